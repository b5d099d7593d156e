#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use course_admin::api::CourseApi;
use course_admin::error::AppError;
use course_admin::models::{
    CatalogItem, Course, CourseId, CourseLink, CourseSetting, EntryKind, FieldMap, LinkKind,
    SettingId, TextEntry,
};
use serde_json::{Value, json};

pub fn map(value: Value) -> FieldMap {
    match value {
        Value::Object(m) => m,
        other => panic!("expected an object, got {}", other),
    }
}

pub fn course(id: CourseId, fields: Value) -> Course {
    Course { id, fields: map(fields) }
}

pub fn item(id: i64, name: &str) -> CatalogItem {
    CatalogItem { id, name: name.to_string(), extra: FieldMap::new() }
}

/// In-memory backend that records every call and fails the ones it is told to.
#[derive(Default)]
pub struct MockCourseApi {
    pub courses: Vec<Course>,
    pub setting: Option<CourseSetting>,
    pub keywords: Vec<TextEntry>,
    pub instructors: Vec<CourseLink>,
    failing: HashSet<&'static str>,
    stalled: HashSet<&'static str>,
    calls: Mutex<Vec<String>>,
}

impl MockCourseApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    pub fn with_setting(mut self, setting: CourseSetting) -> Self {
        self.setting = Some(setting);
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<TextEntry>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_instructors(mut self, instructors: Vec<CourseLink>) -> Self {
        self.instructors = instructors;
        self
    }

    pub fn failing(mut self, call: &'static str) -> Self {
        self.failing.insert(call);
        self
    }

    /// The named call never completes in a test's lifetime.
    pub fn stalling(mut self, call: &'static str) -> Self {
        self.stalled.insert(call);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| {
                c.starts_with("create_")
                    || c.starts_with("update_")
                    || c.starts_with("add_")
                    || c.starts_with("remove_")
            })
            .count()
    }

    async fn stall(&self, call: &str) {
        if self.stalled.contains(call) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    }

    fn record(&self, call: &str) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.failing.contains(call) {
            return Err(AppError::Http { status: 500, message: format!("{} exploded", call) });
        }
        Ok(())
    }
}

#[async_trait]
impl CourseApi for MockCourseApi {
    async fn list_categories(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.record("list_categories")?;
        Ok(vec![item(1, "Engineering"), item(2, "Medicine")])
    }

    async fn list_course_types(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.record("list_course_types")?;
        Ok(vec![item(1, "Online"), item(2, "Hybrid")])
    }

    async fn list_eligibilities(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.record("list_eligibilities")?;
        Ok(vec![item(1, "Graduates")])
    }

    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        self.record("list_courses")?;
        Ok(self.courses.clone())
    }

    async fn list_instructors(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.record("list_instructors")?;
        Ok(vec![item(10, "Dr. Rivera"), item(11, "Prof. Okafor")])
    }

    async fn list_specialities(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.record("list_specialities")?;
        Ok(vec![item(1, "Cardiology")])
    }

    async fn list_accreditation_partners(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.record("list_accreditation_partners")?;
        Ok(vec![item(1, "Board of Education")])
    }

    async fn course_links(&self, _course_id: CourseId, kind: LinkKind) -> Result<Vec<CourseLink>, AppError> {
        self.record(&format!("course_links:{}", kind.path()))?;
        Ok(match kind {
            LinkKind::Instructors => self.instructors.clone(),
            _ => Vec::new(),
        })
    }

    async fn course_entries(&self, _course_id: CourseId, kind: EntryKind) -> Result<Vec<TextEntry>, AppError> {
        self.record(&format!("course_entries:{}", kind.path()))?;
        Ok(match kind {
            EntryKind::Keywords => self.keywords.clone(),
            EntryKind::IntendedAudiences => Vec::new(),
        })
    }

    async fn course_setting(&self, _course_id: CourseId) -> Result<Option<CourseSetting>, AppError> {
        self.record("course_setting")?;
        Ok(self.setting.clone())
    }

    async fn create_course(&self, fields: &FieldMap) -> Result<Course, AppError> {
        self.record("create_course")?;
        Ok(Course { id: 500, fields: fields.clone() })
    }

    async fn update_course(&self, _course_id: CourseId, _fields: &FieldMap) -> Result<FieldMap, AppError> {
        self.stall("update_course").await;
        self.record("update_course")?;
        Ok(map(json!({ "updated_at": "2024-06-01T00:00:00Z" })))
    }

    async fn create_course_setting(&self, course_id: CourseId, fields: &FieldMap) -> Result<CourseSetting, AppError> {
        self.stall("create_course_setting").await;
        self.record("create_course_setting")?;
        Ok(CourseSetting { id: 900, course_id, fields: fields.clone() })
    }

    async fn update_course_setting(&self, _setting_id: SettingId, _fields: &FieldMap) -> Result<FieldMap, AppError> {
        self.stall("update_course_setting").await;
        self.record("update_course_setting")?;
        Ok(FieldMap::new())
    }

    async fn add_link(&self, course_id: CourseId, kind: LinkKind, target_id: i64) -> Result<CourseLink, AppError> {
        self.record(&format!("add_link:{}", kind.path()))?;
        Ok(CourseLink { id: 70, course_id, target_id, extra: FieldMap::new() })
    }

    async fn remove_link(&self, _course_id: CourseId, kind: LinkKind, _link_id: i64) -> Result<(), AppError> {
        self.record(&format!("remove_link:{}", kind.path()))
    }

    async fn add_entry(&self, course_id: CourseId, kind: EntryKind, text: &str) -> Result<TextEntry, AppError> {
        self.record(&format!("add_entry:{}", kind.path()))?;
        Ok(TextEntry { id: 80, course_id, text: text.to_string() })
    }

    async fn remove_entry(&self, _course_id: CourseId, kind: EntryKind, _entry_id: i64) -> Result<(), AppError> {
        self.record(&format!("remove_entry:{}", kind.path()))
    }
}
