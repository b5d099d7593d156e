use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{CacheBucket, InvalidationGate};
use crate::api::CourseApi;
use crate::error::AppError;
use crate::models::{
    CatalogItem, Course, CourseId, CourseLink, CourseSetting, EntryKind, FieldMap, LinkKind,
    SettingId, TextEntry,
};

const CATALOGS: &[CacheBucket] = &[CacheBucket::Catalogs];
const COURSES: &[CacheBucket] = &[CacheBucket::Courses];
const SETTINGS: &[CacheBucket] = &[CacheBucket::CourseSettings, CacheBucket::Courses];

/// `CourseApi` decorator: reads go through the tagged cache, writes through
/// the invalidation gate.
pub struct CachedCourseApi {
    inner: Arc<dyn CourseApi>,
    gate: InvalidationGate,
}

impl CachedCourseApi {
    pub fn new(inner: Arc<dyn CourseApi>, gate: InvalidationGate) -> Self {
        Self { inner, gate }
    }

    async fn cached<T, F>(&self, key: String, buckets: &[CacheBucket], fetch: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T, AppError>>,
    {
        let cache = self.gate.cache();
        if let Some(hit) = cache.get(&key).await {
            if let Ok(value) = serde_json::from_value(hit) {
                return Ok(value);
            }
        }
        let fresh = fetch.await?;
        cache.set(&key, serde_json::to_value(&fresh)?, buckets).await;
        Ok(fresh)
    }
}

#[async_trait]
impl CourseApi for CachedCourseApi {
    async fn list_categories(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.cached("categories".into(), CATALOGS, self.inner.list_categories()).await
    }

    async fn list_course_types(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.cached("course-types".into(), CATALOGS, self.inner.list_course_types()).await
    }

    async fn list_eligibilities(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.cached("eligibilities".into(), CATALOGS, self.inner.list_eligibilities()).await
    }

    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        self.cached("courses".into(), COURSES, self.inner.list_courses()).await
    }

    async fn list_instructors(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.cached("instructors".into(), CATALOGS, self.inner.list_instructors()).await
    }

    async fn list_specialities(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.cached("specialities".into(), CATALOGS, self.inner.list_specialities()).await
    }

    async fn list_accreditation_partners(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.cached("accreditation-partners".into(), CATALOGS, self.inner.list_accreditation_partners())
            .await
    }

    async fn course_links(&self, course_id: CourseId, kind: LinkKind) -> Result<Vec<CourseLink>, AppError> {
        let key = format!("courses/{}/{}", course_id, kind.path());
        self.cached(key, COURSES, self.inner.course_links(course_id, kind)).await
    }

    async fn course_entries(&self, course_id: CourseId, kind: EntryKind) -> Result<Vec<TextEntry>, AppError> {
        let key = format!("courses/{}/{}", course_id, kind.path());
        self.cached(key, COURSES, self.inner.course_entries(course_id, kind)).await
    }

    async fn course_setting(&self, course_id: CourseId) -> Result<Option<CourseSetting>, AppError> {
        let key = format!("courses/{}/settings", course_id);
        self.cached(key, SETTINGS, self.inner.course_setting(course_id)).await
    }

    async fn create_course(&self, fields: &FieldMap) -> Result<Course, AppError> {
        self.gate.guard(COURSES, self.inner.create_course(fields)).await
    }

    async fn update_course(&self, course_id: CourseId, fields: &FieldMap) -> Result<FieldMap, AppError> {
        self.gate.guard(COURSES, self.inner.update_course(course_id, fields)).await
    }

    async fn create_course_setting(&self, course_id: CourseId, fields: &FieldMap) -> Result<CourseSetting, AppError> {
        self.gate
            .guard(&[CacheBucket::CourseSettings], self.inner.create_course_setting(course_id, fields))
            .await
    }

    async fn update_course_setting(&self, setting_id: SettingId, fields: &FieldMap) -> Result<FieldMap, AppError> {
        self.gate
            .guard(&[CacheBucket::CourseSettings], self.inner.update_course_setting(setting_id, fields))
            .await
    }

    async fn add_link(&self, course_id: CourseId, kind: LinkKind, target_id: i64) -> Result<CourseLink, AppError> {
        self.gate.guard(COURSES, self.inner.add_link(course_id, kind, target_id)).await
    }

    async fn remove_link(&self, course_id: CourseId, kind: LinkKind, link_id: i64) -> Result<(), AppError> {
        self.gate.guard(COURSES, self.inner.remove_link(course_id, kind, link_id)).await
    }

    async fn add_entry(&self, course_id: CourseId, kind: EntryKind, text: &str) -> Result<TextEntry, AppError> {
        self.gate.guard(COURSES, self.inner.add_entry(course_id, kind, text)).await
    }

    async fn remove_entry(&self, course_id: CourseId, kind: EntryKind, entry_id: i64) -> Result<(), AppError> {
        self.gate.guard(COURSES, self.inner.remove_entry(course_id, kind, entry_id)).await
    }
}
