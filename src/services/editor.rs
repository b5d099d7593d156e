use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::{error::AppError, api::CourseApi};
use crate::fields::classify;
use crate::models::{
    Catalogs, Course, CourseId, CourseLink, CourseSetting, EntryKind, FieldMap, LinkKind,
    LinkedCollections, RuleDomain, SettingState, TextEntry,
};
use crate::services::fetch_service::FetchService;
use crate::services::reconcile_service::{ReconcileOutcome, ReconcileService};
use crate::validation::{FieldErrors, ValidationError, validate_all, validate_complete};

/// Editing state of one course.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    pub course: Course,
    pub setting: SettingState,
    pub linked: LinkedCollections,
    pub catalogs: Catalogs,
    pub field_errors: FieldErrors,
    /// Set once an open has installed a server baseline.
    pub loaded: bool,
}

impl EditorSession {
    pub fn new(course_id: CourseId) -> Self {
        Self { course: Course::new(course_id), ..Default::default() }
    }

    /// Forget everything scoped to the previous course.
    pub fn reset_for(&mut self, course_id: CourseId) {
        self.course = Course::new(course_id);
        self.setting = SettingState::Unloaded;
        self.linked = LinkedCollections::default();
        self.field_errors.clear();
        self.loaded = false;
    }

    /// Writes need a fetched baseline to diff against and to pick create vs update.
    fn ensure_loaded(&self) -> Result<(), AppError> {
        if self.loaded {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            course: self.course.clone(),
            setting: self.setting.record().cloned(),
            loaded: self.loaded,
            saving: self.setting.is_in_flight(),
            linked: self.linked.clone(),
            field_errors: self.field_errors.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EditorSnapshot {
    pub course: Course,
    pub setting: Option<CourseSetting>,
    pub loaded: bool,
    pub saving: bool,
    pub linked: LinkedCollections,
    pub field_errors: Vec<ValidationError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedCourse {
    pub course: Course,
    pub setting: Option<CourseSetting>,
}

/// Drives the fetch, save and selection flows for editor sessions.
pub struct CourseEditor {
    api: Arc<dyn CourseApi>,
    fetcher: FetchService,
    reconciler: ReconcileService,
}

impl CourseEditor {
    pub fn new(api: Arc<dyn CourseApi>) -> Self {
        Self {
            fetcher: FetchService::new(api.clone()),
            reconciler: ReconcileService::new(api.clone()),
            api,
        }
    }

    pub async fn load_catalogs(&self) -> Result<Catalogs, AppError> {
        self.fetcher.load_catalogs().await
    }

    /// Select a course: run both fetch phases, then replace per-course state.
    ///
    /// A failed re-open of the same course keeps the previous baseline. A
    /// failed switch to another course leaves the session unloaded.
    pub async fn open(&self, session: &mut EditorSession, course_id: CourseId) -> Result<(), AppError> {
        if session.course.id != course_id {
            session.reset_for(course_id);
        }

        let catalogs = self.fetcher.load_catalogs().await?;
        let course = catalogs.find_course(course_id).cloned().ok_or(AppError::NotFound)?;
        let scope = self.fetcher.load_course_scope(course_id).await;

        session.reset_for(course_id);
        session.loaded = true;
        session.course = course;
        session.catalogs = catalogs;
        session.linked = scope.linked;
        session.setting = SettingState::from_lookup(scope.setting);
        info!("Opened course {} for editing", course_id);
        Ok(())
    }

    pub async fn save(&self, session: &mut EditorSession, edits: &FieldMap) -> Result<ReconcileOutcome, AppError> {
        session.ensure_loaded()?;
        let result = self
            .reconciler
            .reconcile(&mut session.course, &mut session.setting, edits)
            .await;
        match &result {
            Ok(_) => session.field_errors.clear(),
            Err(AppError::Validation(errors)) => session.field_errors.replace_with(errors),
            Err(_) => {}
        }
        result
    }

    /// Live check of individual fields while the user types.
    pub fn revalidate(&self, session: &mut EditorSession, edits: &FieldMap) -> Vec<ValidationError> {
        for (name, value) in edits {
            let domain = domain_of(name);
            session.field_errors.revalidate(domain, name, Some(value));
        }
        session.field_errors.to_vec()
    }

    /// New-course mode: the full course domain must validate, then the
    /// course is created and, if settings fields were supplied, its settings.
    pub async fn create_course(&self, edits: &FieldMap) -> Result<CreatedCourse, AppError> {
        let classified = classify(edits);
        let mut errors = Vec::new();
        errors.extend(validate_complete(RuleDomain::Course, edits).errors);
        errors.extend(validate_all(RuleDomain::Pricing, edits).errors);
        errors.extend(validate_all(RuleDomain::Seo, edits).errors);
        errors.extend(validate_all(RuleDomain::CourseSetting, &classified.setting).errors);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let course = self.api.create_course(&classified.course).await?;
        info!("Created course {}", course.id);

        let setting = if classified.setting.is_empty() {
            None
        } else {
            Some(self.api.create_course_setting(course.id, &classified.setting).await?)
        };

        Ok(CreatedCourse { course, setting })
    }

    pub async fn link(&self, session: &mut EditorSession, kind: LinkKind, target_id: i64) -> Result<CourseLink, AppError> {
        session.ensure_loaded()?;
        let link = self.api.add_link(session.course.id, kind, target_id).await?;
        session.linked.links_mut(kind).push(link.clone());
        Ok(link)
    }

    pub async fn unlink(&self, session: &mut EditorSession, kind: LinkKind, link_id: i64) -> Result<(), AppError> {
        session.ensure_loaded()?;
        self.api.remove_link(session.course.id, kind, link_id).await?;
        session.linked.links_mut(kind).retain(|l| l.id != link_id);
        Ok(())
    }

    pub async fn add_entry(&self, session: &mut EditorSession, kind: EntryKind, text: &str) -> Result<TextEntry, AppError> {
        session.ensure_loaded()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("Entry text must not be empty".to_string()));
        }
        let entry = self.api.add_entry(session.course.id, kind, text).await?;
        session.linked.entries_mut(kind).push(entry.clone());
        Ok(entry)
    }

    pub async fn remove_entry(&self, session: &mut EditorSession, kind: EntryKind, entry_id: i64) -> Result<(), AppError> {
        session.ensure_loaded()?;
        self.api.remove_entry(session.course.id, kind, entry_id).await?;
        session.linked.entries_mut(kind).retain(|e| e.id != entry_id);
        Ok(())
    }
}

/// Rule domain a flat edit key is checked against.
pub fn domain_of(name: &str) -> RuleDomain {
    use crate::models::{CourseField, PatronField, SettingField};

    if let Some(f) = CourseField::from_name(name) {
        f.domain()
    } else if SettingField::from_name(name).is_some() {
        RuleDomain::CourseSetting
    } else if PatronField::from_name(name).is_some() {
        RuleDomain::Patron
    } else {
        RuleDomain::Course
    }
}
