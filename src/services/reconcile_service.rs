use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{error::AppError, api::CourseApi};
use crate::fields::{ClassifiedEdits, classify};
use crate::models::{Course, CourseSetting, FieldMap, SettingState, SettingWrite};
use crate::services::merge::{merge_course, merge_setting};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingOutcome {
    Created,
    Updated,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileOutcome {
    pub course_updated: bool,
    pub setting: Option<SettingOutcome>,
    pub course_fields: Vec<String>,
    pub setting_fields: Vec<String>,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        !self.course_updated && self.setting.is_none()
    }
}

/// What a save would write, before anything is sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub classified: ClassifiedEdits,
    pub course_changes: FieldMap,
}

impl ChangeSet {
    pub fn detect(baseline: &Course, edits: &FieldMap) -> Self {
        let classified = classify(edits);
        let course_changes = classified.course_changes(baseline);
        Self { classified, course_changes }
    }

    /// Diff test against the fetched course.
    pub fn has_course_changes(&self) -> bool {
        !self.course_changes.is_empty()
    }

    /// Presence test: any submitted settings field is a change.
    pub fn has_setting_changes(&self) -> bool {
        self.classified.has_setting_changes()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_course_changes() && !self.has_setting_changes()
    }
}

/// Rolls an in-flight settings write back to its previous state when the
/// save ends without reaching `finish`, including when the future is dropped.
struct PendingWrite<'a> {
    state: &'a mut SettingState,
    armed: bool,
}

impl<'a> PendingWrite<'a> {
    fn new(state: &'a mut SettingState, armed: bool) -> Self {
        Self { state, armed }
    }

    fn state(&self) -> &SettingState {
        &*self.state
    }

    fn finish(mut self, apply: impl FnOnce(&mut SettingState)) {
        apply(&mut *self.state);
        self.armed = false;
    }
}

impl Drop for PendingWrite<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.abort_write();
            debug!("settings write rolled back to {:?}", self.state);
        }
    }
}

enum SettingResult {
    Created(CourseSetting),
    Updated(FieldMap),
}

pub struct ReconcileService {
    api: Arc<dyn CourseApi>,
}

impl ReconcileService {
    pub fn new(api: Arc<dyn CourseApi>) -> Self {
        Self { api }
    }

    /// Diff, validate, dispatch and merge one save.
    ///
    /// `course` and `setting` are the last fetched baselines and receive the
    /// merged result. On any validation or network failure neither is changed.
    pub async fn reconcile(
        &self,
        course: &mut Course,
        setting: &mut SettingState,
        edits: &FieldMap,
    ) -> Result<ReconcileOutcome, AppError> {
        let changes = ChangeSet::detect(course, edits);
        if changes.is_empty() {
            debug!("Nothing to save for course {}", course.id);
            return Ok(ReconcileOutcome::default());
        }

        changes
            .classified
            .validate_subset(edits, &changes.course_changes)
            .into_result()?;

        let setting_write = if changes.has_setting_changes() {
            let write = setting.begin_write().ok_or_else(|| {
                AppError::Conflict("A settings save is already in progress".to_string())
            })?;
            Some(write)
        } else {
            None
        };

        let pending = PendingWrite::new(setting, setting_write.is_some());

        let course_id = course.id;
        info!(
            "Saving course {}: {} primary field(s), settings {:?}",
            course_id,
            changes.course_changes.len(),
            setting_write
        );

        let api = &self.api;
        let course_fields = &changes.course_changes;
        let setting_fields = &changes.classified.setting;

        let course_call = async {
            if course_fields.is_empty() {
                return Ok(None);
            }
            api.update_course(course_id, course_fields).await.map(Some)
        };
        let setting_call = async {
            match setting_write {
                Some(SettingWrite::Create) => api
                    .create_course_setting(course_id, setting_fields)
                    .await
                    .map(|created| Some(SettingResult::Created(created))),
                Some(SettingWrite::Update(id)) => api
                    .update_course_setting(id, setting_fields)
                    .await
                    .map(|echo| Some(SettingResult::Updated(echo))),
                None => Ok(None),
            }
        };

        let (course_echo, setting_result) = match tokio::try_join!(course_call, setting_call) {
            Ok(results) => results,
            Err(e) => {
                warn!("Save for course {} failed, nothing merged: {}", course_id, e);
                return Err(e);
            }
        };

        let mut outcome = ReconcileOutcome {
            course_fields: course_fields.keys().cloned().collect(),
            setting_fields: setting_fields.keys().cloned().collect(),
            ..Default::default()
        };

        if let Some(echo) = course_echo {
            *course = merge_course(course, course_fields, &echo);
            outcome.course_updated = true;
        }

        match setting_result {
            Some(SettingResult::Created(created)) => {
                info!("Created settings record {} for course {}", created.id, course_id);
                pending.finish(|state| state.finish_create(created));
                outcome.setting = Some(SettingOutcome::Created);
            }
            Some(SettingResult::Updated(echo)) => {
                if let SettingState::Updating(current) = pending.state() {
                    let merged = merge_setting(current, setting_fields, &echo);
                    pending.finish(|state| state.finish_update(merged));
                }
                outcome.setting = Some(SettingOutcome::Updated);
            }
            None => {}
        }

        Ok(outcome)
    }
}
