use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields::{CourseField, SettingField};

/// Flat field-name → value map, the shape of edits and payloads.
pub type FieldMap = Map<String, Value>;

pub type CourseId = i64;
pub type SettingId = i64;

/// Primary course record as last fetched from the backend.
///
/// Only `id` is structural; every editable attribute lives in `fields` so a
/// shallow merge never has to know the server's full schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl Course {
    pub fn new(id: CourseId) -> Self {
        Self { id, fields: FieldMap::new() }
    }

    pub fn get(&self, field: CourseField) -> Option<&Value> {
        self.fields.get(field.name())
    }

    pub fn title(&self) -> Option<&str> {
        self.get(CourseField::Title).and_then(Value::as_str)
    }

    pub fn course_name(&self) -> Option<&str> {
        self.get(CourseField::CourseName).and_then(Value::as_str)
    }
}

/// 1:1 extension of a course. Its existence is the presence of a loaded `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseSetting {
    pub id: SettingId,
    #[serde(default)]
    pub course_id: CourseId,
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl CourseSetting {
    pub fn get(&self, field: SettingField) -> Option<&Value> {
        self.fields.get(field.name())
    }
}

/// Lifecycle of the extension record for one editor session.
///
/// `Creating` and `Updating` mark a write in flight; a second write cannot
/// begin until the first one finishes or aborts.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SettingState {
    #[default]
    Unloaded,
    Creating,
    Loaded(CourseSetting),
    Updating(CourseSetting),
}

/// Which extension call a save needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingWrite {
    Create,
    Update(SettingId),
}

impl SettingState {
    pub fn from_lookup(setting: Option<CourseSetting>) -> Self {
        match setting {
            Some(s) => SettingState::Loaded(s),
            None => SettingState::Unloaded,
        }
    }

    /// The server-authoritative record, if one exists.
    pub fn record(&self) -> Option<&CourseSetting> {
        match self {
            SettingState::Loaded(s) | SettingState::Updating(s) => Some(s),
            SettingState::Unloaded | SettingState::Creating => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, SettingState::Creating | SettingState::Updating(_))
    }

    pub fn begin_write(&mut self) -> Option<SettingWrite> {
        match std::mem::take(self) {
            SettingState::Unloaded => {
                *self = SettingState::Creating;
                Some(SettingWrite::Create)
            }
            SettingState::Loaded(s) => {
                let id = s.id;
                *self = SettingState::Updating(s);
                Some(SettingWrite::Update(id))
            }
            in_flight => {
                *self = in_flight;
                None
            }
        }
    }

    pub fn finish_create(&mut self, created: CourseSetting) {
        *self = SettingState::Loaded(created);
    }

    pub fn finish_update(&mut self, merged: CourseSetting) {
        *self = SettingState::Loaded(merged);
    }

    pub fn abort_write(&mut self) {
        *self = match std::mem::take(self) {
            SettingState::Creating => SettingState::Unloaded,
            SettingState::Updating(s) => SettingState::Loaded(s),
            other => other,
        };
    }
}
