pub mod coerce;

use serde_json::Value;
use tracing::debug;

use crate::models::{Course, CourseField, Field, FieldMap, SettingField};

pub use coerce::{coerce, numeric_value, string_form, values_differ};

/// An edit map split by resource, each side coerced to declared types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedEdits {
    pub course: FieldMap,
    pub setting: FieldMap,
}

impl ClassifiedEdits {
    pub fn is_empty(&self) -> bool {
        self.course.is_empty() && self.setting.is_empty()
    }

    /// Primary fields whose coerced value differs from the baseline record.
    pub fn course_changes(&self, baseline: &Course) -> FieldMap {
        self.course
            .iter()
            .filter(|(name, value)| values_differ(value, baseline.fields.get(name.as_str())))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Every submitted extension field counts as a change.
    pub fn has_setting_changes(&self) -> bool {
        !self.setting.is_empty()
    }
}

/// Partition a flat edit map into primary and extension payloads.
///
/// Keys outside both membership tables are dropped.
pub fn classify(edits: &FieldMap) -> ClassifiedEdits {
    let mut classified = ClassifiedEdits::default();

    for (name, raw) in edits {
        let Some(field) = Field::resolve(name) else {
            debug!("dropping unclassified edit field {}", name);
            continue;
        };
        let value = coerce(Some(raw.clone()), field.field_type()).unwrap_or(Value::Null);
        match field {
            Field::Course(_) => classified.course.insert(name.clone(), value),
            Field::Setting(_) => classified.setting.insert(name.clone(), value),
        };
    }

    classified
}

/// Names present in both membership tables. Always empty.
pub fn overlapping_field_names() -> Vec<&'static str> {
    CourseField::ALL
        .iter()
        .map(CourseField::name)
        .filter(|name| SettingField::from_name(name).is_some())
        .collect()
}
