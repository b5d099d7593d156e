//! Shallow merges applied after a successful save. Keys that appear in
//! neither the submitted nor the returned fields are left as they were.

use crate::models::{Course, CourseSetting, FieldMap};

const COURSE_KEYS: [&str; 1] = ["id"];
const SETTING_KEYS: [&str; 2] = ["id", "course_id"];

fn apply(target: &mut FieldMap, source: &FieldMap, structural: &[&str]) {
    for (name, value) in source {
        if structural.contains(&name.as_str()) {
            continue;
        }
        target.insert(name.clone(), value.clone());
    }
}

/// Submitted fields first, then whatever the server echoed back.
pub fn merge_course(course: &Course, submitted: &FieldMap, returned: &FieldMap) -> Course {
    let mut merged = course.clone();
    apply(&mut merged.fields, submitted, &COURSE_KEYS);
    apply(&mut merged.fields, returned, &COURSE_KEYS);
    merged
}

pub fn merge_setting(setting: &CourseSetting, submitted: &FieldMap, returned: &FieldMap) -> CourseSetting {
    let mut merged = setting.clone();
    apply(&mut merged.fields, submitted, &SETTING_KEYS);
    apply(&mut merged.fields, returned, &SETTING_KEYS);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn map(value: Value) -> FieldMap {
        match value {
            Value::Object(m) => m,
            _ => FieldMap::new(),
        }
    }

    #[test]
    fn merge_leaves_untouched_fields_alone() {
        let course = Course {
            id: 7,
            fields: map(json!({ "title": "Old", "description": "Keep me" })),
        };

        let merged = merge_course(
            &course,
            &map(json!({ "title": "New" })),
            &map(json!({ "id": 99, "updated_at": "2024-05-01" })),
        );

        assert_eq!(merged.id, 7);
        assert_eq!(merged.fields["title"], json!("New"));
        assert_eq!(merged.fields["description"], json!("Keep me"));
        assert_eq!(merged.fields["updated_at"], json!("2024-05-01"));
    }

    #[test]
    fn returned_fields_win_over_submitted() {
        let setting = CourseSetting { id: 3, course_id: 7, fields: FieldMap::new() };
        let merged = merge_setting(
            &setting,
            &map(json!({ "schedule": "weekly" })),
            &map(json!({ "schedule": "monthly" })),
        );
        assert_eq!(merged.fields["schedule"], json!("monthly"));
    }
}
