pub mod rules;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::{ClassifiedEdits, numeric_value, string_form};
use crate::models::{FieldMap, RuleDomain, SettingField};

pub use rules::rule_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Required,
    Length,
    Format,
    Range,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
}

impl ValidationError {
    pub fn new(field: &str, kind: RuleKind, message: impl Into<String>) -> Self {
        Self { field: field.to_string(), message: message.into(), kind }
    }
}

/// A domain check that returns an error message, or `None` when satisfied.
pub type CustomCheck = fn(&Value) -> Option<String>;

/// Regex shared by every rule that references it.
pub type Pattern = &'static LazyLock<Option<Regex>>;

/// Declarative constraints for one field.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<(Pattern, &'static str)>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub custom: Option<CustomCheck>,
}

impl FieldRule {
    pub const fn new() -> Self {
        Self {
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            min: None,
            max: None,
            custom: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub const fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub const fn pattern(mut self, pattern: Pattern, message: &'static str) -> Self {
        self.pattern = Some((pattern, message));
        self
    }

    pub const fn min(mut self, n: f64) -> Self {
        self.min = Some(n);
        self
    }

    pub const fn max(mut self, n: f64) -> Self {
        self.max = Some(n);
        self
    }

    pub const fn custom(mut self, check: CustomCheck) -> Self {
        self.custom = Some(check);
        self
    }
}

/// Missing, null, whitespace-only text, or an empty array.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// "course_name" -> "Course name"
pub fn field_label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Check one value against its rule. The first failing check wins.
pub fn validate(field: &str, value: Option<&Value>, rule: &FieldRule) -> Option<ValidationError> {
    let label = field_label(field);

    if is_blank(value) {
        if rule.required {
            return Some(ValidationError::new(field, RuleKind::Required, format!("{} is required", label)));
        }
        return None;
    }
    let value = value?;
    let text = string_form(value);
    let length = text.chars().count();

    if let Some(min) = rule.min_length {
        if length < min {
            return Some(ValidationError::new(
                field,
                RuleKind::Length,
                format!("{} must be at least {} characters", label, min),
            ));
        }
    }
    if let Some(max) = rule.max_length {
        if length > max {
            return Some(ValidationError::new(
                field,
                RuleKind::Length,
                format!("{} must be at most {} characters", label, max),
            ));
        }
    }

    if let Some((pattern, message)) = rule.pattern {
        if let Some(regex) = pattern.as_ref() {
            if !regex.is_match(&text) {
                return Some(ValidationError::new(field, RuleKind::Format, format!("{} {}", label, message)));
            }
        }
    }

    if let Some(number) = numeric_value(value) {
        if let Some(min) = rule.min {
            if number < min {
                return Some(ValidationError::new(
                    field,
                    RuleKind::Range,
                    format!("{} must be at least {}", label, min),
                ));
            }
        }
        if let Some(max) = rule.max {
            if number > max {
                return Some(ValidationError::new(
                    field,
                    RuleKind::Range,
                    format!("{} must be at most {}", label, max),
                ));
            }
        }
    }

    if let Some(check) = rule.custom {
        if let Some(message) = check(value) {
            return Some(ValidationError::new(field, RuleKind::Custom, message));
        }
    }

    None
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self { is_valid: errors.is_empty(), errors }
    }

    pub fn into_result(self) -> Result<(), crate::error::AppError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(crate::error::AppError::Validation(self.errors))
        }
    }
}

/// Validate a whole edit map against one domain's rule table.
///
/// Fields without a rule in `domain` are not checked. Setting-domain maps
/// also get the start/end date ordering check.
pub fn validate_all(domain: RuleDomain, edits: &FieldMap) -> ValidationReport {
    let mut errors: Vec<ValidationError> = edits
        .iter()
        .filter_map(|(name, value)| {
            let rule = rule_for(domain, name)?;
            validate(name, Some(value), &rule)
        })
        .collect();

    if domain == RuleDomain::CourseSetting {
        push_date_order(edits, &mut errors);
    }
    ValidationReport::from_errors(errors)
}

/// Like [`validate_all`] but also reports required fields that are absent.
pub fn validate_complete(domain: RuleDomain, edits: &FieldMap) -> ValidationReport {
    let mut report = validate_all(domain, edits);
    for name in rules::required_fields(domain) {
        if !edits.contains_key(name) {
            report.errors.push(ValidationError::new(
                name,
                RuleKind::Required,
                format!("{} is required", field_label(name)),
            ));
        }
    }
    report.is_valid = report.errors.is_empty();
    report
}

/// Validate the raw submitted values of the fields a save will write.
pub fn validate_changes(raw: &FieldMap, course: &FieldMap, setting: &FieldMap) -> ValidationReport {
    let mut errors = Vec::new();

    for name in course.keys() {
        let Some(rule) = rules::course_rule_by_name(name) else { continue };
        if let Some(e) = validate(name, raw.get(name).or(course.get(name)), &rule) {
            errors.push(e);
        }
    }

    let mut setting_values = FieldMap::new();
    for name in setting.keys() {
        let value = raw.get(name).or(setting.get(name)).cloned().unwrap_or(Value::Null);
        setting_values.insert(name.clone(), value);
    }
    errors.extend(validate_all(RuleDomain::CourseSetting, &setting_values).errors);

    ValidationReport::from_errors(errors)
}

impl ClassifiedEdits {
    /// Validate the changed primary fields and every submitted settings field.
    pub fn validate_subset(&self, raw: &FieldMap, course_changes: &FieldMap) -> ValidationReport {
        validate_changes(raw, course_changes, &self.setting)
    }
}

fn push_date_order(edits: &FieldMap, errors: &mut Vec<ValidationError>) {
    let start_name = SettingField::StartDate.name();
    let end_name = SettingField::EndDate.name();
    if errors.iter().any(|e| e.field == end_name) {
        return;
    }
    let (Some(start), Some(end)) = (
        edits.get(start_name).and_then(parse_date),
        edits.get(end_name).and_then(parse_date),
    ) else {
        return;
    };
    if start >= end {
        errors.push(ValidationError::new(
            end_name,
            RuleKind::Custom,
            "End date must be after the start date",
        ));
    }
}

pub(crate) fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Current per-field errors of an editing form, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldErrors {
    errors: BTreeMap<String, ValidationError>,
}

impl FieldErrors {
    /// Re-check a single field, replacing or clearing its previous error.
    pub fn revalidate(&mut self, domain: RuleDomain, field: &str, value: Option<&Value>) -> Option<&ValidationError> {
        let outcome = rule_for(domain, field).and_then(|rule| validate(field, value, &rule));
        match outcome {
            Some(e) => {
                self.errors.insert(field.to_string(), e);
                self.errors.get(field)
            }
            None => {
                self.errors.remove(field);
                None
            }
        }
    }

    /// Replace the whole book with an aggregated report.
    pub fn replace_with(&mut self, errors: &[ValidationError]) {
        self.errors.clear();
        for e in errors {
            self.errors.entry(e.field.clone()).or_insert_with(|| e.clone());
        }
    }

    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors.get(field)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_vec(&self) -> Vec<ValidationError> {
        self.errors.values().cloned().collect()
    }
}
