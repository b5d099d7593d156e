//! Rule tables, one exhaustive `match` per resource domain.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use url::Url;

use super::FieldRule;
use crate::fields::{numeric_value, string_form};
use crate::models::{CourseField, PatronField, RuleDomain, SettingField};

static DIGITS_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").ok());

static SLUG_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").ok());

static CURRENCY_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").ok());

static DATE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}(T[0-9:.]+(Z|[+-]\d{2}:\d{2}))?$").ok());

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

static LANGUAGE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").ok());

pub const SCHEDULES: [&str; 4] = ["daily", "weekly", "monthly", "self-paced"];
pub const LEVELS: [&str; 4] = ["beginner", "intermediate", "advanced", "all-levels"];
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];

pub fn rule_for(domain: RuleDomain, field: &str) -> Option<FieldRule> {
    match domain {
        RuleDomain::Course | RuleDomain::Pricing | RuleDomain::Seo => CourseField::from_name(field)
            .filter(|f| f.domain() == domain)
            .map(course_rule),
        RuleDomain::CourseSetting => SettingField::from_name(field).map(setting_rule),
        RuleDomain::Patron => PatronField::from_name(field).map(patron_rule),
    }
}

/// Rule of a primary field whatever its sub-domain.
pub fn course_rule_by_name(field: &str) -> Option<FieldRule> {
    CourseField::from_name(field).map(course_rule)
}

pub fn required_fields(domain: RuleDomain) -> Vec<&'static str> {
    match domain {
        RuleDomain::Course | RuleDomain::Pricing | RuleDomain::Seo => CourseField::ALL
            .into_iter()
            .filter(|f| f.domain() == domain && course_rule(*f).required)
            .map(|f| f.name())
            .collect(),
        RuleDomain::CourseSetting => SettingField::ALL
            .into_iter()
            .filter(|f| setting_rule(*f).required)
            .map(|f| f.name())
            .collect(),
        RuleDomain::Patron => PatronField::ALL
            .into_iter()
            .filter(|f| patron_rule(*f).required)
            .map(|f| f.name())
            .collect(),
    }
}

pub fn course_rule(field: CourseField) -> FieldRule {
    let rule = FieldRule::new();
    match field {
        CourseField::CourseName => rule.required().min_length(3).max_length(150),
        CourseField::Title => rule.required().min_length(3).max_length(200),
        CourseField::Description => rule.max_length(5000),
        CourseField::ShortDescription => rule.max_length(500),
        CourseField::CategoryId | CourseField::CourseTypeId => {
            rule.required().pattern(&DIGITS_PATTERN, "must be a number").min(1.0).custom(whole_number)
        }
        CourseField::SpecialityId => rule.pattern(&DIGITS_PATTERN, "must be a number").min(1.0).custom(whole_number),
        CourseField::Level => rule.custom(level_choice),
        CourseField::Language => rule.pattern(&LANGUAGE_PATTERN, "must be a language code like en or en-US"),
        CourseField::Thumbnail => rule.max_length(500).custom(image_url),
        CourseField::Rating => rule.pattern(&DIGITS_PATTERN, "must contain digits only").custom(rating_scale),
        CourseField::TotalEnrollments => {
            rule.pattern(&DIGITS_PATTERN, "must be a number").min(0.0).custom(whole_number)
        }
        CourseField::DurationHours => rule.pattern(&DIGITS_PATTERN, "must be a number").min(0.0).max(10_000.0),
        CourseField::IsFeatured | CourseField::IsPublished => rule.custom(binary_flag),
        CourseField::Price | CourseField::DiscountPrice => {
            rule.pattern(&DIGITS_PATTERN, "must be a number").min(0.0).max(1_000_000.0)
        }
        CourseField::Currency => rule.pattern(&CURRENCY_PATTERN, "must be a three-letter ISO code"),
        CourseField::Slug => rule
            .min_length(3)
            .max_length(120)
            .pattern(&SLUG_PATTERN, "may contain lowercase letters, digits and hyphens only"),
        CourseField::MetaTitle => rule.max_length(60),
        CourseField::MetaDescription => rule.max_length(160),
        CourseField::MetaKeywords => rule.max_length(255),
        CourseField::CanonicalUrl => rule.max_length(500).custom(web_url),
    }
}

pub fn setting_rule(field: SettingField) -> FieldRule {
    let rule = FieldRule::new();
    match field {
        SettingField::Banner => rule.max_length(500).custom(image_url),
        SettingField::Schedule => rule.custom(schedule_choice),
        SettingField::StartDate | SettingField::EndDate => {
            rule.pattern(&DATE_PATTERN, "must be a date like 2024-01-31").custom(calendar_date)
        }
        SettingField::DurationWeeks => rule.pattern(&DIGITS_PATTERN, "must be a number").min(1.0).max(520.0),
        SettingField::HoursPerWeek => rule.pattern(&DIGITS_PATTERN, "must be a number").min(0.0).max(168.0),
        SettingField::DemoVideoUrl | SettingField::DemoLessonUrl => rule.max_length(500).custom(web_url),
        SettingField::Disclosure | SettingField::RefundPolicy | SettingField::Prerequisites => {
            rule.max_length(2000)
        }
        SettingField::LearningOutcomes => rule.custom(text_list),
        SettingField::CertificateEnabled => rule.custom(binary_flag),
        SettingField::MaxEnrollments => {
            rule.pattern(&DIGITS_PATTERN, "must be a number").min(0.0).custom(whole_number)
        }
        SettingField::Timezone => rule.max_length(64),
    }
}

pub fn patron_rule(field: PatronField) -> FieldRule {
    let rule = FieldRule::new();
    match field {
        PatronField::PatronName => rule.required().min_length(2).max_length(100),
        PatronField::PatronEmail => rule.max_length(254).pattern(&EMAIL_PATTERN, "must be a valid email address"),
        PatronField::PatronUrl => rule.custom(web_url),
        PatronField::PatronLogo => rule.custom(image_url),
    }
}

fn binary_flag(value: &Value) -> Option<String> {
    let ok = match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_f64(), Some(f) if f == 0.0 || f == 1.0),
        Value::String(s) => matches!(s.as_str(), "0" | "1" | "true" | "false"),
        _ => false,
    };
    (!ok).then(|| "Value must be 0 or 1".to_string())
}

fn rating_scale(value: &Value) -> Option<String> {
    match numeric_value(value) {
        Some(r) if (0.0..=5.0).contains(&r) => None,
        _ => Some("Rating must be between 0 and 5".to_string()),
    }
}

fn whole_number(value: &Value) -> Option<String> {
    match numeric_value(value) {
        Some(n) if n.fract() == 0.0 => None,
        _ => Some("Value must be a whole number".to_string()),
    }
}

fn schedule_choice(value: &Value) -> Option<String> {
    let text = string_form(value);
    (!SCHEDULES.contains(&text.as_str()))
        .then(|| format!("Schedule must be one of: {}", SCHEDULES.join(", ")))
}

fn level_choice(value: &Value) -> Option<String> {
    let text = string_form(value);
    (!LEVELS.contains(&text.as_str())).then(|| format!("Level must be one of: {}", LEVELS.join(", ")))
}

fn parse_web_url(value: &Value) -> Option<Url> {
    Url::parse(value.as_str()?.trim())
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
}

fn web_url(value: &Value) -> Option<String> {
    parse_web_url(value)
        .is_none()
        .then(|| "Must be a valid http(s) URL".to_string())
}

fn image_url(value: &Value) -> Option<String> {
    let Some(url) = parse_web_url(value) else {
        return Some("Must be a valid http(s) URL".to_string());
    };
    let extension = url
        .path()
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    (!IMAGE_EXTENSIONS.contains(&extension.as_str()))
        .then(|| format!("Image must end in one of: {}", IMAGE_EXTENSIONS.join(", ")))
}

fn calendar_date(value: &Value) -> Option<String> {
    super::parse_date(value)
        .is_none()
        .then(|| "Must be a real calendar date".to_string())
}

fn text_list(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) if items.iter().all(Value::is_string) => None,
        _ => Some("Must be a list of text entries".to_string()),
    }
}
