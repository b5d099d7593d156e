use serde::{Deserialize, Serialize};

/// Declared primitive type of an editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
}

/// Rule table scope. Pricing and SEO fields live on the course record but
/// keep their own rule tables; patron fields are validated only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleDomain {
    Course,
    CourseSetting,
    Pricing,
    Seo,
    Patron,
}

impl RuleDomain {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "course" => Some(Self::Course),
            "course_setting" | "setting" | "settings" => Some(Self::CourseSetting),
            "pricing" => Some(Self::Pricing),
            "seo" => Some(Self::Seo),
            "patron" => Some(Self::Patron),
            _ => None,
        }
    }
}

/// Fields stored on the primary course record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourseField {
    CourseName,
    Title,
    Description,
    ShortDescription,
    CategoryId,
    CourseTypeId,
    SpecialityId,
    Level,
    Language,
    Thumbnail,
    Rating,
    TotalEnrollments,
    DurationHours,
    IsFeatured,
    IsPublished,
    Price,
    DiscountPrice,
    Currency,
    Slug,
    MetaTitle,
    MetaDescription,
    MetaKeywords,
    CanonicalUrl,
}

impl CourseField {
    pub const ALL: [CourseField; 23] = [
        Self::CourseName,
        Self::Title,
        Self::Description,
        Self::ShortDescription,
        Self::CategoryId,
        Self::CourseTypeId,
        Self::SpecialityId,
        Self::Level,
        Self::Language,
        Self::Thumbnail,
        Self::Rating,
        Self::TotalEnrollments,
        Self::DurationHours,
        Self::IsFeatured,
        Self::IsPublished,
        Self::Price,
        Self::DiscountPrice,
        Self::Currency,
        Self::Slug,
        Self::MetaTitle,
        Self::MetaDescription,
        Self::MetaKeywords,
        Self::CanonicalUrl,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::CourseName => "course_name",
            Self::Title => "title",
            Self::Description => "description",
            Self::ShortDescription => "short_description",
            Self::CategoryId => "category_id",
            Self::CourseTypeId => "course_type_id",
            Self::SpecialityId => "speciality_id",
            Self::Level => "level",
            Self::Language => "language",
            Self::Thumbnail => "thumbnail",
            Self::Rating => "rating",
            Self::TotalEnrollments => "total_enrollments",
            Self::DurationHours => "duration_hours",
            Self::IsFeatured => "is_featured",
            Self::IsPublished => "is_published",
            Self::Price => "price",
            Self::DiscountPrice => "discount_price",
            Self::Currency => "currency",
            Self::Slug => "slug",
            Self::MetaTitle => "meta_title",
            Self::MetaDescription => "meta_description",
            Self::MetaKeywords => "meta_keywords",
            Self::CanonicalUrl => "canonical_url",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::CategoryId
            | Self::CourseTypeId
            | Self::SpecialityId
            | Self::Rating
            | Self::TotalEnrollments
            | Self::DurationHours
            | Self::Price
            | Self::DiscountPrice => FieldType::Number,
            Self::IsFeatured | Self::IsPublished => FieldType::Boolean,
            Self::CourseName
            | Self::Title
            | Self::Description
            | Self::ShortDescription
            | Self::Level
            | Self::Language
            | Self::Thumbnail
            | Self::Currency
            | Self::Slug
            | Self::MetaTitle
            | Self::MetaDescription
            | Self::MetaKeywords
            | Self::CanonicalUrl => FieldType::String,
        }
    }

    pub const fn domain(&self) -> RuleDomain {
        match self {
            Self::Price | Self::DiscountPrice | Self::Currency => RuleDomain::Pricing,
            Self::Slug
            | Self::MetaTitle
            | Self::MetaDescription
            | Self::MetaKeywords
            | Self::CanonicalUrl => RuleDomain::Seo,
            _ => RuleDomain::Course,
        }
    }
}

/// Fields stored on the course-setting extension record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    Banner,
    Schedule,
    StartDate,
    EndDate,
    DurationWeeks,
    HoursPerWeek,
    DemoVideoUrl,
    DemoLessonUrl,
    Disclosure,
    RefundPolicy,
    Prerequisites,
    LearningOutcomes,
    CertificateEnabled,
    MaxEnrollments,
    Timezone,
}

impl SettingField {
    pub const ALL: [SettingField; 15] = [
        Self::Banner,
        Self::Schedule,
        Self::StartDate,
        Self::EndDate,
        Self::DurationWeeks,
        Self::HoursPerWeek,
        Self::DemoVideoUrl,
        Self::DemoLessonUrl,
        Self::Disclosure,
        Self::RefundPolicy,
        Self::Prerequisites,
        Self::LearningOutcomes,
        Self::CertificateEnabled,
        Self::MaxEnrollments,
        Self::Timezone,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Banner => "banner",
            Self::Schedule => "schedule",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::DurationWeeks => "duration_weeks",
            Self::HoursPerWeek => "hours_per_week",
            Self::DemoVideoUrl => "demo_video_url",
            Self::DemoLessonUrl => "demo_lesson_url",
            Self::Disclosure => "disclosure",
            Self::RefundPolicy => "refund_policy",
            Self::Prerequisites => "prerequisites",
            Self::LearningOutcomes => "learning_outcomes",
            Self::CertificateEnabled => "certificate_enabled",
            Self::MaxEnrollments => "max_enrollments",
            Self::Timezone => "timezone",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::DurationWeeks | Self::HoursPerWeek | Self::MaxEnrollments => FieldType::Number,
            Self::CertificateEnabled => FieldType::Boolean,
            Self::LearningOutcomes => FieldType::Array,
            Self::Banner
            | Self::Schedule
            | Self::StartDate
            | Self::EndDate
            | Self::DemoVideoUrl
            | Self::DemoLessonUrl
            | Self::Disclosure
            | Self::RefundPolicy
            | Self::Prerequisites
            | Self::Timezone => FieldType::String,
        }
    }
}

/// Sponsor fields. Validated on their own, never classified into a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatronField {
    PatronName,
    PatronEmail,
    PatronUrl,
    PatronLogo,
}

impl PatronField {
    pub const ALL: [PatronField; 4] = [
        Self::PatronName,
        Self::PatronEmail,
        Self::PatronUrl,
        Self::PatronLogo,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::PatronName => "patron_name",
            Self::PatronEmail => "patron_email",
            Self::PatronUrl => "patron_url",
            Self::PatronLogo => "patron_logo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Resource tag of a field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Course(CourseField),
    Setting(SettingField),
}

impl Field {
    /// Resolve a flat edit key. Names outside both membership tables yield `None`.
    pub fn resolve(name: &str) -> Option<Self> {
        CourseField::from_name(name)
            .map(Field::Course)
            .or_else(|| SettingField::from_name(name).map(Field::Setting))
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Field::Course(f) => f.name(),
            Field::Setting(f) => f.name(),
        }
    }

    pub const fn field_type(&self) -> FieldType {
        match self {
            Field::Course(f) => f.field_type(),
            Field::Setting(f) => f.field_type(),
        }
    }
}
