use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::course::{Course, CourseId};

/// A row of any lookup catalog (categories, course types, instructors, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    #[serde(default, alias = "title", alias = "full_name", alias = "label")]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Phase-1 data shared by every course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalogs {
    pub categories: Vec<CatalogItem>,
    pub course_types: Vec<CatalogItem>,
    pub eligibilities: Vec<CatalogItem>,
    pub courses: Vec<Course>,
    pub instructors: Vec<CatalogItem>,
    pub specialities: Vec<CatalogItem>,
    pub accreditation_partners: Vec<CatalogItem>,
}

impl Catalogs {
    pub fn find_course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }
}

/// Association collections that point a course at a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    Eligibilities,
    Instructors,
    AccreditationPartners,
}

impl LinkKind {
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Eligibilities => "eligibilities",
            Self::Instructors => "instructors",
            Self::AccreditationPartners => "accreditation-partners",
        }
    }

    /// Name of the foreign key sent when creating a link.
    pub const fn target_key(&self) -> &'static str {
        match self {
            Self::Eligibilities => "eligibility_id",
            Self::Instructors => "instructor_id",
            Self::AccreditationPartners => "accreditation_partner_id",
        }
    }
}

/// Free-text collections owned by a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    Keywords,
    IntendedAudiences,
}

impl EntryKind {
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Keywords => "keywords",
            Self::IntendedAudiences => "intended-audiences",
        }
    }

    pub const fn text_key(&self) -> &'static str {
        match self {
            Self::Keywords => "keyword",
            Self::IntendedAudiences => "audience",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseLink {
    pub id: i64,
    #[serde(default)]
    pub course_id: CourseId,
    #[serde(
        alias = "eligibility_id",
        alias = "instructor_id",
        alias = "accreditation_partner_id"
    )]
    pub target_id: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntry {
    pub id: i64,
    #[serde(default)]
    pub course_id: CourseId,
    #[serde(alias = "keyword", alias = "audience", alias = "name")]
    pub text: String,
}

/// Course-scoped collections. Always arrays, never absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedCollections {
    pub eligibilities: Vec<CourseLink>,
    pub keywords: Vec<TextEntry>,
    pub instructors: Vec<CourseLink>,
    pub intended_audiences: Vec<TextEntry>,
    pub accreditation_partners: Vec<CourseLink>,
}

impl LinkedCollections {
    pub fn links_mut(&mut self, kind: LinkKind) -> &mut Vec<CourseLink> {
        match kind {
            LinkKind::Eligibilities => &mut self.eligibilities,
            LinkKind::Instructors => &mut self.instructors,
            LinkKind::AccreditationPartners => &mut self.accreditation_partners,
        }
    }

    pub fn entries_mut(&mut self, kind: EntryKind) -> &mut Vec<TextEntry> {
        match kind {
            EntryKind::Keywords => &mut self.keywords,
            EntryKind::IntendedAudiences => &mut self.intended_audiences,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.eligibilities.is_empty()
            && self.keywords.is_empty()
            && self.instructors.is_empty()
            && self.intended_audiences.is_empty()
            && self.accreditation_partners.is_empty()
    }
}
