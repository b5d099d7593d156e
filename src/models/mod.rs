pub mod catalog;
pub mod course;
pub mod fields;

pub use catalog::{CatalogItem, Catalogs, CourseLink, EntryKind, LinkKind, LinkedCollections, TextEntry};
pub use course::{Course, CourseId, CourseSetting, FieldMap, SettingId, SettingState, SettingWrite};
pub use fields::{CourseField, Field, FieldType, PatronField, RuleDomain, SettingField};
