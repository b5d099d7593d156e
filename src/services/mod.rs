pub mod editor;
pub mod fetch_service;
pub mod merge;
pub mod reconcile_service;

pub use editor::{CourseEditor, CreatedCourse, EditorSession, EditorSnapshot};
pub use fetch_service::{CourseScope, FetchService};
pub use reconcile_service::{ChangeSet, ReconcileOutcome, ReconcileService, SettingOutcome};
