mod common;

use std::sync::Arc;

use common::{MockCourseApi, course};
use course_admin::error::AppError;
use course_admin::models::{CourseLink, CourseSetting, FieldMap, SettingState, TextEntry};
use course_admin::services::{CourseEditor, EditorSession, FetchService};
use serde_json::json;

fn keyword(id: i64, text: &str) -> TextEntry {
    TextEntry { id, course_id: 7, text: text.to_string() }
}

#[tokio::test]
async fn test_failed_catalog_read_degrades_to_empty_list() {
    let api = Arc::new(
        MockCourseApi::new()
            .with_course(course(7, json!({ "title": "Intro" })))
            .failing("list_instructors"),
    );
    let fetcher = FetchService::new(api.clone());

    let catalogs = fetcher.load_catalogs().await.expect("phase 1 succeeds");

    assert!(catalogs.instructors.is_empty());
    assert_eq!(catalogs.categories.len(), 2);
    assert_eq!(catalogs.course_types.len(), 2);
    assert_eq!(catalogs.eligibilities.len(), 1);
    assert_eq!(catalogs.specialities.len(), 1);
    assert_eq!(catalogs.accreditation_partners.len(), 1);
    assert_eq!(catalogs.courses.len(), 1);
    assert_eq!(api.calls().len(), 7);
}

#[tokio::test]
async fn test_failed_course_list_fails_phase_after_all_reads_settle() {
    let api = Arc::new(MockCourseApi::new().failing("list_courses"));
    let fetcher = FetchService::new(api.clone());

    let result = fetcher.load_catalogs().await;

    assert!(matches!(result, Err(AppError::Http { status: 500, .. })));
    assert_eq!(api.calls().len(), 7);
}

#[tokio::test]
async fn test_missing_setting_is_none_and_collections_still_load() {
    let api = Arc::new(
        MockCourseApi::new()
            .with_keywords(vec![keyword(1, "rust"), keyword(2, "systems")])
            .with_instructors(vec![CourseLink {
                id: 5,
                course_id: 7,
                target_id: 10,
                extra: FieldMap::new(),
            }]),
    );
    let fetcher = FetchService::new(api.clone());

    let scope = fetcher.load_course_scope(7).await;

    assert!(scope.setting.is_none());
    assert_eq!(scope.linked.keywords.len(), 2);
    assert_eq!(scope.linked.instructors.len(), 1);
    assert!(scope.linked.eligibilities.is_empty());
    assert!(scope.linked.intended_audiences.is_empty());
    assert!(scope.linked.accreditation_partners.is_empty());
    assert_eq!(api.calls().len(), 6);
}

#[tokio::test]
async fn test_failed_setting_lookup_degrades_to_none() {
    let api = Arc::new(
        MockCourseApi::new()
            .with_keywords(vec![keyword(1, "rust")])
            .failing("course_setting")
            .failing("course_entries:intended-audiences"),
    );
    let fetcher = FetchService::new(api);

    let scope = fetcher.load_course_scope(7).await;

    assert!(scope.setting.is_none());
    assert_eq!(scope.linked.keywords.len(), 1);
    assert!(scope.linked.intended_audiences.is_empty());
}

#[tokio::test]
async fn test_open_installs_both_phases() {
    let setting = CourseSetting { id: 31, course_id: 7, fields: common::map(json!({ "schedule": "weekly" })) };
    let api = Arc::new(
        MockCourseApi::new()
            .with_course(course(7, json!({ "title": "Intro" })))
            .with_setting(setting.clone())
            .with_keywords(vec![keyword(1, "rust")]),
    );
    let editor = CourseEditor::new(api);
    let mut session = EditorSession::new(7);

    editor.open(&mut session, 7).await.expect("opens");

    assert_eq!(session.course.title(), Some("Intro"));
    assert_eq!(session.setting, SettingState::Loaded(setting));
    assert_eq!(session.linked.keywords.len(), 1);
    assert_eq!(session.catalogs.categories.len(), 2);
}

#[tokio::test]
async fn test_switching_course_clears_previous_course_state() {
    let setting = CourseSetting { id: 31, course_id: 7, fields: FieldMap::new() };
    let api = Arc::new(
        MockCourseApi::new()
            .with_course(course(7, json!({ "title": "Intro" })))
            .with_setting(setting),
    );
    let editor = CourseEditor::new(api);
    let mut session = EditorSession::new(7);
    editor.open(&mut session, 7).await.expect("opens");
    session.linked.keywords.push(keyword(9, "stale"));

    let result = editor.open(&mut session, 8).await;

    assert!(matches!(result, Err(AppError::NotFound)));
    assert_eq!(session.course.id, 8);
    assert!(session.course.fields.is_empty());
    assert_eq!(session.setting, SettingState::Unloaded);
    assert!(session.linked.is_empty());
}
