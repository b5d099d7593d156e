mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::map;
use course_admin::api::{ApiConfig, CourseApi, CourseApiHttpClient};
use course_admin::error::AppError;
use course_admin::models::{EntryKind, LinkKind};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CourseApiHttpClient {
    CourseApiHttpClient::new(ApiConfig::new(server.uri())).expect("client builds")
}

#[tokio::test]
async fn test_success_envelope_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{ "id": 1, "name": "Engineering" }, { "id": 2, "title": "Medicine" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let categories = client(&server).list_categories().await.expect("list");

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].name, "Medicine");
}

#[tokio::test]
async fn test_legacy_and_wrapped_list_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "title": "Intro", "price": 49 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/instructors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "items": [{ "id": 10, "full_name": "Dr. Rivera" }] }
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let courses = api.list_courses().await.expect("courses");
    let instructors = api.list_instructors().await.expect("instructors");

    assert_eq!(courses[0].id, 7);
    assert_eq!(courses[0].title(), Some("Intro"));
    assert_eq!(courses[0].fields["price"], json!(49));
    assert_eq!(instructors[0].name, "Dr. Rivera");
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/specialities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Token expired"
        })))
        .mount(&server)
        .await;

    let result = client(&server).list_specialities().await;

    match result {
        Err(AppError::Api(message)) => assert_eq!(message, "Token expired"),
        other => panic!("expected an API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_setting_maps_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/courses/7/settings"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "No settings" })))
        .mount(&server)
        .await;

    let setting = client(&server).course_setting(7).await.expect("404 is not an error");

    assert!(setting.is_none());
}

#[tokio::test]
async fn test_existing_setting_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/courses/7/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": { "id": 31, "course_id": 7, "schedule": "weekly" }
        })))
        .mount(&server)
        .await;

    let setting = client(&server)
        .course_setting(7)
        .await
        .expect("read")
        .expect("present");

    assert_eq!(setting.id, 31);
    assert_eq!(setting.fields["schedule"], json!("weekly"));
}

#[tokio::test]
async fn test_error_status_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/courses/7"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "error": "title is taken" })))
        .mount(&server)
        .await;

    let result = client(&server).update_course(7, &map(json!({ "title": "Dup" }))).await;

    match result {
        Err(AppError::Http { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "title is taken");
        }
        other => panic!("expected an HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_sends_only_given_fields_and_tolerates_empty_echo() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/course-settings/31"))
        .and(body_json(json!({ "schedule": "daily" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let echo = client(&server)
        .update_course_setting(31, &map(json!({ "schedule": "daily" })))
        .await
        .expect("update");

    assert!(echo.is_empty());
}

#[tokio::test]
async fn test_create_setting_posts_course_id_with_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/course-settings"))
        .and(body_json(json!({ "course_id": 7, "schedule": "daily" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "data": { "id": 44, "course_id": 7, "schedule": "daily" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server)
        .create_course_setting(7, &map(json!({ "schedule": "daily" })))
        .await
        .expect("create");

    assert_eq!(created.id, 44);
}

#[tokio::test]
async fn test_link_and_entry_bodies_use_collection_keys() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/courses/7/accreditation-partners"))
        .and(body_json(json!({ "course_id": 7, "accreditation_partner_id": 3 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 12, "course_id": 7, "accreditation_partner_id": 3
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/courses/7/intended-audiences"))
        .and(body_json(json!({ "course_id": 7, "audience": "Students" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 13, "course_id": 7, "audience": "Students"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/courses/7/keywords/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let link = api.add_link(7, LinkKind::AccreditationPartners, 3).await.expect("link");
    let entry = api
        .add_entry(7, EntryKind::IntendedAudiences, "Students")
        .await
        .expect("entry");
    api.remove_entry(7, EntryKind::Keywords, 5).await.expect("remove");

    assert_eq!(link.target_id, 3);
    assert_eq!(entry.text, "Students");
}

#[tokio::test]
async fn test_bearer_token_is_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/course-types"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = ApiConfig::new(server.uri());
    config.api_token = Some("secret-token".to_string());
    let api = CourseApiHttpClient::new(config).expect("client builds");

    assert!(api.list_course_types().await.expect("list").is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let api = CourseApiHttpClient::new(ApiConfig::new("http://127.0.0.1:1")).expect("client builds");

    let result = api.list_categories().await;

    assert!(matches!(result, Err(AppError::Network(_))));
}

#[tokio::test]
async fn test_truncated_success_body_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let head = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"id\":";
        let _ = socket.write_all(head.as_bytes()).await;
    });

    let api = CourseApiHttpClient::new(ApiConfig::new(format!("http://{}", addr))).expect("client builds");
    let result = api.course_setting(7).await;

    match result {
        Err(e) => assert_eq!(e.into_response().status(), StatusCode::BAD_GATEWAY),
        Ok(setting) => panic!("truncated body read as {:?}", setting),
    }
}

#[tokio::test]
async fn test_undecodable_body_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let decode = reqwest::get(format!("{}/status", server.uri()))
        .await
        .expect("response")
        .json::<Value>()
        .await
        .expect_err("body is not json");
    let error = AppError::from(decode);

    assert!(matches!(error, AppError::Api(_)));
    assert_eq!(error.into_response().status(), StatusCode::BAD_GATEWAY);
}
