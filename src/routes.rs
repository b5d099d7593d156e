use std::sync::Arc;

use axum::Json;
use axum::extract::Path;
use axum::routing::{delete, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::*;
use crate::services::{CreatedCourse, EditorSession, EditorSnapshot, ReconcileOutcome};
use crate::state::AppState;
use crate::validation::{ValidationError, ValidationReport, validate_all};

#[derive(Deserialize)]
struct LinkRequest {
    target_id: i64,
}

#[derive(Deserialize)]
struct EntryRequest {
    text: String,
}

#[derive(Serialize)]
struct SaveResponse {
    outcome: ReconcileOutcome,
    editor: EditorSnapshot,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/catalogs", get(list_catalogs))
        .route("/courses", post(create_course))
        .route("/courses/{id}/open", post(open_course))
        .route("/courses/{id}/editor", get(get_editor).patch(save_editor))
        .route("/courses/{id}/editor/validate", post(validate_editor))
        .route("/courses/{id}/links/{kind}", post(add_link))
        .route("/courses/{id}/links/{kind}/{link_id}", delete(remove_link))
        .route("/courses/{id}/entries/{kind}", post(add_entry))
        .route("/courses/{id}/entries/{kind}/{entry_id}", delete(remove_entry))
        .route("/validate/{domain}", post(validate_domain))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn open_session(state: &AppState, id: CourseId) -> Result<Arc<Mutex<EditorSession>>, AppError> {
    state.sessions.get(id).await.ok_or(AppError::NotFound)
}

async fn list_catalogs(State(state): State<AppState>) -> Result<Json<Catalogs>, AppError> {
    let catalogs = state.editor.load_catalogs().await?;
    Ok(Json(catalogs))
}

async fn create_course(
    State(state): State<AppState>,
    Json(edits): Json<FieldMap>,
) -> Result<(StatusCode, Json<CreatedCourse>), AppError> {
    let created = state.editor.create_course(&edits).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn open_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<EditorSnapshot>, AppError> {
    let session = state.sessions.get_or_create(id).await;
    let mut session = session.lock().await;
    state.editor.open(&mut session, id).await?;
    Ok(Json(session.snapshot()))
}

async fn get_editor(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<EditorSnapshot>, AppError> {
    let session = open_session(&state, id).await?;
    let session = session.lock().await;
    Ok(Json(session.snapshot()))
}

async fn save_editor(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    Json(edits): Json<FieldMap>,
) -> Result<Json<SaveResponse>, AppError> {
    let session = open_session(&state, id).await?;
    let mut session = session.lock().await;
    let outcome = state.editor.save(&mut session, &edits).await?;
    Ok(Json(SaveResponse { outcome, editor: session.snapshot() }))
}

async fn validate_editor(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    Json(edits): Json<FieldMap>,
) -> Result<Json<Vec<ValidationError>>, AppError> {
    let session = open_session(&state, id).await?;
    let mut session = session.lock().await;
    Ok(Json(state.editor.revalidate(&mut session, &edits)))
}

async fn add_link(
    State(state): State<AppState>,
    Path((id, kind)): Path<(CourseId, LinkKind)>,
    Json(req): Json<LinkRequest>,
) -> Result<(StatusCode, Json<CourseLink>), AppError> {
    let session = open_session(&state, id).await?;
    let mut session = session.lock().await;
    let link = state.editor.link(&mut session, kind, req.target_id).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

async fn remove_link(
    State(state): State<AppState>,
    Path((id, kind, link_id)): Path<(CourseId, LinkKind, i64)>,
) -> Result<StatusCode, AppError> {
    let session = open_session(&state, id).await?;
    let mut session = session.lock().await;
    state.editor.unlink(&mut session, kind, link_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_entry(
    State(state): State<AppState>,
    Path((id, kind)): Path<(CourseId, EntryKind)>,
    Json(req): Json<EntryRequest>,
) -> Result<(StatusCode, Json<TextEntry>), AppError> {
    let session = open_session(&state, id).await?;
    let mut session = session.lock().await;
    let entry = state.editor.add_entry(&mut session, kind, &req.text).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn remove_entry(
    State(state): State<AppState>,
    Path((id, kind, entry_id)): Path<(CourseId, EntryKind, i64)>,
) -> Result<StatusCode, AppError> {
    let session = open_session(&state, id).await?;
    let mut session = session.lock().await;
    state.editor.remove_entry(&mut session, kind, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn validate_domain(
    Path(domain): Path<String>,
    Json(edits): Json<FieldMap>,
) -> Result<Json<ValidationReport>, AppError> {
    let domain = RuleDomain::parse(&domain)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown rule domain: {}", domain)))?;
    Ok(Json(validate_all(domain, &edits)))
}
