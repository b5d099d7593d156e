pub mod dto;

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    CatalogItem, Course, CourseId, CourseLink, CourseSetting, EntryKind, FieldMap, LinkKind,
    SettingId, TextEntry,
};

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub cache_ttl: Duration,
}

impl ApiConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url = env::var("COURSE_API_BASE_URL")
            .map_err(|_| AppError::BadRequest("COURSE_API_BASE_URL is not set".to_string()))?;
        let api_token = env::var("COURSE_API_TOKEN").ok().filter(|t| !t.is_empty());
        let cache_ttl = match env::var("CACHE_TTL_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| AppError::BadRequest(format!("CACHE_TTL_SECS is not a number: {}", raw)))?,
            Err(_) => 300,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            cache_ttl: Duration::from_secs(cache_ttl),
        })
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: None,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// The course backend as seen by the editor.
///
/// Reads return plain collections; mutations return what the server echoed.
#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<CatalogItem>, AppError>;
    async fn list_course_types(&self) -> Result<Vec<CatalogItem>, AppError>;
    async fn list_eligibilities(&self) -> Result<Vec<CatalogItem>, AppError>;
    async fn list_courses(&self) -> Result<Vec<Course>, AppError>;
    async fn list_instructors(&self) -> Result<Vec<CatalogItem>, AppError>;
    async fn list_specialities(&self) -> Result<Vec<CatalogItem>, AppError>;
    async fn list_accreditation_partners(&self) -> Result<Vec<CatalogItem>, AppError>;

    async fn course_links(&self, course_id: CourseId, kind: LinkKind) -> Result<Vec<CourseLink>, AppError>;
    async fn course_entries(&self, course_id: CourseId, kind: EntryKind) -> Result<Vec<TextEntry>, AppError>;
    /// `Ok(None)` when the course has no settings record yet.
    async fn course_setting(&self, course_id: CourseId) -> Result<Option<CourseSetting>, AppError>;

    async fn create_course(&self, fields: &FieldMap) -> Result<Course, AppError>;
    async fn update_course(&self, course_id: CourseId, fields: &FieldMap) -> Result<FieldMap, AppError>;
    async fn create_course_setting(&self, course_id: CourseId, fields: &FieldMap) -> Result<CourseSetting, AppError>;
    async fn update_course_setting(&self, setting_id: SettingId, fields: &FieldMap) -> Result<FieldMap, AppError>;

    async fn add_link(&self, course_id: CourseId, kind: LinkKind, target_id: i64) -> Result<CourseLink, AppError>;
    async fn remove_link(&self, course_id: CourseId, kind: LinkKind, link_id: i64) -> Result<(), AppError>;
    async fn add_entry(&self, course_id: CourseId, kind: EntryKind, text: &str) -> Result<TextEntry, AppError>;
    async fn remove_entry(&self, course_id: CourseId, kind: EntryKind, entry_id: i64) -> Result<(), AppError>;
}

pub struct CourseApiHttpClient {
    client: Client,
    config: ApiConfig,
}

impl CourseApiHttpClient {
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Send one request and return the unwrapped payload.
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, AppError> {
        let url = format!("{}{}", self.config.base_url, path);
        let request_id = Uuid::new_v4().to_string();
        debug!(%request_id, "{} {}", method, path);

        let mut request = self
            .client
            .request(method, &url)
            .header("Accept", "application/json")
            .header("X-Request-Id", &request_id);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                debug!(%request_id, "{} returned 404", path);
            }
            let body_text = response.text().await.unwrap_or_default();
            let message = dto::error_message(&body_text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
            return Err(AppError::Http { status: status.as_u16(), message });
        }

        let body_text = response.text().await?;
        if body_text.trim().is_empty() {
            return Ok(Value::Null);
        }
        let parsed: Value = serde_json::from_str(&body_text)?;
        dto::unwrap_envelope(parsed)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, AppError> {
        let payload = self.send(Method::GET, path, None).await?;
        Ok(serde_json::from_value(dto::into_list(payload))?)
    }

    async fn send_json<T: DeserializeOwned>(&self, method: Method, path: &str, body: &Value) -> Result<T, AppError> {
        let payload = self.send(method, path, Some(body)).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Mutation echoes may be empty or a non-object; those merge as nothing.
    async fn send_patch(&self, path: &str, fields: &FieldMap) -> Result<FieldMap, AppError> {
        let payload = self
            .send(Method::PATCH, path, Some(&Value::Object(fields.clone())))
            .await?;
        Ok(match payload {
            Value::Object(map) => map,
            _ => FieldMap::new(),
        })
    }
}

#[async_trait]
impl CourseApi for CourseApiHttpClient {
    async fn list_categories(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.get_list("/categories").await
    }

    async fn list_course_types(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.get_list("/course-types").await
    }

    async fn list_eligibilities(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.get_list("/eligibilities").await
    }

    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        self.get_list("/courses").await
    }

    async fn list_instructors(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.get_list("/instructors").await
    }

    async fn list_specialities(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.get_list("/specialities").await
    }

    async fn list_accreditation_partners(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.get_list("/accreditation-partners").await
    }

    async fn course_links(&self, course_id: CourseId, kind: LinkKind) -> Result<Vec<CourseLink>, AppError> {
        self.get_list(&format!("/courses/{}/{}", course_id, kind.path())).await
    }

    async fn course_entries(&self, course_id: CourseId, kind: EntryKind) -> Result<Vec<TextEntry>, AppError> {
        self.get_list(&format!("/courses/{}/{}", course_id, kind.path())).await
    }

    async fn course_setting(&self, course_id: CourseId) -> Result<Option<CourseSetting>, AppError> {
        let path = format!("/courses/{}/settings", course_id);
        match self.send(Method::GET, &path, None).await {
            Ok(Value::Null) => Ok(None),
            Ok(payload) => Ok(Some(serde_json::from_value(payload)?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_course(&self, fields: &FieldMap) -> Result<Course, AppError> {
        self.send_json(Method::POST, "/courses", &Value::Object(fields.clone())).await
    }

    async fn update_course(&self, course_id: CourseId, fields: &FieldMap) -> Result<FieldMap, AppError> {
        self.send_patch(&format!("/courses/{}", course_id), fields).await
    }

    async fn create_course_setting(&self, course_id: CourseId, fields: &FieldMap) -> Result<CourseSetting, AppError> {
        let body = serde_json::to_value(dto::CreateSettingRequest { course_id, fields })?;
        self.send_json(Method::POST, "/course-settings", &body).await
    }

    async fn update_course_setting(&self, setting_id: SettingId, fields: &FieldMap) -> Result<FieldMap, AppError> {
        self.send_patch(&format!("/course-settings/{}", setting_id), fields).await
    }

    async fn add_link(&self, course_id: CourseId, kind: LinkKind, target_id: i64) -> Result<CourseLink, AppError> {
        let path = format!("/courses/{}/{}", course_id, kind.path());
        let mut body = json!({ "course_id": course_id });
        body[kind.target_key()] = json!(target_id);
        self.send_json(Method::POST, &path, &body).await
    }

    async fn remove_link(&self, course_id: CourseId, kind: LinkKind, link_id: i64) -> Result<(), AppError> {
        let path = format!("/courses/{}/{}/{}", course_id, kind.path(), link_id);
        self.send(Method::DELETE, &path, None).await.map(|_| ())
    }

    async fn add_entry(&self, course_id: CourseId, kind: EntryKind, text: &str) -> Result<TextEntry, AppError> {
        let path = format!("/courses/{}/{}", course_id, kind.path());
        let mut body = json!({ "course_id": course_id });
        body[kind.text_key()] = json!(text);
        self.send_json(Method::POST, &path, &body).await
    }

    async fn remove_entry(&self, course_id: CourseId, kind: EntryKind, entry_id: i64) -> Result<(), AppError> {
        let path = format!("/courses/{}/{}/{}", course_id, kind.path(), entry_id);
        self.send(Method::DELETE, &path, None).await.map(|_| ())
    }
}

/// Backend stand-in that knows no courses and accepts no writes.
pub struct NoopCourseApi;

#[async_trait]
impl CourseApi for NoopCourseApi {
    async fn list_categories(&self) -> Result<Vec<CatalogItem>, AppError> {
        Ok(Vec::new())
    }

    async fn list_course_types(&self) -> Result<Vec<CatalogItem>, AppError> {
        Ok(Vec::new())
    }

    async fn list_eligibilities(&self) -> Result<Vec<CatalogItem>, AppError> {
        Ok(Vec::new())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        Ok(Vec::new())
    }

    async fn list_instructors(&self) -> Result<Vec<CatalogItem>, AppError> {
        Ok(Vec::new())
    }

    async fn list_specialities(&self) -> Result<Vec<CatalogItem>, AppError> {
        Ok(Vec::new())
    }

    async fn list_accreditation_partners(&self) -> Result<Vec<CatalogItem>, AppError> {
        Ok(Vec::new())
    }

    async fn course_links(&self, _course_id: CourseId, _kind: LinkKind) -> Result<Vec<CourseLink>, AppError> {
        Ok(Vec::new())
    }

    async fn course_entries(&self, _course_id: CourseId, _kind: EntryKind) -> Result<Vec<TextEntry>, AppError> {
        Ok(Vec::new())
    }

    async fn course_setting(&self, _course_id: CourseId) -> Result<Option<CourseSetting>, AppError> {
        Ok(None)
    }

    async fn create_course(&self, _fields: &FieldMap) -> Result<Course, AppError> {
        Err(AppError::NotFound)
    }

    async fn update_course(&self, _course_id: CourseId, _fields: &FieldMap) -> Result<FieldMap, AppError> {
        Err(AppError::NotFound)
    }

    async fn create_course_setting(&self, _course_id: CourseId, _fields: &FieldMap) -> Result<CourseSetting, AppError> {
        Err(AppError::NotFound)
    }

    async fn update_course_setting(&self, _setting_id: SettingId, _fields: &FieldMap) -> Result<FieldMap, AppError> {
        Err(AppError::NotFound)
    }

    async fn add_link(&self, _course_id: CourseId, _kind: LinkKind, _target_id: i64) -> Result<CourseLink, AppError> {
        Err(AppError::NotFound)
    }

    async fn remove_link(&self, _course_id: CourseId, _kind: LinkKind, _link_id: i64) -> Result<(), AppError> {
        Err(AppError::NotFound)
    }

    async fn add_entry(&self, _course_id: CourseId, _kind: EntryKind, _text: &str) -> Result<TextEntry, AppError> {
        Err(AppError::NotFound)
    }

    async fn remove_entry(&self, _course_id: CourseId, _kind: EntryKind, _entry_id: i64) -> Result<(), AppError> {
        Err(AppError::NotFound)
    }
}
