use std::net::SocketAddr;
use std::sync::Arc;

use course_admin::api::{ApiConfig, CourseApiHttpClient};
use course_admin::cache::{CachedCourseApi, InvalidationGate, ReadCache};
use course_admin::routes::router;
use course_admin::services::CourseEditor;
use course_admin::state::AppState;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "course_admin=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::new_from_env()?;
    let cache = Arc::new(ReadCache::new(config.cache_ttl));
    let gate = InvalidationGate::new(cache);
    info!("using course API at {}", config.base_url);

    let http = Arc::new(CourseApiHttpClient::new(config)?);
    let api = Arc::new(CachedCourseApi::new(http, gate));
    let state = AppState::new(CourseEditor::new(api));

    let app = router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
