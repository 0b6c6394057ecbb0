//! The form, its submission and the downloads.

use std::num::NonZeroU16;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::constants::SESSION_INACTIVITY_MINUTES;

mod csrf;
mod markdown;
mod prelude;
mod views;

use views::{export_handler, generate_handler, home_handler};

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    config: Arc<AppConfig>,
    client: reqwest::Client,
    export_lock: Arc<Mutex<()>>,
}

impl AppState {
    fn new(config: AppConfig, client: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            client,
            export_lock: Arc::new(Mutex::new(())),
        }
    }
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(home_handler))
        .route("/static/styles.css", axum::routing::get(styles_handler))
        .route("/generate", axum::routing::post(generate_handler))
        .route("/export/{format}", axum::routing::post(export_handler))
}

fn build_app(state: AppState) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            SESSION_INACTIVITY_MINUTES,
        )));

    create_router()
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn styles_handler() -> impl IntoResponse {
    const STYLES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/styles.css"));
    ([(CONTENT_TYPE, "text/css")], STYLES)
}

/// Binds the listener and serves until the process stops.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    config: AppConfig,
) -> Result<(), anyhow::Error> {
    let client = config.http_client()?;
    if config.google_api_key.is_none() {
        info!("GOOGLE_API_KEY is not set, design generation will fail");
    }
    if config.unsplash_access_key.is_none() {
        info!("UNSPLASH_ACCESS_KEY is not set, reference images are disabled");
    }
    let app = build_app(AppState::new(config, client));

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
    Ok(())
}
