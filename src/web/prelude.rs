pub(crate) use crate::constants::CURRENT_DESIGN_KEY;
pub(crate) use crate::error::HomeDesignError;
pub(crate) use crate::web::AppState;
pub(crate) use askama::Template;
pub(crate) use askama_web::WebTemplate;
pub(crate) use axum::extract::{Form, Path, State};
pub(crate) use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
pub(crate) use axum::response::{Redirect, Response};
pub(crate) use serde::{Deserialize, Serialize};
pub(crate) use tower_sessions::Session;
pub(crate) use tracing::{info, warn};
