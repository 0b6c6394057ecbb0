//! Error handling

use axum::response::IntoResponse;
use tracing::info;

use crate::export::{ExportError, UnknownFormat};

/// Web-facing errors for the design assistant.
#[derive(Debug)]
pub enum HomeDesignError {
    /// When you didn't do the right thing
    BadRequest(String),
    /// Missing or invalid session / CSRF token
    Unauthorized,
    /// When a requested resource is not found
    NotFound(String),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl From<std::io::Error> for HomeDesignError {
    fn from(err: std::io::Error) -> Self {
        HomeDesignError::InternalServerError(err.to_string())
    }
}

impl From<axum::http::Error> for HomeDesignError {
    fn from(err: axum::http::Error) -> Self {
        HomeDesignError::InternalServerError(err.to_string())
    }
}

impl From<askama::Error> for HomeDesignError {
    fn from(err: askama::Error) -> Self {
        HomeDesignError::InternalServerError(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for HomeDesignError {
    fn from(err: tower_sessions::session::Error) -> Self {
        HomeDesignError::InternalServerError(err.to_string())
    }
}

impl From<UnknownFormat> for HomeDesignError {
    fn from(err: UnknownFormat) -> Self {
        HomeDesignError::BadRequest(err.to_string())
    }
}

impl From<ExportError> for HomeDesignError {
    fn from(err: ExportError) -> Self {
        HomeDesignError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for HomeDesignError {
    fn into_response(self) -> axum::response::Response {
        match self {
            HomeDesignError::BadRequest(reason) => {
                info!("Bad request received: {reason}");
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Bad Request"));
                *response.status_mut() = axum::http::StatusCode::BAD_REQUEST;
                response
            }
            HomeDesignError::Unauthorized => {
                info!("Unauthorized request received");
                let mut response = axum::response::Response::new(axum::body::Body::from(
                    "Unauthorized: invalid or missing session.",
                ));
                *response.status_mut() = axum::http::StatusCode::UNAUTHORIZED;
                response
            }
            HomeDesignError::NotFound(what) => {
                tracing::error!("404 {what}");
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Not Found"));
                *response.status_mut() = axum::http::StatusCode::NOT_FOUND;
                response
            }
            HomeDesignError::InternalServerError(message) => {
                tracing::error!("Internal server error: {}", message);
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Internal server error"));
                *response.status_mut() = axum::http::StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        }
    }
}
