use std::{collections::HashMap, env, path::PathBuf, sync::Arc};

use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::routes::auth::Ticket;

pub mod auth;
pub mod upload;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct RouteState {
    pub upload_dir: PathBuf,
    pub public_url: String,
    pub max_upload_bytes: u64,
    pub tickets: Arc<Mutex<HashMap<String, Ticket>>>,
}

impl RouteState {
    pub fn from_env() -> Self {
        let upload_dir = env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "./uploads".to_string())
            .into();
        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string())
            .trim_end_matches('/')
            .to_string();
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Self {
            upload_dir,
            public_url,
            max_upload_bytes,
            tickets: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Upload not found")]
    NotFound,
    #[error("Bad request")]
    BadRequest,
    #[error("Payload too large")]
    PayloadTooLarge,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] axum::http::Error),
}

impl IntoResponse for RouteError {
    fn into_response(self) -> axum::response::Response {
        match self {
            RouteError::NotFound => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            RouteError::BadRequest => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            RouteError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()).into_response()
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {self}"),
            )
                .into_response(),
        }
    }
}
