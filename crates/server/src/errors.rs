use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::configuration::ResolveError;
use service::frontend::FrontendError;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error body: `{"error": title, "message": detail, "code": n}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: Option<String>,
    pub code: Option<u16>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, message: Option<String>) -> Self {
        Self { status, title, message, code: None }
    }

    fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.title,
            "message": self.message,
            "code": self.code,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ResolveError> for JsonApiError {
    fn from(e: ResolveError) -> Self {
        let (status, title) = match &e {
            ResolveError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            ResolveError::CycleDetected { .. } | ResolveError::DepthExceeded { .. } => {
                (StatusCode::CONFLICT, "Inconsistent Inheritance")
            }
            ResolveError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "Resolution Timeout"),
            ResolveError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "Store Unavailable"),
        };
        if status.is_server_error() {
            error!(code = e.code(), error = %e, "resolution failed");
        } else {
            warn!(code = e.code(), error = %e, "resolution rejected");
        }
        JsonApiError::new(status, title, Some(e.to_string())).with_code(e.code())
    }
}

impl From<FrontendError> for JsonApiError {
    fn from(e: FrontendError) -> Self {
        error!(error = %e, "frontend component scan failed");
        JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}
