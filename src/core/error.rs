use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::any::Any;
use tracing::{error, warn};

/// Failures raised by the persistence adapter and the repository on top of it
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write succeeded but the row could not be read back
    #[error("integrity error: {0}")]
    Integrity(String),
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    status: u16,
}

/// Client-facing failure. Every handler returns it on its error channel and
/// `into_response` is the one place that shapes the generic error envelope.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    // logged, never serialized
    details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    // Common error constructors
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::internal_server_error("Internal Server Error").with_details(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                status = self.status.as_u16(),
                details = self.details.as_deref().unwrap_or(""),
                "[Error] {}",
                self.message
            );
        } else {
            warn!(status = self.status.as_u16(), "[Error] {}", self.message);
        }

        let body = Json(ErrorEnvelope {
            error: ErrorBody {
                message: self.message,
                status: self.status.as_u16(),
            },
        });
        (self.status, body).into_response()
    }
}

/// Panic hook for `CatchPanicLayer`: a panicking handler still answers with the error envelope
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::internal_server_error("Internal Server Error")
        .with_details(details)
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_envelope_carries_status_and_message() {
        let response = AppError::not_found("Resource not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Resource not found");
        assert_eq!(json["error"]["status"], 404);
    }

    #[tokio::test]
    async fn test_storage_error_hides_details() {
        let err: AppError = StorageError::Integrity("row 7 vanished".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(err.into_response()).await;
        assert_eq!(json["error"]["message"], "Internal Server Error");
        assert_eq!(json["error"]["status"], 500);
        assert!(!json.to_string().contains("row 7"));
    }

    #[tokio::test]
    async fn test_panic_payload_becomes_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"]["status"], 500);
    }
}
