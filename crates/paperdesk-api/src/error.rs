//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use paperdesk_core::Error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// Resources are not provisioned; the request can be retried later.
    #[error("{0}")]
    NotReady(String),
    /// The assistant service failed or timed out.
    #[error("{0}")]
    Upstream(Error),
    #[error("{0}")]
    Internal(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::NotReady(msg) => ApiError::NotReady(msg),
            Error::Remote(_) | Error::Request(_) | Error::Timeout(_) | Error::Serialization(_) => {
                ApiError::Upstream(err)
            }
            Error::Config(_) | Error::Io(_) => ApiError::Internal(err),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(Error::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(subsystem = "api", status = status.as_u16(), error = %self, "Request failed");
        }

        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (Error::NotReady("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (Error::Remote("x".into()), StatusCode::BAD_GATEWAY),
            (Error::Timeout("x".into()), StatusCode::GATEWAY_TIMEOUT),
            (Error::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_message_passthrough() {
        let err = ApiError::from(Error::InvalidInput("question is empty".into()));
        assert_eq!(err.to_string(), "question is empty");
    }
}
