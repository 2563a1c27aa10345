//! OpenAI-specific error handling.

use paperdesk_core::Error;

/// OpenAI-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Invalid authentication credentials.
    AuthenticationError,
    /// Rate limit or quota exceeded.
    RateLimitExceeded,
    /// Vector store, file, assistant, thread, or run does not exist.
    NotFound,
    /// Malformed or rejected request.
    InvalidRequest,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl OpenAIErrorCode {
    /// Determine error code from HTTP status and error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) | (_, "invalid_api_key") => Self::AuthenticationError,
            (429, _) | (_, "insufficient_quota") => Self::RateLimitExceeded,
            (404, _) => Self::NotFound,
            (400, _) => Self::InvalidRequest,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded | Self::ServerError)
    }
}

/// Convert OpenAI error to paperdesk Error.
pub fn to_paperdesk_error(code: OpenAIErrorCode, message: &str) -> Error {
    match code {
        OpenAIErrorCode::AuthenticationError => {
            Error::Config(format!("Authentication failed: {}", message))
        }
        OpenAIErrorCode::RateLimitExceeded => {
            Error::Remote(format!("Rate limit exceeded: {}", message))
        }
        OpenAIErrorCode::NotFound => Error::NotFound(message.to_string()),
        OpenAIErrorCode::InvalidRequest => {
            Error::InvalidInput(format!("Request rejected: {}", message))
        }
        OpenAIErrorCode::ServerError => Error::Remote(format!("Server error: {}", message)),
        OpenAIErrorCode::Unknown => Error::Remote(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_from_401() {
        let code = OpenAIErrorCode::from_response(401, "invalid_request_error");
        assert_eq!(code, OpenAIErrorCode::AuthenticationError);
    }

    #[test]
    fn test_error_code_from_429() {
        let code = OpenAIErrorCode::from_response(429, "rate_limit_exceeded");
        assert_eq!(code, OpenAIErrorCode::RateLimitExceeded);
    }

    #[test]
    fn test_error_code_quota_type() {
        let code = OpenAIErrorCode::from_response(403, "insufficient_quota");
        assert_eq!(code, OpenAIErrorCode::RateLimitExceeded);
    }

    #[test]
    fn test_error_code_from_404() {
        let code = OpenAIErrorCode::from_response(404, "invalid_request_error");
        assert_eq!(code, OpenAIErrorCode::NotFound);
    }

    #[test]
    fn test_error_code_from_400() {
        let code = OpenAIErrorCode::from_response(400, "invalid_request_error");
        assert_eq!(code, OpenAIErrorCode::InvalidRequest);
    }

    #[test]
    fn test_error_code_from_502() {
        let code = OpenAIErrorCode::from_response(502, "bad_gateway");
        assert_eq!(code, OpenAIErrorCode::ServerError);
    }

    #[test]
    fn test_error_code_from_unknown() {
        let code = OpenAIErrorCode::from_response(418, "im_a_teapot");
        assert_eq!(code, OpenAIErrorCode::Unknown);
    }

    #[test]
    fn test_retryable_codes() {
        assert!(OpenAIErrorCode::RateLimitExceeded.is_retryable());
        assert!(OpenAIErrorCode::ServerError.is_retryable());
        assert!(!OpenAIErrorCode::AuthenticationError.is_retryable());
        assert!(!OpenAIErrorCode::NotFound.is_retryable());
    }

    #[test]
    fn test_to_paperdesk_error_auth() {
        let err = to_paperdesk_error(OpenAIErrorCode::AuthenticationError, "Invalid key");
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("Authentication failed"));
    }

    #[test]
    fn test_to_paperdesk_error_not_found() {
        let err = to_paperdesk_error(OpenAIErrorCode::NotFound, "No vector store found");
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_to_paperdesk_error_server() {
        let err = to_paperdesk_error(OpenAIErrorCode::ServerError, "overloaded");
        assert_eq!(err.to_string(), "Remote error: Server error: overloaded");
    }
}
