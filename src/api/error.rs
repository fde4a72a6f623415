use super::decode::error_message;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// Request never produced an HTTP response.
    Network,
    /// 401 on a protected endpoint whose message points at the credential itself.
    SessionExpired,
    /// Any other 401 (bad login, etc).
    Unauthorized,
    Forbidden,
    NotFound,
    /// Remaining 4xx: the server rejected the input.
    Validation,
    Server,
    /// Body did not match the expected shape.
    Decode,
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
    /// Message extracted from the response body, if any.
    pub server_message: Option<String>,
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

const SESSION_HINTS: [&str; 3] = ["unauthorized", "token", "authentication"];

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            server_message: None,
        }
    }

    pub fn network(e: impl std::fmt::Display) -> Self {
        Self::new(ApiErrorKind::Network, format!("Network error: {e}"))
    }

    pub fn decode(e: impl std::fmt::Display) -> Self {
        Self::new(ApiErrorKind::Decode, format!("Unexpected response: {e}"))
    }

    /// Classify a non-success response.
    pub fn from_response(status: u16, path: &str, body: &serde_json::Value) -> Self {
        let server_message = error_message(body);
        let kind = match status {
            401 if is_session_failure(path, server_message.as_deref()) => {
                ApiErrorKind::SessionExpired
            }
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            400..=499 => ApiErrorKind::Validation,
            _ => ApiErrorKind::Server,
        };
        let message = match &server_message {
            Some(m) => format!("Request failed ({status}): {m}"),
            None => format!("Request failed ({status})"),
        };

        Self {
            kind,
            status: Some(status),
            message,
            server_message,
        }
    }

    /// Text for a notification: the server's own words for client errors, otherwise the fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.kind {
            ApiErrorKind::Server | ApiErrorKind::Network | ApiErrorKind::Decode => {
                fallback.to_string()
            }
            _ => self
                .server_message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }

    pub fn is_forbidden(&self) -> bool {
        self.kind == ApiErrorKind::Forbidden
    }

    pub fn is_session_expired(&self) -> bool {
        self.kind == ApiErrorKind::SessionExpired
    }
}

fn is_session_failure(path: &str, message: Option<&str>) -> bool {
    if path.contains("/auth/") {
        return false;
    }
    let Some(message) = message else {
        return false;
    };
    let lower = message.to_lowercase();
    SESSION_HINTS.iter().any(|hint| lower.contains(hint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_classification() {
        let cases = [
            (403, ApiErrorKind::Forbidden),
            (404, ApiErrorKind::NotFound),
            (422, ApiErrorKind::Validation),
            (500, ApiErrorKind::Server),
            (503, ApiErrorKind::Server),
        ];
        for (status, kind) in cases {
            assert_eq!(ApiError::from_response(status, "/pages", &json!({})).kind, kind);
        }
    }

    #[test]
    fn test_401_session_expiry_heuristic() {
        let expired = ApiError::from_response(401, "/pages", &json!({"message": "Invalid token"}));
        assert!(expired.is_session_expired());

        let auth_route =
            ApiError::from_response(401, "/auth/login", &json!({"message": "Invalid token"}));
        assert_eq!(auth_route.kind, ApiErrorKind::Unauthorized);

        let unrelated = ApiError::from_response(401, "/pages", &json!({"message": "Nope"}));
        assert_eq!(unrelated.kind, ApiErrorKind::Unauthorized);

        let bare = ApiError::from_response(401, "/pages", &serde_json::Value::Null);
        assert_eq!(bare.kind, ApiErrorKind::Unauthorized);
    }

    #[test]
    fn test_user_message_prefers_server_text_for_client_errors() {
        let e = ApiError::from_response(400, "/pages", &json!({"message": "Name taken"}));
        assert_eq!(e.user_message("Failed to create page"), "Name taken");

        let e = ApiError::from_response(400, "/pages", &json!({}));
        assert_eq!(e.user_message("Failed to create page"), "Failed to create page");
    }

    #[test]
    fn test_server_errors_always_use_fallback() {
        let e = ApiError::from_response(500, "/pages", &json!({"message": "stack trace here"}));
        assert_eq!(e.user_message("Failed to load pages"), "Failed to load pages");
        assert_eq!(
            ApiError::network("offline").user_message("Failed to load pages"),
            "Failed to load pages"
        );
    }
}
