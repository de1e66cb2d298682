use serde_json::Value;
use thiserror::Error;

use crate::utils::truncate_string;

/// Failure talking to the backend, classified by HTTP status.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request rejected: {0}")]
    BadRequest(String),

    #[error("Not logged in or session revoked")]
    Unauthorized,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Too many requests - try again later")]
    RateLimited,

    #[error("Backend error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Longest backend message kept in an error
const MAX_MESSAGE_CHARS: usize = 300;

impl ApiError {
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = backend_message(body);
        match status.as_u16() {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            code @ 500..=599 => ApiError::Server { status: code, message },
            code => ApiError::InvalidResponse(format!("status {}: {}", code, message)),
        }
    }

    /// Whether logging in again could fix this error
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::Forbidden(_))
    }
}

/// Human-readable part of an error body.
///
/// The backend answers with `{"detail": "..."}` or with per-field message
/// lists (`{"email": ["..."], "non_field_errors": ["..."]}`); anything else
/// is kept as raw text.
fn backend_message(body: &str) -> String {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            _ => map
                .iter()
                .flat_map(|(field, messages)| field_messages(field, messages))
                .collect::<Vec<_>>()
                .join("; "),
        },
        _ => body.trim().to_string(),
    };
    truncate_string(&message, MAX_MESSAGE_CHARS)
}

fn field_messages(field: &str, messages: &Value) -> Vec<String> {
    let texts: Vec<&str> = match messages {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };
    texts
        .into_iter()
        .map(|text| match field {
            "non_field_errors" => text.to_string(),
            _ => format!("{}: {}", field, text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream down"),
            ApiError::Server { status: 502, .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
        assert!(ApiError::from_status(StatusCode::FORBIDDEN, "").is_auth_error());
        assert!(!ApiError::from_status(StatusCode::NOT_FOUND, "").is_auth_error());
    }

    #[test]
    fn test_detail_message() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"detail": "Nenalezeno."}"#);
        assert_eq!(err.to_string(), "Not found: Nenalezeno.");
    }

    #[test]
    fn test_field_messages() {
        let body = serde_json::json!({
            "non_field_errors": ["Invalid credentials"],
            "email": ["Enter a valid email."]
        })
        .to_string();
        let ApiError::BadRequest(message) = ApiError::from_status(StatusCode::BAD_REQUEST, &body)
        else {
            panic!("expected bad request");
        };
        assert!(message.contains("Invalid credentials"));
        assert!(message.contains("email: Enter a valid email."));
    }

    #[test]
    fn test_long_message_is_truncated_on_char_boundary() {
        let body = "ž".repeat(400);
        let ApiError::Server { message, .. } =
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body)
        else {
            panic!("expected server error");
        };
        assert_eq!(message.chars().count(), MAX_MESSAGE_CHARS);
        assert!(message.ends_with("..."));
    }
}
