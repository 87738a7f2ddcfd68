/// Errors from the eduhire REST API layer.
///
/// `Display` is user-facing: the wizard shows it verbatim as the submission
/// banner.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Could not reach the server: {0}")]
    Request(#[from] reqwest::Error),

    /// A 2xx response whose body did not have the expected shape.
    #[error("Unexpected response from the server: {0}")]
    Decode(String),

    /// The API answered with a non-2xx status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Human-readable message extracted from the error payload.
        message: String,
    },

    /// A local input could not be turned into a request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) | ApiError::InvalidRequest(_) => None,
        }
    }
}

/// Keys the API uses for a top-level human-readable message, most specific
/// first.
const MESSAGE_KEYS: &[&str] = &["detail", "error", "message"];

/// Pull a human-readable message out of an error response body.
///
/// Understands `{"detail": ...}`, `{"error": ...}`, `{"message": ...}` and
/// field-error maps such as `{"name": ["An institution with this name
/// already exists."]}`. Anything else falls back to the raw body, or to a
/// generic status message for empty bodies.
pub fn extract_error_message(status: u16, body: &str) -> String {
    let fallback = || {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            format!("Request failed with status {status}")
        } else {
            trimmed.to_string()
        }
    };

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };

    match &value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => first_string(items).unwrap_or_else(fallback),
        serde_json::Value::Object(obj) => {
            for key in MESSAGE_KEYS {
                if let Some(serde_json::Value::String(s)) = obj.get(*key) {
                    return s.clone();
                }
            }
            obj.values()
                .find_map(|v| match v {
                    serde_json::Value::String(s) => Some(s.clone()),
                    serde_json::Value::Array(items) => first_string(items),
                    _ => None,
                })
                .unwrap_or_else(fallback)
        }
        _ => fallback(),
    }
}

fn first_string(items: &[serde_json::Value]) -> Option<String> {
    items.iter().find_map(|v| v.as_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_detail() {
        let body = r#"{"detail": "Authentication credentials were not provided.", "error": "x"}"#;
        assert_eq!(
            extract_error_message(401, body),
            "Authentication credentials were not provided."
        );
    }

    #[test]
    fn reads_error_and_message_keys() {
        assert_eq!(extract_error_message(400, r#"{"error": "Bad"}"#), "Bad");
        assert_eq!(extract_error_message(400, r#"{"message": "Nope"}"#), "Nope");
    }

    #[test]
    fn reads_field_error_lists() {
        let body = r#"{"name": ["An institution with this name already exists."]}"#;
        assert_eq!(
            extract_error_message(400, body),
            "An institution with this name already exists."
        );
    }

    #[test]
    fn reads_bare_list_and_string() {
        assert_eq!(extract_error_message(400, r#"["first", "second"]"#), "first");
        assert_eq!(extract_error_message(400, r#""plain""#), "plain");
    }

    #[test]
    fn falls_back_to_raw_body_or_status() {
        assert_eq!(extract_error_message(502, "Bad Gateway\n"), "Bad Gateway");
        assert_eq!(extract_error_message(500, ""), "Request failed with status 500");
        assert_eq!(extract_error_message(500, "{}"), "{}");
    }

    #[test]
    fn api_error_display_is_the_message() {
        let err = ApiError::Api {
            status: 409,
            message: "Already exists".into(),
        };
        assert_eq!(err.to_string(), "Already exists");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn decode_error_is_not_a_network_error() {
        let err = ApiError::Decode("missing field `id`".into());
        assert_eq!(
            err.to_string(),
            "Unexpected response from the server: missing field `id`"
        );
        assert_eq!(err.status(), None);
    }
}
