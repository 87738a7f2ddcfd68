/// Default API root for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default client-side timeout for every request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, e.g. `https://eduhire.example/api`.
    pub base_url: String,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
    /// Client-side request timeout in seconds. A hung request fails after
    /// this long instead of spinning forever.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `API_BASE_URL`         | `http://localhost:8000/api` |
    /// | `API_TOKEN`            | unset                       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                        |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("API_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let token = lookup("API_TOKEN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        default = DEFAULT_REQUEST_TIMEOUT_SECS,
                        "REQUEST_TIMEOUT_SECS must be a positive integer, using default"
                    );
                    DEFAULT_REQUEST_TIMEOUT_SECS
                }
            },
        };

        Self {
            base_url,
            token,
            request_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(ClientConfig::from_lookup(lookup(&[])), ClientConfig::default());
    }

    #[test]
    fn reads_all_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("API_BASE_URL", "https://eduhire.example/api/"),
            ("API_TOKEN", " abc "),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.base_url, "https://eduhire.example/api");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn bad_timeout_falls_back() {
        for raw in ["zero", "0", "-3"] {
            let config = ClientConfig::from_lookup(lookup(&[("REQUEST_TIMEOUT_SECS", raw)]));
            assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        }
    }

    #[test]
    fn blank_token_is_none() {
        let config = ClientConfig::from_lookup(lookup(&[("API_TOKEN", "   ")]));
        assert!(config.token.is_none());
    }
}
