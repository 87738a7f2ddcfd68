use std::path::PathBuf;

use eduhire_client::ClientConfig;

/// Default directory for the file-backed draft storage.
pub const DEFAULT_DRAFT_DIR: &str = ".eduhire";

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Runtime configuration for the `eduhire` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub client: ClientConfig,
    pub draft_dir: PathBuf,
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var      | Default    |
    /// |--------------|------------|
    /// | `DRAFT_DIR`  | `.eduhire` |
    /// | `LOG_FORMAT` | `pretty`   |
    ///
    /// plus everything [`ClientConfig::from_env`] reads.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let draft_dir = lookup("DRAFT_DIR")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DRAFT_DIR.to_string());

        let log_format = match lookup("LOG_FORMAT") {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            client: ClientConfig::from_lookup(&lookup),
            draft_dir: PathBuf::from(draft_dir),
            log_format,
        }
    }
}
