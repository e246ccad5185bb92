use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use shared::protocol::DEFAULT_HISTORY_LIMIT;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_CONFIG_FILE: &str = "es_client.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid api base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("api base url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub history_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Settings {
    /// Checks the base URL and strips any trailing slash so endpoint paths can
    /// be appended directly.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(&self.api_base_url)?;
        Ok(self)
    }

    pub fn with_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }
}

/// Defaults, then the TOML file at `path` if it exists, then environment
/// overrides.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        apply_file_overrides(&mut settings, &raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings.validated()
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) -> Result<(), toml::de::Error> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;
    if let Some(v) = file_cfg.get("api_base_url").and_then(toml::Value::as_str) {
        settings.api_base_url = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("history_limit")
        .and_then(toml::Value::as_integer)
        .and_then(|v| u32::try_from(v).ok())
    {
        settings.history_limit = v;
    }
    Ok(())
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("ES_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = var("APP__HISTORY_LIMIT") {
        if let Ok(parsed) = v.trim().parse::<u32>() {
            settings.history_limit = parsed;
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let settings = Settings::default().validated().expect("valid");
        assert_eq!(settings.api_base_url, "http://localhost:8000/api");
        assert_eq!(settings.history_limit, 50);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let settings = Settings::default()
            .with_base_url("https://es.example.com/api/ ")
            .validated()
            .expect("valid");
        assert_eq!(settings.api_base_url, "https://es.example.com/api");
    }

    #[test]
    fn rejects_relative_and_non_http_urls() {
        assert!(matches!(
            normalize_base_url("/api"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            normalize_base_url("ftp://example.com/api"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn env_overrides_take_precedence_over_file() {
        let mut settings = Settings::default();
        apply_file_overrides(
            &mut settings,
            "api_base_url = \"http://file.example/api\"\nhistory_limit = 20\n",
        )
        .expect("parse");
        assert_eq!(settings.api_base_url, "http://file.example/api");
        assert_eq!(settings.history_limit, 20);

        let env: HashMap<&str, &str> = HashMap::from([
            ("ES_API_BASE_URL", "http://env.example/api"),
            ("APP__HISTORY_LIMIT", "not-a-number"),
        ]);
        apply_env_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.api_base_url, "http://env.example/api");
        assert_eq!(settings.history_limit, 20);
    }

    #[test]
    fn malformed_config_file_is_reported_with_path() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("es_client_config_test_{suffix}.toml"));
        fs::write(&path, "api_base_url = ").expect("write");

        let err = load_settings_from(&path).expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse { .. }), "unexpected: {err}");
        assert!(err.to_string().contains("es_client_config_test_"));

        fs::remove_file(path).expect("cleanup");
    }
}
