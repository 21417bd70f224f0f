//! HTTP Server Configuration
//!
//! Layered configuration: built-in defaults, an optional JSON file, then
//! environment variables. CLI flags are applied on top by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors, all fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("API_KEY must be set to a non-empty secret")]
    MissingApiKey,
}

/// HTTP server configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared bearer secret (required, never serialized)
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Directory holding uploaded files (default: "./uploads")
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Base used for returned URLs instead of the request's scheme and host
    #[serde(default)]
    pub public_url: Option<String>,

    /// CORS allowed origins (default: empty, meaning any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Request body cap for uploads (default: no limit)
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,

    /// Log filter used when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: String::new(),
            upload_dir: default_upload_dir(),
            public_url: None,
            cors_origins: Vec::new(),
            max_upload_bytes: None,
            log_level: default_log_level(),
        }
    }
}

impl std::fmt::Debug for HttpServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("upload_dir", &self.upload_dir)
            .field("public_url", &self.public_url)
            .field("cors_origins", &self.cors_origins)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Load defaults, overlay the JSON file if given, then the process environment
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Overlay values from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BIND_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_value("PORT", &port)?;
        }
        if let Some(api_key) = lookup("API_KEY") {
            self.api_key = api_key;
        }
        if let Some(dir) = lookup("UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("PUBLIC_URL") {
            self.public_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(max) = lookup("MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = Some(parse_value("MAX_UPLOAD_BYTES", &max)?);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(())
    }

    /// Validate the final configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if let Some(url) = &self.public_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key: "PUBLIC_URL",
                    value: url.clone(),
                });
            }
        }
        if let Some(origin) = self.cors_origins.iter().find(|o| cors_origin(o).is_none()) {
            return Err(ConfigError::InvalidValue {
                key: "CORS_ORIGINS",
                value: origin.clone(),
            });
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Header value for one allowed origin. `*` is not an origin; an empty list
/// already means any.
pub(crate) fn cors_origin(origin: &str) -> Option<HeaderValue> {
    if origin == "*" {
        return None;
    }
    HeaderValue::from_str(origin).ok()
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert!(config.cors_origins.is_empty());
        assert!(config.max_upload_bytes.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = HttpServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_apply_env() {
        let mut config = HttpServerConfig::default();
        config
            .apply_env(env(&[
                ("PORT", "7000"),
                ("API_KEY", "abc123"),
                ("UPLOAD_DIR", "/srv/files"),
                ("CORS_ORIGINS", "http://a.test, http://b.test,"),
                ("MAX_UPLOAD_BYTES", "1048576"),
            ]))
            .unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.upload_dir, PathBuf::from("/srv/files"));
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.max_upload_bytes, Some(1048576));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = HttpServerConfig::default();
        let err = config.apply_env(env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_missing_api_key() {
        let config = HttpServerConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_public_url_must_be_http() {
        let mut config = HttpServerConfig::default();
        config
            .apply_env(env(&[("API_KEY", "k"), ("PUBLIC_URL", "files.test")]))
            .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "PUBLIC_URL", .. })
        ));
    }

    #[test]
    fn test_bind_host_from_env() {
        let mut config = HttpServerConfig::default();
        config
            .apply_env(env(&[("HOST", "build-box-17"), ("BIND_HOST", "127.0.0.1")]))
            .unwrap();
        assert_eq!(config.host, "127.0.0.1");

        let mut config = HttpServerConfig::default();
        config.apply_env(env(&[("HOST", "build-box-17")])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_bad_cors_origin_rejected() {
        for bad in ["http://a.test\nx", "*"] {
            let mut config = HttpServerConfig::default();
            config.api_key = "k".to_string();
            config.cors_origins = vec!["http://ok.test".to_string(), bad.to_string()];

            match config.validate() {
                Err(ConfigError::InvalidValue { key, value }) => {
                    assert_eq!(key, "CORS_ORIGINS");
                    assert_eq!(value, bad);
                }
                other => panic!("expected CORS_ORIGINS error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_file_then_env() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("filevault.json");
        fs::write(&path, r#"{"port": 6000, "api_key": "from-file", "host": "127.0.0.1"}"#)
            .unwrap();

        let mut config = HttpServerConfig::from_file(&path).unwrap();
        assert_eq!(config.port, 6000);
        assert_eq!(config.api_key, "from-file");

        config.apply_env(env(&[("API_KEY", "from-env")])).unwrap();
        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.socket_addr(), "127.0.0.1:6000");
    }

    #[test]
    fn test_unknown_file_key_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, r#"{"prot": 6000}"#).unwrap();

        assert!(matches!(
            HttpServerConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_api_key_never_serialized() {
        let mut config = HttpServerConfig::default();
        config.api_key = "abc123".to_string();

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("abc123"));
        assert!(!format!("{:?}", config).contains("abc123"));
    }
}
