use crate::digest::DEFAULT_CHUNK_SIZE;
use crate::http::{HttpOptions, DEFAULT_MAX_REDIRECTS, DEFAULT_READ_BUFFER, DEFAULT_USER_AGENT};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/pdfwatch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfwatchConfig {
    /// Timeout for header checks, in seconds.
    pub timeout_secs: f64,
    /// Timeout for prefix hashing; if missing, `timeout_secs` is used.
    #[serde(default)]
    pub hash_timeout_secs: Option<f64>,
    /// Number of leading bytes hashed by the prefix hasher.
    pub chunk_size: u64,
    /// Body read increment in bytes (None = 8192).
    #[serde(default)]
    pub read_buffer_bytes: Option<usize>,
    /// Override for the browser-like User-Agent.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Maximum redirects followed (None = 10).
    #[serde(default)]
    pub max_redirects: Option<u32>,
}

impl Default for PdfwatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10.0,
            hash_timeout_secs: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            read_buffer_bytes: None,
            user_agent: None,
            max_redirects: None,
        }
    }
}

impl PdfwatchConfig {
    /// Client settings for header checks.
    pub fn header_http_options(&self) -> HttpOptions {
        self.http_options(self.timeout_secs)
    }

    /// Client settings for prefix hashing.
    pub fn hash_http_options(&self) -> HttpOptions {
        self.http_options(self.hash_timeout_secs.unwrap_or(self.timeout_secs))
    }

    fn http_options(&self, timeout_secs: f64) -> HttpOptions {
        HttpOptions {
            timeout: secs(timeout_secs),
            connect_timeout: None,
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            max_redirects: self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS),
            read_buffer_bytes: self.read_buffer_bytes.unwrap_or(DEFAULT_READ_BUFFER),
            ..HttpOptions::default()
        }
    }
}

/// Non-finite or non-positive values fall back to the 10 s default.
fn secs(v: f64) -> Duration {
    if v.is_finite() && v > 0.0 {
        Duration::from_secs_f64(v)
    } else {
        crate::http::DEFAULT_TIMEOUT
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pdfwatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PdfwatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PdfwatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PdfwatchConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = PdfwatchConfig::default();
        assert_eq!(cfg.timeout_secs, 10.0);
        assert_eq!(cfg.chunk_size, 65536);
        assert!(cfg.hash_timeout_secs.is_none());
        let http = cfg.header_http_options();
        assert_eq!(http.timeout, Duration::from_secs(10));
        assert_eq!(http.read_buffer_bytes, 8192);
        assert_eq!(http.max_redirects, 10);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = PdfwatchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: PdfwatchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.timeout_secs, cfg.timeout_secs);
        assert_eq!(parsed.chunk_size, cfg.chunk_size);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            timeout_secs = 2.5
            hash_timeout_secs = 30
            chunk_size = 131072
            read_buffer_bytes = 16384
            user_agent = "pdfwatch-test/1.0"
            max_redirects = 3
        "#;
        let cfg: PdfwatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.chunk_size, 131072);
        assert_eq!(cfg.header_http_options().timeout, Duration::from_millis(2500));
        let hash = cfg.hash_http_options();
        assert_eq!(hash.timeout, Duration::from_secs(30));
        assert_eq!(hash.read_buffer_bytes, 16384);
        assert_eq!(hash.user_agent, "pdfwatch-test/1.0");
        assert_eq!(hash.max_redirects, 3);
    }

    #[test]
    fn hash_timeout_defaults_to_header_timeout() {
        let toml = r#"
            timeout_secs = 4
            chunk_size = 1024
        "#;
        let cfg: PdfwatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.hash_http_options().timeout, Duration::from_secs(4));
        assert!(cfg.user_agent.is_none());
    }

    #[test]
    fn nonsense_timeout_falls_back_to_default() {
        let cfg = PdfwatchConfig {
            timeout_secs: -1.0,
            ..PdfwatchConfig::default()
        };
        assert_eq!(cfg.header_http_options().timeout, Duration::from_secs(10));
    }
}
