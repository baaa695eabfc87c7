//! Client configuration.
//!
//! Settings are read from `config.toml` in the platform config directory (or the file
//! named by `AURALIS_CONFIG`). Every field has a default, so a missing file is not an
//! error. `AURALIS_API_URL` overrides the backend address.

use crate::{
    error::{ClientError, Result},
    paths,
};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, time::Duration};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub progress: ProgressConfig,
}

/// Shape of the simulated mix progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub tick_ms: u64,
    pub step: u8,
    pub ceiling: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 600,
            progress: ProgressConfig::default(),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_ms: 500,
            step: 5,
            ceiling: 90,
        }
    }
}

impl ProgressConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

impl ClientConfig {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_with(|k| env::var(k).ok(), None)
    }

    /// Resolve the config with `get` standing in for the environment. An explicit
    /// `api_url` beats both the file and `AURALIS_API_URL`.
    pub fn load_with(
        get: impl Fn(&str) -> Option<String>,
        api_url: Option<&str>,
    ) -> Result<Self> {
        let path = paths::config_file_with(&get)?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_overrides(&get);
        if let Some(url) = api_url {
            cfg.api_url = url.to_string();
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(url) = get("AURALIS_API_URL") {
            self.api_url = url;
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let cfg: ClientConfig = toml::from_str(&text)?;
        Ok(cfg)
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "api_url must be an http(s) URL, got `{}`",
                self.api_url
            )));
        }
        if self.progress.ceiling >= 100 {
            return Err(ClientError::Config(
                "progress.ceiling must stay below 100".into(),
            ));
        }
        Ok(())
    }

    /// `api_url` without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let cfg = ClientConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "api_url = \"https://mix.example\"\n[progress]\nstep = 10\n").unwrap();

        let cfg = ClientConfig::load_from(&p).unwrap();
        assert_eq!(cfg.api_url, "https://mix.example");
        assert_eq!(cfg.progress.step, 10);
        assert_eq!(cfg.progress.ceiling, 90);
        assert_eq!(cfg.connect_timeout_secs, 10);
    }

    #[test]
    fn rejects_ceiling_at_completion() {
        let mut cfg = ClientConfig::default();
        cfg.progress.ceiling = 100;
        assert!(matches!(cfg.validate(), Err(ClientError::Config(_))));
    }

    fn lookup(pairs: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
        let owned: Vec<(String, String)> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        move |k: &str| owned.iter().find(|(n, _)| n.as_str() == k).map(|(_, v)| v.clone())
    }

    #[test]
    fn env_api_url_beats_file() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("client.toml");
        fs::write(&p, "api_url = \"http://from-file:1\"\n").unwrap();

        let get = lookup(&[
            ("AURALIS_CONFIG", p.display().to_string()),
            ("AURALIS_API_URL", "http://from-env:2".to_string()),
        ]);
        let cfg = ClientConfig::load_with(get, None).unwrap();
        assert_eq!(cfg.api_url, "http://from-env:2");
    }

    #[test]
    fn config_path_override_is_read() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("client.toml");
        fs::write(&p, "api_url = \"http://from-file:1\"\n").unwrap();

        let get = lookup(&[("AURALIS_CONFIG", p.display().to_string())]);
        let cfg = ClientConfig::load_with(get, None).unwrap();
        assert_eq!(cfg.api_url, "http://from-file:1");
    }

    #[test]
    fn explicit_api_url_beats_env_and_file() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("client.toml");
        fs::write(&p, "api_url = \"http://from-file:1\"\n").unwrap();

        let get = lookup(&[
            ("AURALIS_CONFIG", p.display().to_string()),
            ("AURALIS_API_URL", "http://from-env:2".to_string()),
        ]);
        let cfg = ClientConfig::load_with(get, Some("https://from-flag:3")).unwrap();
        assert_eq!(cfg.api_url, "https://from-flag:3");
    }

    #[test]
    fn load_validates_after_overrides() {
        let dir = tempdir().unwrap();
        let get = lookup(&[
            ("AURALIS_CONFIG", dir.path().join("none.toml").display().to_string()),
            ("AURALIS_API_URL", "ftp://nope".to_string()),
        ]);
        assert!(matches!(
            ClientConfig::load_with(&get, None),
            Err(ClientError::Config(_))
        ));
        // A valid flag rescues a bad env value.
        assert!(ClientConfig::load_with(&get, Some("http://ok:1")).is_ok());
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let cfg = ClientConfig::default().with_api_url("http://host:8000/");
        assert_eq!(cfg.base_url(), "http://host:8000");
    }
}
