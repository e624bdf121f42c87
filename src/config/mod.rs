use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

pub const ENV_BACKEND_URL: &str = "GYMDESK_BACKEND_URL";
pub const ENV_ANON_KEY: &str = "GYMDESK_ANON_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Project URL of the backend, e.g. `https://<ref>.supabase.co`
    #[serde(default)]
    pub backend_url: String,
    /// Public (anon) project key sent as `apikey` on every request
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_location_name")]
    pub location_name: String,
    #[serde(default = "default_gym_name")]
    pub gym_name: String,
    #[serde(default = "default_sessions_limit")]
    pub sessions_limit: usize,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    /// Program that receives exported files (e.g. `xdg-open`). None = save only.
    #[serde(default)]
    pub share_command: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

pub(crate) fn default_location_name() -> String {
    "Front Desk".to_string()
}
fn default_gym_name() -> String {
    "Your Gym".to_string()
}
fn default_sessions_limit() -> usize {
    30
}
fn default_request_timeout() -> u64 {
    15
}
fn default_export_dir() -> String {
    dirs::document_dir()
        .map(|d| d.join("gymdesk"))
        .unwrap_or_else(|| Config::config_dir().join("exports"))
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            anon_key: String::new(),
            location_name: default_location_name(),
            gym_name: default_gym_name(),
            sessions_limit: default_sessions_limit(),
            export_dir: default_export_dir(),
            share_command: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gymdesk")
    }

    /// Return the full path of the default config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("gymdesk.conf")
    }

    /// Pick the config file: `--config` override first, default location otherwise.
    pub fn resolve_path(custom: Option<&str>) -> PathBuf {
        match custom {
            Some(p) => expand_tilde(p),
            None => Self::config_file(),
        }
    }

    /// The persisted session lives next to the config file it belongs to.
    pub fn session_file(config_path: &Path) -> PathBuf {
        config_path
            .parent()
            .map(|dir| dir.join("session.json"))
            .unwrap_or_else(|| PathBuf::from("session.json"))
    }

    pub fn export_path(&self) -> PathBuf {
        expand_tilde(&self.export_dir)
    }

    /// Load configuration from file, or return defaults if not found.
    /// Environment variables override the backend coordinates.
    pub fn load(path: &Path) -> AppResult<Self> {
        let mut cfg = if path.exists() {
            let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?
        } else {
            Config::default()
        };

        if let Ok(url) = env::var(ENV_BACKEND_URL)
            && !url.trim().is_empty()
        {
            cfg.backend_url = url;
        }
        if let Ok(key) = env::var(ENV_ANON_KEY)
            && !key.trim().is_empty()
        {
            cfg.anon_key = key;
        }

        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Initialize the configuration file with defaults.
    /// An existing file is left untouched unless `force` is set.
    /// Returns true when a file was written.
    pub fn init_all(path: &Path, force: bool) -> AppResult<bool> {
        if path.exists() && !force {
            return Ok(false);
        }
        Config::default().save(path)?;
        Ok(true)
    }

    /// Backend coordinates, or a configuration error naming what is missing.
    pub fn backend(&self) -> AppResult<(&str, &str)> {
        if self.backend_url.trim().is_empty() {
            return Err(AppError::Config(format!(
                "backend_url is not set (edit the config file or set {ENV_BACKEND_URL})"
            )));
        }
        if self.anon_key.trim().is_empty() {
            return Err(AppError::Config(format!(
                "anon_key is not set (edit the config file or set {ENV_ANON_KEY})"
            )));
        }
        Ok((self.backend_url.trim_end_matches('/'), self.anon_key.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("nope.conf")).unwrap();
        assert_eq!(cfg.location_name, "Front Desk");
        assert_eq!(cfg.sessions_limit, 30);
    }

    #[test]
    fn partial_file_is_completed_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gymdesk.conf");
        fs::write(&path, "gym_name: Iron Temple\nsessions_limit: 10\n").unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.gym_name, "Iron Temple");
        assert_eq!(cfg.sessions_limit, 10);
        assert_eq!(cfg.location_name, "Front Desk");
    }

    #[test]
    fn backend_requires_url_and_key() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.backend(), Err(AppError::Config(_))));

        cfg.backend_url = "https://example.supabase.co/".into();
        cfg.anon_key = "anon".into();
        let (url, key) = cfg.backend().unwrap();
        assert_eq!(url, "https://example.supabase.co");
        assert_eq!(key, "anon");
    }

    #[test]
    fn session_file_sits_next_to_config() {
        let p = Config::session_file(Path::new("/tmp/gd/gymdesk.conf"));
        assert_eq!(p, PathBuf::from("/tmp/gd/session.json"));
    }
}
