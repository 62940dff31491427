//! Editor configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/gamestall/editor.toml`
//! - Windows: `%APPDATA%/gamestall/editor.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable consulted for the bearer token.
pub const TOKEN_ENV: &str = "GAMESTALL_TOKEN";

/// Editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Base URL of the Game Catalog Service API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Route reported after a save or cancel.
    #[serde(default = "default_dashboard_route")]
    pub dashboard_route: String,

    /// Stored bearer token; the environment and `--token` take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:5000/api".into()
}

fn default_dashboard_route() -> String {
    "/developer/dashboard".into()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            dashboard_route: default_dashboard_route(),
            token: None,
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl EditorConfig {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: EditorConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = EditorConfig::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix (may contain a token).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Picks the token: flag, then environment, then config file.
    pub fn resolve_token(&self, flag: Option<&str>, env: Option<&str>) -> Option<String> {
        [flag, env, self.token.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("gamestall")
            .join("editor.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("gamestall").join("editor.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/gamestall/editor.toml"))
    }
}
