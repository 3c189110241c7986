use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, VeilError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub roster: RosterConfig,
}

/// Upstream lookup endpoints. Paths are appended to these bases, so tests
/// can point them at a mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_profile_url")]
    pub profile_url: String,
    #[serde(default = "default_uuid_url")]
    pub uuid_url: String,
    #[serde(default = "default_uuid_fallback_url")]
    pub uuid_fallback_url: String,
    #[serde(default = "default_session_url")]
    pub session_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            profile_url: default_profile_url(),
            uuid_url: default_uuid_url(),
            uuid_fallback_url: default_uuid_fallback_url(),
            session_url: default_session_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Entity acted on when the CLI is not given an explicit target.
    #[serde(default)]
    pub default_target: Option<String>,
}

/// Entities the local directory knows about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub online: Vec<RosterEntry>,
    #[serde(default)]
    pub known: Vec<RosterEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    #[serde(default)]
    pub id: Option<Uuid>,
}

fn default_profile_url() -> String {
    "https://api.ashcon.app/mojang/v2/user".to_string()
}

fn default_uuid_url() -> String {
    "https://api.mojang.com/users/profiles/minecraft".to_string()
}

fn default_uuid_fallback_url() -> String {
    "https://playerdb.co/api/player/minecraft".to_string()
}

fn default_session_url() -> String {
    "https://sessionserver.mojang.com/session/minecraft/profile".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

impl Config {
    /// Load config from an explicit path, `VEIL_CONFIG`, or the default
    /// location; defaults apply where no file exists. Env overrides win.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("VEIL_CONFIG").ok().map(PathBuf::from))
            .or_else(|| dirs::config_dir().map(|dir| dir.join("veil/config.toml")));

        let mut config = match path {
            Some(path) if path.exists() => Self::load_file(&path)?,
            _ => Self::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| VeilError::Config(format!("read config {}: {err}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|err| VeilError::Config(format!("parse config {}: {err}", path.display())))
    }

    fn apply_env_overrides(&mut self) {
        if let Some(value) = env_string("VEIL_RESOLVER_PROFILE_URL") {
            self.resolver.profile_url = value;
        }
        if let Some(value) = env_string("VEIL_RESOLVER_UUID_URL") {
            self.resolver.uuid_url = value;
        }
        if let Some(value) = env_string("VEIL_RESOLVER_UUID_FALLBACK_URL") {
            self.resolver.uuid_fallback_url = value;
        }
        if let Some(value) = env_string("VEIL_RESOLVER_SESSION_URL") {
            self.resolver.session_url = value;
        }
        if let Some(value) = env_string("VEIL_RESOLVER_TIMEOUT_SECS") {
            if let Ok(secs) = value.parse() {
                self.resolver.timeout_secs = secs;
            }
        }
        if let Some(value) = env_string("VEIL_DEFAULT_TARGET") {
            self.provider.default_target = Some(value);
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
