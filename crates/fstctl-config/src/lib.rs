//! Shared configuration for the fstctl tools.
//!
//! TOML profiles (one per daemon control socket), merged with `FSTCTL_*`
//! environment variables, and translation to `fstctl_core::CtrlConfig`.
//! The CLI layers its own flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fstctl_core::CtrlConfig;
use fstctl_core::config::DEFAULT_CLIENT_DIR;

/// Prefix of the environment variables merged over the file.
///
/// Nested keys use a double underscore: `FSTCTL_DEFAULTS__TIMEOUT_SECS=5`.
pub const ENV_PREFIX: &str = "FSTCTL_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{name}'")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named daemon profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout, like `wpa_ctrl`'s 10 s.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Keepalive period for `monitor`; 0 disables it.
    #[serde(default)]
    pub ping_interval_secs: u64,

    #[serde(default = "default_client_dir")]
    pub client_dir: PathBuf,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout_secs: default_timeout(),
            ping_interval_secs: 0,
            client_dir: default_client_dir(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_client_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CLIENT_DIR)
}

/// One daemon control socket and its overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Control socket path (e.g., "/var/run/hostapd/global").
    pub ctrl_iface: PathBuf,

    pub timeout_secs: Option<u64>,

    pub ping_interval_secs: Option<u64>,

    pub client_dir: Option<PathBuf>,
}

impl Profile {
    pub fn new(ctrl_iface: impl Into<PathBuf>) -> Self {
        Self {
            ctrl_iface: ctrl_iface.into(),
            timeout_secs: None,
            ping_interval_secs: None,
            client_dir: None,
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    ///
    /// Returns `Ok(None)` when no name was asked for and no default
    /// profile exists.
    pub fn profile(&self, name: Option<&str>) -> Result<Option<(&str, &Profile)>, ConfigError> {
        let Some(name) = name.or(self.default_profile.as_deref()) else {
            return Ok(None);
        };
        match self.profiles.get_key_value(name) {
            Some((key, profile)) => Ok(Some((key.as_str(), profile))),
            None if self.default_profile.as_deref() == Some(name) => Ok(None),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "fstctl", "fstctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("fstctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

pub fn render_config(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_config(cfg)?)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `CtrlConfig` from a profile, falling back to `defaults`.
pub fn profile_to_ctrl_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<CtrlConfig, ConfigError> {
    ctrl_config(
        profile.ctrl_iface.clone(),
        profile.timeout_secs.unwrap_or(defaults.timeout_secs),
        profile
            .ping_interval_secs
            .unwrap_or(defaults.ping_interval_secs),
        profile
            .client_dir
            .clone()
            .unwrap_or_else(|| defaults.client_dir.clone()),
    )
}

/// Validate raw settings into a `CtrlConfig`.
pub fn ctrl_config(
    ctrl_iface: PathBuf,
    timeout_secs: u64,
    ping_interval_secs: u64,
    client_dir: PathBuf,
) -> Result<CtrlConfig, ConfigError> {
    if ctrl_iface.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            field: "ctrl_iface".into(),
            reason: "path is empty".into(),
        });
    }
    if timeout_secs == 0 {
        return Err(ConfigError::Validation {
            field: "timeout_secs".into(),
            reason: "must be at least 1".into(),
        });
    }

    let mut config = CtrlConfig::new(ctrl_iface).with_ping_interval_secs(ping_interval_secs);
    config.request_timeout = Duration::from_secs(timeout_secs);
    config.client_dir = client_dir;
    Ok(config)
}
