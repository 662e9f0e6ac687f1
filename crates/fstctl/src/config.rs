//! CLI configuration: thin wrapper around `fstctl_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--ctrl, --timeout, --client-dir) on top of the loaded profile.

use std::path::PathBuf;

use fstctl_config::{Config, ConfigError, Profile};
use fstctl_core::CtrlConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use fstctl_config::{config_path, load_config, render_config, save_config_to};

/// Build the runtime `CtrlConfig` from the config file, profile, and CLI
/// overrides. Flags win over profile values, which win over `[defaults]`.
pub fn resolve_ctrl_config(global: &GlobalOpts, cfg: &Config) -> Result<CtrlConfig, CliError> {
    let profile = match cfg.profile(global.profile.as_deref()) {
        Ok(found) => found.map(|(_, profile)| profile),
        Err(ConfigError::UnknownProfile { name }) => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(cfg),
            });
        }
        Err(other) => return Err(other.into()),
    };

    let ctrl_iface = global
        .ctrl
        .clone()
        .or_else(|| profile.map(|p| p.ctrl_iface.clone()))
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;

    let defaults = &cfg.defaults;
    let timeout = global
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout_secs))
        .unwrap_or(defaults.timeout_secs);
    let ping = profile
        .and_then(|p| p.ping_interval_secs)
        .unwrap_or(defaults.ping_interval_secs);
    let client_dir = global
        .client_dir
        .clone()
        .or_else(|| profile.and_then(|p| p.client_dir.clone()))
        .unwrap_or_else(|| defaults.client_dir.clone());

    Ok(fstctl_config::ctrl_config(
        ctrl_iface, timeout, ping, client_dir,
    )?)
}

/// Insert or replace `name` with a profile for `ctrl_iface`.
pub fn upsert_profile(cfg: &mut Config, name: &str, ctrl_iface: PathBuf) {
    cfg.profiles
        .entry(name.to_owned())
        .and_modify(|p| p.ctrl_iface.clone_from(&ctrl_iface))
        .or_insert_with(|| Profile::new(ctrl_iface.clone()));
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(name.to_owned());
    }
}

fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}
