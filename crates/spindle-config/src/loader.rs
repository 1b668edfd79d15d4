// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./spindle.toml` > `~/.config/spindle/spindle.toml` >
//! `/etc/spindle/spindle.toml`, then `PLUGIN_PATH` and `SPINDLE_*`
//! environment variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SpindleConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG: &str = "/etc/spindle/spindle.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "spindle.toml";

/// Per-user configuration file under the XDG config directory, if one exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("spindle/spindle.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/spindle/spindle.toml`
/// 3. `~/.config/spindle/spindle.toml`
/// 4. `./spindle.toml`
/// 5. `PLUGIN_PATH` (sets `runtime.plugin_dir`)
/// 6. `SPINDLE_*` environment variables
pub fn load_config() -> Result<SpindleConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<SpindleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SpindleConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SpindleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SpindleConfig::default()))
        .merge(Toml::file(path))
        .merge(plugin_path_provider())
        .merge(env_provider())
        .extract()
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SpindleConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(plugin_path_provider())
        .merge(env_provider())
}

/// `PLUGIN_PATH` names the plugin directory without the `SPINDLE_` prefix.
fn plugin_path_provider() -> Env {
    Env::raw()
        .only(&["PLUGIN_PATH"])
        .map(|_| "runtime.plugin_dir".into())
}

/// `SPINDLE_<SECTION>_<KEY>` overrides `<section>.<key>`.
///
/// Uses an explicit `map()` instead of `split("_")` because keys themselves
/// contain underscores: `SPINDLE_RUNTIME_PLUGIN_DIR` is `runtime.plugin_dir`.
fn env_provider() -> Env {
    Env::prefixed("SPINDLE_").map(|key| {
        key.as_str()
            .replacen("runtime_", "runtime.", 1)
            .replacen("js_", "js.", 1)
            .into()
    })
}
