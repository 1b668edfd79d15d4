// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is a
//! startup error rather than a silently ignored setting.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Spindle configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SpindleConfig {
    /// Plugin discovery and runtime behavior.
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// JavaScript engine settings.
    #[serde(default)]
    pub js: JsConfig,
}

/// Plugin discovery and runtime behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Directory scanned for plugin source files.
    #[serde(default = "default_plugin_dir")]
    pub plugin_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Abort a directory load at the first plugin that fails to load.
    #[serde(default = "default_fail_fast")]
    pub fail_fast: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            plugin_dir: default_plugin_dir(),
            log_level: default_log_level(),
            fail_fast: default_fail_fast(),
        }
    }
}

fn default_plugin_dir() -> PathBuf {
    PathBuf::from("plugins")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fail_fast() -> bool {
    true
}

/// JavaScript engine settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JsConfig {
    /// File name suffix claimed by the JavaScript engine.
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            file_extension: default_file_extension(),
        }
    }
}

fn default_file_extension() -> String {
    ".js".to_string()
}
