// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::SpindleConfig;

/// Accepted values for `runtime.log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate semantic constraints, collecting every failure.
pub fn validate_config(config: &SpindleConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.runtime.plugin_dir.as_os_str().is_empty() {
        errors.push(ConfigError::Validation {
            message: "runtime.plugin_dir must not be empty".to_string(),
        });
    }

    let level = config.runtime.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "runtime.log_level `{}` is not one of: {}",
                config.runtime.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let ext = &config.js.file_extension;
    if !ext.starts_with('.') || ext.len() < 2 {
        errors.push(ConfigError::Validation {
            message: format!("js.file_extension `{ext}` must start with `.` followed by a suffix"),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&SpindleConfig::default()).is_ok());
    }

    #[test]
    fn all_failures_are_collected() {
        let mut config = SpindleConfig::default();
        config.runtime.plugin_dir = "".into();
        config.runtime.log_level = "loud".to_string();
        config.js.file_extension = "js".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = SpindleConfig::default();
        config.runtime.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
