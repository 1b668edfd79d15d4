// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Spindle plugin runtime.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across engines, registries, and the runtime.
#[derive(Debug, Error)]
pub enum SpindleError {
    /// A plugin with the same name is already loaded or registered.
    #[error("plugin '{name}' is already loaded")]
    DuplicatePlugin { name: String },

    /// Plugin source was malformed or its evaluation raised.
    #[error("failed to load plugin '{name}': {message}")]
    Load { name: String, message: String },

    /// No registered engine recognizes the source file.
    #[error("no runtime found to handle: {}", path.display())]
    NoRuntimeFound { path: PathBuf },

    /// Reading a plugin file or directory failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A backend was asked about a plugin it does not hold.
    #[error("plugin '{0}' is not loaded")]
    PluginNotFound(String),

    /// The plugin does not expose the requested operation.
    #[error("plugin '{plugin}' has no operation '{operation}'")]
    OperationNotFound { plugin: String, operation: String },

    /// The operation exists but raised while running.
    #[error("{plugin}.{operation} failed: {message}")]
    Invocation {
        plugin: String,
        operation: String,
        message: String,
    },

    /// A value outside {string, integer} crossed the host/engine boundary.
    #[error("unsupported value kind '{kind}': only strings and integers cross the plugin boundary")]
    UnsupportedValue { kind: String },

    /// A host function called back into a plugin context that is still executing.
    #[error("plugin '{plugin}' is already executing; re-entrant calls are not supported")]
    Reentrant { plugin: String },
}

impl SpindleError {
    /// Shorthand for an [`SpindleError::UnsupportedValue`] naming the offending kind.
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedValue { kind: kind.into() }
    }
}
