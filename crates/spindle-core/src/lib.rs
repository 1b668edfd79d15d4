// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Spindle plugin runtime.
//!
//! This crate provides the foundational trait definitions, error types, and
//! boundary value types used throughout the Spindle workspace. Engine
//! adapters and native plugins implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;
pub mod value;

// Re-export key items at crate root for ergonomic imports.
pub use error::SpindleError;
pub use traits::{Declare, NativePlugin, ScriptEngine};
pub use types::{split_path, Contract, Global, Globals, HostFunction, Operation};
pub use value::{FromValue, Value, ValueKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spindle_error_messages_name_the_subject() {
        let dup = SpindleError::DuplicatePlugin { name: "a".into() };
        assert_eq!(dup.to_string(), "plugin 'a' is already loaded");

        let missing = SpindleError::OperationNotFound {
            plugin: "a".into(),
            operation: "Run".into(),
        };
        assert_eq!(missing.to_string(), "plugin 'a' has no operation 'Run'");

        let no_runtime = SpindleError::NoRuntimeFound {
            path: "plugins/x.lua".into(),
        };
        assert_eq!(
            no_runtime.to_string(),
            "no runtime found to handle: plugins/x.lua"
        );
    }

    #[test]
    fn all_backend_traits_are_exported() {
        // Compile-time check that both backend traits are object safe.
        fn _assert_engine(_: &dyn ScriptEngine) {}
        fn _assert_native(_: &dyn NativePlugin) {}
    }
}
