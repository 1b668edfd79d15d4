// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JavaScript plugins for Spindle.
//!
//! [`JsEngine`] evaluates each plugin file in its own isolated JavaScript
//! context. Plugins declare the contracts they fulfil by calling the global
//! `implements("Name")` while their top-level code runs, and export each
//! operation as a global function of the same name.

pub mod engine;
pub mod marshal;
pub mod namespace;

pub use engine::{JsEngine, DEFAULT_EXTENSION, IMPLEMENTS_FN};
