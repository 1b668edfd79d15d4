// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait definitions for the Spindle plugin runtime.
//!
//! A plugin is backed either by a [`ScriptEngine`] holding its compiled
//! module or by a [`NativePlugin`] object living in the host process. Both
//! expose the same invocation contract so the dispatch core can treat them
//! uniformly.

pub mod engine;
pub mod native;

pub use engine::{Declare, ScriptEngine};
pub use native::NativePlugin;
