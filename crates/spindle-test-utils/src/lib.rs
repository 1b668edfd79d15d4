// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Spindle integration tests.
//!
//! Provides backend doubles for fast, deterministic tests of the dispatch
//! core without embedding a real interpreter.
//!
//! # Components
//!
//! - [`MockEngine`] - Line-oriented scripted engine
//! - [`IdPlugin`] - Native plugin that reports its own instance id

pub mod mock_engine;
pub mod mock_plugin;

pub use mock_engine::MockEngine;
pub use mock_plugin::IdPlugin;
