// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Native (in-process) plugin trait.

use crate::error::SpindleError;
use crate::value::Value;

/// A plugin implemented directly in host code.
///
/// Implementors resolve `operation` to one of their own methods. An unknown
/// operation should yield [`SpindleError::OperationNotFound`].
pub trait NativePlugin {
    fn call(&self, operation: &str, args: &[Value]) -> Result<Option<Value>, SpindleError>;
}
