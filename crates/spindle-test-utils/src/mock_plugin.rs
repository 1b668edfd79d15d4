// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Native plugin double.

use std::cell::Cell;

use spindle_core::{NativePlugin, SpindleError, Value};

/// A native plugin whose `Run` operation returns its own id.
///
/// `Fail` always raises, `Count` returns how many times `Run` was called,
/// and `Concat` joins its string arguments.
pub struct IdPlugin {
    id: String,
    runs: Cell<i64>,
}

impl IdPlugin {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            runs: Cell::new(0),
        }
    }
}

impl NativePlugin for IdPlugin {
    fn call(&self, operation: &str, args: &[Value]) -> Result<Option<Value>, SpindleError> {
        match operation {
            "Run" => {
                self.runs.set(self.runs.get() + 1);
                Ok(Some(Value::Str(self.id.clone())))
            }
            "Count" => Ok(Some(Value::Int(self.runs.get()))),
            "Concat" => Ok(Some(Value::Str(
                args.iter().map(ToString::to_string).collect(),
            ))),
            "Fail" => Err(SpindleError::Invocation {
                plugin: self.id.clone(),
                operation: operation.to_string(),
                message: "native failure".to_string(),
            }),
            _ => Err(SpindleError::OperationNotFound {
                plugin: self.id.clone(),
                operation: operation.to_string(),
            }),
        }
    }
}
