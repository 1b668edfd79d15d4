// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by engines, registries, and the runtime.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// A host function exposed to scripted plugins through a global path.
///
/// Arguments arrive already marshalled into [`Value`]s; the single optional
/// return value is marshalled back into the calling engine.
#[derive(Clone)]
pub struct HostFunction(Rc<dyn Fn(&[Value]) -> Option<Value>>);

impl HostFunction {
    pub fn new(f: impl Fn(&[Value]) -> Option<Value> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Call the wrapped function.
    pub fn call(&self, args: &[Value]) -> Option<Value> {
        (self.0)(args)
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostFunction(..)")
    }
}

/// A value injected into every loaded scripted module at a dotted path.
#[derive(Debug, Clone)]
pub enum Global {
    /// A primitive value.
    Value(Value),
    /// A host function callable from inside plugin code.
    Function(HostFunction),
}

impl Global {
    /// Wrap a host closure as a global function entry.
    pub fn function(f: impl Fn(&[Value]) -> Option<Value> + 'static) -> Self {
        Global::Function(HostFunction::new(f))
    }

    /// The primitive value, if this entry is not a function.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Global::Value(v) => Some(v),
            Global::Function(_) => None,
        }
    }
}

impl From<Value> for Global {
    fn from(value: Value) -> Self {
        Global::Value(value)
    }
}

impl From<i64> for Global {
    fn from(n: i64) -> Self {
        Global::Value(Value::Int(n))
    }
}

impl From<i32> for Global {
    fn from(n: i32) -> Self {
        Global::Value(Value::from(n))
    }
}

impl From<String> for Global {
    fn from(s: String) -> Self {
        Global::Value(Value::Str(s))
    }
}

impl From<&str> for Global {
    fn from(s: &str) -> Self {
        Global::Value(Value::from(s))
    }
}

/// Accumulated global entries keyed by dotted path.
///
/// Sorted so that a parent namespace (`Foo`) is applied before its
/// children (`Foo.Bar`).
pub type Globals = BTreeMap<String, Global>;

/// Split a dotted global path into its namespace segments.
///
/// Empty segments (from `A..B` or a trailing dot) are dropped.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

/// One callable operation of a capability contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Operation name as exposed by plugins (e.g. `"Transform"`).
    pub name: String,
    /// Number of parameters.
    pub arity: usize,
    /// Whether the operation produces a value.
    pub returns: bool,
}

impl Operation {
    pub fn new(name: impl Into<String>, arity: usize, returns: bool) -> Self {
        Self {
            name: name.into(),
            arity,
            returns,
        }
    }
}

/// A named capability contract: an ordered set of operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    pub name: String,
    pub operations: Vec<Operation>,
}

impl Contract {
    pub fn new(name: impl Into<String>, operations: Vec<Operation>) -> Self {
        Self {
            name: name.into(),
            operations,
        }
    }

    /// Look up an operation by name.
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }
}
