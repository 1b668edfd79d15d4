// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Values that cross the host/plugin boundary.
//!
//! Only two primitive kinds are bridged: integers and strings. There is no
//! structural marshalling of arrays, maps, or objects. Because [`Value`] has
//! no other variants, the host side cannot hand an engine anything else;
//! engines reject foreign kinds coming the other way with
//! [`SpindleError::UnsupportedValue`].

use std::fmt;

use strum::{Display, EnumString};

use crate::error::SpindleError;

/// Tag naming the kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Int,
    Str,
}

/// A primitive value passed to or returned from a plugin operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i64),
    Str(String),
}

impl Value {
    /// The kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Str(_) => ValueKind::Str,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    /// Parse a command-line style argument: integers become [`Value::Int`],
    /// everything else is passed through as a string.
    pub fn parse_arg(raw: &str) -> Self {
        raw.parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Str(raw.to_string()))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

/// Conversion from a returned [`Value`] into a typed host result.
///
/// Used by typed extension-point proxies to decode operation results.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, SpindleError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, SpindleError> {
        Ok(value)
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, SpindleError> {
        match value {
            Value::Int(n) => Ok(n),
            other => Err(SpindleError::unsupported(format!(
                "{} (expected int)",
                other.kind()
            ))),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, SpindleError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(SpindleError::unsupported(format!(
                "{} (expected str)",
                other.kind()
            ))),
        }
    }
}
