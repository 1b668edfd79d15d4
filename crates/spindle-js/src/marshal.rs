// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between boundary values and JavaScript values.
//!
//! JavaScript has a single number type. Integers that fit in `i32` are
//! handed over as engine integers, larger ones as doubles; coming back,
//! any finite number with no fractional part is accepted as an integer.

use boa_engine::{JsString, JsValue};
use spindle_core::{SpindleError, Value};

// 2^63 as f64; every integral double strictly below it (and at or above
// its negation) converts to i64 without loss of range.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Convert a boundary value into a JavaScript value.
pub fn to_js(value: &Value) -> JsValue {
    match value {
        Value::Int(n) => match i32::try_from(*n) {
            Ok(small) => JsValue::Integer(small),
            Err(_) => JsValue::Rational(*n as f64),
        },
        Value::Str(s) => JsValue::String(JsString::from(s.as_str())),
    }
}

/// Convert a JavaScript value into a boundary value.
///
/// `undefined` and `null` mean "no value". Anything besides strings and
/// integral numbers is rejected with [`SpindleError::UnsupportedValue`].
pub fn from_js(value: &JsValue) -> Result<Option<Value>, SpindleError> {
    match value {
        JsValue::Undefined | JsValue::Null => Ok(None),
        JsValue::Integer(n) => Ok(Some(Value::Int(i64::from(*n)))),
        JsValue::Rational(f) => integral(*f)
            .map(|n| Some(Value::Int(n)))
            .ok_or_else(|| SpindleError::unsupported("float")),
        JsValue::String(s) => Ok(Some(Value::Str(s.to_std_string_escaped()))),
        other => Err(SpindleError::unsupported(kind_of(other))),
    }
}

/// Convert call arguments, failing on the first unsupported one.
///
/// `undefined` and `null` arguments are rejected too: host functions only
/// ever see strings and integers.
pub fn args_from_js(args: &[JsValue]) -> Result<Vec<Value>, SpindleError> {
    args.iter()
        .map(|arg| from_js(arg)?.ok_or_else(|| SpindleError::unsupported(kind_of(arg))))
        .collect()
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f)).then_some(f as i64)
}

/// The `typeof`-style name used in error messages.
pub fn kind_of(value: &JsValue) -> &'static str {
    match value {
        JsValue::Undefined => "undefined",
        JsValue::Null => "null",
        JsValue::Boolean(_) => "boolean",
        JsValue::String(_) => "string",
        JsValue::Integer(_) | JsValue::Rational(_) => "number",
        JsValue::BigInt(_) => "bigint",
        JsValue::Symbol(_) => "symbol",
        JsValue::Object(obj) if obj.is_callable() => "function",
        JsValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn small_ints_become_engine_integers() {
        assert!(matches!(to_js(&Value::Int(42)), JsValue::Integer(42)));
        assert!(matches!(to_js(&Value::Int(1 << 40)), JsValue::Rational(_)));
    }

    #[test]
    fn integral_doubles_come_back_as_ints() {
        assert_eq!(
            from_js(&JsValue::Rational(1e12)).unwrap(),
            Some(Value::Int(1_000_000_000_000))
        );
        assert!(matches!(
            from_js(&JsValue::Rational(1.5)),
            Err(SpindleError::UnsupportedValue { ref kind }) if kind == "float"
        ));
        assert!(from_js(&JsValue::Rational(f64::NAN)).is_err());
    }

    #[test]
    fn absent_and_foreign_kinds() {
        assert_eq!(from_js(&JsValue::Undefined).unwrap(), None);
        assert_eq!(from_js(&JsValue::Null).unwrap(), None);
        assert!(matches!(
            from_js(&JsValue::Boolean(true)),
            Err(SpindleError::UnsupportedValue { ref kind }) if kind == "boolean"
        ));
    }

    #[test]
    fn host_arguments_must_be_present() {
        let args = [JsValue::Integer(1), JsValue::Undefined];
        assert!(args_from_js(&args).is_err());
        assert_eq!(
            args_from_js(&[JsValue::Integer(7)]).unwrap(),
            vec![Value::Int(7)]
        );
    }

    proptest! {
        #[test]
        fn ints_survive_the_boundary(n in -(1i64 << 53)..(1i64 << 53)) {
            let back = from_js(&to_js(&Value::Int(n))).unwrap();
            prop_assert_eq!(back, Some(Value::Int(n)));
        }

        #[test]
        fn strings_survive_the_boundary(s in "[a-zA-Z0-9 ._-]{0,32}") {
            let back = from_js(&to_js(&Value::Str(s.clone()))).unwrap();
            prop_assert_eq!(back, Some(Value::Str(s)));
        }
    }
}
