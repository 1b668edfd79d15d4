// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Native adapter: host objects behind the scripted-plugin call contract.

use std::collections::HashMap;

use spindle_core::{NativePlugin, SpindleError, Value};

type Method<T> = Box<dyn Fn(&T, &[Value]) -> Option<Value>>;

/// Maps operation names to methods of a single host instance.
///
/// ```
/// use spindle_plugin::MethodTable;
/// use spindle_core::{NativePlugin, Value};
///
/// struct Upper;
/// impl Upper {
///     fn transform(&self, input: &str) -> String {
///         input.to_uppercase()
///     }
/// }
///
/// let table = MethodTable::new(Upper).method("Transform", |p, args| {
///     let input = args.first().and_then(Value::as_str).unwrap_or_default();
///     Some(p.transform(input).into())
/// });
/// let out = table.call("Transform", &["abc".into()]).unwrap();
/// assert_eq!(out, Some(Value::from("ABC")));
/// ```
pub struct MethodTable<T> {
    instance: T,
    methods: HashMap<String, Method<T>>,
}

impl<T> MethodTable<T> {
    pub fn new(instance: T) -> Self {
        Self {
            instance,
            methods: HashMap::new(),
        }
    }

    /// Bind `operation` to a method of the wrapped instance.
    pub fn method(
        mut self,
        operation: &str,
        f: impl Fn(&T, &[Value]) -> Option<Value> + 'static,
    ) -> Self {
        self.methods.insert(operation.to_string(), Box::new(f));
        self
    }

    /// The wrapped instance.
    pub fn instance(&self) -> &T {
        &self.instance
    }
}

impl<T> NativePlugin for MethodTable<T> {
    fn call(&self, operation: &str, args: &[Value]) -> Result<Option<Value>, SpindleError> {
        let method = self
            .methods
            .get(operation)
            .ok_or_else(|| SpindleError::OperationNotFound {
                plugin: String::new(),
                operation: operation.to_string(),
            })?;
        Ok(method(&self.instance, args))
    }
}

/// Wraps a [`NativePlugin`] so it is invoked exactly like a scripted backend.
pub struct NativeAdapter {
    plugin: Box<dyn NativePlugin>,
}

impl NativeAdapter {
    pub fn new(plugin: impl NativePlugin + 'static) -> Self {
        Self {
            plugin: Box::new(plugin),
        }
    }

    /// Call `operation` on the wrapped object on behalf of `plugin`.
    pub fn invoke(
        &self,
        plugin: &str,
        operation: &str,
        args: &[Value],
    ) -> Result<Option<Value>, SpindleError> {
        match self.plugin.call(operation, args) {
            Err(SpindleError::OperationNotFound { operation, .. }) => {
                Err(SpindleError::OperationNotFound {
                    plugin: plugin.to_string(),
                    operation,
                })
            }
            other => other,
        }
    }
}
