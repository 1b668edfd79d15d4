// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extension points: contract-shaped proxies bound to one plugin each.
//!
//! A [`Proxy`] pairs a plugin name, its backend, and a contract shape. Each
//! operation call is forwarded to the backend; failures are logged and
//! surface as `None`, so fanning a call out over many plugins always
//! completes even when one of them misbehaves.
//!
//! Host code normally works with typed wrappers declared through
//! [`extension_point!`](crate::extension_point) rather than with raw proxies.

use std::fmt;
use std::rc::Rc;

use spindle_core::{Contract, FromValue, Operation, SpindleError, Value};
use tracing::error;

use crate::registry::Backend;

/// A capability contract known at compile time.
///
/// Implemented by the wrappers generated with
/// [`extension_point!`](crate::extension_point).
pub trait ExtensionPoint: Sized {
    /// Contract name plugins declare with `implements(NAME)`.
    const NAME: &'static str;

    /// The ordered operations of the contract.
    fn operations() -> Vec<Operation>;

    /// Wrap a proxy already bound to a plugin that declared [`Self::NAME`].
    fn from_proxy(proxy: Proxy) -> Self;

    /// The contract shape described by [`Self::NAME`] and [`Self::operations`].
    fn contract() -> Contract {
        Contract::new(Self::NAME, Self::operations())
    }
}

/// One plugin seen through one contract.
///
/// Proxies are cheap to clone and are regenerated on every query; they are
/// never stored by the runtime.
#[derive(Clone)]
pub struct Proxy {
    plugin: Rc<str>,
    backend: Backend,
    contract: Rc<Contract>,
}

impl Proxy {
    pub(crate) fn new(plugin: &str, backend: Backend, contract: Rc<Contract>) -> Self {
        Self {
            plugin: Rc::from(plugin),
            backend,
            contract,
        }
    }

    /// Name of the bound plugin.
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// The contract this proxy is shaped like.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Call an operation and report failures to the caller.
    ///
    /// The operation must belong to the contract and receive exactly its
    /// declared number of arguments. The result of an operation declared
    /// without a return value is discarded.
    pub fn try_call(&self, operation: &str, args: &[Value]) -> Result<Option<Value>, SpindleError> {
        let op = self
            .contract
            .operation(operation)
            .ok_or_else(|| SpindleError::OperationNotFound {
                plugin: self.plugin.to_string(),
                operation: format!("{}.{operation}", self.contract.name),
            })?;
        if args.len() != op.arity {
            return Err(SpindleError::Invocation {
                plugin: self.plugin.to_string(),
                operation: operation.to_string(),
                message: format!("expected {} argument(s), got {}", op.arity, args.len()),
            });
        }

        let value = self.backend.invoke(&self.plugin, operation, args)?;
        Ok(if op.returns { value } else { None })
    }

    /// Call an operation; failures are logged and yield `None`.
    pub fn call(&self, operation: &str, args: &[Value]) -> Option<Value> {
        match self.try_call(operation, args) {
            Ok(value) => value,
            Err(err) => {
                self.report(operation, &err);
                None
            }
        }
    }

    /// Call an operation and decode its result; decode failures are logged too.
    pub fn call_as<T: FromValue>(&self, operation: &str, args: &[Value]) -> Option<T> {
        let value = self.call(operation, args)?;
        match T::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                self.report(operation, &err);
                None
            }
        }
    }

    fn report(&self, operation: &str, err: &SpindleError) {
        error!(
            plugin = %self.plugin,
            backend = self.backend.kind(),
            contract = %self.contract.name,
            operation,
            error = %err,
            "plugin call failed"
        );
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("plugin", &self.plugin)
            .field("backend", &self.backend.kind())
            .field("contract", &self.contract.name)
            .finish()
    }
}

/// Declare a typed extension point.
///
/// Generates a wrapper struct around [`Proxy`], implements
/// [`ExtensionPoint`] for it (the contract name is the struct name), and
/// adds one method per operation. Each method maps a snake_case Rust name to
/// the operation name plugins export. Arguments must convert into
/// [`Value`]; return types must implement [`FromValue`].
///
/// ```
/// use spindle_plugin::{extension_point, ExtensionPoint};
///
/// extension_point! {
///     /// Rewrites lines of text.
///     pub struct TextFilter {
///         fn filter = "Filter"(line: &str) -> String;
///     }
/// }
///
/// assert_eq!(TextFilter::NAME, "TextFilter");
/// assert_eq!(TextFilter::operations()[0].arity, 1);
/// ```
#[macro_export]
macro_rules! extension_point {
    (@count) => { 0usize };
    (@count $head:ident $($tail:ident)*) => {
        1usize + $crate::extension_point!(@count $($tail)*)
    };
    (@returns) => { false };
    (@returns $ret:ty) => { true };
    (@dispatch $proxy:expr, $op:expr, [$($arg:expr),*]) => {{
        let _ = $proxy.call($op, &[$($arg),*]);
    }};
    (@dispatch $proxy:expr, $op:expr, [$($arg:expr),*] $ret:ty) => {
        $proxy.call_as::<$ret>($op, &[$($arg),*])
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fn_meta:meta])*
                fn $method:ident = $op:literal ( $($arg:ident : $ty:ty),* $(,)? ) $(-> $ret:ty)? ;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        $vis struct $name($crate::Proxy);

        impl $crate::ExtensionPoint for $name {
            const NAME: &'static str = stringify!($name);

            fn operations() -> ::std::vec::Vec<$crate::Operation> {
                ::std::vec![
                    $(
                        $crate::Operation::new(
                            $op,
                            $crate::extension_point!(@count $($arg)*),
                            $crate::extension_point!(@returns $($ret)?),
                        )
                    ),*
                ]
            }

            fn from_proxy(proxy: $crate::Proxy) -> Self {
                Self(proxy)
            }
        }

        impl $name {
            /// Name of the plugin behind this proxy.
            pub fn plugin_name(&self) -> &str {
                self.0.plugin()
            }

            $(
                $(#[$fn_meta])*
                pub fn $method(&self, $($arg: $ty),*) $(-> ::std::option::Option<$ret>)? {
                    $crate::extension_point!(
                        @dispatch self.0, $op, [$($crate::Value::from($arg)),*] $($ret)?
                    )
                }
            )*
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeAdapter;
    use spindle_test_utils::IdPlugin;
    use tracing_test::traced_test;

    crate::extension_point! {
        struct Runner {
            fn run = "Run"() -> String;
            fn count = "Count"() -> i64;
            fn fail = "Fail"() -> String;
            fn concat = "Concat"(a: &str, b: i64) -> String;
        }
    }

    crate::extension_point! {
        struct Observer {
            fn run = "Run"();
        }
    }

    fn proxy<E: ExtensionPoint>(id: &str) -> E {
        let backend = Backend::Native(Rc::new(NativeAdapter::new(IdPlugin::new(id))));
        E::from_proxy(Proxy::new(id, backend, Rc::new(E::contract())))
    }

    #[test]
    fn macro_builds_contract_shape() {
        assert_eq!(Runner::NAME, "Runner");
        assert_eq!(
            Runner::operations(),
            vec![
                Operation::new("Run", 0, true),
                Operation::new("Count", 0, true),
                Operation::new("Fail", 0, true),
                Operation::new("Concat", 2, true),
            ]
        );
        assert_eq!(Observer::operations(), vec![Operation::new("Run", 0, false)]);
    }

    #[test]
    fn typed_methods_forward_and_decode() {
        let runner: Runner = proxy("1a");
        assert_eq!(runner.plugin_name(), "1a");
        assert_eq!(runner.run().as_deref(), Some("1a"));
        assert_eq!(runner.count(), Some(1));
        assert_eq!(runner.concat("x", 7).as_deref(), Some("x7"));
    }

    #[test]
    fn operations_without_return_discard_results() {
        let observer: Observer = proxy("obs");
        // Returns () even though the backend produced a value.
        observer.run();
        let raw = observer.0.try_call("Run", &[]).unwrap();
        assert_eq!(raw, None);
    }

    #[traced_test]
    #[test]
    fn failures_are_logged_and_yield_none() {
        let runner: Runner = proxy("broken");
        assert_eq!(runner.fail(), None);
        assert!(logs_contain("plugin call failed"));
        assert!(logs_contain("native failure"));
    }

    #[traced_test]
    #[test]
    fn kind_mismatch_on_decode_is_logged() {
        let runner: Runner = proxy("1a");
        // Count decodes as i64, but asking for it as a string must fail softly.
        assert_eq!(runner.0.call_as::<String>("Count", &[]), None);
        assert!(logs_contain("unsupported value kind"));
    }

    #[test]
    fn arity_and_unknown_operations_are_rejected() {
        let runner: Runner = proxy("1a");
        assert!(matches!(
            runner.0.try_call("Run", &[Value::Int(1)]),
            Err(SpindleError::Invocation { .. })
        ));
        assert!(matches!(
            runner.0.try_call("Missing", &[]),
            Err(SpindleError::OperationNotFound { .. })
        ));
    }
}
