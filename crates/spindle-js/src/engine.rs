// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The JavaScript [`ScriptEngine`] implementation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use boa_engine::{Context, JsError, JsResult, JsString, JsValue, NativeFunction, Source};
use spindle_core::{Declare, Globals, ScriptEngine, SpindleError, Value};
use tracing::{debug, warn};

use crate::{marshal, namespace};

/// Name of the global function plugins call to declare a capability.
pub const IMPLEMENTS_FN: &str = "implements";

/// Default file extension claimed by [`JsEngine`].
pub const DEFAULT_EXTENSION: &str = ".js";

/// A plugin's context, borrowed mutably only while one of its operations runs.
type Slot = Rc<RefCell<Context>>;

/// JavaScript engine hosting one isolated context per plugin.
pub struct JsEngine {
    extension: String,
    contexts: RefCell<HashMap<String, Slot>>,
    globals: RefCell<Globals>,
}

impl JsEngine {
    /// Engine claiming `.js` files.
    pub fn new() -> Self {
        Self::with_extension(DEFAULT_EXTENSION)
    }

    /// Engine claiming files that end with `extension` (e.g. `".mjs"`).
    pub fn with_extension(extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
            contexts: RefCell::new(HashMap::new()),
            globals: RefCell::new(Globals::new()),
        }
    }

    /// Plugins with a retained context, sorted.
    #[cfg(test)]
    fn plugins(&self) -> Vec<String> {
        let mut names: Vec<String> = self.contexts.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    fn slot(&self, plugin: &str) -> Option<Slot> {
        self.contexts.borrow().get(plugin).map(Rc::clone)
    }

    fn fresh_context(&self, on_declare: Declare) -> JsResult<Context> {
        let mut context = Context::default();
        let implements = move |_this: &JsValue, args: &[JsValue], ctx: &mut Context| -> JsResult<JsValue> {
            let name = args.first().cloned().unwrap_or_default().to_string(ctx)?;
            on_declare(&name.to_std_string_escaped());
            Ok(JsValue::undefined())
        };
        // SAFETY: the closure captures only the `Declare` callback, which holds
        // no garbage-collected values.
        let implements = unsafe { NativeFunction::from_closure(implements) };
        context.register_global_callable(JsString::from(IMPLEMENTS_FN), 1, implements)?;
        Ok(context)
    }
}

impl Default for JsEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(err: &JsError) -> String {
    err.to_string()
}

impl ScriptEngine for JsEngine {
    fn name(&self) -> &str {
        "js"
    }

    fn matches_source(&self, path: &Path) -> bool {
        path.to_str()
            .is_some_and(|p| p.ends_with(self.extension.as_str()))
    }

    fn initialize(
        &self,
        plugin: &str,
        source: &str,
        on_declare: Declare,
    ) -> Result<(), SpindleError> {
        if self.has_plugin(plugin) {
            return Err(SpindleError::DuplicatePlugin {
                name: plugin.to_string(),
            });
        }
        let load_error = |err: JsError| SpindleError::Load {
            name: plugin.to_string(),
            message: describe(&err),
        };

        let mut context = self.fresh_context(on_declare).map_err(load_error)?;
        namespace::apply(&mut context, plugin, &self.globals.borrow());
        context
            .eval(Source::from_bytes(source))
            .map_err(load_error)?;

        debug!(plugin, "javascript context initialized");
        self.contexts
            .borrow_mut()
            .insert(plugin.to_string(), Rc::new(RefCell::new(context)));
        Ok(())
    }

    fn invoke(
        &self,
        plugin: &str,
        operation: &str,
        args: &[Value],
    ) -> Result<Option<Value>, SpindleError> {
        let slot = self
            .slot(plugin)
            .ok_or_else(|| SpindleError::PluginNotFound(plugin.to_string()))?;
        // Only this plugin's context stays borrowed during the call, so host
        // functions may still reach other plugins of this engine.
        let mut context = slot.try_borrow_mut().map_err(|_| SpindleError::Reentrant {
            plugin: plugin.to_string(),
        })?;
        let context: &mut Context = &mut context;
        let failed = |err: JsError| SpindleError::Invocation {
            plugin: plugin.to_string(),
            operation: operation.to_string(),
            message: describe(&err),
        };

        let function = context
            .global_object()
            .get(JsString::from(operation), context)
            .map_err(failed)?;
        let Some(callable) = function.as_callable() else {
            return Err(SpindleError::OperationNotFound {
                plugin: plugin.to_string(),
                operation: operation.to_string(),
            });
        };

        let js_args: Vec<JsValue> = args.iter().map(marshal::to_js).collect();
        let result = callable
            .call(&JsValue::undefined(), &js_args, context)
            .map_err(failed)?;
        marshal::from_js(&result)
    }

    fn push_globals(&self, globals: &Globals) {
        *self.globals.borrow_mut() = globals.clone();
        let slots: Vec<(String, Slot)> = self
            .contexts
            .borrow()
            .iter()
            .map(|(plugin, slot)| (plugin.clone(), Rc::clone(slot)))
            .collect();
        for (plugin, slot) in slots {
            match slot.try_borrow_mut() {
                Ok(mut context) => namespace::apply(&mut context, &plugin, globals),
                Err(_) => warn!(
                    engine = "js",
                    plugin = %plugin,
                    "plugin is executing; globals skipped for its context"
                ),
            }
        }
    }

    fn has_plugin(&self, plugin: &str) -> bool {
        self.contexts.borrow().contains_key(plugin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ignore() -> Declare {
        Rc::new(|_: &str| {})
    }

    #[test]
    fn claims_configured_extension() {
        let engine = JsEngine::with_extension(".mjs");
        assert!(engine.matches_source(Path::new("p/a.mjs")));
        assert!(!engine.matches_source(Path::new("p/a.js")));
        assert!(JsEngine::new().matches_source(Path::new("p/a.js")));
    }

    #[test]
    fn implements_calls_back_synchronously() {
        let engine = JsEngine::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let declare: Declare = Rc::new(move |name: &str| sink.borrow_mut().push(name.to_string()));

        engine
            .initialize("p", "implements('A'); implements('B');", declare)
            .unwrap();
        assert_eq!(*seen.borrow(), vec!["A", "B"]);
    }

    #[test]
    fn contexts_are_isolated() {
        let engine = JsEngine::new();
        engine
            .initialize("a", "var shared = 'a'; function Get() { return shared; }", ignore())
            .unwrap();
        engine
            .initialize("b", "function Get() { return typeof shared; }", ignore())
            .unwrap();

        assert_eq!(engine.invoke("a", "Get", &[]).unwrap(), Some(Value::from("a")));
        assert_eq!(
            engine.invoke("b", "Get", &[]).unwrap(),
            Some(Value::from("undefined"))
        );
        assert_eq!(engine.plugins(), vec!["a", "b"]);
    }

    #[test]
    fn syntax_error_is_a_load_error() {
        let engine = JsEngine::new();
        let err = engine
            .initialize("broken", "function (", ignore())
            .unwrap_err();
        assert!(matches!(err, SpindleError::Load { ref name, .. } if name == "broken"));
        assert!(!engine.has_plugin("broken"));
    }

    #[test]
    fn missing_and_non_function_operations() {
        let engine = JsEngine::new();
        engine.initialize("p", "var Data = 3;", ignore()).unwrap();
        assert!(matches!(
            engine.invoke("p", "Run", &[]),
            Err(SpindleError::OperationNotFound { .. })
        ));
        assert!(matches!(
            engine.invoke("p", "Data", &[]),
            Err(SpindleError::OperationNotFound { .. })
        ));
        assert!(matches!(
            engine.invoke("ghost", "Run", &[]),
            Err(SpindleError::PluginNotFound(_))
        ));
    }

    #[test]
    fn thrown_exception_is_an_invocation_error() {
        let engine = JsEngine::new();
        engine
            .initialize("p", "function Run() { throw new Error('kaboom'); }", ignore())
            .unwrap();
        let err = engine.invoke("p", "Run", &[]).unwrap_err();
        assert!(matches!(err, SpindleError::Invocation { .. }));
        assert!(err.to_string().contains("kaboom"));
    }

    #[test]
    fn unsupported_return_kind_is_reported() {
        let engine = JsEngine::new();
        engine
            .initialize("p", "function Run() { return { a: 1 }; }", ignore())
            .unwrap();
        assert!(matches!(
            engine.invoke("p", "Run", &[]),
            Err(SpindleError::UnsupportedValue { ref kind }) if kind == "object"
        ));
    }
}
