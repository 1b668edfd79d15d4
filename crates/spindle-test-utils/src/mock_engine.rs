// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock script engine for deterministic testing.
//!
//! `MockEngine` implements `ScriptEngine` over a tiny line-oriented plugin
//! language, so dispatch tests can load "scripted" plugins without a real
//! interpreter. Each non-empty line is one directive, evaluated in order:
//!
//! ```text
//! # comment
//! implements TextFilter          declare a capability (synchronously)
//! op Name returns "text"         return a string literal
//! op Name returns 42             return an integer literal
//! op Name echo                   return the first argument
//! op Name silent                 return nothing
//! op Name global Foo.Bar         return the primitive global at a path
//! op Name call Foo.Log           call the host function at a path with the arguments
//! op Name fail some message      raise when called
//! fail some message              abort evaluation at this line
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;

use spindle_core::{Declare, Global, Globals, ScriptEngine, SpindleError, Value};
use tracing::debug;

/// Behavior bound to one operation of a mock module.
#[derive(Debug, Clone)]
enum Body {
    Returns(Value),
    Echo,
    Silent,
    Global(String),
    Call(String),
    Fail(String),
}

/// One loaded mock plugin: its operations plus the globals it can see.
struct Module {
    ops: HashMap<String, Body>,
    globals: Globals,
}

/// A scripted engine double driven by a line-oriented source format.
pub struct MockEngine {
    name: String,
    extension: String,
    modules: RefCell<HashMap<String, Module>>,
    globals: RefCell<Globals>,
    pushes: Cell<usize>,
}

impl MockEngine {
    /// Create an engine named `mock` that claims `.mock` files.
    pub fn new() -> Self {
        Self::with_extension("mock", ".mock")
    }

    /// Create an engine with a custom name and file extension.
    pub fn with_extension(name: &str, extension: &str) -> Self {
        Self {
            name: name.to_string(),
            extension: extension.to_string(),
            modules: RefCell::new(HashMap::new()),
            globals: RefCell::new(Globals::new()),
            pushes: Cell::new(0),
        }
    }

    /// Number of times `push_globals` has been called.
    pub fn push_count(&self) -> usize {
        self.pushes.get()
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn malformed(plugin: &str, line_no: usize, detail: &str) -> SpindleError {
    SpindleError::Load {
        name: plugin.to_string(),
        message: format!("line {line_no}: {detail}"),
    }
}

fn parse_literal(raw: &str) -> Option<Value> {
    if let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        return Some(Value::Str(inner.to_string()));
    }
    raw.parse::<i64>().ok().map(Value::Int)
}

fn parse_op(plugin: &str, line_no: usize, rest: &str) -> Result<(String, Body), SpindleError> {
    let mut parts = rest.splitn(3, char::is_whitespace);
    let name = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| malformed(plugin, line_no, "op without a name"))?;
    let kind = parts
        .next()
        .ok_or_else(|| malformed(plugin, line_no, "op without a body"))?;
    let arg = parts.next().map(str::trim).unwrap_or_default();

    let body = match kind {
        "returns" => Body::Returns(
            parse_literal(arg).ok_or_else(|| malformed(plugin, line_no, "bad literal"))?,
        ),
        "echo" => Body::Echo,
        "silent" => Body::Silent,
        "global" if !arg.is_empty() => Body::Global(arg.to_string()),
        "call" if !arg.is_empty() => Body::Call(arg.to_string()),
        "fail" => Body::Fail(arg.to_string()),
        other => return Err(malformed(plugin, line_no, &format!("unknown op body `{other}`"))),
    };
    Ok((name.to_string(), body))
}

impl ScriptEngine for MockEngine {
    fn name(&self) -> &str {
        &self.name
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
        if self.modules.borrow().contains_key(plugin) {
            return Err(SpindleError::DuplicatePlugin {
                name: plugin.to_string(),
            });
        }

        let mut module = Module {
            ops: HashMap::new(),
            globals: self.globals.borrow().clone(),
        };

        for (idx, line) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (directive, rest) = line
                .split_once(char::is_whitespace)
                .unwrap_or((line, ""));
            match directive {
                "implements" if !rest.trim().is_empty() => on_declare(rest.trim()),
                "op" => {
                    let (name, body) = parse_op(plugin, line_no, rest.trim())?;
                    module.ops.insert(name, body);
                }
                "fail" => return Err(malformed(plugin, line_no, rest.trim())),
                other => {
                    return Err(malformed(
                        plugin,
                        line_no,
                        &format!("unknown directive `{other}`"),
                    ));
                }
            }
        }

        debug!(plugin, ops = module.ops.len(), "mock module initialized");
        self.modules.borrow_mut().insert(plugin.to_string(), module);
        Ok(())
    }

    fn invoke(
        &self,
        plugin: &str,
        operation: &str,
        args: &[Value],
    ) -> Result<Option<Value>, SpindleError> {
        let modules = self.modules.try_borrow().map_err(|_| SpindleError::Reentrant {
            plugin: plugin.to_string(),
        })?;
        let module = modules
            .get(plugin)
            .ok_or_else(|| SpindleError::PluginNotFound(plugin.to_string()))?;
        let body = module
            .ops
            .get(operation)
            .ok_or_else(|| SpindleError::OperationNotFound {
                plugin: plugin.to_string(),
                operation: operation.to_string(),
            })?;

        let failed = |message: String| SpindleError::Invocation {
            plugin: plugin.to_string(),
            operation: operation.to_string(),
            message,
        };

        match body {
            Body::Returns(value) => Ok(Some(value.clone())),
            Body::Echo => Ok(args.first().cloned()),
            Body::Silent => Ok(None),
            Body::Global(path) => match module.globals.get(path) {
                Some(Global::Value(value)) => Ok(Some(value.clone())),
                Some(Global::Function(_)) => Err(SpindleError::unsupported("function")),
                None => Ok(None),
            },
            Body::Call(path) => match module.globals.get(path) {
                Some(Global::Function(f)) => Ok(f.call(args)),
                _ => Err(failed(format!("{path} is not a function"))),
            },
            Body::Fail(message) => Err(failed(message.clone())),
        }
    }

    fn push_globals(&self, globals: &Globals) {
        self.pushes.set(self.pushes.get() + 1);
        *self.globals.borrow_mut() = globals.clone();
        for module in self.modules.borrow_mut().values_mut() {
            module.globals = globals.clone();
        }
    }

    fn has_plugin(&self, plugin: &str) -> bool {
        self.modules.borrow().contains_key(plugin)
    }
}
