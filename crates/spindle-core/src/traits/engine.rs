// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution engine adapter trait.

use std::path::Path;
use std::rc::Rc;

use crate::error::SpindleError;
use crate::types::Globals;
use crate::value::Value;

/// Callback handed to [`ScriptEngine::initialize`].
///
/// Invoked synchronously, once per `implements(name)` call made by the
/// plugin while its source is being evaluated.
pub type Declare = Rc<dyn Fn(&str)>;

/// An embedded scripting technology able to host many isolated plugin modules.
///
/// Engines are shared between the runtime and every proxy bound to one of
/// their plugins, so all methods take `&self`; implementations keep their
/// per-plugin contexts behind interior mutability and must report a call that
/// re-enters a busy context as [`SpindleError::Reentrant`] rather than panic.
pub trait ScriptEngine {
    /// Short identifier used to select this engine by name (e.g. `"js"`).
    fn name(&self) -> &str;

    /// Whether this engine recognizes the given source file.
    fn matches_source(&self, path: &Path) -> bool;

    /// Compile and evaluate `source` in a fresh isolated context for `plugin`.
    ///
    /// The context must expose a global `implements` function that forwards
    /// to `on_declare`, and must see every global last passed to
    /// [`push_globals`](Self::push_globals) before the source runs. The
    /// context is retained only if evaluation succeeds.
    fn initialize(&self, plugin: &str, source: &str, on_declare: Declare)
        -> Result<(), SpindleError>;

    /// Call the named operation of a loaded plugin.
    ///
    /// Returns `Ok(None)` when the operation produces no value.
    fn invoke(
        &self,
        plugin: &str,
        operation: &str,
        args: &[Value],
    ) -> Result<Option<Value>, SpindleError>;

    /// Apply the full accumulated global set to every retained context and
    /// remember it for contexts initialized later.
    fn push_globals(&self, globals: &Globals);

    /// Whether a context for `plugin` is retained by this engine.
    fn has_plugin(&self, plugin: &str) -> bool;
}
