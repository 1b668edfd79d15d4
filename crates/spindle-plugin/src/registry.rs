// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry mapping plugin names to their backends.
//!
//! The `PluginRegistry` stores one [`Backend`] per plugin name. A backend is
//! either the script engine holding the plugin's module or a native adapter
//! wrapping a host object; both are invoked through the same contract.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use spindle_core::{ScriptEngine, SpindleError, Value};

use crate::native::NativeAdapter;

/// The implementation behind one plugin.
#[derive(Clone)]
pub enum Backend {
    /// A module retained inside a script engine.
    Script(Rc<dyn ScriptEngine>),
    /// A host object registered directly.
    Native(Rc<NativeAdapter>),
}

impl Backend {
    /// Forward an operation call to the underlying implementation.
    pub fn invoke(
        &self,
        plugin: &str,
        operation: &str,
        args: &[Value],
    ) -> Result<Option<Value>, SpindleError> {
        match self {
            Backend::Script(engine) => engine.invoke(plugin, operation, args),
            Backend::Native(adapter) => adapter.invoke(plugin, operation, args),
        }
    }

    /// Short label for logs: the engine name, or `native`.
    pub fn kind(&self) -> &str {
        match self {
            Backend::Script(engine) => engine.name(),
            Backend::Native(_) => "native",
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Backend").field(&self.kind()).finish()
    }
}

/// Registry of loaded plugins keyed by unique name.
///
/// Entries are never removed; a name can be registered once per registry.
#[derive(Default)]
pub struct PluginRegistry {
    entries: HashMap<String, Backend>,
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under `name`.
    ///
    /// Fails with [`SpindleError::DuplicatePlugin`] instead of overwriting.
    pub fn insert(&mut self, name: &str, backend: Backend) -> Result<(), SpindleError> {
        if self.entries.contains_key(name) {
            return Err(SpindleError::DuplicatePlugin {
                name: name.to_string(),
            });
        }
        self.entries.insert(name.to_string(), backend);
        Ok(())
    }

    /// Get a plugin's backend by name.
    pub fn get(&self, name: &str) -> Option<&Backend> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over `(name, backend)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Backend)> {
        self.entries.iter().map(|(name, backend)| (name.as_str(), backend))
    }

    /// All plugin names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_test_utils::{IdPlugin, MockEngine};

    fn native(id: &str) -> Backend {
        Backend::Native(Rc::new(NativeAdapter::new(IdPlugin::new(id))))
    }

    #[test]
    fn insert_and_get_roundtrip() {
        let mut registry = PluginRegistry::new();
        registry.insert("1a", native("1a")).unwrap();

        let backend = registry.get("1a").unwrap();
        assert_eq!(backend.kind(), "native");
        assert_eq!(
            backend.invoke("1a", "Run", &[]).unwrap(),
            Some(Value::from("1a"))
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = PluginRegistry::new();
        registry.insert("dup", native("first")).unwrap();
        let err = registry.insert("dup", native("second")).unwrap_err();
        assert!(matches!(err, SpindleError::DuplicatePlugin { ref name } if name == "dup"));

        // The first entry is untouched.
        let backend = registry.get("dup").unwrap();
        assert_eq!(
            backend.invoke("dup", "Run", &[]).unwrap(),
            Some(Value::from("first"))
        );
    }

    #[test]
    fn script_backend_reports_engine_name() {
        let engine: Rc<dyn ScriptEngine> = Rc::new(MockEngine::new());
        let backend = Backend::Script(engine);
        assert_eq!(backend.kind(), "mock");
        assert_eq!(format!("{backend:?}"), "Backend(\"mock\")");
    }

    #[test]
    fn names_are_sorted_and_len_tracks_inserts() {
        let mut registry = PluginRegistry::new();
        assert!(registry.is_empty());

        registry.insert("zebra", native("zebra")).unwrap();
        registry.insert("alpha", native("alpha")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["alpha", "zebra"]);
        assert_eq!(registry.iter().count(), 2);
    }
}
