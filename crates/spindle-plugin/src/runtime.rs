// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The owning plugin runtime context.
//!
//! A [`Runtime`] is constructed explicitly and passed around by the host; it
//! is the single owner of the engine list, the plugin registry, the
//! capability registry, the accumulated globals, and declared contracts.
//!
//! The runtime is single-threaded: it holds `Rc` handles and is neither
//! `Send` nor `Sync`. Mutation goes through `&mut self`; the only state
//! written through a shared handle is the capability registry, which
//! engines update from inside plugin evaluation.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use spindle_core::{Contract, Global, NativePlugin, ScriptEngine, SpindleError};
use tracing::{debug, info, warn};

use crate::capability::CapabilityRegistry;
use crate::extension::{ExtensionPoint, Proxy};
use crate::globals::GlobalStore;
use crate::loader;
use crate::native::NativeAdapter;
use crate::registry::{Backend, PluginRegistry};

fn same_engine(a: &Rc<dyn ScriptEngine>, b: &Rc<dyn ScriptEngine>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Plugin runtime: engines, plugins, capabilities, globals, and contracts.
#[derive(Default)]
pub struct Runtime {
    engines: Vec<Rc<dyn ScriptEngine>>,
    plugins: PluginRegistry,
    capabilities: CapabilityRegistry,
    globals: GlobalStore,
    contracts: HashMap<String, Rc<Contract>>,
}

impl Runtime {
    /// Create an empty runtime with no engines or plugins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script engine and hand it the current globals.
    ///
    /// Returns the shared handle used by [`load_source`](Self::load_source).
    pub fn register_engine(&mut self, engine: impl ScriptEngine + 'static) -> Rc<dyn ScriptEngine> {
        let engine: Rc<dyn ScriptEngine> = Rc::new(engine);
        self.attach_engine(Rc::clone(&engine));
        engine
    }

    fn attach_engine(&mut self, engine: Rc<dyn ScriptEngine>) {
        if self.engines.iter().any(|known| same_engine(known, &engine)) {
            return;
        }
        engine.push_globals(self.globals.entries());
        info!(engine = engine.name(), "registered script engine");
        self.engines.push(engine);
    }

    /// Look up a registered engine by name.
    pub fn engine(&self, name: &str) -> Option<Rc<dyn ScriptEngine>> {
        self.engines.iter().find(|e| e.name() == name).cloned()
    }

    /// Merge `entries` into the accumulated globals and push the full set
    /// into every engine.
    pub fn set_globals<I, K>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, Global)>,
        K: Into<String>,
    {
        self.globals.merge(entries);
        self.globals.propagate(&self.engines);
    }

    /// Exact-path lookup of a global value.
    pub fn global(&self, path: &str) -> Option<&Global> {
        self.globals.get(path)
    }

    /// Load a scripted plugin from source text.
    ///
    /// Capabilities the plugin declares during initialization are recorded
    /// as they happen; if initialization then fails they are rolled back, so
    /// a failed load leaves no trace. An engine that was never registered is
    /// registered on first use.
    ///
    /// # Errors
    ///
    /// [`SpindleError::DuplicatePlugin`] if the name is taken, or whatever
    /// the engine reports for malformed or failing source.
    pub fn load_source(
        &mut self,
        name: &str,
        source: &str,
        engine: &Rc<dyn ScriptEngine>,
    ) -> Result<(), SpindleError> {
        if self.plugins.contains(name) || engine.has_plugin(name) {
            return Err(SpindleError::DuplicatePlugin {
                name: name.to_string(),
            });
        }
        self.attach_engine(Rc::clone(engine));

        let declarer = self.capabilities.declarer(name);
        let initialized = engine.initialize(name, source, declarer.callback());
        declarer.close();
        if let Err(err) = initialized {
            self.capabilities.forget(name);
            warn!(plugin = name, engine = engine.name(), error = %err, "plugin load failed");
            return Err(err);
        }

        self.plugins.insert(name, Backend::Script(Rc::clone(engine)))?;
        info!(
            plugin = name,
            engine = engine.name(),
            capabilities = ?self.capabilities.capabilities_of(name),
            "loaded scripted plugin"
        );
        Ok(())
    }

    /// Load a plugin file, picking the engine by file extension.
    ///
    /// Returns the plugin name (the file name up to its first `.`).
    pub fn load_file(&mut self, path: &Path) -> Result<String, SpindleError> {
        let engine = loader::select_engine(&self.engines, path).ok_or_else(|| {
            SpindleError::NoRuntimeFound {
                path: path.to_path_buf(),
            }
        })?;
        let name = loader::plugin_name(path).ok_or_else(|| SpindleError::Load {
            name: path.display().to_string(),
            message: "cannot derive a plugin name from the file name".to_string(),
        })?;
        let source = loader::read_source(path)?;
        self.load_source(&name, &source, &engine)?;
        Ok(name)
    }

    /// Load every file in `dir` that some registered engine recognizes.
    ///
    /// Files no engine claims are skipped. With `fail_fast` the first failing
    /// plugin aborts the scan; otherwise failures are logged and skipped.
    /// Returns the names loaded, in file-name order.
    pub fn load_dir(&mut self, dir: &Path, fail_fast: bool) -> Result<Vec<String>, SpindleError> {
        let mut loaded = Vec::new();
        for path in loader::source_files(dir)? {
            if loader::select_engine(&self.engines, &path).is_none() {
                debug!(path = %path.display(), "no engine for file, skipping");
                continue;
            }
            match self.load_file(&path) {
                Ok(name) => loaded.push(name),
                Err(err) if fail_fast => return Err(err),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping plugin");
                }
            }
        }
        info!(dir = %dir.display(), count = loaded.len(), "loaded plugin directory");
        Ok(loaded)
    }

    /// Register a native plugin that implements `capabilities`.
    pub fn register_static(
        &mut self,
        name: &str,
        plugin: impl NativePlugin + 'static,
        capabilities: &[&str],
    ) -> Result<(), SpindleError> {
        if self.plugins.contains(name) {
            return Err(SpindleError::DuplicatePlugin {
                name: name.to_string(),
            });
        }
        for capability in capabilities {
            self.capabilities.declare(name, capability);
        }
        self.plugins
            .insert(name, Backend::Native(Rc::new(NativeAdapter::new(plugin))))?;
        info!(plugin = name, ?capabilities, "registered static plugin");
        Ok(())
    }

    /// Register a contract shape for untyped lookups by name.
    pub fn declare_contract(&mut self, contract: Contract) {
        debug!(contract = %contract.name, operations = contract.operations.len(), "declared extension point");
        self.contracts.insert(contract.name.clone(), Rc::new(contract));
    }

    /// Register the contract of a typed extension point.
    pub fn declare_extension_point<E: ExtensionPoint>(&mut self) {
        self.declare_contract(E::contract());
    }

    /// Proxy for `plugin` shaped like the declared contract `contract`.
    ///
    /// `None` if the plugin is unknown, did not declare the contract, or the
    /// contract was never declared.
    pub fn proxy_for(&self, plugin: &str, contract: &str) -> Option<Proxy> {
        let Some(shape) = self.contracts.get(contract) else {
            debug!(contract, "proxy requested for undeclared contract");
            return None;
        };
        self.bind(plugin, shape)
    }

    /// Proxies for every plugin that declared `contract`, in no particular order.
    pub fn all_proxies_for(&self, contract: &str) -> Vec<Proxy> {
        match self.contracts.get(contract) {
            Some(shape) => self.bind_all(shape),
            None => Vec::new(),
        }
    }

    /// Typed proxy for one plugin.
    pub fn plugin<E: ExtensionPoint>(&self, name: &str) -> Option<E> {
        self.bind(name, &self.contract_of::<E>())
            .map(E::from_proxy)
    }

    /// Typed proxies for every plugin implementing `E`, in no particular order.
    pub fn plugins<E: ExtensionPoint>(&self) -> Vec<E> {
        self.bind_all(&self.contract_of::<E>())
            .into_iter()
            .map(E::from_proxy)
            .collect()
    }

    /// Names of all loaded and registered plugins, sorted.
    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins.names()
    }

    /// Capabilities declared by `plugin`, sorted.
    pub fn capabilities_of(&self, plugin: &str) -> Vec<String> {
        self.capabilities.capabilities_of(plugin)
    }

    /// Shared handle to the capability registry.
    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    fn contract_of<E: ExtensionPoint>(&self) -> Rc<Contract> {
        self.contracts
            .get(E::NAME)
            .cloned()
            .unwrap_or_else(|| Rc::new(E::contract()))
    }

    fn bind(&self, plugin: &str, contract: &Rc<Contract>) -> Option<Proxy> {
        if !self.capabilities.is_declared(plugin, &contract.name) {
            return None;
        }
        let backend = self.plugins.get(plugin)?.clone();
        Some(Proxy::new(plugin, backend, Rc::clone(contract)))
    }

    fn bind_all(&self, contract: &Rc<Contract>) -> Vec<Proxy> {
        self.plugins
            .iter()
            .filter(|(name, _)| self.capabilities.is_declared(name, &contract.name))
            .map(|(name, backend)| Proxy::new(name, backend.clone(), Rc::clone(contract)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_core::{Operation, Value};
    use spindle_test_utils::{IdPlugin, MockEngine};
    use tracing_test::traced_test;

    crate::extension_point! {
        struct TextFilter {
            fn filter = "Filter"(line: &str) -> String;
        }
    }

    fn text_filter() -> Contract {
        Contract::new("TextFilter", vec![Operation::new("Filter", 1, true)])
    }

    #[test]
    fn failed_load_rolls_back_declared_capabilities() {
        let mut runtime = Runtime::new();
        let engine = runtime.register_engine(MockEngine::new());

        let err = runtime
            .load_source("half", "implements TextFilter\nfail boom", &engine)
            .unwrap_err();
        assert!(matches!(err, SpindleError::Load { .. }));
        assert!(runtime.capabilities_of("half").is_empty());
        assert!(runtime.plugin_names().is_empty());

        // The name is free again after a failed load.
        runtime
            .load_source("half", "implements TextFilter\nop Filter echo", &engine)
            .unwrap();
        assert_eq!(runtime.capabilities_of("half"), vec!["TextFilter"]);
    }

    #[test]
    fn duplicate_name_across_backends_is_rejected() {
        let mut runtime = Runtime::new();
        let engine = runtime.register_engine(MockEngine::new());
        runtime
            .register_static("shared", IdPlugin::new("shared"), &["TextFilter"])
            .unwrap();

        let err = runtime
            .load_source("shared", "implements Other", &engine)
            .unwrap_err();
        assert!(matches!(err, SpindleError::DuplicatePlugin { .. }));
        // The rejected source never ran, so it declared nothing.
        assert_eq!(runtime.capabilities_of("shared"), vec!["TextFilter"]);

        let err = runtime
            .register_static("shared", IdPlugin::new("again"), &[])
            .unwrap_err();
        assert!(matches!(err, SpindleError::DuplicatePlugin { .. }));
    }

    #[test]
    fn unregistered_engine_is_attached_on_first_load() {
        let mut runtime = Runtime::new();
        runtime.set_globals([("Greeting", Global::from("hi"))]);

        let engine: Rc<dyn ScriptEngine> = Rc::new(MockEngine::new());
        runtime
            .load_source("late", "implements Greeter\nop Read global Greeting", &engine)
            .unwrap();

        assert!(runtime.engine("mock").is_some());
        assert_eq!(
            engine.invoke("late", "Read", &[]).unwrap(),
            Some(Value::from("hi"))
        );
    }

    #[test]
    fn untyped_queries_require_a_declared_contract() {
        let mut runtime = Runtime::new();
        let engine = runtime.register_engine(MockEngine::new());
        runtime
            .load_source("echo", "implements TextFilter\nop Filter echo", &engine)
            .unwrap();

        assert!(runtime.proxy_for("echo", "TextFilter").is_none());
        assert!(runtime.all_proxies_for("TextFilter").is_empty());

        runtime.declare_contract(text_filter());
        let proxy = runtime.proxy_for("echo", "TextFilter").unwrap();
        assert_eq!(proxy.call("Filter", &["abc".into()]), Some(Value::from("abc")));
        assert_eq!(runtime.all_proxies_for("TextFilter").len(), 1);
    }

    #[test]
    fn typed_queries_work_without_declaration() {
        let mut runtime = Runtime::new();
        let engine = runtime.register_engine(MockEngine::new());
        runtime
            .load_source("echo", "implements TextFilter\nop Filter echo", &engine)
            .unwrap();

        let filter = runtime.plugin::<TextFilter>("echo").unwrap();
        assert_eq!(filter.filter("line").as_deref(), Some("line"));
        assert_eq!(runtime.plugins::<TextFilter>().len(), 1);
    }

    #[traced_test]
    #[test]
    fn failed_load_is_logged() {
        let mut runtime = Runtime::new();
        let engine = runtime.register_engine(MockEngine::new());
        let _ = runtime.load_source("bad", "nonsense", &engine);
        assert!(logs_contain("plugin load failed"));
    }
}
