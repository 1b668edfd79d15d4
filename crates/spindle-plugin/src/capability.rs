// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability registry: which contracts each plugin has declared.
//!
//! Scripted plugins carry no static type information, so a plugin is only
//! ever bound to a contract it declared at load time. The registry is a
//! cheaply cloneable handle: engines receive a [`Declare`] callback that
//! writes into it while plugin source is still evaluating. Once the load
//! returns the callback is closed, so later calls change nothing.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use spindle_core::Declare;
use tracing::{debug, warn};

/// Mapping of plugin name to the set of capability names it declared.
///
/// There is no removal of individual capabilities. The same capability may be
/// declared by any number of plugins.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    declared: Rc<RefCell<HashMap<String, BTreeSet<String>>>>,
}

impl CapabilityRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `plugin` implements `capability`. Re-declaring is a no-op.
    pub fn declare(&self, plugin: &str, capability: &str) {
        let inserted = self
            .declared
            .borrow_mut()
            .entry(plugin.to_string())
            .or_default()
            .insert(capability.to_string());
        if inserted {
            debug!(plugin, capability, "capability declared");
        }
    }

    /// Whether `plugin` has declared `capability`. False for unknown plugins.
    pub fn is_declared(&self, plugin: &str, capability: &str) -> bool {
        self.declared
            .borrow()
            .get(plugin)
            .is_some_and(|caps| caps.contains(capability))
    }

    /// All capabilities declared by `plugin`, sorted.
    pub fn capabilities_of(&self, plugin: &str) -> Vec<String> {
        self.declared
            .borrow()
            .get(plugin)
            .map(|caps| caps.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Open a declaration window for `plugin`. Its callback records each
    /// `implements(name)` made during initialization, until the window closes.
    pub fn declarer(&self, plugin: &str) -> Declarer {
        let open = Rc::new(Cell::new(true));
        let registry = self.clone();
        let plugin = plugin.to_string();
        let gate = Rc::clone(&open);
        let callback: Declare = Rc::new(move |capability: &str| {
            if gate.get() {
                registry.declare(&plugin, capability);
            } else {
                warn!(
                    plugin = %plugin,
                    capability,
                    "capability declared after load; ignored"
                );
            }
        });
        Declarer { open, callback }
    }

    /// Drop everything declared by `plugin`.
    ///
    /// Only used to undo the declarations of a plugin whose load failed.
    pub(crate) fn forget(&self, plugin: &str) {
        if self.declared.borrow_mut().remove(plugin).is_some() {
            debug!(plugin, "rolled back capability declarations");
        }
    }
}

/// The declaration callback of one plugin load. Closed on drop.
pub struct Declarer {
    open: Rc<Cell<bool>>,
    callback: Declare,
}

impl Declarer {
    /// The callback handed to the engine. Engines may retain it.
    pub fn callback(&self) -> Declare {
        Rc::clone(&self.callback)
    }

    /// Stop recording: every later call is logged and ignored.
    pub fn close(&self) {
        self.open.set(false);
    }
}

impl Drop for Declarer {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_is_idempotent() {
        let registry = CapabilityRegistry::new();
        registry.declare("upper", "TextFilter");
        registry.declare("upper", "TextFilter");

        assert!(registry.is_declared("upper", "TextFilter"));
        assert_eq!(registry.capabilities_of("upper"), vec!["TextFilter"]);
    }

    #[test]
    fn unknown_plugin_or_capability_is_not_declared() {
        let registry = CapabilityRegistry::new();
        registry.declare("upper", "TextFilter");

        assert!(!registry.is_declared("lower", "TextFilter"));
        assert!(!registry.is_declared("upper", "OutputRenderer"));
        assert!(registry.capabilities_of("lower").is_empty());
    }

    #[test]
    fn many_plugins_may_declare_the_same_capability() {
        let registry = CapabilityRegistry::new();
        registry.declare("a", "TextFilter");
        registry.declare("b", "TextFilter");

        assert!(registry.is_declared("a", "TextFilter"));
        assert!(registry.is_declared("b", "TextFilter"));
    }

    #[test]
    fn declarer_writes_through_shared_handle() {
        let registry = CapabilityRegistry::new();
        let declarer = registry.declarer("scripted");
        let declare = declarer.callback();
        declare("ProgramObserver");
        declare("TextFilter");

        assert_eq!(
            registry.capabilities_of("scripted"),
            vec!["ProgramObserver", "TextFilter"]
        );
    }

    #[test]
    fn retained_callback_is_inert_once_closed() {
        let registry = CapabilityRegistry::new();
        let declarer = registry.declarer("scripted");
        let declare = declarer.callback();
        declare("TextFilter");
        declarer.close();
        declare("OutputRenderer");

        assert_eq!(registry.capabilities_of("scripted"), vec!["TextFilter"]);

        let late = registry.declarer("other").callback();
        late("TextFilter");
        assert!(registry.capabilities_of("other").is_empty());
    }

    #[test]
    fn forget_removes_all_declarations_of_one_plugin() {
        let registry = CapabilityRegistry::new();
        registry.declare("bad", "TextFilter");
        registry.declare("good", "TextFilter");
        registry.forget("bad");

        assert!(!registry.is_declared("bad", "TextFilter"));
        assert!(registry.is_declared("good", "TextFilter"));
    }
}
