// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Global value propagation.
//!
//! Host-provided values (and host functions) are addressed by dotted paths
//! such as `Foo.Bar.Baz`. Every update merges into the accumulated set and
//! the *whole* set is pushed again to every engine; engines also remember it
//! so plugins loaded later start with the same view.

use std::rc::Rc;

use spindle_core::{Global, Globals, ScriptEngine};
use tracing::debug;

/// Accumulated global entries, last write wins per path.
#[derive(Debug, Default)]
pub struct GlobalStore {
    entries: Globals,
}

impl GlobalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `entries` into the accumulated map, overriding colliding paths.
    pub fn merge<I, K>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, Global)>,
        K: Into<String>,
    {
        for (path, value) in entries {
            self.entries.insert(path.into(), value);
        }
    }

    /// Exact-path lookup. No namespace traversal: `Foo` does not resolve
    /// to anything just because `Foo.Bar` is set.
    pub fn get(&self, path: &str) -> Option<&Global> {
        self.entries.get(path)
    }

    /// The full accumulated set.
    pub fn entries(&self) -> &Globals {
        &self.entries
    }

    /// Push the full accumulated set into every engine.
    pub fn propagate(&self, engines: &[Rc<dyn ScriptEngine>]) {
        for engine in engines {
            debug!(
                engine = engine.name(),
                entries = self.entries.len(),
                "pushing globals"
            );
            engine.push_globals(&self.entries);
        }
    }
}
