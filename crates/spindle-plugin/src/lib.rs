// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry, capability gating, and extension-point dispatch.
//!
//! The [`Runtime`] owns every piece of plugin state: the engines that host
//! scripted plugins, the plugin registry mapping names to backends, the
//! capability registry recording which contracts each plugin implements,
//! and the accumulated global values pushed into scripted modules. Host code
//! queries it for [`Proxy`] objects, or for typed wrappers generated with
//! [`extension_point!`], bound to every plugin that declared a contract.

pub mod capability;
pub mod extension;
pub mod globals;
pub mod loader;
pub mod native;
pub mod registry;
pub mod runtime;

pub use capability::{CapabilityRegistry, Declarer};
pub use extension::{ExtensionPoint, Proxy};
pub use globals::GlobalStore;
pub use native::{MethodTable, NativeAdapter};
pub use registry::{Backend, PluginRegistry};
pub use runtime::Runtime;

pub use spindle_core::{Contract, Global, Operation, SpindleError, Value};
