// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `spindle list`: loaded plugins and their declared capabilities.

use spindle_plugin::Runtime;

pub fn run(runtime: &Runtime) {
    print!("{}", render(runtime));
}

fn render(runtime: &Runtime) -> String {
    let names = runtime.plugin_names();
    if names.is_empty() {
        return "no plugins loaded\n".to_string();
    }
    names
        .iter()
        .map(|name| {
            let caps = runtime.capabilities_of(name);
            if caps.is_empty() {
                format!("{name}\n")
            } else {
                format!("{name}: {}\n", caps.join(", "))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_core::{NativePlugin, SpindleError, Value};

    struct Nop;

    impl NativePlugin for Nop {
        fn call(&self, _: &str, _: &[Value]) -> Result<Option<Value>, SpindleError> {
            Ok(None)
        }
    }

    #[test]
    fn renders_sorted_plugins_with_capabilities() {
        let mut runtime = Runtime::new();
        assert_eq!(render(&runtime), "no plugins loaded\n");

        runtime.register_static("zeta", Nop, &["Filter", "Audit"]).unwrap();
        runtime.register_static("alpha", Nop, &[]).unwrap();
        assert_eq!(render(&runtime), "alpha\nzeta: Audit, Filter\n");
    }
}
