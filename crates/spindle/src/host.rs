// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the plugin runtime the CLI commands operate on.

use std::path::{Path, PathBuf};

use spindle_config::SpindleConfig;
use spindle_core::{Global, SpindleError, Value};
use spindle_js::JsEngine;
use spindle_plugin::Runtime;
use tracing::{info, warn};

/// Globals every plugin can rely on, installed before any user globals.
pub fn builtin_globals() -> Vec<(String, Global)> {
    vec![
        (
            "Spindle.version".to_string(),
            Global::from(env!("CARGO_PKG_VERSION")),
        ),
        (
            "Spindle.log".to_string(),
            Global::function(|args: &[Value]| {
                let line: Vec<String> = args.iter().map(ToString::to_string).collect();
                info!(target: "spindle::plugin", "{}", line.join(" "));
                None
            }),
        ),
    ]
}

/// Parse a `path=value` command-line global. Integer values become integers.
pub fn parse_global(raw: &str) -> Result<(String, Value), String> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got `{raw}`"))?;
    let path = path.trim();
    if path.is_empty() {
        return Err(format!("empty global path in `{raw}`"));
    }
    Ok((path.to_string(), Value::parse_arg(value)))
}

/// The plugin directory to scan: the command-line override, else the config.
pub fn plugin_dir(config: &SpindleConfig, overridden: Option<&Path>) -> PathBuf {
    overridden
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.runtime.plugin_dir.clone())
}

/// Create a runtime with the JavaScript engine, apply globals, and load
/// every plugin in `dir`. A missing directory loads nothing.
pub fn build_runtime(
    config: &SpindleConfig,
    dir: &Path,
    globals: Vec<(String, Value)>,
) -> Result<Runtime, SpindleError> {
    let mut runtime = Runtime::new();
    runtime.set_globals(builtin_globals());
    runtime.set_globals(
        globals
            .into_iter()
            .map(|(path, value)| (path, Global::Value(value))),
    );
    runtime.register_engine(JsEngine::with_extension(&config.js.file_extension));

    if !dir.is_dir() {
        warn!(dir = %dir.display(), "plugin directory does not exist");
        return Ok(runtime);
    }
    runtime.load_dir(dir, config.runtime.fail_fast)?;
    Ok(runtime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_core::{Contract, Operation};

    #[test]
    fn parse_global_splits_on_first_equals() {
        assert_eq!(
            parse_global("App.mode=a=b").unwrap(),
            ("App.mode".to_string(), Value::from("a=b"))
        );
        assert_eq!(
            parse_global("Limit=10").unwrap(),
            ("Limit".to_string(), Value::Int(10))
        );
        assert!(parse_global("novalue").is_err());
        assert!(parse_global("=1").is_err());
    }

    #[test]
    fn command_line_dir_overrides_config() {
        let config = SpindleConfig::default();
        assert_eq!(plugin_dir(&config, None), PathBuf::from("plugins"));
        assert_eq!(
            plugin_dir(&config, Some(Path::new("elsewhere"))),
            PathBuf::from("elsewhere")
        );
    }

    #[test]
    fn missing_dir_yields_empty_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = build_runtime(
            &SpindleConfig::default(),
            &dir.path().join("absent"),
            Vec::new(),
        )
        .unwrap();
        assert!(runtime.plugin_names().is_empty());
        assert!(runtime.global("Spindle.version").is_some());
    }

    #[test]
    fn plugins_see_builtin_and_cli_globals() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("reader.js"),
            "implements('Reader');\nfunction Read() { Spindle.log('reading'); return Mode + '@' + Spindle.version; }",
        )
        .unwrap();

        let mut runtime = build_runtime(
            &SpindleConfig::default(),
            dir.path(),
            vec![("Mode".to_string(), Value::from("test"))],
        )
        .unwrap();

        runtime.declare_contract(Contract::new("Reader", vec![Operation::new("Read", 0, true)]));
        let proxy = runtime.proxy_for("reader", "Reader").unwrap();
        assert_eq!(
            proxy.call("Read", &[]),
            Some(Value::from(format!("test@{}", env!("CARGO_PKG_VERSION"))))
        );
    }
}
