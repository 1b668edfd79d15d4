// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spindle - load capability-declaring plugins and call into them.
//!
//! This is the binary entry point.

mod call;
mod host;
mod list;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use spindle_core::Value;

/// Spindle - load capability-declaring plugins and call into them.
#[derive(Parser, Debug)]
#[command(name = "spindle", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the usual hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Plugin directory, overriding `runtime.plugin_dir` and `PLUGIN_PATH`.
    #[arg(long, global = true)]
    plugin_dir: Option<PathBuf>,

    /// Set a global visible to every plugin, as PATH=VALUE (repeatable).
    #[arg(long = "global", value_name = "PATH=VALUE", value_parser = host::parse_global, global = true)]
    globals: Vec<(String, Value)>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List loaded plugins and the capabilities they declare.
    List,
    /// Call an operation on every plugin that implements a contract.
    Call {
        /// Contract name plugins declare with `implements(...)`.
        contract: String,
        /// Operation to invoke.
        operation: String,
        /// Arguments; values that parse as integers are passed as integers.
        args: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => spindle_config::load_and_validate_path(path),
        None => spindle_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            spindle_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.runtime.log_level);

    let dir = host::plugin_dir(&config, cli.plugin_dir.as_deref());
    let runtime = match host::build_runtime(&config, &dir, cli.globals) {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("spindle: {err}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::List => list::run(&runtime),
        Commands::Call {
            contract,
            operation,
            args,
        } => call::run(runtime, &contract, &operation, &args),
    }
    ExitCode::SUCCESS
}

/// Initializes the tracing subscriber; `RUST_LOG` takes precedence.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let level = log_level.to_ascii_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "spindle={level},spindle_plugin={level},spindle_js={level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
