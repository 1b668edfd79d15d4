// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `spindle call`: fan one operation out to every implementing plugin.

use spindle_core::{Contract, Operation, Value};
use spindle_plugin::Runtime;

pub fn run(runtime: Runtime, contract: &str, operation: &str, args: &[String]) {
    for line in fan_out(runtime, contract, operation, args) {
        println!("{line}");
    }
}

/// One output line per plugin, sorted by plugin name.
fn fan_out(mut runtime: Runtime, contract: &str, operation: &str, args: &[String]) -> Vec<String> {
    let values: Vec<Value> = args.iter().map(|raw| Value::parse_arg(raw)).collect();
    runtime.declare_contract(Contract::new(
        contract,
        vec![Operation::new(operation, values.len(), true)],
    ));

    let mut proxies = runtime.all_proxies_for(contract);
    proxies.sort_by(|a, b| a.plugin().cmp(b.plugin()));
    proxies
        .iter()
        .map(|proxy| match proxy.call(operation, &values) {
            Some(value) => format!("{}: {value}", proxy.plugin()),
            None => format!("{}: (no value)", proxy.plugin()),
        })
        .collect()
}
