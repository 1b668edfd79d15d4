// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Installing dotted-path globals into a JavaScript context.
//!
//! `Foo.Bar.Baz` is installed as `globalThis.Foo.Bar.Baz`, creating `Foo` and
//! `Foo.Bar` as plain objects when they are missing. An intermediate segment
//! that exists but is not an object is replaced.

use boa_engine::object::ObjectInitializer;
use boa_engine::{Context, JsError, JsNativeError, JsObject, JsResult, JsString, JsValue, NativeFunction};
use spindle_core::{split_path, Global, Globals, HostFunction};
use tracing::{debug, warn};

use crate::marshal;

/// Install every entry of `globals`, in path order, into `context`.
///
/// A failing entry is logged and skipped; the rest are still applied.
pub fn apply(context: &mut Context, plugin: &str, globals: &Globals) {
    for (path, global) in globals {
        if let Err(err) = install(context, path, global) {
            warn!(plugin, path = %path, error = %err, "failed to install global");
        }
    }
}

/// Install one entry at `path`.
pub fn install(context: &mut Context, path: &str, global: &Global) -> JsResult<()> {
    let segments = split_path(path);
    let Some((leaf, parents)) = segments.split_last() else {
        return Err(JsNativeError::typ()
            .with_message("empty global path")
            .into());
    };

    let mut target = context.global_object();
    for segment in parents {
        target = child_object(context, &target, segment)?;
    }

    let value = match global {
        Global::Value(value) => marshal::to_js(value),
        Global::Function(function) => wrap_host_function(context, function.clone()),
    };
    target.set(JsString::from(*leaf), value, true, context)?;
    Ok(())
}

fn child_object(context: &mut Context, parent: &JsObject, segment: &str) -> JsResult<JsObject> {
    let key = JsString::from(segment);
    if let Some(existing) = parent.get(key.clone(), context)?.as_object() {
        return Ok(existing.clone());
    }
    debug!(segment, "creating namespace object");
    let created = ObjectInitializer::new(context).build();
    parent.set(key, created.clone(), true, context)?;
    Ok(created)
}

/// Expose a host function as a native JavaScript function.
///
/// Arguments are marshalled to boundary values first; an unsupported argument
/// throws a `TypeError` inside the script.
pub fn wrap_host_function(context: &mut Context, function: HostFunction) -> JsValue {
    let body = move |_this: &JsValue, args: &[JsValue], _ctx: &mut Context| -> JsResult<JsValue> {
        let args = marshal::args_from_js(args).map_err(|err| -> JsError {
            JsNativeError::typ().with_message(err.to_string()).into()
        })?;
        Ok(function
            .call(&args)
            .map(|value| marshal::to_js(&value))
            .unwrap_or_default())
    };
    // SAFETY: the closure captures only a `HostFunction`, which holds no
    // garbage-collected values, so there is nothing the collector must trace.
    let native = unsafe { NativeFunction::from_closure(body) };
    native.to_js_function(context.realm()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::Source;
    use spindle_core::Value;

    fn eval(context: &mut Context, src: &str) -> JsValue {
        context.eval(Source::from_bytes(src)).unwrap()
    }

    fn eval_string(context: &mut Context, src: &str) -> String {
        eval(context, src)
            .as_string()
            .map(|s| s.to_std_string_escaped())
            .unwrap_or_default()
    }

    #[test]
    fn nested_paths_create_intermediate_objects() {
        let mut context = Context::default();
        install(&mut context, "Foo.Bar.Baz", &Global::from("Hello world")).unwrap();

        assert_eq!(eval_string(&mut context, "Foo.Bar.Baz"), "Hello world");
        assert_eq!(eval_string(&mut context, "typeof Foo.Bar"), "object");
    }

    #[test]
    fn siblings_share_a_namespace() {
        let mut context = Context::default();
        let mut globals = Globals::new();
        globals.insert("App.name".into(), "spindle".into());
        globals.insert("App.version".into(), 3.into());
        apply(&mut context, "p", &globals);

        assert_eq!(eval_string(&mut context, "App.name + '/' + App.version"), "spindle/3");
    }

    #[test]
    fn primitive_parent_is_replaced() {
        let mut context = Context::default();
        install(&mut context, "Foo", &Global::from(1)).unwrap();
        install(&mut context, "Foo.Bar", &Global::from(2)).unwrap();
        assert_eq!(eval_string(&mut context, "typeof Foo"), "object");
    }

    #[test]
    fn host_functions_receive_marshalled_args() {
        let mut context = Context::default();
        let add = Global::function(|args: &[Value]| {
            let total: i64 = args.iter().filter_map(Value::as_int).sum();
            Some(Value::Int(total))
        });
        install(&mut context, "Host.add", &add).unwrap();

        assert_eq!(eval_string(&mut context, "typeof Host.add"), "function");
        assert_eq!(eval_string(&mut context, "String(Host.add(2, 3))"), "5");
        assert_eq!(
            eval_string(
                &mut context,
                "try { Host.add(true); 'ok' } catch (e) { e instanceof TypeError ? 'type' : 'other' }"
            ),
            "type"
        );
    }
}
