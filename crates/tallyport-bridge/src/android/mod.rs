// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android native channel via JNI.
//
// The Java shim `com.tallyport.bridge.TallyportAndroid` wraps the Android SDK
// and exposes:
//
//   static String invoke(String method, String payload)
//   static native void nativeDeliver(String kind, String payload)
//
// `invoke` is called from Rust through JNI. `nativeDeliver` is implemented
// below and routes results to the installed relay.
//
// The shim class is resolved through the hosting Activity's class loader;
// threads attached from native code only see the system loader otherwise.

#![cfg(target_os = "android")]

use jni::objects::{JClass, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};
use tracing::{debug, warn};

use tallyport_core::Platform;
use tallyport_core::error::{BridgeError, Result};

use crate::channel::NativeChannel;

const SHIM_CLASS: &str = "com.tallyport.bridge.TallyportAndroid";
const INVOKE_SIGNATURE: &str = "(Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;";

/// Map any `jni::errors::Error` into `BridgeError::Backend`.
fn jni_err(context: &str, e: jni::errors::Error) -> BridgeError {
    BridgeError::Backend(format!("{context}: {e}"))
}

/// Obtain the process `JavaVM` from the NDK context.
fn java_vm() -> Result<JavaVM> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` is the `JavaVM*` set by the NDK glue code and stays
    // valid for the lifetime of the process.
    unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| BridgeError::Backend(format!("failed to obtain JavaVM: {e}")))
}

/// Load the shim class through the Activity's class loader.
fn shim_class<'local>(env: &mut JNIEnv<'local>) -> Result<JClass<'local>> {
    let ctx = ndk_context::android_context();
    if ctx.context().is_null() {
        return Err(BridgeError::PlatformUnavailable);
    }
    // SAFETY: the NDK guarantees this is a valid global reference to the
    // hosting Activity. The local wrapper is never deleted.
    let activity = unsafe { JObject::from_raw(ctx.context().cast()) };

    let loader = env
        .call_method(&activity, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .and_then(|v| v.l())
        .map_err(|e| jni_err("getClassLoader", e))?;
    let name = env
        .new_string(SHIM_CLASS)
        .map_err(|e| jni_err("new_string(class)", e))?;
    let class = env
        .call_method(
            &loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&name)],
        )
        .and_then(|v| v.l())
        .map_err(|e| jni_err("loadClass", e))?;
    Ok(JClass::from(class))
}

/// Clear a pending Java exception so the thread stays usable.
fn clear_exception(env: &mut JNIEnv<'_>) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
}

fn call_invoke(env: &mut JNIEnv<'_>, method: &str, payload: &str) -> Result<Option<String>> {
    let class = shim_class(env)?;
    let j_method = env
        .new_string(method)
        .map_err(|e| jni_err("new_string(method)", e))?;
    let j_payload = env
        .new_string(payload)
        .map_err(|e| jni_err("new_string(payload)", e))?;

    let reply = env
        .call_static_method(
            &class,
            "invoke",
            INVOKE_SIGNATURE,
            &[JValue::Object(&j_method), JValue::Object(&j_payload)],
        )
        .and_then(|v| v.l())
        .map_err(|e| jni_err("TallyportAndroid.invoke", e))?;
    if reply.is_null() {
        return Ok(None);
    }

    let reply = JString::from(reply);
    let text: String = env
        .get_string(&reply)
        .map_err(|e| jni_err("get_string(reply)", e))?
        .into();
    Ok(Some(text))
}

/// Channel to the Java shim.
///
/// Zero-sized; the JNI environment is attached per call.
pub struct AndroidChannel;

impl AndroidChannel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeChannel for AndroidChannel {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn invoke(&self, method: &str, payload: &str) -> Result<Option<String>> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let result = call_invoke(&mut env, method, payload);
        if result.is_err() {
            clear_exception(&mut env);
        }
        result
    }
}

/// `TallyportAndroid.nativeDeliver(String kind, String payload)`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tallyport_bridge_TallyportAndroid_nativeDeliver<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    kind: JString<'local>,
    payload: JString<'local>,
) {
    if kind.is_null() {
        warn!("native delivery without a kind dropped");
        return;
    }
    let kind: String = match env.get_string(&kind) {
        Ok(s) => s.into(),
        Err(e) => {
            warn!(error = %e, "unreadable delivery kind dropped");
            clear_exception(&mut env);
            return;
        }
    };
    if payload.is_null() {
        debug!(kind = %kind, "native delivery with null payload dropped");
        return;
    }
    let payload: String = match env.get_string(&payload) {
        Ok(s) => s.into(),
        Err(e) => {
            warn!(kind = %kind, error = %e, "unreadable delivery payload dropped");
            clear_exception(&mut env);
            return;
        }
    };
    crate::ffi::deliver(&kind, &payload);
}
