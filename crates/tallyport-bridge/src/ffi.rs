// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// C ABI surface shared with the native shims.
//
// Inbound: `tallyport_deliver(kind, payload)` routes a native result to the
// relay installed by `Bridge::install_native_relay`. Native code has no
// handle to pass back, so this is the one place the crate keeps a global.
//
// Outbound: the iOS and Windows shims export the same two C functions,
// `_TallyportInvoke` and `_TallyportFreeString`. Strings returned by the
// former are owned by the shim and must be released with the latter.

use std::ffi::{CStr, c_char};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::OnceLock;

use tracing::{debug, error, warn};

use crate::relay::InboundRelay;

static NATIVE_RELAY: OnceLock<InboundRelay> = OnceLock::new();

/// Make `relay` the target of native deliveries. Only the first relay
/// installed in a process is kept; returns false if one already was.
pub(crate) fn install(relay: InboundRelay) -> bool {
    NATIVE_RELAY.set(relay).is_ok()
}

/// Hand a named result from the JNI entry point to the installed relay.
/// Never panics.
#[cfg(target_os = "android")]
pub(crate) fn deliver(kind: &str, payload: &str) {
    if let Some(relay) = installed() {
        deliver_to(relay, kind, payload);
    }
}

fn installed() -> Option<&'static InboundRelay> {
    let relay = NATIVE_RELAY.get();
    if relay.is_none() {
        warn!("native result arrived before a relay was installed");
    }
    relay
}

fn deliver_to(relay: &InboundRelay, kind: &str, payload: &str) -> usize {
    match catch_unwind(AssertUnwindSafe(|| relay.deliver_named(kind, payload))) {
        Ok(invoked) => invoked,
        Err(_) => {
            error!(kind, "native delivery panicked");
            0
        }
    }
}

/// Validate raw C strings and deliver them to `relay`.
///
/// # Safety
///
/// Same contract as [`tallyport_deliver`].
unsafe fn deliver_raw(relay: &InboundRelay, kind: *const c_char, payload: *const c_char) -> usize {
    if kind.is_null() {
        warn!("native delivery without a kind dropped");
        return 0;
    }
    // SAFETY: non-null and NUL-terminated per the caller's contract.
    let kind = unsafe { CStr::from_ptr(kind) };
    let Ok(kind) = kind.to_str() else {
        warn!("native delivery with non UTF-8 kind dropped");
        return 0;
    };
    if payload.is_null() {
        debug!(kind, "native delivery with null payload dropped");
        return 0;
    }
    // SAFETY: as above.
    let payload = unsafe { CStr::from_ptr(payload) };
    match payload.to_str() {
        Ok(payload) => deliver_to(relay, kind, payload),
        Err(e) => {
            warn!(kind, error = %e, "native payload is not UTF-8, dropped");
            0
        }
    }
}

/// Deliver a native result.
///
/// `kind` is a callback kind wire name such as `eventSuccess`. A null
/// `payload` means the native side had nothing to report and is dropped.
///
/// # Safety
///
/// Both pointers must be null or point to NUL-terminated strings that stay
/// valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tallyport_deliver(kind: *const c_char, payload: *const c_char) {
    let Some(relay) = installed() else {
        return;
    };
    // SAFETY: forwarded contract.
    unsafe { deliver_raw(relay, kind, payload) };
}

#[cfg(any(target_os = "ios", target_os = "windows"))]
pub(crate) use shim::*;

#[cfg(any(target_os = "ios", target_os = "windows"))]
mod shim {
    use std::ffi::{CStr, CString, c_char};

    use tallyport_core::error::{BridgeError, Result};

    pub(crate) type InvokeFn =
        unsafe extern "C" fn(method: *const c_char, payload: *const c_char) -> *mut c_char;
    pub(crate) type FreeFn = unsafe extern "C" fn(reply: *mut c_char);

    /// Call a shim's invoke function and copy out its reply.
    ///
    /// # Safety
    ///
    /// `invoke` and `free` must be a matching pair exported by one shim.
    pub(crate) unsafe fn call_shim(
        invoke: InvokeFn,
        free: FreeFn,
        method: &str,
        payload: &str,
    ) -> Result<Option<String>> {
        let method = CString::new(method)
            .map_err(|e| BridgeError::InvalidArgument(format!("method name: {e}")))?;
        let payload = CString::new(payload)
            .map_err(|e| BridgeError::InvalidArgument(format!("payload: {e}")))?;

        // SAFETY: both arguments are valid C strings for the call.
        let reply = unsafe { invoke(method.as_ptr(), payload.as_ptr()) };
        if reply.is_null() {
            return Ok(None);
        }
        // SAFETY: a non-null reply is a NUL-terminated string owned by the
        // shim until handed back through `free`.
        let text = unsafe { CStr::from_ptr(reply) }.to_string_lossy().into_owned();
        unsafe { free(reply) };
        Ok(Some(text))
    }
}
