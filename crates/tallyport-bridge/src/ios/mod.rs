// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS native channel.
//
// The Objective-C shim wrapping the iOS SDK is linked statically into the
// app binary (Xcode build) and exports `_TallyportInvoke` and
// `_TallyportFreeString`. Results come back through `tallyport_deliver`.
//
// The iOS SDK does its own threading, so calls here may be made from any
// thread.

#![cfg(target_os = "ios")]

use std::ffi::c_char;

use tallyport_core::Platform;
use tallyport_core::error::Result;

use crate::channel::NativeChannel;
use crate::ffi::call_shim;

unsafe extern "C" {
    fn _TallyportInvoke(method: *const c_char, payload: *const c_char) -> *mut c_char;
    fn _TallyportFreeString(reply: *mut c_char);
}

/// Channel to the statically linked iOS shim.
pub struct IosChannel;

impl IosChannel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IosChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeChannel for IosChannel {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn invoke(&self, method: &str, payload: &str) -> Result<Option<String>> {
        // SAFETY: both symbols come from the same linked shim.
        unsafe { call_shim(_TallyportInvoke, _TallyportFreeString, method, payload) }
    }
}
