// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Windows native channel.
//
// The Windows SDK shim ships as `tallyport_windows.dll` next to the host
// executable and is loaded at runtime. It exports the same two functions as
// the iOS shim.

#![cfg(target_os = "windows")]

use libloading::{Library, Symbol};
use tracing::info;

use tallyport_core::Platform;
use tallyport_core::error::{BridgeError, Result};

use crate::channel::NativeChannel;
use crate::ffi::{FreeFn, InvokeFn, call_shim};

pub const LIBRARY_NAME: &str = "tallyport_windows.dll";

/// Channel to the dynamically loaded Windows shim.
pub struct WindowsChannel {
    invoke: InvokeFn,
    free: FreeFn,
    // Keeps the function pointers above valid.
    _library: Library,
}

impl WindowsChannel {
    /// Load the shim from the default search path.
    pub fn load() -> Result<Self> {
        Self::load_from(LIBRARY_NAME)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        // SAFETY: loading runs the DLL's initialisers; the shim has none
        // with preconditions.
        let library = unsafe { Library::new(path) }
            .map_err(|e| BridgeError::NativeLibrary(format!("{path}: {e}")))?;

        // SAFETY: the signatures match the shim's exported C functions.
        let invoke: InvokeFn = unsafe {
            let symbol: Symbol<InvokeFn> = library
                .get(b"_TallyportInvoke\0")
                .map_err(|e| BridgeError::NativeLibrary(format!("_TallyportInvoke: {e}")))?;
            *symbol
        };
        let free: FreeFn = unsafe {
            let symbol: Symbol<FreeFn> = library
                .get(b"_TallyportFreeString\0")
                .map_err(|e| BridgeError::NativeLibrary(format!("_TallyportFreeString: {e}")))?;
            *symbol
        };

        info!(path, "Windows SDK shim loaded");
        Ok(Self {
            invoke,
            free,
            _library: library,
        })
    }
}

impl NativeChannel for WindowsChannel {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn invoke(&self, method: &str, payload: &str) -> Result<Option<String>> {
        // SAFETY: both pointers were resolved from `_library`, which lives
        // as long as `self`.
        unsafe { call_shim(self.invoke, self.free, method, payload) }
    }
}
