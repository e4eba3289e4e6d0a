// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Tallyport bridge: one API over the iOS, Android, and Windows attribution
//! SDKs.
//!
//! Calls go out through the [`Bridge`] facade, which picks the backend for
//! the compilation target. Asynchronous results come back from native code
//! through [`InboundRelay`] into the [`CallbackRegistry`], which invokes the
//! application callbacks waiting for them.
//!
//! On targets without a native SDK the bridge is inert: every operation
//! returns its default and forwards nothing.

pub mod callback;
pub mod channel;
pub mod config;
pub mod facade;
pub mod ffi;
pub mod logging;
pub mod registry;
pub mod relay;
pub mod selector;
pub mod traits;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(test)]
mod testing;

pub use callback::{Callback, CallbackHandle, CallbackKind, Payload, Retention, callback};
pub use channel::{ChannelBackend, NativeChannel};
pub use config::TrackerConfig;
pub use facade::Bridge;
pub use registry::CallbackRegistry;
pub use relay::InboundRelay;
pub use selector::{Operation, PlatformSelector};
pub use traits::PlatformBackend;

/// The native backend for the compilation target, if there is one.
pub(crate) fn native_backend() -> Option<Box<dyn PlatformBackend>> {
    #[cfg(target_os = "ios")]
    {
        Some(Box::new(ChannelBackend::new(ios::IosChannel::new())))
    }
    #[cfg(target_os = "android")]
    {
        Some(Box::new(ChannelBackend::new(android::AndroidChannel::new())))
    }
    #[cfg(target_os = "windows")]
    {
        match windows::WindowsChannel::load() {
            Ok(channel) => Some(Box::new(ChannelBackend::new(channel))),
            Err(e) => {
                tracing::warn!(error = %e, "Windows SDK shim not loaded");
                None
            }
        }
    }
    #[cfg(not(any(target_os = "ios", target_os = "android", target_os = "windows")))]
    {
        None
    }
}
