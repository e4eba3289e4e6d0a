// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Start-time configuration: SDK options plus the persistent delegates.

use tallyport_core::{
    Attribution, EventFailure, EventSuccess, SdkConfig, SessionFailure, SessionSuccess,
    Skad4ConversionUpdate,
};

use crate::callback::{CallbackHandle, callback};

/// Everything `Bridge::start` needs.
///
/// Delegates are optional. Each one supplied is registered as a persistent
/// callback before the SDK is started.
#[derive(Clone)]
pub struct TrackerConfig {
    pub sdk: SdkConfig,
    delegates: Vec<CallbackHandle>,
}

impl TrackerConfig {
    pub fn new(sdk: SdkConfig) -> Self {
        Self {
            sdk,
            delegates: Vec::new(),
        }
    }

    fn with(mut self, handle: CallbackHandle) -> Self {
        // Last one wins, same as the registry.
        let kind = handle.kind();
        self.delegates.retain(|h| h.kind() != kind);
        self.delegates.push(handle);
        self
    }

    pub fn on_event_success(self, f: impl Fn(EventSuccess) + Send + Sync + 'static) -> Self {
        self.with(CallbackHandle::EventSuccess(callback(f)))
    }

    pub fn on_event_failure(self, f: impl Fn(EventFailure) + Send + Sync + 'static) -> Self {
        self.with(CallbackHandle::EventFailure(callback(f)))
    }

    pub fn on_session_success(self, f: impl Fn(SessionSuccess) + Send + Sync + 'static) -> Self {
        self.with(CallbackHandle::SessionSuccess(callback(f)))
    }

    pub fn on_session_failure(self, f: impl Fn(SessionFailure) + Send + Sync + 'static) -> Self {
        self.with(CallbackHandle::SessionFailure(callback(f)))
    }

    pub fn on_attribution_changed(self, f: impl Fn(Attribution) + Send + Sync + 'static) -> Self {
        self.with(CallbackHandle::AttributionChanged(callback(f)))
    }

    /// Called with the deep link URL of a deferred install.
    pub fn on_deferred_deeplink(self, f: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.with(CallbackHandle::DeferredDeeplink(callback(f)))
    }

    pub fn on_conversion_value_updated(self, f: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.with(CallbackHandle::ConversionValueUpdated(callback(f)))
    }

    pub fn on_skad4_conversion_value_updated(
        self,
        f: impl Fn(Skad4ConversionUpdate) + Send + Sync + 'static,
    ) -> Self {
        self.with(CallbackHandle::Skad4ConversionValueUpdated(callback(f)))
    }

    pub(crate) fn delegates(&self) -> &[CallbackHandle] {
        &self.delegates
    }
}

impl From<SdkConfig> for TrackerConfig {
    fn from(sdk: SdkConfig) -> Self {
        Self::new(sdk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::CallbackKind;
    use tallyport_core::Environment;

    #[test]
    fn delegates_replace_by_kind() {
        let config = TrackerConfig::new(SdkConfig::new("2fm9gkqubvpc", Environment::Sandbox))
            .on_event_success(|_| {})
            .on_attribution_changed(|_| {})
            .on_event_success(|_| {});

        let kinds: Vec<CallbackKind> = config.delegates().iter().map(|h| h.kind()).collect();
        assert_eq!(
            kinds,
            vec![CallbackKind::AttributionChanged, CallbackKind::EventSuccess]
        );
    }
}
