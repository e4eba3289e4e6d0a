// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inbound relay: native results in, application callbacks out.
//
// Native code hands over one raw string per result. The relay decodes it
// into the payload its kind expects and fires the registry. A payload that
// does not decode is logged and dropped; nothing here returns an error to
// the native caller.

use std::sync::Arc;

use tracing::{debug, warn};

use tallyport_core::error::Result;
use tallyport_core::payload::{decode_conversion_value, decode_int, decode_json};

use crate::callback::{CallbackKind, Payload};
use crate::registry::CallbackRegistry;

/// Entry point native backends use to deliver results.
#[derive(Clone)]
pub struct InboundRelay {
    registry: Arc<CallbackRegistry>,
}

impl InboundRelay {
    pub fn new(registry: Arc<CallbackRegistry>) -> Self {
        Self { registry }
    }

    /// Decode `raw` as a `kind` result and fire it.
    ///
    /// Returns how many handles were invoked. Zero covers every dropped
    /// case: nobody registered, undecodable payload, or a "no value" marker.
    pub fn deliver(&self, kind: CallbackKind, raw: &str) -> usize {
        if !self.registry.is_registered(kind) {
            debug!(%kind, "no callback registered, result dropped");
            return 0;
        }
        match decode(kind, raw) {
            Ok(Some(payload)) => self.registry.fire(payload),
            Ok(None) => {
                debug!(%kind, raw, "result carries no value, dropped");
                0
            }
            Err(e) => {
                warn!(%kind, error = %e, "undecodable native payload dropped");
                0
            }
        }
    }

    /// Deliver by wire name, as used by the C ABI and JNI entry points.
    pub fn deliver_named(&self, kind: &str, raw: &str) -> usize {
        match kind.parse::<CallbackKind>() {
            Ok(kind) => self.deliver(kind, raw),
            Err(e) => {
                warn!(error = %e, "native delivery for unknown kind dropped");
                0
            }
        }
    }

    pub fn attribution_changed(&self, raw: &str) {
        self.deliver(CallbackKind::AttributionChanged, raw);
    }

    pub fn event_success(&self, raw: &str) {
        self.deliver(CallbackKind::EventSuccess, raw);
    }

    pub fn event_failure(&self, raw: &str) {
        self.deliver(CallbackKind::EventFailure, raw);
    }

    pub fn session_success(&self, raw: &str) {
        self.deliver(CallbackKind::SessionSuccess, raw);
    }

    pub fn session_failure(&self, raw: &str) {
        self.deliver(CallbackKind::SessionFailure, raw);
    }

    pub fn deferred_deeplink(&self, raw: &str) {
        self.deliver(CallbackKind::DeferredDeeplink, raw);
    }

    pub fn conversion_value_updated(&self, raw: &str) {
        self.deliver(CallbackKind::ConversionValueUpdated, raw);
    }

    pub fn skad4_conversion_value_updated(&self, raw: &str) {
        self.deliver(CallbackKind::Skad4ConversionValueUpdated, raw);
    }

    pub fn skad_completion(&self, raw: &str) {
        self.deliver(CallbackKind::SkadCompletion, raw);
    }

    pub fn skad4_completion(&self, raw: &str) {
        self.deliver(CallbackKind::Skad4Completion, raw);
    }

    pub fn authorization_status(&self, raw: &str) {
        self.deliver(CallbackKind::AuthorizationStatus, raw);
    }

    pub fn purchase_verification_info(&self, raw: &str) {
        self.deliver(CallbackKind::PurchaseVerificationInfo, raw);
    }

    pub fn google_ad_id_read(&self, raw: &str) {
        self.deliver(CallbackKind::GoogleAdIdRead, raw);
    }
}

/// `Ok(None)` means the payload decoded to "nothing to report".
fn decode(kind: CallbackKind, raw: &str) -> Result<Option<Payload>> {
    let payload = match kind {
        CallbackKind::EventSuccess => Payload::EventSuccess(decode_json(raw)?),
        CallbackKind::EventFailure => Payload::EventFailure(decode_json(raw)?),
        CallbackKind::SessionSuccess => Payload::SessionSuccess(decode_json(raw)?),
        CallbackKind::SessionFailure => Payload::SessionFailure(decode_json(raw)?),
        CallbackKind::AttributionChanged => Payload::AttributionChanged(decode_json(raw)?),
        CallbackKind::DeferredDeeplink => Payload::DeferredDeeplink(raw.to_string()),
        CallbackKind::ConversionValueUpdated => match decode_conversion_value(raw)? {
            Some(value) => Payload::ConversionValueUpdated(value),
            None => return Ok(None),
        },
        CallbackKind::Skad4ConversionValueUpdated => {
            Payload::Skad4ConversionValueUpdated(decode_json(raw)?)
        }
        CallbackKind::SkadCompletion => Payload::SkadCompletion(raw.to_string()),
        CallbackKind::Skad4Completion => Payload::Skad4Completion(raw.to_string()),
        CallbackKind::AuthorizationStatus => Payload::AuthorizationStatus(decode_int(raw)?),
        CallbackKind::PurchaseVerificationInfo => {
            Payload::PurchaseVerificationInfo(decode_json(raw)?)
        }
        CallbackKind::GoogleAdIdRead => Payload::GoogleAdIdRead(raw.to_string()),
    };
    Ok(Some(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::{callback, CallbackHandle};
    use std::sync::Mutex;
    use tallyport_core::{EventFailure, EventSuccess, Skad4ConversionUpdate};

    fn relay() -> (InboundRelay, Arc<CallbackRegistry>) {
        let registry = Arc::new(CallbackRegistry::new());
        (InboundRelay::new(registry.clone()), registry)
    }

    #[test]
    fn success_then_unclaimed_failure() {
        let (relay, registry) = relay();
        let seen: Arc<Mutex<Vec<EventSuccess>>> = Arc::default();
        let sink = seen.clone();
        registry.register(CallbackHandle::EventSuccess(callback(move |s| {
            sink.lock().unwrap().push(s);
        })));

        relay.event_success(r#"{"callbackId":"abc","message":"ok"}"#);
        {
            let seen = seen.lock().unwrap();
            assert_eq!(seen.len(), 1);
            assert_eq!(
                seen[0],
                EventSuccess {
                    callback_id: Some("abc".into()),
                    message: Some("ok".into()),
                    ..Default::default()
                }
            );
        }

        assert_eq!(
            relay.deliver(
                CallbackKind::EventFailure,
                r#"{"eventToken":"tok","willRetry":"true"}"#
            ),
            0
        );
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(registry.is_registered(CallbackKind::EventSuccess));
    }

    #[test]
    fn malformed_payload_invokes_nothing() {
        let (relay, registry) = relay();
        let hits: Arc<Mutex<Vec<EventFailure>>> = Arc::default();
        let sink = hits.clone();
        registry.register(CallbackHandle::EventFailure(callback(move |f| {
            sink.lock().unwrap().push(f);
        })));

        assert_eq!(relay.deliver(CallbackKind::EventFailure, "{not json"), 0);
        assert_eq!(relay.deliver(CallbackKind::EventFailure, ""), 0);
        assert!(hits.lock().unwrap().is_empty());

        // still usable afterwards
        assert_eq!(
            relay.deliver(CallbackKind::EventFailure, r#"{"willRetry":1}"#),
            1
        );
        assert!(hits.lock().unwrap()[0].will_retry);
    }

    #[test]
    fn authorization_status_reaches_every_queued_handle() {
        let (relay, registry) = relay();
        let order: Arc<Mutex<Vec<(u8, i32)>>> = Arc::default();
        for id in 1..=3u8 {
            let sink = order.clone();
            registry.register(CallbackHandle::AuthorizationStatus(callback(move |s| {
                sink.lock().unwrap().push((id, s));
            })));
        }

        relay.authorization_status("2");
        assert_eq!(*order.lock().unwrap(), vec![(1, 2), (2, 2), (3, 2)]);
        assert_eq!(registry.pending(CallbackKind::AuthorizationStatus), 0);

        relay.authorization_status("2");
        assert_eq!(order.lock().unwrap().len(), 3);
    }

    #[test]
    fn conversion_value_marker_is_dropped() {
        let (relay, registry) = relay();
        let seen: Arc<Mutex<Vec<i32>>> = Arc::default();
        let sink = seen.clone();
        registry.register(CallbackHandle::ConversionValueUpdated(callback(move |v| {
            sink.lock().unwrap().push(v);
        })));

        relay.conversion_value_updated("-1");
        relay.conversion_value_updated("abc");
        relay.conversion_value_updated("42");
        assert_eq!(*seen.lock().unwrap(), vec![42]);
    }

    #[test]
    fn skad4_update_is_decoded_leniently() {
        let (relay, registry) = relay();
        let seen: Arc<Mutex<Vec<Skad4ConversionUpdate>>> = Arc::default();
        let sink = seen.clone();
        registry.register(CallbackHandle::Skad4ConversionValueUpdated(callback(
            move |u| sink.lock().unwrap().push(u),
        )));

        relay.skad4_conversion_value_updated(
            r#"{"fineValue":"12","coarseValue":"high","lockWindow":"true"}"#,
        );
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Skad4ConversionUpdate {
                fine_value: 12,
                coarse_value: "high".into(),
                lock_window: true,
            }]
        );
    }

    #[test]
    fn empty_completion_message_is_delivered_once() {
        let (relay, registry) = relay();
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = seen.clone();
        registry.register(CallbackHandle::SkadCompletion(callback(move |m| {
            sink.lock().unwrap().push(m);
        })));

        relay.skad_completion("");
        relay.skad_completion("late");
        assert_eq!(*seen.lock().unwrap(), vec![String::new()]);
    }

    #[test]
    fn named_delivery() {
        let (relay, registry) = relay();
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = seen.clone();
        registry.register(CallbackHandle::DeferredDeeplink(callback(move |url| {
            sink.lock().unwrap().push(url);
        })));

        assert_eq!(relay.deliver_named("deferredDeeplink", "app://promo"), 1);
        assert_eq!(relay.deliver_named("noSuchKind", "app://promo"), 0);
        assert_eq!(*seen.lock().unwrap(), vec!["app://promo".to_string()]);
    }

    #[test]
    fn empty_deferred_deeplink_is_passed_through() {
        let (relay, registry) = relay();
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = seen.clone();
        registry.register(CallbackHandle::DeferredDeeplink(callback(move |url| {
            sink.lock().unwrap().push(url);
        })));

        assert_eq!(relay.deliver(CallbackKind::DeferredDeeplink, ""), 1);
        assert_eq!(*seen.lock().unwrap(), vec![String::new()]);
    }
}
