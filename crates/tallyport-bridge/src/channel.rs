// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON method channel shared by the iOS, Android, and Windows backends.
//
// Each native SDK is fronted by a thin shim exposing one entry point:
// `invoke(method, payload) -> reply`. The payload is JSON (`null` when the
// method takes no argument). The reply is plain text for string getters,
// `true`/`false` for flags, a decimal for integer getters, and JSON for
// attribution. A missing reply means "nothing to report".

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;
use tracing::trace;

use tallyport_core::error::{BridgeError, Result};
use tallyport_core::payload::{decode_int, decode_json};
use tallyport_core::{
    AdRevenue, AppStorePurchase, AppStoreSubscription, Attribution, Event, Platform,
    PlayStorePurchase, PlayStoreSubscription, SdkConfig, ThirdPartySharing,
};

use crate::traits::*;

/// Transport to one native SDK shim.
pub trait NativeChannel: Send + Sync {
    fn platform(&self) -> Platform;

    /// Call `method` with a JSON `payload`.
    fn invoke(&self, method: &str, payload: &str) -> Result<Option<String>>;
}

/// Method names understood by every native shim.
pub mod method {
    pub const START: &str = "start";
    pub const SET_ENABLED: &str = "setEnabled";
    pub const IS_ENABLED: &str = "isEnabled";
    pub const SET_OFFLINE_MODE: &str = "setOfflineMode";
    pub const SET_DEVICE_TOKEN: &str = "setDeviceToken";
    pub const APP_WILL_OPEN_URL: &str = "appWillOpenUrl";
    pub const SEND_FIRST_PACKAGES: &str = "sendFirstPackages";
    pub const SET_TEST_OPTIONS: &str = "setTestOptions";
    pub const ON_PAUSE: &str = "onPause";
    pub const ON_RESUME: &str = "onResume";
    pub const TRACK_EVENT: &str = "trackEvent";
    pub const TRACK_AD_REVENUE_RAW: &str = "trackAdRevenueRaw";
    pub const TRACK_AD_REVENUE: &str = "trackAdRevenue";
    pub const TRACK_APP_STORE_SUBSCRIPTION: &str = "trackAppStoreSubscription";
    pub const TRACK_PLAY_STORE_SUBSCRIPTION: &str = "trackPlayStoreSubscription";
    pub const ADD_SESSION_PARTNER_PARAMETER: &str = "addSessionPartnerParameter";
    pub const ADD_SESSION_CALLBACK_PARAMETER: &str = "addSessionCallbackParameter";
    pub const REMOVE_SESSION_PARTNER_PARAMETER: &str = "removeSessionPartnerParameter";
    pub const REMOVE_SESSION_CALLBACK_PARAMETER: &str = "removeSessionCallbackParameter";
    pub const RESET_SESSION_PARTNER_PARAMETERS: &str = "resetSessionPartnerParameters";
    pub const RESET_SESSION_CALLBACK_PARAMETERS: &str = "resetSessionCallbackParameters";
    pub const GET_ADID: &str = "getAdid";
    pub const GET_ATTRIBUTION: &str = "getAttribution";
    pub const GET_SDK_VERSION: &str = "getSdkVersion";
    pub const GET_IDFA: &str = "getIdfa";
    pub const GET_WIN_ADID: &str = "getWinAdid";
    pub const GET_AMAZON_AD_ID: &str = "getAmazonAdId";
    pub const GET_LAST_DEEPLINK: &str = "getLastDeeplink";
    pub const GET_GOOGLE_AD_ID: &str = "getGoogleAdId";
    pub const SET_REFERRER: &str = "setReferrer";
    pub const GDPR_FORGET_ME: &str = "gdprForgetMe";
    pub const DISABLE_THIRD_PARTY_SHARING: &str = "disableThirdPartySharing";
    pub const TRACK_THIRD_PARTY_SHARING: &str = "trackThirdPartySharing";
    pub const TRACK_MEASUREMENT_CONSENT: &str = "trackMeasurementConsent";
    pub const REQUEST_TRACKING_AUTHORIZATION: &str = "requestTrackingAuthorization";
    pub const CHECK_FOR_NEW_ATT_STATUS: &str = "checkForNewAttStatus";
    pub const GET_APP_TRACKING_AUTHORIZATION_STATUS: &str = "getAppTrackingAuthorizationStatus";
    pub const UPDATE_CONVERSION_VALUE: &str = "updateConversionValue";
    pub const UPDATE_CONVERSION_VALUE_WITH_COMPLETION: &str = "updateConversionValueWithCompletion";
    pub const UPDATE_SKAD4_CONVERSION_VALUE: &str = "updateSkad4ConversionValue";
    pub const VERIFY_APP_STORE_PURCHASE: &str = "verifyAppStorePurchase";
    pub const VERIFY_PLAY_STORE_PURCHASE: &str = "verifyPlayStorePurchase";
}

/// A [`PlatformBackend`] that serializes every call onto a [`NativeChannel`].
pub struct ChannelBackend<C> {
    channel: C,
}

impl<C: NativeChannel> ChannelBackend<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    fn send(&self, method: &str, payload: &impl Serialize) -> Result<()> {
        let json = serde_json::to_string(payload)?;
        trace!(method, payload = %json, "native call");
        self.channel.invoke(method, &json).map(|_| ())
    }

    fn call(&self, method: &str) -> Result<()> {
        self.send(method, &serde_json::Value::Null)
    }

    fn text(&self, method: &str) -> Result<String> {
        Ok(self.channel.invoke(method, "null")?.unwrap_or_default())
    }
}

impl<C: NativeChannel> PlatformBackend for ChannelBackend<C> {
    fn platform(&self) -> Platform {
        self.channel.platform()
    }
}

impl<C: NativeChannel> SdkLifecycle for ChannelBackend<C> {
    fn start(&self, config: &SdkConfig) -> Result<()> {
        self.send(method::START, config)
    }

    fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.send(method::SET_ENABLED, &enabled)
    }

    fn is_enabled(&self) -> Result<bool> {
        match self.channel.invoke(method::IS_ENABLED, "null")?.as_deref() {
            Some("true") | Some("1") => Ok(true),
            Some("false") | Some("0") | None => Ok(false),
            Some(other) => Err(BridgeError::Decode(format!(
                "isEnabled replied {other:?}"
            ))),
        }
    }

    fn set_offline_mode(&self, enabled: bool) -> Result<()> {
        self.send(method::SET_OFFLINE_MODE, &enabled)
    }

    fn set_device_token(&self, token: &str) -> Result<()> {
        self.send(method::SET_DEVICE_TOKEN, &token)
    }

    fn app_will_open_url(&self, url: &str) -> Result<()> {
        self.send(method::APP_WILL_OPEN_URL, &url)
    }

    fn send_first_packages(&self) -> Result<()> {
        self.call(method::SEND_FIRST_PACKAGES)
    }

    fn set_test_options(&self, options: &BTreeMap<String, String>) -> Result<()> {
        self.send(method::SET_TEST_OPTIONS, options)
    }

    fn on_pause(&self) -> Result<()> {
        self.call(method::ON_PAUSE)
    }

    fn on_resume(&self) -> Result<()> {
        self.call(method::ON_RESUME)
    }
}

impl<C: NativeChannel> EventTracking for ChannelBackend<C> {
    fn track_event(&self, event: &Event) -> Result<()> {
        self.send(method::TRACK_EVENT, event)
    }

    fn track_ad_revenue_raw(&self, source: &str, payload: &str) -> Result<()> {
        self.send(
            method::TRACK_AD_REVENUE_RAW,
            &json!({ "source": source, "payload": payload }),
        )
    }

    fn track_ad_revenue(&self, ad_revenue: &AdRevenue) -> Result<()> {
        self.send(method::TRACK_AD_REVENUE, ad_revenue)
    }

    fn track_app_store_subscription(&self, subscription: &AppStoreSubscription) -> Result<()> {
        self.send(method::TRACK_APP_STORE_SUBSCRIPTION, subscription)
    }

    fn track_play_store_subscription(&self, subscription: &PlayStoreSubscription) -> Result<()> {
        self.send(method::TRACK_PLAY_STORE_SUBSCRIPTION, subscription)
    }
}

impl<C: NativeChannel> SessionParameters for ChannelBackend<C> {
    fn add_session_partner_parameter(&self, key: &str, value: &str) -> Result<()> {
        self.send(
            method::ADD_SESSION_PARTNER_PARAMETER,
            &json!({ "key": key, "value": value }),
        )
    }

    fn add_session_callback_parameter(&self, key: &str, value: &str) -> Result<()> {
        self.send(
            method::ADD_SESSION_CALLBACK_PARAMETER,
            &json!({ "key": key, "value": value }),
        )
    }

    fn remove_session_partner_parameter(&self, key: &str) -> Result<()> {
        self.send(method::REMOVE_SESSION_PARTNER_PARAMETER, &key)
    }

    fn remove_session_callback_parameter(&self, key: &str) -> Result<()> {
        self.send(method::REMOVE_SESSION_CALLBACK_PARAMETER, &key)
    }

    fn reset_session_partner_parameters(&self) -> Result<()> {
        self.call(method::RESET_SESSION_PARTNER_PARAMETERS)
    }

    fn reset_session_callback_parameters(&self) -> Result<()> {
        self.call(method::RESET_SESSION_CALLBACK_PARAMETERS)
    }
}

impl<C: NativeChannel> DeviceIdentifiers for ChannelBackend<C> {
    fn adid(&self) -> Result<String> {
        self.text(method::GET_ADID)
    }

    fn attribution(&self) -> Result<Option<Attribution>> {
        match self.channel.invoke(method::GET_ATTRIBUTION, "null")? {
            Some(raw) if !raw.trim().is_empty() => decode_json(&raw).map(Some),
            _ => Ok(None),
        }
    }

    fn sdk_version(&self) -> Result<String> {
        self.text(method::GET_SDK_VERSION)
    }

    fn idfa(&self) -> Result<String> {
        self.text(method::GET_IDFA)
    }

    fn win_adid(&self) -> Result<String> {
        self.text(method::GET_WIN_ADID)
    }

    fn amazon_ad_id(&self) -> Result<String> {
        self.text(method::GET_AMAZON_AD_ID)
    }

    fn last_deeplink(&self) -> Result<String> {
        self.text(method::GET_LAST_DEEPLINK)
    }

    fn request_google_ad_id(&self) -> Result<()> {
        self.call(method::GET_GOOGLE_AD_ID)
    }

    fn set_referrer(&self, referrer: &str) -> Result<()> {
        self.send(method::SET_REFERRER, &referrer)
    }
}

impl<C: NativeChannel> PrivacyControls for ChannelBackend<C> {
    fn gdpr_forget_me(&self) -> Result<()> {
        self.call(method::GDPR_FORGET_ME)
    }

    fn disable_third_party_sharing(&self) -> Result<()> {
        self.call(method::DISABLE_THIRD_PARTY_SHARING)
    }

    fn track_third_party_sharing(&self, sharing: &ThirdPartySharing) -> Result<()> {
        self.send(method::TRACK_THIRD_PARTY_SHARING, sharing)
    }

    fn track_measurement_consent(&self, consent: bool) -> Result<()> {
        self.send(method::TRACK_MEASUREMENT_CONSENT, &consent)
    }

    fn request_tracking_authorization(&self) -> Result<()> {
        self.call(method::REQUEST_TRACKING_AUTHORIZATION)
    }

    fn check_for_new_att_status(&self) -> Result<()> {
        self.call(method::CHECK_FOR_NEW_ATT_STATUS)
    }

    fn app_tracking_authorization_status(&self) -> Result<i32> {
        match self
            .channel
            .invoke(method::GET_APP_TRACKING_AUTHORIZATION_STATUS, "null")?
        {
            Some(raw) => decode_int(&raw),
            None => Ok(-1),
        }
    }
}

impl<C: NativeChannel> SkAdNetwork for ChannelBackend<C> {
    fn update_conversion_value(&self, value: i32) -> Result<()> {
        self.send(method::UPDATE_CONVERSION_VALUE, &value)
    }

    fn update_conversion_value_with_completion(&self, value: i32) -> Result<()> {
        self.send(method::UPDATE_CONVERSION_VALUE_WITH_COMPLETION, &value)
    }

    fn update_skad4_conversion_value(
        &self,
        fine_value: i32,
        coarse_value: &str,
        lock_window: bool,
    ) -> Result<()> {
        self.send(
            method::UPDATE_SKAD4_CONVERSION_VALUE,
            &json!({
                "fineValue": fine_value,
                "coarseValue": coarse_value,
                "lockWindow": lock_window,
            }),
        )
    }
}

impl<C: NativeChannel> PurchaseVerification for ChannelBackend<C> {
    fn verify_app_store_purchase(&self, purchase: &AppStorePurchase) -> Result<()> {
        self.send(method::VERIFY_APP_STORE_PURCHASE, purchase)
    }

    fn verify_play_store_purchase(&self, purchase: &PlayStorePurchase) -> Result<()> {
        self.send(method::VERIFY_PLAY_STORE_PURCHASE, purchase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every call and answers from a canned reply table.
    struct LoopbackChannel {
        calls: Mutex<Vec<(String, String)>>,
        replies: BTreeMap<&'static str, &'static str>,
    }

    impl LoopbackChannel {
        fn new(replies: &[(&'static str, &'static str)]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                replies: replies.iter().copied().collect(),
            }
        }
    }

    impl NativeChannel for LoopbackChannel {
        fn platform(&self) -> Platform {
            Platform::Ios
        }

        fn invoke(&self, method: &str, payload: &str) -> Result<Option<String>> {
            self.calls
                .lock()
                .unwrap()
                .push((method.to_string(), payload.to_string()));
            Ok(self.replies.get(method).map(|r| r.to_string()))
        }
    }

    #[test]
    fn event_is_sent_as_json() {
        let backend = ChannelBackend::new(LoopbackChannel::new(&[]));
        let mut event = Event::new("abc123");
        event.set_revenue(0.99, "EUR");
        backend.track_event(&event).unwrap();

        let calls = backend.channel.calls.lock().unwrap();
        assert_eq!(calls[0].0, "trackEvent");
        let sent: serde_json::Value = serde_json::from_str(&calls[0].1).unwrap();
        assert_eq!(sent["eventToken"], "abc123");
        assert_eq!(sent["currency"], "EUR");
    }

    #[test]
    fn no_argument_methods_send_null() {
        let backend = ChannelBackend::new(LoopbackChannel::new(&[]));
        backend.gdpr_forget_me().unwrap();
        let calls = backend.channel.calls.lock().unwrap();
        assert_eq!(calls[0], ("gdprForgetMe".to_string(), "null".to_string()));
    }

    #[test]
    fn replies_are_decoded() {
        let backend = ChannelBackend::new(LoopbackChannel::new(&[
            ("isEnabled", "true"),
            ("getAdid", "a1b2c3"),
            ("getAttribution", r#"{"trackerName":"Organic"}"#),
            ("getAppTrackingAuthorizationStatus", "3"),
        ]));

        assert!(backend.is_enabled().unwrap());
        assert_eq!(backend.adid().unwrap(), "a1b2c3");
        assert_eq!(
            backend.attribution().unwrap().unwrap().tracker_name.as_deref(),
            Some("Organic")
        );
        assert_eq!(backend.app_tracking_authorization_status().unwrap(), 3);
    }

    #[test]
    fn missing_replies_use_empty_values() {
        let backend = ChannelBackend::new(LoopbackChannel::new(&[]));
        assert!(!backend.is_enabled().unwrap());
        assert_eq!(backend.sdk_version().unwrap(), "");
        assert!(backend.attribution().unwrap().is_none());
        assert_eq!(backend.app_tracking_authorization_status().unwrap(), -1);
    }

    #[test]
    fn garbled_flag_is_a_decode_error() {
        let backend = ChannelBackend::new(LoopbackChannel::new(&[("isEnabled", "maybe")]));
        assert!(matches!(backend.is_enabled(), Err(BridgeError::Decode(_))));
    }
}
