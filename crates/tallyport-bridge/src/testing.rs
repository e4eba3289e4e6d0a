// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording backend for unit tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tallyport_core::error::{BridgeError, Result};
use tallyport_core::{
    AdRevenue, AppStorePurchase, AppStoreSubscription, Attribution, Event, Platform,
    PlayStorePurchase, PlayStoreSubscription, SdkConfig, ThirdPartySharing,
};

use crate::traits::*;

/// Backend that records the name of every forwarded call.
///
/// Clones share the call log, so a test can keep one copy and hand the
/// other to a `Bridge`.
#[derive(Clone)]
pub(crate) struct RecordingBackend {
    platform: Platform,
    calls: Arc<Mutex<Vec<&'static str>>>,
    fail: bool,
}

impl RecordingBackend {
    pub(crate) fn new(platform: Platform) -> Self {
        Self {
            platform,
            calls: Arc::default(),
            fail: false,
        }
    }

    /// Every call records, then returns a backend error.
    pub(crate) fn failing(platform: Platform) -> Self {
        Self {
            fail: true,
            ..Self::new(platform)
        }
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record<T>(&self, name: &'static str, value: T) -> Result<T> {
        self.calls.lock().unwrap().push(name);
        if self.fail {
            return Err(BridgeError::Backend(format!("{name} failed")));
        }
        Ok(value)
    }
}

impl PlatformBackend for RecordingBackend {
    fn platform(&self) -> Platform {
        self.platform
    }
}

impl SdkLifecycle for RecordingBackend {
    fn start(&self, _config: &SdkConfig) -> Result<()> {
        self.record("start", ())
    }
    fn set_enabled(&self, _enabled: bool) -> Result<()> {
        self.record("set_enabled", ())
    }
    fn is_enabled(&self) -> Result<bool> {
        self.record("is_enabled", true)
    }
    fn set_offline_mode(&self, _enabled: bool) -> Result<()> {
        self.record("set_offline_mode", ())
    }
    fn set_device_token(&self, _token: &str) -> Result<()> {
        self.record("set_device_token", ())
    }
    fn app_will_open_url(&self, _url: &str) -> Result<()> {
        self.record("app_will_open_url", ())
    }
    fn send_first_packages(&self) -> Result<()> {
        self.record("send_first_packages", ())
    }
    fn set_test_options(&self, _options: &BTreeMap<String, String>) -> Result<()> {
        self.record("set_test_options", ())
    }
    fn on_pause(&self) -> Result<()> {
        self.record("on_pause", ())
    }
    fn on_resume(&self) -> Result<()> {
        self.record("on_resume", ())
    }
}

impl EventTracking for RecordingBackend {
    fn track_event(&self, _event: &Event) -> Result<()> {
        self.record("track_event", ())
    }
    fn track_ad_revenue_raw(&self, _source: &str, _payload: &str) -> Result<()> {
        self.record("track_ad_revenue_raw", ())
    }
    fn track_ad_revenue(&self, _ad_revenue: &AdRevenue) -> Result<()> {
        self.record("track_ad_revenue", ())
    }
    fn track_app_store_subscription(&self, _subscription: &AppStoreSubscription) -> Result<()> {
        self.record("track_app_store_subscription", ())
    }
    fn track_play_store_subscription(&self, _subscription: &PlayStoreSubscription) -> Result<()> {
        self.record("track_play_store_subscription", ())
    }
}

impl SessionParameters for RecordingBackend {
    fn add_session_partner_parameter(&self, _key: &str, _value: &str) -> Result<()> {
        self.record("add_session_partner_parameter", ())
    }
    fn add_session_callback_parameter(&self, _key: &str, _value: &str) -> Result<()> {
        self.record("add_session_callback_parameter", ())
    }
    fn remove_session_partner_parameter(&self, _key: &str) -> Result<()> {
        self.record("remove_session_partner_parameter", ())
    }
    fn remove_session_callback_parameter(&self, _key: &str) -> Result<()> {
        self.record("remove_session_callback_parameter", ())
    }
    fn reset_session_partner_parameters(&self) -> Result<()> {
        self.record("reset_session_partner_parameters", ())
    }
    fn reset_session_callback_parameters(&self) -> Result<()> {
        self.record("reset_session_callback_parameters", ())
    }
}

impl DeviceIdentifiers for RecordingBackend {
    fn adid(&self) -> Result<String> {
        self.record("adid", "adid-1".to_string())
    }
    fn attribution(&self) -> Result<Option<Attribution>> {
        let attribution = Attribution {
            tracker_name: Some("Organic".into()),
            ..Default::default()
        };
        self.record("attribution", Some(attribution))
    }
    fn sdk_version(&self) -> Result<String> {
        self.record("sdk_version", "4.38.0".to_string())
    }
    fn idfa(&self) -> Result<String> {
        self.record("idfa", "idfa-1".to_string())
    }
    fn win_adid(&self) -> Result<String> {
        self.record("win_adid", "win-1".to_string())
    }
    fn amazon_ad_id(&self) -> Result<String> {
        self.record("amazon_ad_id", "amazon-1".to_string())
    }
    fn last_deeplink(&self) -> Result<String> {
        self.record("last_deeplink", "app://last".to_string())
    }
    fn request_google_ad_id(&self) -> Result<()> {
        self.record("request_google_ad_id", ())
    }
    fn set_referrer(&self, _referrer: &str) -> Result<()> {
        self.record("set_referrer", ())
    }
}

impl PrivacyControls for RecordingBackend {
    fn gdpr_forget_me(&self) -> Result<()> {
        self.record("gdpr_forget_me", ())
    }
    fn disable_third_party_sharing(&self) -> Result<()> {
        self.record("disable_third_party_sharing", ())
    }
    fn track_third_party_sharing(&self, _sharing: &ThirdPartySharing) -> Result<()> {
        self.record("track_third_party_sharing", ())
    }
    fn track_measurement_consent(&self, _consent: bool) -> Result<()> {
        self.record("track_measurement_consent", ())
    }
    fn request_tracking_authorization(&self) -> Result<()> {
        self.record("request_tracking_authorization", ())
    }
    fn check_for_new_att_status(&self) -> Result<()> {
        self.record("check_for_new_att_status", ())
    }
    fn app_tracking_authorization_status(&self) -> Result<i32> {
        self.record("app_tracking_authorization_status", 3)
    }
}

impl SkAdNetwork for RecordingBackend {
    fn update_conversion_value(&self, _value: i32) -> Result<()> {
        self.record("update_conversion_value", ())
    }
    fn update_conversion_value_with_completion(&self, _value: i32) -> Result<()> {
        self.record("update_conversion_value_with_completion", ())
    }
    fn update_skad4_conversion_value(
        &self,
        _fine_value: i32,
        _coarse_value: &str,
        _lock_window: bool,
    ) -> Result<()> {
        self.record("update_skad4_conversion_value", ())
    }
}

impl PurchaseVerification for RecordingBackend {
    fn verify_app_store_purchase(&self, _purchase: &AppStorePurchase) -> Result<()> {
        self.record("verify_app_store_purchase", ())
    }
    fn verify_play_store_purchase(&self, _purchase: &PlayStorePurchase) -> Result<()> {
        self.record("verify_play_store_purchase", ())
    }
}
