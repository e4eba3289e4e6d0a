// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic capability traits for native attribution SDKs.
//
// Capabilities every platform has are required methods. Capabilities only
// some platforms have default to `BridgeError::PlatformUnavailable`; the
// facade consults the support table before calling them, so those defaults
// only fire if a backend is driven directly.
//
// Methods whose answer arrives later (authorization, SKAdNetwork completion,
// purchase verification, Google advertising id) return as soon as the
// request is handed over. The answer comes back through the inbound relay.

use std::collections::BTreeMap;

use tallyport_core::error::{BridgeError, Result};
use tallyport_core::{
    AdRevenue, AppStorePurchase, AppStoreSubscription, Attribution, Event, Platform,
    PlayStorePurchase, PlayStoreSubscription, SdkConfig, ThirdPartySharing,
};

/// One native SDK, as seen by the dispatch facade.
pub trait PlatformBackend:
    SdkLifecycle
    + EventTracking
    + SessionParameters
    + DeviceIdentifiers
    + PrivacyControls
    + SkAdNetwork
    + PurchaseVerification
    + Send
    + Sync
{
    /// Which platform this backend drives.
    fn platform(&self) -> Platform;
}

/// Starting, pausing, and toggling the SDK.
pub trait SdkLifecycle {
    fn start(&self, config: &SdkConfig) -> Result<()>;

    fn set_enabled(&self, enabled: bool) -> Result<()>;

    fn is_enabled(&self) -> Result<bool>;

    /// Hold packages locally instead of sending them.
    fn set_offline_mode(&self, enabled: bool) -> Result<()>;

    /// Push notification token.
    fn set_device_token(&self, token: &str) -> Result<()>;

    /// Report a URL the app was opened with (reattribution).
    fn app_will_open_url(&self, url: &str) -> Result<()>;

    /// Release packages held back by a delayed start.
    fn send_first_packages(&self) -> Result<()>;

    /// Integration-test hooks; never used in production builds.
    fn set_test_options(&self, options: &BTreeMap<String, String>) -> Result<()>;

    /// Host app moved to the background.
    fn on_pause(&self) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    /// Host app returned to the foreground.
    fn on_resume(&self) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }
}

/// Events, ad revenue, and subscriptions.
pub trait EventTracking {
    fn track_event(&self, event: &Event) -> Result<()>;

    /// Ad revenue as an opaque mediation-source payload.
    fn track_ad_revenue_raw(&self, _source: &str, _payload: &str) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    fn track_ad_revenue(&self, _ad_revenue: &AdRevenue) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    fn track_app_store_subscription(&self, _subscription: &AppStoreSubscription) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    fn track_play_store_subscription(&self, _subscription: &PlayStoreSubscription) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }
}

/// Parameters attached to every session package.
pub trait SessionParameters {
    fn add_session_partner_parameter(&self, key: &str, value: &str) -> Result<()>;
    fn add_session_callback_parameter(&self, key: &str, value: &str) -> Result<()>;
    fn remove_session_partner_parameter(&self, key: &str) -> Result<()>;
    fn remove_session_callback_parameter(&self, key: &str) -> Result<()>;
    fn reset_session_partner_parameters(&self) -> Result<()>;
    fn reset_session_callback_parameters(&self) -> Result<()>;
}

/// Identifiers and attribution known to the SDK. Getters return an empty
/// string while the value is not yet known.
pub trait DeviceIdentifiers {
    fn adid(&self) -> Result<String>;

    fn attribution(&self) -> Result<Option<Attribution>>;

    fn sdk_version(&self) -> Result<String>;

    /// iOS advertising identifier.
    fn idfa(&self) -> Result<String> {
        Err(BridgeError::PlatformUnavailable)
    }

    /// Windows advertising identifier.
    fn win_adid(&self) -> Result<String> {
        Err(BridgeError::PlatformUnavailable)
    }

    fn amazon_ad_id(&self) -> Result<String> {
        Err(BridgeError::PlatformUnavailable)
    }

    fn last_deeplink(&self) -> Result<String> {
        Err(BridgeError::PlatformUnavailable)
    }

    /// Ask for the Google Play advertising id. Delivered as `GoogleAdIdRead`.
    fn request_google_ad_id(&self) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    /// Install referrer override. Testing only.
    fn set_referrer(&self, _referrer: &str) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }
}

/// Consent, data sharing, and tracking authorization.
pub trait PrivacyControls {
    fn gdpr_forget_me(&self) -> Result<()>;

    fn disable_third_party_sharing(&self) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    fn track_third_party_sharing(&self, _sharing: &ThirdPartySharing) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    fn track_measurement_consent(&self, _consent: bool) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    /// Show the ATT prompt. Delivered as `AuthorizationStatus`.
    fn request_tracking_authorization(&self) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    fn check_for_new_att_status(&self) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    /// Current ATT status, `-1` when unknown.
    fn app_tracking_authorization_status(&self) -> Result<i32> {
        Err(BridgeError::PlatformUnavailable)
    }
}

/// SKAdNetwork conversion value updates.
pub trait SkAdNetwork {
    fn update_conversion_value(&self, _value: i32) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    /// Delivered as `SkadCompletion`.
    fn update_conversion_value_with_completion(&self, _value: i32) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    /// SKAdNetwork 4 update. Delivered as `Skad4Completion`.
    fn update_skad4_conversion_value(
        &self,
        _fine_value: i32,
        _coarse_value: &str,
        _lock_window: bool,
    ) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }
}

/// Server-side purchase verification. Results are delivered as
/// `PurchaseVerificationInfo`.
pub trait PurchaseVerification {
    fn verify_app_store_purchase(&self, _purchase: &AppStorePurchase) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }

    fn verify_play_store_purchase(&self, _purchase: &PlayStorePurchase) -> Result<()> {
        Err(BridgeError::PlatformUnavailable)
    }
}
