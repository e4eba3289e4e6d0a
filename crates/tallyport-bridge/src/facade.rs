// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dispatch facade: the one API application code calls.
//
// Every operation checks the selected backend and the support table, then
// validates its arguments, registers any callback, and forwards. Nothing
// here panics or returns an error: each failure is logged and the
// operation's documented default is returned.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use tallyport_core::error::Result;
use tallyport_core::{
    AdRevenue, AppStorePurchase, AppStoreSubscription, Attribution, Event, Platform,
    PlayStorePurchase, PlayStoreSubscription, PurchaseVerificationInfo, ThirdPartySharing,
};

use crate::callback::{CallbackHandle, CallbackKind, Retention, callback};
use crate::config::TrackerConfig;
use crate::ffi;
use crate::registry::CallbackRegistry;
use crate::relay::InboundRelay;
use crate::selector::{Operation, PlatformSelector};
use crate::traits::*;

/// Facade over the native attribution SDK of the running platform.
pub struct Bridge {
    selector: PlatformSelector,
    registry: Arc<CallbackRegistry>,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge {
    /// Bridge to the native SDK of the compilation target, or an inert
    /// bridge where there is none.
    pub fn new() -> Self {
        Self::from_selector(PlatformSelector::native())
    }

    /// Bridge to a caller-supplied backend.
    pub fn with_backend(backend: impl PlatformBackend + 'static) -> Self {
        Self::from_selector(PlatformSelector::with_backend(Box::new(backend)))
    }

    /// Bridge with no backend; every operation returns its default.
    pub fn unsupported() -> Self {
        Self::from_selector(PlatformSelector::unsupported())
    }

    fn from_selector(selector: PlatformSelector) -> Self {
        Self {
            selector,
            registry: Arc::new(CallbackRegistry::new()),
        }
    }

    pub fn platform(&self) -> Platform {
        self.selector.platform()
    }

    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    /// A relay delivering into this bridge's registry.
    pub fn relay(&self) -> InboundRelay {
        InboundRelay::new(self.registry.clone())
    }

    /// Route results arriving through `tallyport_deliver` and the JNI entry
    /// point into this bridge. Only one bridge per process can be the target;
    /// returns false if another already is.
    pub fn install_native_relay(&self) -> bool {
        let installed = ffi::install(self.relay());
        if !installed {
            warn!("native relay already installed, keeping the existing one");
        }
        installed
    }

    fn active(&self, op: Operation) -> Option<&dyn PlatformBackend> {
        let Some(backend) = self.selector.resolve() else {
            debug!(operation = %op, "no native SDK on this platform, call ignored");
            return None;
        };
        let platform = self.selector.platform();
        if !op.is_supported_on(platform) {
            warn!(
                operation = %op,
                %platform,
                "{op} is only supported on {}",
                op.restriction()
            );
            return None;
        }
        Some(backend)
    }

    fn report(op: Operation, result: Result<()>) {
        if let Err(e) = result {
            warn!(operation = %op, error = %e, "native call failed");
        }
    }

    fn forward(&self, op: Operation, call: impl FnOnce(&dyn PlatformBackend) -> Result<()>) {
        if let Some(backend) = self.active(op) {
            Self::report(op, call(backend));
        }
    }

    fn query<T>(
        &self,
        op: Operation,
        default: T,
        call: impl FnOnce(&dyn PlatformBackend) -> Result<T>,
    ) -> T {
        let Some(backend) = self.active(op) else {
            return default;
        };
        match call(backend) {
            Ok(value) => value,
            Err(e) => {
                warn!(operation = %op, error = %e, "native query failed, using default");
                default
            }
        }
    }

    fn rejects(op: Operation, missing: &[&'static str]) -> bool {
        if missing.is_empty() {
            return false;
        }
        warn!(operation = %op, ?missing, "required fields missing, call ignored");
        true
    }

    // -- lifecycle ----------------------------------------------------------

    /// Register the configured delegates and start the SDK.
    ///
    /// Every delegate slot is reset from `config`: a delegate registered by an
    /// earlier start and absent now is dropped.
    pub fn start(&self, config: &TrackerConfig) {
        let op = Operation::Start;
        let Some(backend) = self.active(op) else {
            return;
        };
        if let Err(e) = config.sdk.validate() {
            warn!(operation = %op, error = %e, "invalid config, SDK not started");
            return;
        }
        for kind in CallbackKind::ALL
            .into_iter()
            .filter(|k| k.retention() == Retention::Persistent)
        {
            self.registry.clear(kind);
        }
        for delegate in config.delegates() {
            self.registry.register(delegate.clone());
        }
        info!(
            platform = %self.platform(),
            environment = %config.sdk.environment,
            "starting attribution SDK"
        );
        Self::report(op, backend.start(&config.sdk));
    }

    /// Host start hook. Forwards the URL the app was opened with (Android
    /// only, other SDKs observe it themselves) and starts the SDK unless the
    /// config asks for a manual start.
    pub fn launch(&self, config: &TrackerConfig, opening_url: Option<&str>) {
        if self.selector.resolve().is_none() {
            debug!("no native SDK on this platform, launch ignored");
            return;
        }
        if self.platform() == Platform::Android {
            if let Some(url) = opening_url.filter(|u| !u.is_empty()) {
                self.app_will_open_url(url);
            }
        }
        if config.sdk.start_manually {
            debug!("manual start configured, waiting for start()");
            return;
        }
        self.start(config);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.forward(Operation::SetEnabled, |b| b.set_enabled(enabled));
    }

    pub fn is_enabled(&self) -> bool {
        self.query(Operation::IsEnabled, false, |b| b.is_enabled())
    }

    pub fn set_offline_mode(&self, enabled: bool) {
        self.forward(Operation::SetOfflineMode, |b| b.set_offline_mode(enabled));
    }

    pub fn set_device_token(&self, token: &str) {
        self.forward(Operation::SetDeviceToken, |b| b.set_device_token(token));
    }

    pub fn app_will_open_url(&self, url: &str) {
        let op = Operation::AppWillOpenUrl;
        let Some(backend) = self.active(op) else {
            return;
        };
        if Self::rejects(op, &empty(url, "url")) {
            return;
        }
        Self::report(op, backend.app_will_open_url(url));
    }

    pub fn send_first_packages(&self) {
        self.forward(Operation::SendFirstPackages, |b| b.send_first_packages());
    }

    pub fn set_test_options(&self, options: &BTreeMap<String, String>) {
        self.forward(Operation::SetTestOptions, |b| b.set_test_options(options));
    }

    /// Host app went to the background. No-op on iOS, whose SDK observes
    /// lifecycle notifications itself.
    pub fn on_pause(&self) {
        if self.platform() == Platform::Ios {
            return;
        }
        self.forward(Operation::Lifecycle, |b| b.on_pause());
    }

    /// Host app came back to the foreground. No-op on iOS.
    pub fn on_resume(&self) {
        if self.platform() == Platform::Ios {
            return;
        }
        self.forward(Operation::Lifecycle, |b| b.on_resume());
    }

    // -- tracking -----------------------------------------------------------

    pub fn track_event(&self, event: &Event) {
        let op = Operation::TrackEvent;
        let Some(backend) = self.active(op) else {
            return;
        };
        if Self::rejects(op, &event.missing_fields()) {
            return;
        }
        Self::report(op, backend.track_event(event));
    }

    /// Ad revenue as reported by a mediation SDK, passed through untouched.
    pub fn track_ad_revenue_raw(&self, source: &str, payload: &str) {
        let op = Operation::TrackAdRevenue;
        let Some(backend) = self.active(op) else {
            return;
        };
        if Self::rejects(op, &empty(source, "source")) {
            return;
        }
        Self::report(op, backend.track_ad_revenue_raw(source, payload));
    }

    pub fn track_ad_revenue(&self, ad_revenue: &AdRevenue) {
        let op = Operation::TrackAdRevenue;
        let Some(backend) = self.active(op) else {
            return;
        };
        if Self::rejects(op, &ad_revenue.missing_fields()) {
            return;
        }
        Self::report(op, backend.track_ad_revenue(ad_revenue));
    }

    pub fn track_app_store_subscription(&self, subscription: &AppStoreSubscription) {
        let op = Operation::TrackAppStoreSubscription;
        let Some(backend) = self.active(op) else {
            return;
        };
        if Self::rejects(op, &subscription.missing_fields()) {
            return;
        }
        Self::report(op, backend.track_app_store_subscription(subscription));
    }

    pub fn track_play_store_subscription(&self, subscription: &PlayStoreSubscription) {
        let op = Operation::TrackPlayStoreSubscription;
        let Some(backend) = self.active(op) else {
            return;
        };
        if Self::rejects(op, &subscription.missing_fields()) {
            return;
        }
        Self::report(op, backend.track_play_store_subscription(subscription));
    }

    // -- session parameters -------------------------------------------------

    pub fn add_session_partner_parameter(&self, key: &str, value: &str) {
        let op = Operation::AddSessionPartnerParameter;
        let Some(backend) = self.active(op) else {
            return;
        };
        if Self::rejects(op, &empty(key, "key")) {
            return;
        }
        Self::report(op, backend.add_session_partner_parameter(key, value));
    }

    pub fn add_session_callback_parameter(&self, key: &str, value: &str) {
        let op = Operation::AddSessionCallbackParameter;
        let Some(backend) = self.active(op) else {
            return;
        };
        if Self::rejects(op, &empty(key, "key")) {
            return;
        }
        Self::report(op, backend.add_session_callback_parameter(key, value));
    }

    pub fn remove_session_partner_parameter(&self, key: &str) {
        self.forward(Operation::RemoveSessionPartnerParameter, |b| {
            b.remove_session_partner_parameter(key)
        });
    }

    pub fn remove_session_callback_parameter(&self, key: &str) {
        self.forward(Operation::RemoveSessionCallbackParameter, |b| {
            b.remove_session_callback_parameter(key)
        });
    }

    pub fn reset_session_partner_parameters(&self) {
        self.forward(Operation::ResetSessionPartnerParameters, |b| {
            b.reset_session_partner_parameters()
        });
    }

    pub fn reset_session_callback_parameters(&self) {
        self.forward(Operation::ResetSessionCallbackParameters, |b| {
            b.reset_session_callback_parameters()
        });
    }

    // -- identifiers --------------------------------------------------------

    /// Adjust device id, empty until the first session was tracked.
    pub fn adid(&self) -> String {
        self.query(Operation::Adid, String::new(), |b| b.adid())
    }

    pub fn attribution(&self) -> Option<Attribution> {
        self.query(Operation::Attribution, None, |b| b.attribution())
    }

    pub fn sdk_version(&self) -> String {
        self.query(Operation::SdkVersion, String::new(), |b| b.sdk_version())
    }

    pub fn idfa(&self) -> String {
        self.query(Operation::Idfa, String::new(), |b| b.idfa())
    }

    pub fn win_adid(&self) -> String {
        self.query(Operation::WinAdid, String::new(), |b| b.win_adid())
    }

    pub fn amazon_ad_id(&self) -> String {
        self.query(Operation::AmazonAdId, String::new(), |b| b.amazon_ad_id())
    }

    pub fn last_deeplink(&self) -> String {
        self.query(Operation::LastDeeplink, String::new(), |b| b.last_deeplink())
    }

    /// Read the Google Play advertising id. `on_read` gets an empty string
    /// on iOS and Windows.
    pub fn google_ad_id(&self, on_read: impl Fn(String) + Send + Sync + 'static) {
        let op = Operation::GoogleAdId;
        if self.selector.resolve().is_none() {
            debug!(operation = %op, "no native SDK on this platform, call ignored");
            return;
        }
        let Some(backend) = self.active(op) else {
            on_read(String::new());
            return;
        };
        self.registry
            .register(CallbackHandle::GoogleAdIdRead(callback(on_read)));
        Self::report(op, backend.request_google_ad_id());
    }

    #[deprecated(note = "install referrers are read by the Android SDK itself")]
    pub fn set_referrer(&self, referrer: &str) {
        self.forward(Operation::SetReferrer, |b| b.set_referrer(referrer));
    }

    // -- privacy ------------------------------------------------------------

    pub fn gdpr_forget_me(&self) {
        self.forward(Operation::GdprForgetMe, |b| b.gdpr_forget_me());
    }

    pub fn disable_third_party_sharing(&self) {
        self.forward(Operation::DisableThirdPartySharing, |b| {
            b.disable_third_party_sharing()
        });
    }

    pub fn track_third_party_sharing(&self, sharing: &ThirdPartySharing) {
        self.forward(Operation::TrackThirdPartySharing, |b| {
            b.track_third_party_sharing(sharing)
        });
    }

    pub fn track_measurement_consent(&self, consent: bool) {
        self.forward(Operation::TrackMeasurementConsent, |b| {
            b.track_measurement_consent(consent)
        });
    }

    /// Show the App Tracking Transparency prompt. Every pending caller gets
    /// the same status once the user answers.
    pub fn request_tracking_authorization(&self, on_status: impl Fn(i32) + Send + Sync + 'static) {
        let op = Operation::RequestTrackingAuthorization;
        let Some(backend) = self.active(op) else {
            return;
        };
        self.registry
            .register(CallbackHandle::AuthorizationStatus(callback(on_status)));
        Self::report(op, backend.request_tracking_authorization());
    }

    pub fn check_for_new_att_status(&self) {
        self.forward(Operation::CheckForNewAttStatus, |b| b.check_for_new_att_status());
    }

    /// Current ATT status, or `-1` where unknown or unsupported.
    pub fn app_tracking_authorization_status(&self) -> i32 {
        self.query(Operation::AppTrackingAuthorizationStatus, -1, |b| {
            b.app_tracking_authorization_status()
        })
    }

    // -- SKAdNetwork --------------------------------------------------------

    pub fn update_conversion_value(&self, value: i32) {
        self.forward(Operation::UpdateConversionValue, |b| {
            b.update_conversion_value(value)
        });
    }

    /// `on_complete` receives the native error message, empty on success.
    pub fn update_conversion_value_with_completion(
        &self,
        value: i32,
        on_complete: impl Fn(String) + Send + Sync + 'static,
    ) {
        let op = Operation::UpdateConversionValue;
        let Some(backend) = self.active(op) else {
            return;
        };
        self.registry
            .register(CallbackHandle::SkadCompletion(callback(on_complete)));
        Self::report(op, backend.update_conversion_value_with_completion(value));
    }

    pub fn update_skad4_conversion_value(
        &self,
        fine_value: i32,
        coarse_value: &str,
        lock_window: bool,
        on_complete: impl Fn(String) + Send + Sync + 'static,
    ) {
        let op = Operation::UpdateConversionValue;
        let Some(backend) = self.active(op) else {
            return;
        };
        self.registry
            .register(CallbackHandle::Skad4Completion(callback(on_complete)));
        Self::report(
            op,
            backend.update_skad4_conversion_value(fine_value, coarse_value, lock_window),
        );
    }

    // -- purchase verification ----------------------------------------------

    pub fn verify_app_store_purchase(
        &self,
        purchase: &AppStorePurchase,
        on_result: impl Fn(PurchaseVerificationInfo) + Send + Sync + 'static,
    ) {
        let op = Operation::VerifyAppStorePurchase;
        let Some(backend) = self.active(op) else {
            return;
        };
        if Self::rejects(op, &purchase.missing_fields()) {
            return;
        }
        self.registry
            .register(CallbackHandle::PurchaseVerificationInfo(callback(on_result)));
        Self::report(op, backend.verify_app_store_purchase(purchase));
    }

    pub fn verify_play_store_purchase(
        &self,
        purchase: &PlayStorePurchase,
        on_result: impl Fn(PurchaseVerificationInfo) + Send + Sync + 'static,
    ) {
        let op = Operation::VerifyPlayStorePurchase;
        let Some(backend) = self.active(op) else {
            return;
        };
        if Self::rejects(op, &purchase.missing_fields()) {
            return;
        }
        self.registry
            .register(CallbackHandle::PurchaseVerificationInfo(callback(on_result)));
        Self::report(op, backend.verify_play_store_purchase(purchase));
    }
}

fn empty(value: &str, name: &'static str) -> Vec<&'static str> {
    if value.is_empty() { vec![name] } else { Vec::new() }
}
