// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform selection and the static operation support table.

use tallyport_core::Platform;

use crate::traits::PlatformBackend;

const ALL: &[Platform] = &[Platform::Ios, Platform::Android, Platform::Windows];
const MOBILE: &[Platform] = &[Platform::Ios, Platform::Android];
const IOS: &[Platform] = &[Platform::Ios];
const ANDROID: &[Platform] = &[Platform::Android];
const WINDOWS: &[Platform] = &[Platform::Windows];
const LIFECYCLE: &[Platform] = &[Platform::Android, Platform::Windows];

/// Every operation the dispatch facade exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Start,
    TrackEvent,
    SetEnabled,
    IsEnabled,
    SetOfflineMode,
    SetDeviceToken,
    GdprForgetMe,
    DisableThirdPartySharing,
    AppWillOpenUrl,
    SendFirstPackages,
    AddSessionPartnerParameter,
    AddSessionCallbackParameter,
    RemoveSessionPartnerParameter,
    RemoveSessionCallbackParameter,
    ResetSessionPartnerParameters,
    ResetSessionCallbackParameters,
    TrackAdRevenue,
    TrackAppStoreSubscription,
    TrackPlayStoreSubscription,
    TrackThirdPartySharing,
    TrackMeasurementConsent,
    RequestTrackingAuthorization,
    UpdateConversionValue,
    CheckForNewAttStatus,
    AppTrackingAuthorizationStatus,
    Adid,
    Attribution,
    WinAdid,
    Idfa,
    SdkVersion,
    SetReferrer,
    GoogleAdId,
    AmazonAdId,
    LastDeeplink,
    VerifyAppStorePurchase,
    VerifyPlayStorePurchase,
    SetTestOptions,
    Lifecycle,
}

impl Operation {
    /// Platforms whose native SDK implements this operation.
    pub fn platforms(&self) -> &'static [Platform] {
        match self {
            Self::Start
            | Self::TrackEvent
            | Self::SetEnabled
            | Self::IsEnabled
            | Self::SetOfflineMode
            | Self::SetDeviceToken
            | Self::GdprForgetMe
            | Self::AppWillOpenUrl
            | Self::SendFirstPackages
            | Self::AddSessionPartnerParameter
            | Self::AddSessionCallbackParameter
            | Self::RemoveSessionPartnerParameter
            | Self::RemoveSessionCallbackParameter
            | Self::ResetSessionPartnerParameters
            | Self::ResetSessionCallbackParameters
            | Self::Adid
            | Self::Attribution
            | Self::SdkVersion
            | Self::SetTestOptions => ALL,

            Self::DisableThirdPartySharing
            | Self::TrackAdRevenue
            | Self::TrackThirdPartySharing
            | Self::TrackMeasurementConsent => MOBILE,

            Self::TrackAppStoreSubscription
            | Self::RequestTrackingAuthorization
            | Self::UpdateConversionValue
            | Self::CheckForNewAttStatus
            | Self::AppTrackingAuthorizationStatus
            | Self::Idfa
            | Self::LastDeeplink
            | Self::VerifyAppStorePurchase => IOS,

            Self::TrackPlayStoreSubscription
            | Self::SetReferrer
            | Self::GoogleAdId
            | Self::AmazonAdId
            | Self::VerifyPlayStorePurchase => ANDROID,

            Self::WinAdid => WINDOWS,

            Self::Lifecycle => LIFECYCLE,
        }
    }

    pub fn is_supported_on(&self, platform: Platform) -> bool {
        self.platforms().contains(&platform)
    }

    /// Human-readable list such as "iOS and Android".
    pub fn restriction(&self) -> String {
        let names: Vec<String> = self.platforms().iter().map(ToString::to_string).collect();
        match names.as_slice() {
            [] => "no platform".to_string(),
            [only] => only.clone(),
            [init @ .., last] => format!("{} and {last}", init.join(", ")),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Holds the one backend chosen for the process lifetime.
///
/// There is no way to swap the backend after construction; a selector built
/// without one resolves to `None` forever.
pub struct PlatformSelector {
    platform: Platform,
    backend: Option<Box<dyn PlatformBackend>>,
}

impl PlatformSelector {
    /// Select the native backend for the compilation target.
    pub fn native() -> Self {
        let platform = Platform::current();
        let backend = crate::native_backend();
        if backend.is_none() && platform.is_native() {
            tracing::warn!(%platform, "native SDK unavailable, bridge will run inert");
        }
        Self {
            platform: if backend.is_some() { platform } else { Platform::Unsupported },
            backend,
        }
    }

    /// Use a caller-supplied backend, e.g. one provided by an embedding host.
    pub fn with_backend(backend: Box<dyn PlatformBackend>) -> Self {
        Self {
            platform: backend.platform(),
            backend: Some(backend),
        }
    }

    /// A selector with no backend at all.
    pub fn unsupported() -> Self {
        Self {
            platform: Platform::Unsupported,
            backend: None,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The active backend, or `None` on editor/desktop builds.
    pub fn resolve(&self) -> Option<&dyn PlatformBackend> {
        self.backend.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restriction_text() {
        assert_eq!(Operation::Idfa.restriction(), "iOS");
        assert_eq!(Operation::TrackAdRevenue.restriction(), "iOS and Android");
        assert_eq!(Operation::Adid.restriction(), "iOS, Android and Windows");
    }

    #[test]
    fn support_matrix() {
        assert!(Operation::WinAdid.is_supported_on(Platform::Windows));
        assert!(!Operation::WinAdid.is_supported_on(Platform::Ios));
        assert!(Operation::VerifyPlayStorePurchase.is_supported_on(Platform::Android));
        assert!(!Operation::VerifyAppStorePurchase.is_supported_on(Platform::Android));
        assert!(!Operation::Lifecycle.is_supported_on(Platform::Ios));
        assert!(!Operation::Start.is_supported_on(Platform::Unsupported));
    }

    #[test]
    fn unsupported_selector_resolves_none() {
        let selector = PlatformSelector::unsupported();
        assert!(selector.resolve().is_none());
        assert_eq!(selector.platform(), Platform::Unsupported);
    }
}
