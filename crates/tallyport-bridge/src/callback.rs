// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Callback kinds, application handles, and the payloads they receive.
//
// A handle and a payload of the same kind always travel as matching enum
// variants, so the registry can never hand a payload to a handle expecting a
// different shape.

use std::str::FromStr;
use std::sync::Arc;

use tallyport_core::{
    Attribution, EventFailure, EventSuccess, PurchaseVerificationInfo, SessionFailure,
    SessionSuccess, Skad4ConversionUpdate,
};

/// Application code reacting to one payload.
pub type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Wrap a closure as a [`Callback`].
pub fn callback<T, F>(f: F) -> Callback<T>
where
    F: Fn(T) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How long a registered handle stays in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Fires on every delivery until replaced.
    Persistent,
    /// Fires once, then the slot is emptied.
    OneShot,
}

/// Category of asynchronous result the bridge can relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CallbackKind {
    EventSuccess,
    EventFailure,
    SessionSuccess,
    SessionFailure,
    AttributionChanged,
    DeferredDeeplink,
    ConversionValueUpdated,
    Skad4ConversionValueUpdated,
    SkadCompletion,
    Skad4Completion,
    AuthorizationStatus,
    PurchaseVerificationInfo,
    GoogleAdIdRead,
}

impl CallbackKind {
    pub const ALL: [CallbackKind; 13] = [
        Self::EventSuccess,
        Self::EventFailure,
        Self::SessionSuccess,
        Self::SessionFailure,
        Self::AttributionChanged,
        Self::DeferredDeeplink,
        Self::ConversionValueUpdated,
        Self::Skad4ConversionValueUpdated,
        Self::SkadCompletion,
        Self::Skad4Completion,
        Self::AuthorizationStatus,
        Self::PurchaseVerificationInfo,
        Self::GoogleAdIdRead,
    ];

    pub fn retention(&self) -> Retention {
        match self {
            Self::EventSuccess
            | Self::EventFailure
            | Self::SessionSuccess
            | Self::SessionFailure
            | Self::AttributionChanged
            | Self::DeferredDeeplink
            | Self::ConversionValueUpdated
            | Self::Skad4ConversionValueUpdated => Retention::Persistent,
            Self::SkadCompletion
            | Self::Skad4Completion
            | Self::AuthorizationStatus
            | Self::PurchaseVerificationInfo
            | Self::GoogleAdIdRead => Retention::OneShot,
        }
    }

    /// Multi-slot kinds queue every registration; all others keep only the
    /// latest one.
    pub fn is_multi_slot(&self) -> bool {
        matches!(self, Self::AuthorizationStatus | Self::GoogleAdIdRead)
    }

    /// Slot index inside the registry.
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }

    /// Wire name used by native code when delivering a result.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EventSuccess => "eventSuccess",
            Self::EventFailure => "eventFailure",
            Self::SessionSuccess => "sessionSuccess",
            Self::SessionFailure => "sessionFailure",
            Self::AttributionChanged => "attributionChanged",
            Self::DeferredDeeplink => "deferredDeeplink",
            Self::ConversionValueUpdated => "conversionValueUpdated",
            Self::Skad4ConversionValueUpdated => "skad4ConversionValueUpdated",
            Self::SkadCompletion => "skadCompletion",
            Self::Skad4Completion => "skad4Completion",
            Self::AuthorizationStatus => "authorizationStatus",
            Self::PurchaseVerificationInfo => "purchaseVerificationInfo",
            Self::GoogleAdIdRead => "googleAdIdRead",
        }
    }
}

impl std::fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CallbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown callback kind {s:?}"))
    }
}

/// A registered application handle, tagged with its kind.
#[derive(Clone)]
pub enum CallbackHandle {
    EventSuccess(Callback<EventSuccess>),
    EventFailure(Callback<EventFailure>),
    SessionSuccess(Callback<SessionSuccess>),
    SessionFailure(Callback<SessionFailure>),
    AttributionChanged(Callback<Attribution>),
    DeferredDeeplink(Callback<String>),
    ConversionValueUpdated(Callback<i32>),
    Skad4ConversionValueUpdated(Callback<Skad4ConversionUpdate>),
    SkadCompletion(Callback<String>),
    Skad4Completion(Callback<String>),
    AuthorizationStatus(Callback<i32>),
    PurchaseVerificationInfo(Callback<PurchaseVerificationInfo>),
    GoogleAdIdRead(Callback<String>),
}

impl CallbackHandle {
    pub fn kind(&self) -> CallbackKind {
        match self {
            Self::EventSuccess(_) => CallbackKind::EventSuccess,
            Self::EventFailure(_) => CallbackKind::EventFailure,
            Self::SessionSuccess(_) => CallbackKind::SessionSuccess,
            Self::SessionFailure(_) => CallbackKind::SessionFailure,
            Self::AttributionChanged(_) => CallbackKind::AttributionChanged,
            Self::DeferredDeeplink(_) => CallbackKind::DeferredDeeplink,
            Self::ConversionValueUpdated(_) => CallbackKind::ConversionValueUpdated,
            Self::Skad4ConversionValueUpdated(_) => CallbackKind::Skad4ConversionValueUpdated,
            Self::SkadCompletion(_) => CallbackKind::SkadCompletion,
            Self::Skad4Completion(_) => CallbackKind::Skad4Completion,
            Self::AuthorizationStatus(_) => CallbackKind::AuthorizationStatus,
            Self::PurchaseVerificationInfo(_) => CallbackKind::PurchaseVerificationInfo,
            Self::GoogleAdIdRead(_) => CallbackKind::GoogleAdIdRead,
        }
    }

    /// Call the handle with `payload`. Returns false, without calling, when
    /// the payload belongs to another kind.
    pub(crate) fn invoke(&self, payload: &Payload) -> bool {
        match (self, payload) {
            (Self::EventSuccess(f), Payload::EventSuccess(p)) => f(p.clone()),
            (Self::EventFailure(f), Payload::EventFailure(p)) => f(p.clone()),
            (Self::SessionSuccess(f), Payload::SessionSuccess(p)) => f(p.clone()),
            (Self::SessionFailure(f), Payload::SessionFailure(p)) => f(p.clone()),
            (Self::AttributionChanged(f), Payload::AttributionChanged(p)) => f(p.clone()),
            (Self::DeferredDeeplink(f), Payload::DeferredDeeplink(p)) => f(p.clone()),
            (Self::ConversionValueUpdated(f), Payload::ConversionValueUpdated(p)) => f(*p),
            (Self::Skad4ConversionValueUpdated(f), Payload::Skad4ConversionValueUpdated(p)) => {
                f(p.clone())
            }
            (Self::SkadCompletion(f), Payload::SkadCompletion(p)) => f(p.clone()),
            (Self::Skad4Completion(f), Payload::Skad4Completion(p)) => f(p.clone()),
            (Self::AuthorizationStatus(f), Payload::AuthorizationStatus(p)) => f(*p),
            (Self::PurchaseVerificationInfo(f), Payload::PurchaseVerificationInfo(p)) => {
                f(p.clone())
            }
            (Self::GoogleAdIdRead(f), Payload::GoogleAdIdRead(p)) => f(p.clone()),
            _ => return false,
        }
        true
    }
}

impl std::fmt::Debug for CallbackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CallbackHandle").field(&self.kind()).finish()
    }
}

/// A decoded native result, tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    EventSuccess(EventSuccess),
    EventFailure(EventFailure),
    SessionSuccess(SessionSuccess),
    SessionFailure(SessionFailure),
    AttributionChanged(Attribution),
    DeferredDeeplink(String),
    ConversionValueUpdated(i32),
    Skad4ConversionValueUpdated(Skad4ConversionUpdate),
    /// Error message from the native SKAdNetwork call, empty on success.
    SkadCompletion(String),
    Skad4Completion(String),
    AuthorizationStatus(i32),
    PurchaseVerificationInfo(PurchaseVerificationInfo),
    GoogleAdIdRead(String),
}

impl Payload {
    pub fn kind(&self) -> CallbackKind {
        match self {
            Self::EventSuccess(_) => CallbackKind::EventSuccess,
            Self::EventFailure(_) => CallbackKind::EventFailure,
            Self::SessionSuccess(_) => CallbackKind::SessionSuccess,
            Self::SessionFailure(_) => CallbackKind::SessionFailure,
            Self::AttributionChanged(_) => CallbackKind::AttributionChanged,
            Self::DeferredDeeplink(_) => CallbackKind::DeferredDeeplink,
            Self::ConversionValueUpdated(_) => CallbackKind::ConversionValueUpdated,
            Self::Skad4ConversionValueUpdated(_) => CallbackKind::Skad4ConversionValueUpdated,
            Self::SkadCompletion(_) => CallbackKind::SkadCompletion,
            Self::Skad4Completion(_) => CallbackKind::Skad4Completion,
            Self::AuthorizationStatus(_) => CallbackKind::AuthorizationStatus,
            Self::PurchaseVerificationInfo(_) => CallbackKind::PurchaseVerificationInfo,
            Self::GoogleAdIdRead(_) => CallbackKind::GoogleAdIdRead,
        }
    }
}
