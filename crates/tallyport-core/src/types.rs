// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core enumerations shared by the configuration, the facade, and the native
// channels.

use serde::{Deserialize, Serialize};

/// Which attribution environment the native SDK reports to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Test traffic, kept apart from production statistics.
    #[default]
    Sandbox,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sandbox => write!(f, "sandbox"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Verbosity of the native SDK, also used to seed the Rust log filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Verbose,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Assert,
    /// No output at all. Native SDKs only honour this when the config was
    /// created with `allow_suppress_log_level`.
    Suppress,
}

impl LogLevel {
    /// `tracing-subscriber` filter directive for this level.
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Self::Verbose => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error | Self::Assert => "error",
            Self::Suppress => "off",
        }
    }
}

/// Endpoint selection strategy for the native SDK's network traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UrlStrategy {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "india")]
    India,
    #[serde(rename = "china")]
    China,
    #[serde(rename = "data-residency-eu")]
    DataResidencyEu,
    #[serde(rename = "data-residency-tr")]
    DataResidencyTr,
    #[serde(rename = "data-residency-us")]
    DataResidencyUs,
}

/// The closed set of runtime platforms the bridge knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Windows,
    /// Editor, preview, desktop, or CI: anything without a native SDK.
    Unsupported,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Unsupported
        }
    }

    /// Whether a native backend can exist for this platform at all.
    pub fn is_native(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ios => write!(f, "iOS"),
            Self::Android => write!(f, "Android"),
            Self::Windows => write!(f, "Windows"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}
