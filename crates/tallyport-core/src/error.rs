// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Tallyport.
//
// None of these ever cross the native boundary. The dispatch facade and the
// inbound relay turn every error into a diagnostic plus a safe default.

use thiserror::Error;

/// Top-level error type for all Tallyport operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Inbound payloads --
    #[error("could not decode native payload: {0}")]
    Decode(String),

    // -- Outbound calls --
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("native backend error: {0}")]
    Backend(String),

    #[error("native library error: {0}")]
    NativeLibrary(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;
