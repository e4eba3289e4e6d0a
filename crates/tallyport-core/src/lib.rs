// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tallyport core: types, payloads, config, and errors shared by the bridge.

pub mod config;
pub mod error;
pub mod model;
pub mod payload;
pub mod types;

pub use config::{AppSecret, SdkConfig};
pub use error::{BridgeError, Result};
pub use model::*;
pub use payload::{
    Attribution, EventFailure, EventSuccess, PurchaseVerificationInfo, SessionFailure,
    SessionSuccess, Skad4ConversionUpdate,
};
pub use types::*;
