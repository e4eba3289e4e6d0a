// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Log output for the bridge's own diagnostics.

use tallyport_core::LogLevel;

/// Install a `tracing` subscriber filtered at `level`.
///
/// `RUST_LOG` takes precedence when set. Returns false, leaving things as
/// they are, if the host already installed a global subscriber.
pub fn init(level: LogLevel) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.filter_directive())),
        )
        .try_init()
        .is_ok()
}
