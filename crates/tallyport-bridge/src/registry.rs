// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Callback registry: where application handles wait for native results.
//
// Every kind owns its own mutex, so a registration on the main thread and a
// delivery on a native callback thread serialize only when they touch the
// same kind. Handles are always invoked after the lock is released; an
// application callback may therefore register again without deadlocking.
// A panicking handle is logged and skipped; the handles after it still run.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, warn};

use crate::callback::{CallbackHandle, CallbackKind, Payload, Retention};

/// Process-wide store of registered callback handles.
///
/// Created empty, usually once per [`Bridge`](crate::Bridge) and shared with
/// the [`InboundRelay`](crate::InboundRelay) through an `Arc`. Registrations
/// live until they fire (one-shot kinds), are replaced, are cleared, or the
/// registry is dropped.
pub struct CallbackRegistry {
    /// One slot per kind, indexed by `CallbackKind::index`. Single-slot kinds
    /// hold at most one handle.
    slots: Vec<Mutex<Vec<CallbackHandle>>>,
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            slots: CallbackKind::ALL.iter().map(|_| Mutex::new(Vec::new())).collect(),
        }
    }

    fn slot(&self, kind: CallbackKind) -> MutexGuard<'_, Vec<CallbackHandle>> {
        // The critical sections below never run application code, so a
        // poisoned slot still holds a consistent Vec.
        self.slots[kind.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `handle` under its kind.
    ///
    /// Single-slot kinds keep only the newest handle; the previous one is
    /// dropped without being invoked. Multi-slot kinds append.
    pub fn register(&self, handle: CallbackHandle) {
        let kind = handle.kind();
        let mut slot = self.slot(kind);
        if kind.is_multi_slot() {
            slot.push(handle);
            debug!(%kind, queued = slot.len(), "callback queued");
        } else {
            if !slot.is_empty() {
                debug!(%kind, "replacing registered callback");
            }
            slot.clear();
            slot.push(handle);
        }
    }

    /// Invoke every handle registered for the payload's kind, in registration
    /// order, and apply the kind's retention policy.
    ///
    /// Returns the number of handles invoked, counting any that panicked.
    /// Zero means nothing was registered, which is logged and otherwise
    /// ignored.
    pub fn fire(&self, payload: Payload) -> usize {
        let kind = payload.kind();
        let handles = {
            let mut slot = self.slot(kind);
            match kind.retention() {
                Retention::Persistent => slot.clone(),
                Retention::OneShot => std::mem::take(&mut *slot),
            }
        };

        if handles.is_empty() {
            debug!(%kind, "no callback registered, dropping native result");
            return 0;
        }

        let mut invoked = 0;
        for handle in &handles {
            match catch_unwind(AssertUnwindSafe(|| handle.invoke(&payload))) {
                Ok(true) => invoked += 1,
                Ok(false) => {
                    warn!(%kind, handle = ?handle, "callback does not accept this payload")
                }
                Err(_) => {
                    error!(%kind, "application callback panicked");
                    invoked += 1;
                }
            }
        }
        invoked
    }

    pub fn is_registered(&self, kind: CallbackKind) -> bool {
        !self.slot(kind).is_empty()
    }

    /// Number of handles currently waiting under `kind`.
    pub fn pending(&self, kind: CallbackKind) -> usize {
        self.slot(kind).len()
    }

    /// Drop every handle registered under `kind` without invoking it.
    pub fn clear(&self, kind: CallbackKind) {
        self.slot(kind).clear();
    }

    pub fn clear_all(&self) {
        for kind in CallbackKind::ALL {
            self.clear(kind);
        }
    }
}
