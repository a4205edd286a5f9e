//! Badge counters (unread notifications, unread messages)
//!
//! Each counter is adjusted locally as the user acts and overwritten
//! whenever an authoritative count arrives from the server. Between two
//! authoritative sets the value is allowed to drift; the next set wins.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::bus::{AppEvent, EventBus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
    Notifications,
    Messages,
}

impl BadgeKind {
    pub const ALL: [BadgeKind; 2] = [BadgeKind::Notifications, BadgeKind::Messages];
}

impl fmt::Display for BadgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadgeKind::Notifications => write!(f, "notifications"),
            BadgeKind::Messages => write!(f, "messages"),
        }
    }
}

/// Reconciliation state of a single counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    /// No authoritative count seen yet
    #[default]
    Uninitialized,
    /// Value equals the last authoritative count
    Synced,
    /// Locally adjusted since the last authoritative count
    Stale,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BadgeCounter {
    value: u64,
    state: SyncState,
}

impl BadgeCounter {
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    fn set(&mut self, value: u64) {
        self.value = value;
        self.state = SyncState::Synced;
    }

    /// Returns the delta actually applied after saturation
    fn adjust(&mut self, delta: i64) -> i64 {
        let before = self.value;
        self.value = if delta >= 0 {
            self.value.saturating_add(delta.unsigned_abs())
        } else {
            self.value.saturating_sub(delta.unsigned_abs())
        };
        self.state = SyncState::Stale;
        if delta >= 0 {
            i64::try_from(self.value - before).unwrap_or(i64::MAX)
        } else {
            -i64::try_from(before - self.value).unwrap_or(i64::MAX)
        }
    }
}

/// Process-wide set of badge counters
#[derive(Debug, Clone)]
pub struct BadgeStore {
    counters: Arc<Mutex<HashMap<BadgeKind, BadgeCounter>>>,
    bus: EventBus,
}

impl BadgeStore {
    pub fn new(bus: EventBus) -> Self {
        Self {
            counters: Arc::new(Mutex::new(HashMap::new())),
            bus,
        }
    }

    pub fn get(&self, kind: BadgeKind) -> u64 {
        self.counter(kind).value
    }

    pub fn counter(&self, kind: BadgeKind) -> BadgeCounter {
        self.counters
            .lock()
            .get(&kind)
            .copied()
            .unwrap_or_default()
    }

    /// Apply an authoritative count, discarding any local drift
    pub fn set(&self, kind: BadgeKind, count: u64) {
        self.counters.lock().entry(kind).or_default().set(count);
        tracing::debug!(%kind, count, "badge set");
        self.bus.publish(AppEvent::BadgeSet { kind, count });
    }

    pub fn increment(&self, kind: BadgeKind, delta: u64) -> u64 {
        self.adjust(kind, i64::try_from(delta).unwrap_or(i64::MAX)).0
    }

    /// Decrement, saturating at zero
    pub fn decrement(&self, kind: BadgeKind, delta: u64) -> u64 {
        self.adjust(kind, -i64::try_from(delta).unwrap_or(i64::MAX)).0
    }

    /// Decrement by at most `delta` and return how much was removed.
    ///
    /// Adding the returned amount back undoes the call exactly, even when
    /// the counter held less than `delta`.
    pub fn take(&self, kind: BadgeKind, delta: u64) -> u64 {
        self.adjust(kind, -i64::try_from(delta).unwrap_or(i64::MAX))
            .1
            .unsigned_abs()
    }

    fn adjust(&self, kind: BadgeKind, delta: i64) -> (u64, i64) {
        let (count, applied) = {
            let mut counters = self.counters.lock();
            let counter = counters.entry(kind).or_default();
            let applied = counter.adjust(delta);
            (counter.value, applied)
        };
        tracing::debug!(%kind, delta = applied, count, "badge adjusted");
        self.bus.publish(AppEvent::BadgeAdjusted {
            kind,
            delta: applied,
            count,
        });
        (count, applied)
    }

    /// Fetch the authoritative count and apply it
    ///
    /// On fetch failure the counter keeps both its value and its state.
    pub async fn reconcile<F, E>(&self, kind: BadgeKind, fetch: F) -> Result<u64, E>
    where
        F: Future<Output = Result<u64, E>>,
        E: fmt::Display,
    {
        match fetch.await {
            Ok(count) => {
                self.set(kind, count);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(%kind, error = %e, "badge reconciliation failed");
                Err(e)
            }
        }
    }
}
