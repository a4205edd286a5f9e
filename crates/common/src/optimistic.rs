//! Optimistic toggles with rollback
//!
//! A toggle (like, save, follow, block) is applied to [`LocalState`] the
//! moment the user acts, before the server answers. The resulting
//! [`OptimisticAction`] records the previous value and is resolved exactly
//! once:
//!
//! ```text
//! Idle --begin/begin_set--> Pending --commit--> Committed
//!                                  \--rollback-> RolledBack
//! ```
//!
//! A commit overwrites local state with whatever authoritative values the
//! server returned; a rollback restores the recorded previous value.
//! Resolving consumes the action, so it cannot be resolved twice. An action
//! dropped while still pending is rolled back.
//!
//! Overlapping actions on the same target are not serialized. Each one
//! writes its own outcome when it settles, so the last to settle wins.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::toast::{Toast, ToastSink};

/// Which boolean of a target entity a toggle changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleField {
    Liked,
    Saved,
    Following,
    /// Outstanding follow request to a private account
    FollowRequested,
    Blocked,
}

impl fmt::Display for ToggleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleField::Liked => write!(f, "liked"),
            ToggleField::Saved => write!(f, "saved"),
            ToggleField::Following => write!(f, "following"),
            ToggleField::FollowRequested => write!(f, "follow_requested"),
            ToggleField::Blocked => write!(f, "blocked"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetKey {
    pub id: String,
    pub field: ToggleField,
}

impl TargetKey {
    pub fn new(id: impl AsRef<str>, field: ToggleField) -> Self {
        Self {
            id: id.as_ref().to_string(),
            field,
        }
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.field)
    }
}

/// Displayed state of one toggle, with the counter that moves with it
/// (likes count for `Liked`), if any
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub active: bool,
    pub count: Option<u64>,
}

impl ToggleState {
    pub fn new(active: bool) -> Self {
        Self {
            active,
            count: None,
        }
    }

    pub fn with_count(active: bool, count: u64) -> Self {
        Self {
            active,
            count: Some(count),
        }
    }

    /// The optimistic guess for flipping this toggle
    pub fn toggled(self) -> Self {
        let active = !self.active;
        let count = self.count.map(|c| {
            if active {
                c.saturating_add(1)
            } else {
                c.saturating_sub(1)
            }
        });
        Self { active, count }
    }
}

/// Values the server reported for a toggle. Missing values keep the
/// optimistic guess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Authoritative {
    pub active: Option<bool>,
    pub count: Option<u64>,
}

impl Authoritative {
    pub fn active(active: bool) -> Self {
        Self {
            active: Some(active),
            count: None,
        }
    }

    pub fn with_count(mut self, count: Option<u64>) -> Self {
        self.count = count;
        self
    }

    fn apply(&self, proposed: ToggleState) -> ToggleState {
        ToggleState {
            active: self.active.unwrap_or(proposed.active),
            count: self.count.or(proposed.count),
        }
    }
}

/// Shared map of displayed toggle states
#[derive(Debug, Clone, Default)]
pub struct LocalState {
    inner: Arc<Mutex<HashMap<TargetKey, ToggleState>>>,
}

impl LocalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TargetKey) -> Option<ToggleState> {
        self.inner.lock().get(key).copied()
    }

    /// Record server-provided state (e.g. from a freshly fetched feed page)
    pub fn seed(&self, key: TargetKey, state: ToggleState) {
        self.inner.lock().insert(key, state);
    }

    pub fn remove(&self, key: &TargetKey) -> Option<ToggleState> {
        self.inner.lock().remove(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    fn write(&self, key: &TargetKey, state: ToggleState) {
        self.inner.lock().insert(key.clone(), state);
    }

    /// Read the current state (or `fallback`) and write its flip atomically
    fn flip(&self, key: &TargetKey, fallback: ToggleState) -> (ToggleState, ToggleState) {
        let mut inner = self.inner.lock();
        let previous = inner.get(key).copied().unwrap_or(fallback);
        let proposed = previous.toggled();
        inner.insert(key.clone(), proposed);
        (previous, proposed)
    }

    /// Read the current state (or `fallback`) and write it with `active`
    /// forced, moving the count only when the flag actually changes
    fn force(
        &self,
        key: &TargetKey,
        active: bool,
        fallback: ToggleState,
    ) -> (ToggleState, ToggleState) {
        let mut inner = self.inner.lock();
        let previous = inner.get(key).copied().unwrap_or(fallback);
        let proposed = if previous.active == active {
            previous
        } else {
            previous.toggled()
        };
        inner.insert(key.clone(), proposed);
        (previous, proposed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Pending,
    Committed,
    RolledBack,
}

/// One in-flight optimistic mutation
#[derive(Debug)]
pub struct OptimisticAction {
    key: TargetKey,
    previous: ToggleState,
    proposed: ToggleState,
    status: ActionStatus,
    store: LocalState,
}

impl OptimisticAction {
    /// Flip `key` in `store` and start tracking the mutation
    ///
    /// `fallback` is used as the current state when the store has never
    /// seen this target.
    pub fn begin(store: &LocalState, key: TargetKey, fallback: ToggleState) -> Self {
        let (previous, proposed) = store.flip(&key, fallback);
        tracing::debug!(target_key = %key, ?previous, ?proposed, "optimistic toggle");
        Self::pending(store, key, previous, proposed)
    }

    /// Set `key` to `active` in `store` regardless of its current value
    ///
    /// For one-way mutations (cancelling a follow request) where flipping
    /// would guess wrong when the target is already in the wanted state.
    pub fn begin_set(
        store: &LocalState,
        key: TargetKey,
        active: bool,
        fallback: ToggleState,
    ) -> Self {
        let (previous, proposed) = store.force(&key, active, fallback);
        tracing::debug!(target_key = %key, ?previous, ?proposed, "optimistic set");
        Self::pending(store, key, previous, proposed)
    }

    fn pending(
        store: &LocalState,
        key: TargetKey,
        previous: ToggleState,
        proposed: ToggleState,
    ) -> Self {
        Self {
            key,
            previous,
            proposed,
            status: ActionStatus::Pending,
            store: store.clone(),
        }
    }

    pub fn key(&self) -> &TargetKey {
        &self.key
    }

    pub fn previous(&self) -> ToggleState {
        self.previous
    }

    pub fn proposed(&self) -> ToggleState {
        self.proposed
    }

    pub fn status(&self) -> ActionStatus {
        self.status
    }

    /// Server accepted the mutation; its values replace the guess
    pub fn commit(mut self, authoritative: Authoritative) -> Resolution {
        let state = authoritative.apply(self.proposed);
        self.store.write(&self.key, state);
        self.status = ActionStatus::Committed;
        tracing::debug!(target_key = %self.key, ?state, "optimistic toggle committed");
        self.resolution(state)
    }

    /// Server rejected the mutation; restore the previous state
    pub fn rollback(mut self) -> Resolution {
        let state = self.previous;
        self.store.write(&self.key, state);
        self.status = ActionStatus::RolledBack;
        tracing::debug!(target_key = %self.key, ?state, "optimistic toggle rolled back");
        self.resolution(state)
    }

    fn resolution(&self, state: ToggleState) -> Resolution {
        Resolution {
            key: self.key.clone(),
            previous: self.previous,
            state,
            status: self.status,
        }
    }
}

impl Drop for OptimisticAction {
    fn drop(&mut self) {
        if self.status == ActionStatus::Pending {
            tracing::warn!(target_key = %self.key, "pending optimistic toggle dropped, rolling back");
            self.store.write(&self.key, self.previous);
        }
    }
}

/// Outcome of a resolved action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub key: TargetKey,
    pub previous: ToggleState,
    /// State written to the store on resolution
    pub state: ToggleState,
    pub status: ActionStatus,
}

/// Starts optimistic actions and settles them against a server outcome,
/// emitting one toast per failure
#[derive(Debug, Clone)]
pub struct Mutator {
    store: LocalState,
    toasts: Arc<dyn ToastSink>,
}

impl Mutator {
    pub fn new(store: LocalState, toasts: Arc<dyn ToastSink>) -> Self {
        Self { store, toasts }
    }

    pub fn store(&self) -> &LocalState {
        &self.store
    }

    pub fn begin(&self, key: TargetKey, fallback: ToggleState) -> OptimisticAction {
        OptimisticAction::begin(&self.store, key, fallback)
    }

    pub fn begin_set(
        &self,
        key: TargetKey,
        active: bool,
        fallback: ToggleState,
    ) -> OptimisticAction {
        OptimisticAction::begin_set(&self.store, key, active, fallback)
    }

    /// Commit on success; on failure roll back, show `failure` once and
    /// hand the error back to the caller
    pub fn settle<E: fmt::Display>(
        &self,
        action: OptimisticAction,
        outcome: Result<Authoritative, E>,
        failure: &str,
    ) -> Result<Resolution, E> {
        match outcome {
            Ok(authoritative) => Ok(action.commit(authoritative)),
            Err(e) => {
                tracing::warn!(target_key = %action.key(), error = %e, "{}", failure);
                action.rollback();
                self.toasts.show(Toast::error(failure));
                Err(e)
            }
        }
    }
}
