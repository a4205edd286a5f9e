//! Client-side state synchronization core for Pulse
//!
//! Everything in this crate is transport-agnostic: the optimistic mutator,
//! the typed event bus and the badge counters only ever touch in-memory
//! state. The `pulse-client` crate wires them to the REST backend.

pub mod badge;
pub mod bus;
pub mod chat;
pub mod feed;
pub mod models;
pub mod optimistic;
pub mod stories;
pub mod toast;

pub mod prelude {
    pub use crate::badge::{BadgeCounter, BadgeKind, BadgeStore, SyncState};
    pub use crate::bus::{AppEvent, EventBus, Subscription, Topic};
    pub use crate::chat::{Conversation, DeliveryStatus, LocalMessage};
    pub use crate::feed::{FeedPager, Identified};
    pub use crate::models::*;
    pub use crate::optimistic::{
        ActionStatus, Authoritative, LocalState, Mutator, OptimisticAction, Resolution,
        TargetKey, ToggleField, ToggleState,
    };
    pub use crate::stories::SeenTracker;
    pub use crate::toast::{Toast, ToastLevel, ToastQueue, ToastSink};
}
