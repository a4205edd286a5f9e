//! Typed in-process event bus
//!
//! Decouples the component that performs a mutation from the components
//! that need to react to it (saved list refresh, follow buttons elsewhere on
//! screen, badge counters). Delivery is synchronous, in registration order,
//! and only reaches listeners that are subscribed at the time of the
//! publish. Nothing is buffered for late subscribers.
//!
//! Long-running async tasks can use [`EventBus::stream`] instead of a
//! callback; they receive every event published after the call.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::badge::BadgeKind;
use crate::models::{ChatId, CommentId, MessageId, PostId, StoryId, UserId};

/// Capacity of the async stream adapter. Slow stream readers skip ahead
/// (`RecvError::Lagged`) rather than block publishers.
const STREAM_CAPACITY: usize = 256;

/// Coarse event category, used to filter subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Saved,
    Likes,
    Follow,
    Block,
    Comments,
    Stories,
    Badges,
    Messages,
    Session,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A post was bookmarked or removed from bookmarks
    SavedUpdated { post_id: PostId, saved: bool },
    PostLiked {
        post_id: PostId,
        liked: bool,
        likes_count: Option<u64>,
    },
    FollowUpdated {
        user_id: UserId,
        following: bool,
        requested: bool,
    },
    BlockUpdated { user_id: UserId, blocked: bool },
    CommentAdded {
        post_id: PostId,
        comment_id: CommentId,
    },
    StorySeen { story_id: StoryId, author_id: UserId },
    /// Authoritative count from the server
    BadgeSet { kind: BadgeKind, count: u64 },
    /// Local drift applied without server confirmation
    BadgeAdjusted {
        kind: BadgeKind,
        delta: i64,
        count: u64,
    },
    MessageSent {
        chat_id: ChatId,
        message_id: MessageId,
    },
    ChatRead { chat_id: ChatId },
    SessionChanged { logged_in: bool },
}

impl AppEvent {
    pub fn topic(&self) -> Topic {
        match self {
            AppEvent::SavedUpdated { .. } => Topic::Saved,
            AppEvent::PostLiked { .. } => Topic::Likes,
            AppEvent::FollowUpdated { .. } => Topic::Follow,
            AppEvent::BlockUpdated { .. } => Topic::Block,
            AppEvent::CommentAdded { .. } => Topic::Comments,
            AppEvent::StorySeen { .. } => Topic::Stories,
            AppEvent::BadgeSet { .. } | AppEvent::BadgeAdjusted { .. } => Topic::Badges,
            AppEvent::MessageSent { .. } | AppEvent::ChatRead { .. } => Topic::Messages,
            AppEvent::SessionChanged { .. } => Topic::Session,
        }
    }
}

type Handler = Arc<dyn Fn(&AppEvent) + Send + Sync>;

struct Listener {
    id: u64,
    topic: Option<Topic>,
    handler: Handler,
}

struct BusInner {
    next_id: AtomicU64,
    listeners: Mutex<Vec<Listener>>,
    stream: broadcast::Sender<AppEvent>,
}

/// Cloneable handle to the bus; all clones share one listener list
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (stream, _) = broadcast::channel(STREAM_CAPACITY);
        Self {
            inner: Arc::new(BusInner {
                next_id: AtomicU64::new(0),
                listeners: Mutex::new(Vec::new()),
                stream,
            }),
        }
    }

    /// Deliver an event to every current listener
    ///
    /// Handlers run on the caller's thread, outside the listener lock, so a
    /// handler may publish, subscribe or drop its own subscription. A
    /// listener added during delivery does not receive the event being
    /// delivered, and one removed during delivery is not called for it.
    pub fn publish(&self, event: AppEvent) {
        let topic = event.topic();
        let handlers: Vec<(u64, Handler)> = self
            .inner
            .listeners
            .lock()
            .iter()
            .filter(|l| l.topic.map_or(true, |t| t == topic))
            .map(|l| (l.id, l.handler.clone()))
            .collect();

        tracing::trace!(?topic, listeners = handlers.len(), "publishing event");

        for (id, handler) in handlers {
            if self.is_registered(id) {
                handler(&event);
            }
        }

        if self.inner.stream.receiver_count() > 0 {
            // only fails when every receiver is gone, which is a drop anyway
            let _ = self.inner.stream.send(event);
        }
    }

    /// Listen to every event until the returned guard is dropped
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(handler))
    }

    /// Listen to events of a single topic until the returned guard is dropped
    pub fn subscribe_topic<F>(&self, topic: Topic, handler: F) -> Subscription
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        self.register(Some(topic), Arc::new(handler))
    }

    /// Async receiver for every event published from now on
    pub fn stream(&self) -> broadcast::Receiver<AppEvent> {
        self.inner.stream.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    fn is_registered(&self, id: u64) -> bool {
        self.inner.listeners.lock().iter().any(|l| l.id == id)
    }

    fn register(&self, topic: Option<Topic>, handler: Handler) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push(Listener { id, topic, handler });
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }
}

/// Keeps a listener attached; dropping it detaches the listener
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    bus: Weak<BusInner>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.listeners.lock().retain(|l| l.id != self.id);
        }
    }
}
