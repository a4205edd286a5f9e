//! The coordinator owning all client-side state
//!
//! A [`Pulse`] is created once per process and passed by reference to
//! whatever needs it. Clones share everything: one bus, one badge store,
//! one local toggle store and one bearer token.

use std::sync::Arc;

use common::badge::BadgeStore;
use common::bus::{AppEvent, EventBus};
use common::feed::{FeedPager, Identified};
use common::models::User;
use common::optimistic::{LocalState, Mutator};
use common::stories::SeenTracker;
use common::toast::{Toast, ToastSink};
use parking_lot::RwLock;

use crate::api::{ApiClient, ApiError};
use crate::services::{
    AuthService, ChatService, NotificationService, PostService, SettingsService, SocialService,
    StoryService,
};
use crate::session::{SessionError, SessionStore};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub struct Pulse {
    client: ApiClient,
    bus: EventBus,
    badges: BadgeStore,
    mutator: Mutator,
    seen: SeenTracker,
    toasts: Arc<dyn ToastSink>,
    session: Option<SessionStore>,
    current_user: Arc<RwLock<Option<User>>>,
    page_size: u32,
}

impl Pulse {
    pub fn new(client: ApiClient, toasts: Arc<dyn ToastSink>) -> Self {
        let bus = EventBus::new();
        Self {
            client,
            badges: BadgeStore::new(bus.clone()),
            mutator: Mutator::new(LocalState::new(), toasts.clone()),
            seen: SeenTracker::new(bus.clone()),
            bus,
            toasts,
            session: None,
            current_user: Arc::new(RwLock::new(None)),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Build from a loaded state directory, restoring any saved login
    pub fn from_state(state: &AppState, toasts: Arc<dyn ToastSink>) -> Result<Self, PulseError> {
        let client = ApiClient::with_options(&state.config.api_url()?, state.config.client_options())?;
        Ok(Self::new(client, toasts)
            .with_page_size(state.config.feed_page_size)
            .with_session(SessionStore::new(&state.session_path))?)
    }

    /// Persist logins to `store` and restore the one already saved there
    pub fn with_session(mut self, store: SessionStore) -> Result<Self, SessionError> {
        if let Some(saved) = store.load()? {
            tracing::debug!(session = ?saved, "restored session");
            self.client.set_token(Some(saved.token));
            *self.current_user.write() = saved.user;
        }
        self.session = Some(store);
        Ok(self)
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn badges(&self) -> &BadgeStore {
        &self.badges
    }

    pub fn mutator(&self) -> &Mutator {
        &self.mutator
    }

    pub fn local(&self) -> &LocalState {
        self.mutator.store()
    }

    pub fn seen(&self) -> &SeenTracker {
        &self.seen
    }

    pub fn session(&self) -> Option<&SessionStore> {
        self.session.as_ref()
    }

    pub fn current_user(&self) -> Option<User> {
        self.current_user.read().clone()
    }

    pub(crate) fn set_current_user(&self, user: Option<User>) {
        *self.current_user.write() = user;
    }

    /// A fresh pager sized from the configuration
    pub fn pager<T: Identified>(&self) -> FeedPager<T> {
        FeedPager::new(self.page_size)
    }

    pub(crate) fn toast(&self, toast: Toast) {
        self.toasts.show(toast);
    }

    pub(crate) fn publish(&self, event: AppEvent) {
        self.bus.publish(event);
    }

    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    pub fn posts(&self) -> PostService<'_> {
        PostService::new(self)
    }

    pub fn social(&self) -> SocialService<'_> {
        SocialService::new(self)
    }

    pub fn chat(&self) -> ChatService<'_> {
        ChatService::new(self)
    }

    pub fn notifications(&self) -> NotificationService<'_> {
        NotificationService::new(self)
    }

    pub fn stories(&self) -> StoryService<'_> {
        StoryService::new(self)
    }

    pub fn settings(&self) -> SettingsService<'_> {
        SettingsService::new(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error(transparent)]
    State(#[from] crate::state::StateError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
