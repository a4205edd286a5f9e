// REST client for the Pulse backend
pub mod api;

// Coordinator owning bus, badges, toggles and session
pub mod pulse;
pub mod services;
pub mod session;

// App state (configuration, paths)
pub mod state;

pub use api::{ApiClient, ApiError, ClientOptions};
pub use pulse::{Pulse, PulseError};
pub use services::{Availability, FollowState, ServiceError};
pub use session::{SavedSession, SessionStore};
pub use state::{AppConfig, AppState, StateError};
