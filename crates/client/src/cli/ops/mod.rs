pub mod badges;
pub mod block;
pub mod chats;
pub mod comment;
pub mod feed;
pub mod follow;
pub mod health;
pub mod init;
pub mod like;
pub mod login;
pub mod logout;
pub mod post;
pub mod profile;
pub mod read;
pub mod save;
pub mod send;
pub mod stories;

pub use badges::Badges;
pub use block::Block;
pub use chats::Chats;
pub use comment::Comment;
pub use feed::Feed;
pub use follow::Follow;
pub use health::Health;
pub use init::Init;
pub use like::Like;
pub use login::Login;
pub use logout::Logout;
pub use post::Post;
pub use profile::Profile;
pub use read::Read;
pub use save::Save;
pub use send::SendMessage;
pub use stories::Stories;

/// Failure shared by every op that talks to the backend
#[derive(Debug, thiserror::Error)]
pub enum ClientOpError {
    #[error(transparent)]
    Setup(#[from] pulse_client::PulseError),
    #[error(transparent)]
    Service(#[from] pulse_client::ServiceError),
}

/// Shorten free text to one table cell
pub(crate) fn excerpt(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max {
        return line.to_string();
    }
    let mut out: String = line.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
