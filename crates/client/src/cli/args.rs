use std::path::PathBuf;

use clap::Parser;
use url::Url;

use super::ops::{
    Badges, Block, Chats, Comment, Feed, Follow, Health, Init, Like, Login, Logout, Post, Profile,
    Read, Save, SendMessage, Stories,
};

crate::command_enum! {
    (Init, Init),
    (Health, Health),
    (Login, Login),
    (Logout, Logout),
    (Feed, Feed),
    (Post, Post),
    (Like, Like),
    (Save, Save),
    (Comment, Comment),
    (Follow, Follow),
    (Block, Block),
    (Stories, Stories),
    (Chats, Chats),
    (Send, SendMessage),
    (Read, Read),
    (Badges, Badges),
    (Profile, Profile),
}

#[derive(Parser, Debug)]
#[command(name = "pulse", version, about = "Command-line client for the Pulse social platform")]
pub struct Cli {
    /// State directory (default: ~/.pulse)
    #[arg(long, global = true, env = "PULSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the API URL from config.toml
    #[arg(long, global = true, env = "PULSE_REMOTE")]
    pub remote: Option<Url>,

    /// Default log filter; RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}
