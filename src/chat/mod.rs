//! Chat application module for interactive conversations.
//!
//! This module provides the line-oriented chat loop built on top of the
//! streaming client.  It supports:
//!
//! - Streaming replies rendered as they arrive
//! - Slash commands to save, load and list transcripts
//! - A single configuration value resolved at startup
//!
//! # Architecture
//!
//! - [`config`]: configuration and its defaults
//! - [`session`]: transcript ownership and command dispatch
//! - [`commands`]: slash command parsing
//! - [`store`]: transcript files on disk

mod commands;
mod config;
mod session;
mod store;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{
    API_KEY_ENV, ChatConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT, DEFAULT_HISTORY_DIR,
    DEFAULT_IDLE_TIMEOUT, DEFAULT_MODEL,
};
pub use session::{ChatSession, Flow};
pub use store::{TRANSCRIPT_EXTENSION, TranscriptStore, default_name};
