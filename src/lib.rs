//! A streaming terminal chat client with saved transcripts.

// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod decoder;
pub mod error;
pub mod observability;
pub mod render;
pub mod sse;
pub mod types;
pub mod utils;

// Re-exports
pub use client::OpenRouter;
pub use client_logger::ClientLogger;
pub use decoder::{ContentFilter, Exchange, ask};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use types::*;
