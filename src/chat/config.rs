//! Configuration for the chat application.
//!
//! Everything the client and session need is resolved once at startup into a
//! [`ChatConfig`] and passed by reference from there on.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::decoder::ContentFilter;

/// Environment variable that holds the API bearer credential.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// The model every request is sent to.
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";

/// The chat-completion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Directory that holds saved transcripts, relative to the working directory.
pub const DEFAULT_HISTORY_DIR: &str = "convo_hist";

/// Default time allowed to establish a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default time allowed between two chunks of a streamed reply.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Bearer credential; requests are sent without one when absent.
    pub api_key: Option<String>,

    /// The model to use for generating responses.
    pub model: String,

    /// Full URL of the chat-completion endpoint.
    pub endpoint: String,

    /// Directory where transcripts are saved and loaded.
    pub history_dir: PathBuf,

    /// Filter applied to every streamed fragment before display and storage.
    pub content_filter: ContentFilter,

    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,

    /// Time allowed between two chunks of a streamed reply.
    pub idle_timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values and no credential.
    ///
    /// Defaults:
    /// - Model: deepseek/deepseek-r1:free
    /// - Endpoint: OpenRouter chat completions
    /// - History directory: convo_hist
    /// - Content filter: ASCII only
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            history_dir: PathBuf::from(DEFAULT_HISTORY_DIR),
            content_filter: ContentFilter::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            use_color: true,
        }
    }

    /// Creates the default configuration with the credential taken from
    /// `OPENROUTER_API_KEY`, after loading a `.env` file if one is present.
    ///
    /// A missing credential is not an error here; the server rejects the
    /// first request instead.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        let api_key = env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty());
        Self::new().with_api_key(api_key)
    }

    /// Sets the bearer credential.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the chat-completion endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the transcript directory.
    pub fn with_history_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.history_dir = dir.into();
        self
    }

    /// Sets the content filter.
    pub fn with_content_filter(mut self, filter: ContentFilter) -> Self {
        self.content_filter = filter;
        self
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the idle timeout between streamed chunks.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}
