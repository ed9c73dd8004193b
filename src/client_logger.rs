//! Logging trait for chat-completion client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows callers to capture
//! every API interaction passing through the [`OpenRouter`](crate::OpenRouter) client.

use crate::types::ChatCompletionRequest;

/// A trait for logging client operations.
///
/// Implement this trait to record the request body, the raw server-sent-event
/// lines, and the assembled reply for each streamed exchange.
///
/// # Example
///
/// ```rust,ignore
/// use askcli::{ChatCompletionRequest, ClientLogger};
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, request: &ChatCompletionRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "request: {}", serde_json::to_string(request).unwrap()).unwrap();
///     }
///
///     fn log_stream_line(&self, line: &str) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "line: {line}").unwrap();
///     }
///
///     fn log_reply(&self, reply: &str) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "reply: {reply}").unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log the body of an outgoing chat-completion request.
    fn log_request(&self, request: &ChatCompletionRequest);

    /// Log a single raw line of the response stream, before classification.
    ///
    /// Blank keep-alive lines are logged too.
    fn log_stream_line(&self, line: &str);

    /// Log the assembled reply once the stream completes successfully.
    ///
    /// This is called even when the reply is empty.
    fn log_reply(&self, reply: &str);
}
