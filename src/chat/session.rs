//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript,
//! dispatches slash commands to the transcript store, and forwards everything
//! else to the streaming decoder.

use std::path::PathBuf;

use crate::chat::commands::{ChatCommand, help_text, parse_command};
use crate::chat::config::ChatConfig;
use crate::chat::store::TranscriptStore;
use crate::client::OpenRouter;
use crate::decoder::ask;
use crate::error::Result;
use crate::render::Renderer;
use crate::types::{Message, Transcript};

/// What the read loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Wait for the next line.
    Continue,
    /// Leave the loop.
    Exit,
}

/// A chat session that manages conversation state and API interactions.
pub struct ChatSession {
    client: OpenRouter,
    config: ChatConfig,
    store: TranscriptStore,
    messages: Transcript,
}

impl ChatSession {
    /// Creates a new chat session from the configuration.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = OpenRouter::new(&config)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a new chat session around an existing client.
    pub fn with_client(client: OpenRouter, config: ChatConfig) -> Self {
        let store = TranscriptStore::new(config.history_dir.clone());
        Self {
            client,
            config,
            store,
            messages: Vec::new(),
        }
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Returns the conversation so far.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the transcript store.
    pub fn store(&self) -> &TranscriptStore {
        &self.store
    }

    /// Handles one line of user input.
    ///
    /// Surrounding whitespace is ignored when recognising commands, but a
    /// message is sent exactly as typed.
    pub async fn handle_line(&mut self, line: &str, renderer: &mut dyn Renderer) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }

        let Some(command) = parse_command(line) else {
            if let Err(err) = self.send_streaming(line, renderer).await {
                renderer.print_error(&err.to_string());
            }
            return Flow::Continue;
        };

        match command {
            ChatCommand::Exit => {
                renderer.print_info("Conversation ended.");
                return Flow::Exit;
            }
            ChatCommand::Save(name) => match self.save_transcript(name.as_deref()) {
                Ok(path) => {
                    renderer.print_info(&format!("Conversation saved to: {}", path.display()))
                }
                Err(err) => renderer.print_error(&err.to_string()),
            },
            ChatCommand::Load(name) => match self.load_transcript(&name) {
                Ok(count) => {
                    renderer.print_info(&format!("Loaded conversation from: {name}"));
                    renderer.print_info(&format!("Loaded {count} messages"));
                }
                Err(err) => renderer.print_error(&err.to_string()),
            },
            ChatCommand::List => match self.store.list() {
                Ok(names) if names.is_empty() => {
                    renderer.print_info("No saved conversations found")
                }
                Ok(names) => {
                    renderer.print_info("Saved conversations:");
                    for (i, name) in names.iter().enumerate() {
                        renderer.print_info(&format!("  {}. {}", i + 1, name));
                    }
                }
                Err(err) => renderer.print_error(&err.to_string()),
            },
            ChatCommand::Help => renderer.print_info(help_text()),
            ChatCommand::Invalid(message) => renderer.print_error(&message),
        }
        Flow::Continue
    }

    /// Sends a user message and streams the response.
    ///
    /// The user message stays in the transcript even when the request fails;
    /// the assistant reply is added only when it carries text.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request or the stream fails.
    pub async fn send_streaming(
        &mut self,
        user_input: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let transcript = std::mem::take(&mut self.messages);
        let exchange = ask(&self.client, &self.config, transcript, user_input, renderer).await;
        self.messages = exchange.transcript;
        match exchange.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Saves the transcript and returns the path written.
    pub fn save_transcript(&self, name: Option<&str>) -> Result<PathBuf> {
        self.store.save(&self.messages, name)
    }

    /// Loads a transcript, replacing the conversation, and returns its length.
    ///
    /// On failure the current conversation is left untouched.
    pub fn load_transcript(&mut self, name: &str) -> Result<usize> {
        self.messages = self.store.load(name)?;
        Ok(self.messages.len())
    }
}
