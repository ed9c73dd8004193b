//! Streaming response decoding.
//!
//! [`ask`] runs one exchange: it appends the user's message, posts the whole
//! transcript, and folds the streamed lines into a single assistant reply.
//! Each line is classified independently, so a malformed payload costs only
//! that line.  Fragments reach the [`Renderer`] as they arrive; the assembled
//! reply goes into the returned transcript only when it is non-empty.

use std::borrow::Cow;
use std::time::Instant;

use futures::{Stream, StreamExt};

use crate::chat::ChatConfig;
use crate::client::OpenRouter;
use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{STREAM_DELTAS, STREAM_DURATION, STREAM_LINES, STREAM_MALFORMED};
use crate::render::Renderer;
use crate::sse::{StreamLine, parse_line};
use crate::types::{ChatCompletionRequest, Message, Transcript};

/// Which characters of a streamed fragment are kept for display and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFilter {
    /// Keep only 7-bit ASCII; every code point at or above 128 is dropped.
    #[default]
    Ascii,
    /// Keep fragments unchanged.
    Unicode,
}

impl ContentFilter {
    /// Apply the filter to one fragment.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            ContentFilter::Ascii if !text.is_ascii() => {
                Cow::Owned(text.chars().filter(char::is_ascii).collect())
            }
            _ => Cow::Borrowed(text),
        }
    }
}

/// The result of one exchange with the model.
#[derive(Debug)]
pub struct Exchange {
    /// The transcript after the exchange.  It always ends with the user's
    /// message, followed by the assistant's reply when one was received.
    pub transcript: Transcript,
    /// Why no reply was recorded, if the request or the stream failed.
    pub error: Option<Error>,
}

/// Send `question` on top of `transcript` and stream the reply.
pub async fn ask(
    client: &OpenRouter,
    config: &ChatConfig,
    mut transcript: Transcript,
    question: &str,
    renderer: &mut dyn Renderer,
) -> Exchange {
    transcript.push(Message::user(question));
    match stream_reply(client, config, &transcript, renderer).await {
        Ok(reply) => {
            if !reply.is_empty() {
                transcript.push(Message::assistant(reply));
            }
            Exchange {
                transcript,
                error: None,
            }
        }
        Err(err) => Exchange {
            transcript,
            error: Some(err),
        },
    }
}

/// Post `transcript` and return the assembled reply, rendering it as it streams.
pub async fn stream_reply(
    client: &OpenRouter,
    config: &ChatConfig,
    transcript: &[Message],
    renderer: &mut dyn Renderer,
) -> Result<String> {
    let request = ChatCompletionRequest::streaming(config.model.clone(), transcript.to_vec());
    renderer.start_response(&config.model);
    let result = match client.stream(&request).await {
        Ok(lines) => decode_stream(lines, config.content_filter, client.logger(), renderer).await,
        Err(err) => Err(err),
    };
    renderer.finish_response();
    result
}

/// Fold a stream of event lines into the reply text.
///
/// Decoding stops at the `[DONE]` sentinel or at the end of the stream.
/// Malformed payloads and undecodable lines are skipped; in-band error
/// objects are rendered and skipped; any other stream error aborts with that
/// error and the partial reply is discarded.
pub async fn decode_stream<S>(
    lines: S,
    filter: ContentFilter,
    logger: Option<&dyn ClientLogger>,
    renderer: &mut dyn Renderer,
) -> Result<String>
where
    S: Stream<Item = Result<String>>,
{
    futures::pin_mut!(lines);
    let start = Instant::now();
    let mut reply = String::new();

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(Error::Encoding { .. }) => {
                STREAM_MALFORMED.click();
                continue;
            }
            Err(err) => return Err(err),
        };
        STREAM_LINES.click();
        if let Some(logger) = logger {
            logger.log_stream_line(&line);
        }

        match parse_line(&line) {
            StreamLine::Delta(delta) => {
                let fragment = filter.apply(&delta);
                if fragment.is_empty() {
                    continue;
                }
                STREAM_DELTAS.click();
                renderer.print_text(&fragment);
                reply.push_str(&fragment);
            }
            StreamLine::Done => break,
            StreamLine::Error(message) => renderer.print_error(&message),
            StreamLine::Ignored => {}
            StreamLine::Malformed => STREAM_MALFORMED.click(),
        }
    }

    STREAM_DURATION.add(start.elapsed().as_secs_f64());
    if let Some(logger) = logger {
        logger.log_reply(&reply);
    }
    Ok(reply)
}
