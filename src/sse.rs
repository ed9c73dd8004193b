//! Server-Sent Events (SSE) processing for streaming chat completions.
//!
//! The response body is split into lines by [`process_sse`], and each line is
//! classified by [`parse_line`].  Only `data:` lines carry payload; the
//! `[DONE]` sentinel ends the stream, and a payload that fails to parse is
//! reported as [`StreamLine::Malformed`] so the caller can skip it and carry on.

use std::time::Duration;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::observability::STREAM_BYTES;
use crate::types::ChatCompletionChunk;
use crate::{Error, Result};

/// Prefix of every payload-carrying line.
pub const DATA_PREFIX: &str = "data:";

/// Payload that marks the end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// The classification of one line of the response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamLine {
    /// A non-empty fragment of assistant text.
    Delta(String),
    /// The end-of-stream sentinel.
    Done,
    /// An error object delivered in-band.
    Error(String),
    /// A line with nothing to contribute: blank, comment, or a payload without content.
    Ignored,
    /// A payload that could not be decoded.
    Malformed,
}

/// Classify a single line of the event stream.
pub fn parse_line(line: &str) -> StreamLine {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let Some(data) = line.strip_prefix(DATA_PREFIX) else {
        return StreamLine::Ignored;
    };
    let data = data.strip_prefix(' ').unwrap_or(data);
    if data.trim() == DONE_SENTINEL {
        return StreamLine::Done;
    }
    match serde_json::from_str::<ChatCompletionChunk>(data) {
        Ok(chunk) => {
            if let Some(error) = chunk.error {
                StreamLine::Error(error.message)
            } else if let Some(content) = chunk.content() {
                StreamLine::Delta(content.to_string())
            } else {
                StreamLine::Ignored
            }
        }
        Err(_) => StreamLine::Malformed,
    }
}

/// Process a stream of bytes into a stream of text lines.
///
/// Lines are split on `\n` and decoded only once complete, so a multi-byte
/// character split across two chunks arrives intact.  A line that is not valid
/// UTF-8 yields an [`Error::Encoding`] item and the stream continues.  When
/// `idle_timeout` is set and no bytes arrive within it, the stream yields an
/// [`Error::Timeout`] and ends.
pub fn process_sse<S>(
    byte_stream: S,
    idle_timeout: Option<Duration>,
) -> impl Stream<Item = Result<String>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(format!("Stream timed out: {e}"), None)
            } else {
                Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e)))
            }
        })
    });

    stream::unfold(
        (stream, Vec::new(), false),
        move |(mut stream, mut buffer, mut finished)| async move {
            loop {
                if let Some(line) = extract_line(&mut buffer) {
                    return Some((decode_line(line), (stream, buffer, finished)));
                }

                if finished {
                    // Flush an unterminated final line.
                    if buffer.is_empty() {
                        return None;
                    }
                    let line = std::mem::take(&mut buffer);
                    return Some((decode_line(line), (stream, buffer, finished)));
                }

                let next = match idle_timeout {
                    Some(limit) => match tokio::time::timeout(limit, stream.next()).await {
                        Ok(next) => next,
                        Err(_) => Some(Err(Error::timeout(
                            "no data received from the server",
                            Some(limit.as_secs_f64()),
                        ))),
                    },
                    None => stream.next().await,
                };

                match next {
                    Some(Ok(bytes)) => {
                        STREAM_BYTES.count(bytes.len() as u64);
                        buffer.extend_from_slice(&bytes);
                    }
                    Some(Err(e)) => {
                        buffer.clear();
                        return Some((Err(e), (stream, buffer, true)));
                    }
                    None => finished = true,
                }
            }
        },
    )
}

/// Remove and return the first complete line in `buffer`, without its newline.
fn extract_line(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
    let newline = buffer.iter().position(|b| *b == b'\n')?;
    let mut line: Vec<u8> = buffer.drain(..=newline).collect();
    line.pop();
    Some(line)
}

fn decode_line(line: Vec<u8>) -> Result<String> {
    String::from_utf8(line)
        .map_err(|e| Error::encoding(format!("Invalid UTF-8 in stream: {e}"), Some(Box::new(e))))
}

#[cfg(test)]
mod tests {
    use super::*;

    type ByteChunk = std::result::Result<Bytes, reqwest::Error>;

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = ByteChunk> + Unpin + 'static {
        let items: Vec<ByteChunk> = parts.iter().map(|p| Ok(Bytes::from_static(p))).collect();
        stream::iter(items)
    }

    async fn collect_lines(parts: &[&'static [u8]]) -> Vec<Result<String>> {
        process_sse(chunks(parts), None).collect().await
    }

    #[test]
    fn parse_content_delta() {
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{"content":"A"}}]}"#),
            StreamLine::Delta("A".to_string())
        );
    }

    #[test]
    fn parse_done_sentinel() {
        assert_eq!(parse_line("data: [DONE]"), StreamLine::Done);
        assert_eq!(parse_line("data: [DONE]\r"), StreamLine::Done);
        assert_eq!(parse_line("data:[DONE]"), StreamLine::Done);
    }

    #[test]
    fn parse_ignores_non_data_lines() {
        assert_eq!(parse_line(""), StreamLine::Ignored);
        assert_eq!(parse_line(": OPENROUTER PROCESSING"), StreamLine::Ignored);
        assert_eq!(parse_line("event: message"), StreamLine::Ignored);
    }

    #[test]
    fn parse_payload_without_content() {
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            StreamLine::Ignored
        );
        assert_eq!(parse_line(r#"data: {"choices":[]}"#), StreamLine::Ignored);
    }

    #[test]
    fn parse_malformed_payload() {
        assert_eq!(parse_line("data: {\"choices\": [oops"), StreamLine::Malformed);
        assert_eq!(parse_line("data: "), StreamLine::Malformed);
    }

    #[test]
    fn parse_in_band_error() {
        assert_eq!(
            parse_line(r#"data: {"error":{"message":"upstream failed"}}"#),
            StreamLine::Error("upstream failed".to_string())
        );
    }

    #[tokio::test]
    async fn split_lines_across_chunks() {
        let lines = collect_lines(&[b"data: one\nda", b"ta: two\n", b"\n"]).await;
        let lines: Vec<String> = lines.into_iter().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["data: one", "data: two", ""]);
    }

    #[tokio::test]
    async fn flush_unterminated_final_line() {
        let lines = collect_lines(&[b"data: one\ndata: [DONE]"]).await;
        let lines: Vec<String> = lines.into_iter().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["data: one", "data: [DONE]"]);
    }

    #[tokio::test]
    async fn multibyte_character_split_across_chunks() {
        // "é" is 0xC3 0xA9.
        let lines = collect_lines(&[b"caf\xC3", b"\xA9\n"]).await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_ref().unwrap(), "café");
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_stream() {
        let lines = collect_lines(&[b"\xFF\xFE\n", b"data: ok\n"]).await;
        assert_eq!(lines.len(), 2);
        assert!(matches!(lines[0], Err(Error::Encoding { .. })));
        assert_eq!(lines[1].as_ref().unwrap(), "data: ok");
    }

    #[tokio::test(start_paused = true)]
    async fn idle_timeout_ends_stream() {
        let first: ByteChunk = Ok(Bytes::from_static(b"data: first\n"));
        let stalled = stream::iter(vec![first]).chain(stream::pending());
        let mut lines = Box::pin(process_sse(
            Box::pin(stalled),
            Some(Duration::from_secs(5)),
        ));

        assert_eq!(lines.next().await.unwrap().unwrap(), "data: first");
        let err = lines.next().await.unwrap().unwrap_err();
        assert!(err.is_timeout());
        assert!(lines.next().await.is_none());
    }
}
