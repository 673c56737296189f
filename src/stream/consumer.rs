//! Response consumer.
//!
//! Turns a processing response into a sequence of [`StreamEvent`]s. Two
//! shapes are supported, chosen from the response's declared framing:
//!
//! - streamed: newline-delimited JSON records, decoded chunk by chunk;
//! - single document: one JSON object read in full.
//!
//! Malformed intermediate records are dropped. A malformed single document
//! is reported as a failure, since it is the only response there is.

use crate::defaults::{FAILURE_MESSAGE, NO_STREAM_MESSAGE, STREAM_CONTENT_TYPES};
use crate::error::{DubshError, Result};
use crate::protocol::{Document, Record, StreamEvent};
use crate::stream::framer::RecordFramer;
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Body of a reply, delivered as chunks.
pub type ChunkStream = BoxStream<'static, Result<Vec<u8>>>;

/// An HTTP reply, reduced to what the consumer needs.
pub struct Reply {
    pub status: u16,
    pub content_type: Option<String>,
    /// `None` when the reply has no body at all.
    pub body: Option<ChunkStream>,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Wrap a `reqwest` response. A declared zero-length body counts as absent.
    pub fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = if response.content_length() == Some(0) {
            None
        } else {
            Some(
                response
                    .bytes_stream()
                    .map(|chunk| {
                        chunk
                            .map(|bytes| bytes.to_vec())
                            .map_err(|e| DubshError::Transport {
                                message: format!("Failed to read response: {e}"),
                            })
                    })
                    .boxed(),
            )
        };
        Self {
            status,
            content_type,
            body,
        }
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reply")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .finish()
    }
}

/// How to read a successful reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Streamed when the content type declares NDJSON, otherwise a document.
    #[default]
    Auto,
    Stream,
    Document,
}

impl ResponseMode {
    pub fn is_streamed(self, content_type: Option<&str>) -> bool {
        match self {
            ResponseMode::Stream => true,
            ResponseMode::Document => false,
            ResponseMode::Auto => content_type
                .and_then(|ct| ct.split(';').next())
                .map(|mime| {
                    let mime = mime.trim();
                    STREAM_CONTENT_TYPES
                        .iter()
                        .any(|t| t.eq_ignore_ascii_case(mime))
                })
                .unwrap_or(false),
        }
    }
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ResponseMode::Auto),
            "stream" => Ok(ResponseMode::Stream),
            "document" => Ok(ResponseMode::Document),
            other => Err(format!(
                "unknown response mode '{other}' (expected auto, stream or document)"
            )),
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResponseMode::Auto => "auto",
            ResponseMode::Stream => "stream",
            ResponseMode::Document => "document",
        })
    }
}

/// How a consumed response ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The last terminal event was a result.
    Succeeded,
    /// The last terminal event was an error.
    Failed,
    /// The body ended without any terminal event.
    Incomplete,
}

/// Incremental consumer for one streamed response.
///
/// Records are dispatched in completion order, and every record completed by
/// a chunk is dispatched before the next chunk is read.
#[derive(Debug)]
pub struct ResponseConsumer {
    framer: RecordFramer,
    seen_logs: Vec<String>,
    outcome: Outcome,
    discarded: usize,
}

impl Default for ResponseConsumer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseConsumer {
    pub fn new() -> Self {
        Self {
            framer: RecordFramer::new(),
            seen_logs: Vec::new(),
            outcome: Outcome::Incomplete,
            discarded: 0,
        }
    }

    /// Feed one chunk and dispatch every record it completes.
    pub fn feed<F>(&mut self, chunk: &[u8], on_event: &mut F)
    where
        F: FnMut(StreamEvent),
    {
        for line in self.framer.push(chunk) {
            self.dispatch_line(&line, on_event);
        }
    }

    /// Flush the trailing record left in the buffer when the stream ends.
    pub fn finish<F>(mut self, on_event: &mut F) -> Outcome
    where
        F: FnMut(StreamEvent),
    {
        if let Some(tail) = self.framer.finish() {
            self.dispatch_line(&tail, on_event);
        }
        if self.discarded > 0 {
            log::debug!("Discarded {} malformed records", self.discarded);
        }
        self.outcome
    }

    /// Read `stream` to the end, dispatching as records complete.
    ///
    /// A transport error ends consumption with `DubshError::Transport`; the
    /// partial record in the buffer is dropped.
    pub async fn run<S, B, E, F>(mut self, stream: S, on_event: &mut F) -> Result<Outcome>
    where
        S: Stream<Item = std::result::Result<B, E>>,
        B: AsRef<[u8]>,
        E: fmt::Display,
        F: FnMut(StreamEvent),
    {
        let mut stream = std::pin::pin!(stream);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DubshError::Transport {
                message: e.to_string(),
            })?;
            self.feed(chunk.as_ref(), on_event);
        }
        Ok(self.finish(on_event))
    }

    fn dispatch_line<F>(&mut self, line: &str, on_event: &mut F)
    where
        F: FnMut(StreamEvent),
    {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let Some(record) = Record::from_json(line) else {
            self.discarded += 1;
            log::debug!("Dropping malformed record: {}", truncate(line, 120));
            return;
        };

        let event = record.into_event(&self.seen_logs);
        match &event {
            StreamEvent::Log { message } => self.seen_logs.push(message.clone()),
            StreamEvent::Error { .. } => self.outcome = Outcome::Failed,
            StreamEvent::Result { .. } => self.outcome = Outcome::Succeeded,
        }
        on_event(event);
    }
}

/// Interpret a complete single-document body.
pub fn consume_document<F>(success: bool, body: &[u8], on_event: &mut F) -> Outcome
where
    F: FnMut(StreamEvent),
{
    let event = match Document::from_slice(body) {
        Ok(document) => document.into_event(success),
        Err(e) => {
            log::debug!("Malformed response document: {e}");
            StreamEvent::Error {
                message: FAILURE_MESSAGE.to_string(),
            }
        }
    };
    let outcome = match event {
        StreamEvent::Result { .. } => Outcome::Succeeded,
        _ => Outcome::Failed,
    };
    on_event(event);
    outcome
}

/// Consume a reply exactly once, dispatching its events to `on_event`.
///
/// Failing statuses are always read as a single document carrying `detail`.
/// Successful replies are streamed or read whole depending on `mode`.
pub async fn consume<F>(reply: Reply, mode: ResponseMode, mut on_event: F) -> Result<Outcome>
where
    F: FnMut(StreamEvent),
{
    let success = reply.is_success();
    let streamed = success && mode.is_streamed(reply.content_type.as_deref());
    log::debug!(
        "Consuming reply: status {}, content type {:?}, {}",
        reply.status,
        reply.content_type,
        if streamed { "streamed" } else { "document" }
    );

    if streamed {
        let Some(body) = reply.body else {
            on_event(StreamEvent::Error {
                message: NO_STREAM_MESSAGE.to_string(),
            });
            return Ok(Outcome::Failed);
        };
        return ResponseConsumer::new().run(body, &mut on_event).await;
    }

    let mut bytes = Vec::new();
    if let Some(mut body) = reply.body {
        while let Some(chunk) = body.next().await {
            bytes.extend_from_slice(&chunk?);
        }
    }
    Ok(consume_document(success, &bytes, &mut on_event))
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
