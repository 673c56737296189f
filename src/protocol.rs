//! Wire protocol of the processing endpoint.
//!
//! A streamed response is newline-delimited JSON, one record per line:
//!
//! ```text
//! {"type":"log","message":"Parsing speaker segments..."}
//! {"type":"error","message":"No speaker segments detected"}
//! {"type":"result","logs":["..."],"downloads":["/download?path=1.mp3"]}
//! ```
//!
//! A single-document response is `{"logs":[...],"downloads":[...]}` on
//! success or `{"detail":"..."}` on failure.
//!
//! Records are decoded leniently: missing or mistyped fields are replaced by
//! the defaults in [`Record::into_event`] and [`Document::into_event`], the
//! only places where fallbacks are applied.

use crate::defaults::FAILURE_MESSAGE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded event handed to application code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Progress message to append to the log.
    Log { message: String },
    /// Terminal failure.
    Error { message: String },
    /// Terminal success. `logs` replaces the accumulated log.
    Result {
        logs: Vec<String>,
        downloads: Vec<String>,
    },
}

impl StreamEvent {
    /// Whether no further events are expected after this one.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Log { .. })
    }

    /// Serialize as one NDJSON record (without the trailing newline).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// One streamed record as found on the wire, before defaults are applied.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    Log {
        #[serde(default)]
        message: Option<Value>,
    },
    Error {
        #[serde(default)]
        message: Option<Value>,
    },
    Result {
        #[serde(default)]
        logs: Option<Value>,
        #[serde(default)]
        downloads: Option<Value>,
    },
}

impl Record {
    /// Parse one trimmed, non-empty line. `None` for anything that is not a
    /// known record: invalid JSON, non-objects and unknown `type`s alike.
    pub fn from_json(line: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(line).ok()?;
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Apply the default-substitution rules.
    ///
    /// `seen_logs` are the log messages dispatched so far in this response;
    /// they stand in for a result record's missing or malformed `logs`.
    pub fn into_event(self, seen_logs: &[String]) -> StreamEvent {
        match self {
            Record::Log { message } => StreamEvent::Log {
                message: text_of(message.as_ref()).unwrap_or_default(),
            },
            Record::Error { message } => StreamEvent::Error {
                message: non_empty_text(message.as_ref())
                    .unwrap_or_else(|| FAILURE_MESSAGE.to_string()),
            },
            Record::Result { logs, downloads } => StreamEvent::Result {
                logs: match logs {
                    Some(Value::Array(items)) => items.iter().map(display_text).collect(),
                    _ => seen_logs.to_vec(),
                },
                downloads: string_items(downloads.as_ref()),
            },
        }
    }
}

/// A single-document response body.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Document {
    pub logs: Option<Value>,
    pub downloads: Option<Value>,
    pub detail: Option<Value>,
    pub message: Option<Value>,
}

impl Document {
    /// Parse a complete body. Must be a JSON object.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom("expected a JSON object"));
        }
        serde_json::from_value(value)
    }

    /// Convert to the single event this document stands for.
    pub fn into_event(self, success: bool) -> StreamEvent {
        if success {
            return StreamEvent::Result {
                logs: match self.logs {
                    Some(Value::Array(items)) => items.iter().map(display_text).collect(),
                    _ => Vec::new(),
                },
                downloads: string_items(self.downloads.as_ref()),
            };
        }
        StreamEvent::Error {
            message: self.failure_message(),
        }
    }

    /// Failure text: `detail`, then `message`, then the generic message.
    ///
    /// Validation failures carry `detail` as a list of `{ "msg": ... }`
    /// objects; their messages are joined.
    pub fn failure_message(&self) -> String {
        if let Some(Value::Array(items)) = &self.detail {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !msgs.is_empty() {
                return msgs.join("; ");
            }
        }
        non_empty_text(self.detail.as_ref())
            .or_else(|| non_empty_text(self.message.as_ref()))
            .unwrap_or_else(|| FAILURE_MESSAGE.to_string())
    }
}

fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        other => Some(display_text(other)),
    }
}

fn non_empty_text(value: Option<&Value>) -> Option<String> {
    text_of(value).filter(|s| !s.is_empty())
}

/// Strings verbatim, anything else in its JSON form.
fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// String elements of an array; non-arrays and non-string elements are dropped.
fn string_items(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
