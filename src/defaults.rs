//! Default configuration constants for dubsh.
//!
//! Shared by the config types, the response consumer and the CLI so the
//! fallback strings shown to the user are defined exactly once.

/// Default backend base URL.
pub const SERVER_URL: &str = "http://127.0.0.1:8000";

/// Path of the processing endpoint, relative to the server URL.
pub const PROCESS_PATH: &str = "/process";

/// Seconds to wait for the TCP/TLS connection to the backend.
///
/// Only the connect phase is bounded; a processing stream may legitimately
/// run for many minutes.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Multipart field carrying the transcript file.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the JSON-encoded speaker to voice mapping.
pub const VOICE_MAP_FIELD: &str = "voice_map_json";

/// Default source language of the transcript.
pub const INPUT_LANGUAGE: &str = "ru-RU";

/// Default language of the synthesized audio.
pub const OUTPUT_LANGUAGE: &str = "en-US";

/// Default synthesis sample rate in Hz.
pub const SAMPLE_RATE_HZ: u32 = 24000;

/// Default synthesis volume gain in dB.
pub const VOLUME_GAIN_DB: f32 = 0.0;

/// Message used when an error record or failure document carries no text.
pub const FAILURE_MESSAGE: &str = "Processing failed.";

/// Message used when a streamed response arrives without a body.
pub const NO_STREAM_MESSAGE: &str = "No response stream available.";

/// Status line shown when a submission starts.
pub const STARTING_MESSAGE: &str = "Starting processing...";

/// Validation message when no transcript file was given.
pub const NO_FILE_MESSAGE: &str = "Please select a file.";

/// Placeholder shown by mapping surfaces when no speakers were detected.
pub const NO_SPEAKERS_MESSAGE: &str = "No speakers detected yet.";

/// Label of the empty "automatic" voice choice.
pub const AUTO_CHOICE_LABEL: &str = "Auto (no voice override)";

/// Content types that declare a newline-delimited JSON body.
pub const STREAM_CONTENT_TYPES: &[&str] = &[
    "application/x-ndjson",
    "application/ndjson",
    "application/jsonl",
];
