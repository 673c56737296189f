//! dubsh - dubbing client
//!
//! Finds the speakers of a timestamped transcript, maps each to a synthesis
//! voice, submits the transcript to the dubbing backend and follows its
//! streamed progress.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod mapping;
#[cfg(feature = "cli")]
pub mod output;
pub mod protocol;
pub mod stream;
pub mod submit;
pub mod transcript;
pub mod voices;

// Core seams (surface for the mapping, transport, display)
pub use mapping::{MappingEditor, MappingSurface, VoiceMapping};
pub use submit::{Backend, HttpBackend, Presenter, SubmissionController};

// Response consumption
pub use protocol::StreamEvent;
pub use stream::{Outcome, ResponseMode, consume};

// Speaker discovery
pub use transcript::extract_speakers;
pub use voices::VoiceCatalog;

// Error handling
pub use error::{DubshError, Result};

// Config
pub use config::Config;

/// Package version, suffixed with the git short hash when the build had one.
///
/// Sent to the backend in the `User-Agent` header.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{version}+{hash}"),
        _ => version.to_string(),
    }
}
