//! Error types for dubsh.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DubshError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Transcript input errors
    #[error("Failed to read transcript {path}: {message}")]
    TranscriptRead { path: String, message: String },

    #[error("Transcript {path} is not valid UTF-8 text")]
    TranscriptEncoding { path: String },

    // Mapping errors
    #[error("Unknown speaker: {speaker}")]
    UnknownSpeaker { speaker: String },

    #[error("Voice '{voice}' is not in the voice catalog")]
    UnknownVoice { voice: String },

    #[error("Invalid voice assignment '{input}': expected SPEAKER=VOICE")]
    InvalidAssignment { input: String },

    // Submission errors
    #[error("Failed to build request: {message}")]
    Request { message: String },

    #[error("{message}")]
    Transport { message: String },

    #[error("Download failed: {message}")]
    Download { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DubshError>;
