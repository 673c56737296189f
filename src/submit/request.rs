//! Multipart request contents.

use crate::config::ProcessConfig;
use crate::defaults;
use crate::error::{DubshError, Result};
use crate::mapping::VoiceMapping;
use reqwest::multipart::{Form, Part};
use std::fs;
use std::path::Path;

/// A selected transcript file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| DubshError::TranscriptRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "transcript.txt".to_string());
        Ok(Self { file_name, bytes })
    }

    /// The file decoded as UTF-8, for speaker extraction.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.bytes).map_err(|_| DubshError::TranscriptEncoding {
            path: self.file_name.clone(),
        })
    }
}

/// Processing options sent as text fields next to the file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOptions {
    pub input_language: String,
    pub output_language: String,
    pub sample_rate_hz: u32,
    pub volume_gain_db: f32,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self::from(&ProcessConfig::default())
    }
}

impl From<&ProcessConfig> for ProcessOptions {
    fn from(config: &ProcessConfig) -> Self {
        Self {
            input_language: config.input_language.clone(),
            output_language: config.output_language.clone(),
            sample_rate_hz: config.sample_rate_hz,
            volume_gain_db: config.volume_gain_db,
        }
    }
}

/// Everything one submission sends.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub upload: Upload,
    pub mapping: VoiceMapping,
    pub options: ProcessOptions,
}

impl SubmitRequest {
    pub fn new(upload: Upload, mapping: VoiceMapping, options: ProcessOptions) -> Self {
        Self {
            upload,
            mapping,
            options,
        }
    }

    /// The mapping as a JSON object keyed by speaker.
    pub fn voice_map_json(&self) -> Result<String> {
        serde_json::to_string(&self.mapping).map_err(|e| DubshError::Request {
            message: format!("Failed to encode voice map: {e}"),
        })
    }

    /// Text fields in the order they are appended to the form.
    pub fn text_fields(&self) -> Result<Vec<(&'static str, String)>> {
        Ok(vec![
            ("input_language", self.options.input_language.clone()),
            ("output_language", self.options.output_language.clone()),
            ("sample_rate_hz", self.options.sample_rate_hz.to_string()),
            ("volume_gain_db", self.options.volume_gain_db.to_string()),
            (defaults::VOICE_MAP_FIELD, self.voice_map_json()?),
        ])
    }

    pub fn into_form(self) -> Result<Form> {
        let fields = self.text_fields()?;
        let part = Part::bytes(self.upload.bytes)
            .file_name(self.upload.file_name)
            .mime_str("text/plain")
            .map_err(|e| DubshError::Request {
                message: format!("Failed to build file part: {e}"),
            })?;

        let mut form = Form::new().part(defaults::FILE_FIELD, part);
        for (name, value) in fields {
            form = form.text(name, value);
        }
        Ok(form)
    }
}
