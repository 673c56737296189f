//! Transcript parsing: speaker discovery and segment preview.

pub mod segments;
pub mod speakers;

pub use segments::{Segment, parse_segments, speaker_turns};
pub use speakers::{extract_speakers, parse_speaker_line};
