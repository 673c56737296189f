//! Speaker to voice mapping.
//!
//! The editor decides which controls exist; a [`MappingSurface`] shows them
//! and reports their live values. Surfaces: in-memory presets and an
//! interactive terminal prompt.

pub mod editor;
pub mod preset;
pub mod prompt;

pub use editor::{
    AutoChoice, ControlKind, MappingEditor, MappingLayout, MappingSurface, VoiceControl,
    VoiceMapping,
};
pub use preset::{PresetSurface, parse_assignment};
pub use prompt::PromptSurface;
