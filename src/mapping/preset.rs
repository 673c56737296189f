//! In-memory mapping surface driven by `SPEAKER=VOICE` assignments.

use crate::error::{DubshError, Result};
use crate::mapping::editor::{ControlKind, MappingLayout, MappingSurface, VoiceControl};

/// A rendered control and its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BoundControl {
    control: VoiceControl,
    value: String,
}

/// Surface that keeps controls in memory. Values change only through [`set`].
///
/// [`set`]: PresetSurface::set
#[derive(Debug, Default)]
pub struct PresetSurface {
    controls: Vec<BoundControl>,
    placeholder: bool,
}

impl PresetSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last render was the "no speakers" placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn controls(&self) -> impl Iterator<Item = &VoiceControl> {
        self.controls.iter().map(|b| &b.control)
    }

    /// Set the value of the control bound to `speaker`.
    ///
    /// For choice controls the value must be one of the options (matched
    /// case-insensitively) or empty when the automatic option is offered.
    pub fn set(&mut self, speaker: &str, voice: &str) -> Result<()> {
        let bound = self
            .controls
            .iter_mut()
            .find(|b| b.control.speaker == speaker)
            .ok_or_else(|| DubshError::UnknownSpeaker {
                speaker: speaker.to_string(),
            })?;

        let voice = voice.trim();
        let value = match &bound.control.kind {
            ControlKind::FreeText => voice.to_string(),
            ControlKind::Choice { options, .. } => {
                let resolved = options
                    .iter()
                    .find(|o| *o == voice)
                    .or_else(|| options.iter().find(|o| o.eq_ignore_ascii_case(voice)))
                    .map(String::clone)
                    .unwrap_or_else(|| voice.to_string());
                if !bound.control.kind.accepts(&resolved) {
                    return Err(DubshError::UnknownVoice {
                        voice: voice.to_string(),
                    });
                }
                resolved
            }
        };
        bound.value = value;
        Ok(())
    }

    /// Apply a batch of `(speaker, voice)` assignments, stopping at the first
    /// rejected one.
    pub fn apply<'a, I>(&mut self, assignments: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a (String, String)>,
    {
        for (speaker, voice) in assignments {
            self.set(speaker, voice)?;
        }
        Ok(())
    }
}

impl MappingSurface for PresetSurface {
    fn render(&mut self, layout: &MappingLayout) -> Result<()> {
        self.placeholder = matches!(layout, MappingLayout::NoSpeakers);
        self.controls = layout
            .controls()
            .iter()
            .map(|control| BoundControl {
                value: control.kind.initial_value().to_string(),
                control: control.clone(),
            })
            .collect();
        Ok(())
    }

    fn read_current_values(&self) -> Vec<(String, String)> {
        self.controls
            .iter()
            .map(|b| (b.control.speaker.clone(), b.value.clone()))
            .collect()
    }
}

/// Parse a `SPEAKER=VOICE` assignment. The split happens at the last `=`,
/// so speaker labels may contain `=`. An empty voice means automatic.
pub fn parse_assignment(input: &str) -> Result<(String, String)> {
    let (speaker, voice) = input
        .rsplit_once('=')
        .ok_or_else(|| DubshError::InvalidAssignment {
            input: input.to_string(),
        })?;
    let speaker = speaker.trim();
    if speaker.is_empty() {
        return Err(DubshError::InvalidAssignment {
            input: input.to_string(),
        });
    }
    Ok((speaker.to_string(), voice.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::editor::AutoChoice;
    use crate::voices::VoiceCatalog;

    fn rendered(speakers: &[&str], catalog: &VoiceCatalog, auto: AutoChoice) -> PresetSurface {
        let speakers: Vec<String> = speakers.iter().map(|s| s.to_string()).collect();
        let mut surface = PresetSurface::new();
        surface
            .render(&MappingLayout::build(&speakers, catalog, auto))
            .unwrap();
        surface
    }

    #[test]
    fn test_set_known_voice() {
        let mut surface = rendered(&["Alice"], &VoiceCatalog::builtin(), AutoChoice::Always);
        surface.set("Alice", "Kore").unwrap();
        assert_eq!(
            surface.read_current_values(),
            vec![("Alice".to_string(), "Kore".to_string())]
        );
    }

    #[test]
    fn test_set_resolves_case_insensitively() {
        let mut surface = rendered(&["Alice"], &VoiceCatalog::builtin(), AutoChoice::Always);
        surface.set("Alice", "kore").unwrap();
        assert_eq!(surface.read_current_values()[0].1, "Kore");
    }

    #[test]
    fn test_set_unknown_speaker_is_rejected() {
        let mut surface = rendered(&["Alice"], &VoiceCatalog::builtin(), AutoChoice::Always);
        let err = surface.set("Mallory", "Kore").unwrap_err();
        assert!(matches!(err, DubshError::UnknownSpeaker { .. }));
    }

    #[test]
    fn test_set_voice_outside_catalog_is_rejected() {
        let mut surface = rendered(&["Alice"], &VoiceCatalog::builtin(), AutoChoice::Always);
        let err = surface.set("Alice", "Robot").unwrap_err();
        assert!(matches!(err, DubshError::UnknownVoice { .. }));
    }

    #[test]
    fn test_empty_value_needs_auto_option() {
        let catalog = VoiceCatalog::parse_list("Kore,Puck");
        let mut surface = rendered(&["Alice"], &catalog, AutoChoice::BuiltinOnly);
        assert_eq!(surface.read_current_values()[0].1, "Kore");
        assert!(surface.set("Alice", "").is_err());

        let mut surface = rendered(&["Alice"], &catalog, AutoChoice::Always);
        surface.set("Alice", "Puck").unwrap();
        surface.set("Alice", "").unwrap();
        assert_eq!(surface.read_current_values()[0].1, "");
    }

    #[test]
    fn test_free_text_accepts_anything() {
        let catalog = VoiceCatalog::parse_list("");
        let mut surface = rendered(&["Alice"], &catalog, AutoChoice::Always);
        surface.set("Alice", "  custom-voice-7 ").unwrap();
        assert_eq!(surface.read_current_values()[0].1, "custom-voice-7");
    }

    #[test]
    fn test_apply_assignments() {
        let mut surface = rendered(
            &["Alice", "Bob"],
            &VoiceCatalog::builtin(),
            AutoChoice::Always,
        );
        let assignments = vec![
            ("Alice".to_string(), "Kore".to_string()),
            ("Bob".to_string(), "Puck".to_string()),
        ];
        surface.apply(&assignments).unwrap();
        assert_eq!(
            surface.read_current_values(),
            vec![
                ("Alice".to_string(), "Kore".to_string()),
                ("Bob".to_string(), "Puck".to_string()),
            ]
        );
    }

    #[test]
    fn test_placeholder_flag() {
        let surface = rendered(&[], &VoiceCatalog::builtin(), AutoChoice::Always);
        assert!(surface.is_placeholder());
        assert_eq!(surface.controls().count(), 0);
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("Alice=Kore").unwrap(),
            ("Alice".to_string(), "Kore".to_string())
        );
        assert_eq!(
            parse_assignment(" Speaker 1 = Puck ").unwrap(),
            ("Speaker 1".to_string(), "Puck".to_string())
        );
        assert_eq!(
            parse_assignment("A=B=Kore").unwrap(),
            ("A=B".to_string(), "Kore".to_string())
        );
        assert_eq!(
            parse_assignment("Alice=").unwrap(),
            ("Alice".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_assignment_rejects_malformed() {
        assert!(parse_assignment("Alice").is_err());
        assert!(parse_assignment("=Kore").is_err());
    }
}
