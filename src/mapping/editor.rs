//! Mapping editor: one voice control per speaker.

use crate::error::Result;
use crate::voices::{CatalogSource, VoiceCatalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Speaker label to voice identifier. An empty value means "automatic".
///
/// Ordered by key so the JSON encoding is stable.
pub type VoiceMapping = BTreeMap<String, String>;

/// Whether a constrained choice offers a leading empty "automatic" option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoChoice {
    /// Always offer the automatic option.
    #[default]
    Always,
    /// Offer it for the built-in catalog only; user catalogs must pick a voice.
    BuiltinOnly,
    /// Never offer it; every speaker gets an explicit voice.
    Never,
}

impl AutoChoice {
    pub fn offers_auto(self, source: CatalogSource) -> bool {
        match self {
            AutoChoice::Always => true,
            AutoChoice::BuiltinOnly => source == CatalogSource::Builtin,
            AutoChoice::Never => false,
        }
    }
}

/// How a speaker's voice is entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    /// Pick one of `options`, or the empty value when `auto` is set.
    Choice { options: Vec<String>, auto: bool },
    /// Free text, empty by default.
    FreeText,
}

impl ControlKind {
    /// Value a freshly rendered control holds before the user touches it.
    pub fn initial_value(&self) -> &str {
        match self {
            ControlKind::Choice { auto: true, .. } | ControlKind::FreeText => "",
            ControlKind::Choice { options, .. } => {
                options.first().map(String::as_str).unwrap_or("")
            }
        }
    }

    /// Whether `value` is an acceptable setting for this control.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ControlKind::FreeText => true,
            ControlKind::Choice { options, auto } => {
                (value.is_empty() && *auto) || options.iter().any(|o| o == value)
            }
        }
    }
}

/// A control bound to one speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceControl {
    pub speaker: String,
    pub kind: ControlKind,
}

/// What a surface should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingLayout {
    /// Placeholder state: nothing to map.
    NoSpeakers,
    /// One control per speaker, in transcript order.
    Controls(Vec<VoiceControl>),
}

impl MappingLayout {
    pub fn build(speakers: &[String], catalog: &VoiceCatalog, auto_choice: AutoChoice) -> Self {
        if speakers.is_empty() {
            return MappingLayout::NoSpeakers;
        }
        let kind = if catalog.is_empty() {
            ControlKind::FreeText
        } else {
            ControlKind::Choice {
                options: catalog.voices().to_vec(),
                auto: auto_choice.offers_auto(catalog.source()),
            }
        };
        MappingLayout::Controls(
            speakers
                .iter()
                .map(|speaker| VoiceControl {
                    speaker: speaker.clone(),
                    kind: kind.clone(),
                })
                .collect(),
        )
    }

    pub fn controls(&self) -> &[VoiceControl] {
        match self {
            MappingLayout::NoSpeakers => &[],
            MappingLayout::Controls(controls) => controls,
        }
    }
}

/// A UI surface that can display mapping controls and read them back.
pub trait MappingSurface {
    /// Replace everything currently shown with `layout`.
    fn render(&mut self, layout: &MappingLayout) -> Result<()>;

    /// Current `(speaker, value)` of every rendered control.
    fn read_current_values(&self) -> Vec<(String, String)>;
}

/// Drives a [`MappingSurface`] from a speaker list and a catalog.
pub struct MappingEditor<S: MappingSurface> {
    surface: S,
    auto_choice: AutoChoice,
}

impl<S: MappingSurface> MappingEditor<S> {
    pub fn new(surface: S, auto_choice: AutoChoice) -> Self {
        Self {
            surface,
            auto_choice,
        }
    }

    /// Render one control per speaker, discarding any previous controls.
    pub fn render_mapping(&mut self, speakers: &[String], catalog: &VoiceCatalog) -> Result<()> {
        let layout = MappingLayout::build(speakers, catalog, self.auto_choice);
        log::debug!(
            "Rendering voice mapping for {} speakers ({} voices)",
            layout.controls().len(),
            catalog.len()
        );
        self.surface.render(&layout)
    }

    /// Build a fresh mapping from the surface's live values.
    pub fn read_mapping(&self) -> VoiceMapping {
        self.surface.read_current_values().into_iter().collect()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}
