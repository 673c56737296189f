//! Synthesis voice catalog.
//!
//! The catalog is the ordered list of voice identifiers offered for each
//! speaker. It is either the built-in list below or a user-supplied list
//! (config file, `DUBSH_VOICES`, `--voices`). Both are normalized the same
//! way: entries are trimmed, blanks dropped, duplicates keep their first
//! position.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Voices known to the synthesis backend.
pub const BUILTIN_VOICES: &[&str] = &[
    "Achernar",
    "Achird",
    "Algenib",
    "Algieba",
    "Alnilam",
    "Aoede",
    "Autonoe",
    "Callirrhoe",
    "Charon",
    "Despina",
    "Enceladus",
    "Erinome",
    "Fenrir",
    "Gacrux",
    "Iapetus",
    "Kore",
    "Laomedeia",
    "Leda",
    "Orus",
    "Puck",
    "Pulcherrima",
    "Rasalgethi",
    "Sadachbia",
    "Sadaltager",
    "Schedar",
    "Sulafat",
    "Umbriel",
    "Vindemiatrix",
    "Zephyr",
    "Zubenelgenubi",
];

/// Where a catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    Builtin,
    User,
}

/// Ordered set of voice identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCatalog {
    voices: Vec<String>,
    source: CatalogSource,
}

impl VoiceCatalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self {
            voices: BUILTIN_VOICES.iter().map(|v| v.to_string()).collect(),
            source: CatalogSource::Builtin,
        }
    }

    /// A user-supplied catalog. May end up empty, which switches the
    /// mapping editor to free-text entry.
    pub fn from_voices<I, S>(voices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let voices = voices
            .into_iter()
            .filter_map(|v| {
                let v = v.as_ref().trim();
                if v.is_empty() || !seen.insert(v.to_string()) {
                    None
                } else {
                    Some(v.to_string())
                }
            })
            .collect();
        Self {
            voices,
            source: CatalogSource::User,
        }
    }

    /// Parse a comma-separated list such as `"Kore, Puck,,Charon"`.
    pub fn parse_list(list: &str) -> Self {
        Self::from_voices(list.split(','))
    }

    pub fn voices(&self) -> &[String] {
        &self.voices
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn contains(&self, voice: &str) -> bool {
        self.voices.iter().any(|v| v == voice)
    }

    /// Look up a voice by exact name, falling back to a case-insensitive match.
    pub fn find(&self, voice: &str) -> Option<&str> {
        self.voices
            .iter()
            .find(|v| *v == voice)
            .or_else(|| self.voices.iter().find(|v| v.eq_ignore_ascii_case(voice)))
            .map(String::as_str)
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
