//! Speaker label extraction.
//!
//! A speaker header is a line of the form `<label> <HH:MM:SS>`. Every other
//! line is transcript text and is ignored here.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Header line: shortest label followed by whitespace and a trailing
/// `HH:MM:SS` timestamp. `[0-9]` rather than `\d` keeps the timestamp ASCII.
static SPEAKER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    // SAFETY: hardcoded pattern, always valid
    #[allow(clippy::expect_used)]
    Regex::new(r"^(?P<speaker>.+?)\s+(?P<ts>[0-9]{2}:[0-9]{2}:[0-9]{2})\s*$")
        .expect("hardcoded speaker line pattern")
});

/// Parse a single transcript line as a speaker header.
///
/// Returns `(label, timestamp)` when the trimmed line matches, `None`
/// otherwise. The label is trimmed and never empty.
pub fn parse_speaker_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let caps = SPEAKER_LINE.captures(line)?;
    let speaker = caps.name("speaker")?.as_str().trim();
    let ts = caps.name("ts")?.as_str();
    if speaker.is_empty() {
        return None;
    }
    Some((speaker, ts))
}

/// Extract the unique speaker labels of a transcript in discovery order.
///
/// Lines are split on `\n` (with an optional preceding `\r`). Non-matching
/// lines are skipped silently. Duplicates keep their first position.
pub fn extract_speakers(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut speakers = Vec::new();

    for line in text.lines() {
        if let Some((speaker, _)) = parse_speaker_line(line)
            && seen.insert(speaker)
        {
            speakers.push(speaker.to_string());
        }
    }

    speakers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_unique_speakers_in_order() {
        let text = "Alice 00:01:23\nBob 00:02:00\nAlice 00:03:00\n";
        assert_eq!(extract_speakers(text), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_no_speaker_lines_yields_empty() {
        assert!(extract_speakers("not a speaker line\n\n   \n").is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty() {
        assert!(extract_speakers("").is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "Alice 00:00:01\r\nHello\r\nBob 00:00:05\r\nHi\r\n";
        assert_eq!(extract_speakers(text), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_label_with_spaces_and_digits() {
        let text = "Speaker 1 00:00:00\nHello there.\nSpeaker 2 00:00:05\nGeneral Kenobi.";
        assert_eq!(extract_speakers(text), vec!["Speaker 1", "Speaker 2"]);
    }

    #[test]
    fn test_non_ascii_labels() {
        let text = "Спикер 1 00:00:00\nПривет\nСпикер 2 00:00:05\n";
        assert_eq!(extract_speakers(text), vec!["Спикер 1", "Спикер 2"]);
    }

    #[test]
    fn test_only_trailing_timestamp_counts() {
        // The label may itself contain a timestamp-like token.
        let text = "Call 10:00:00 recap 00:01:02\n";
        assert_eq!(extract_speakers(text), vec!["Call 10:00:00 recap"]);

        let text = "Host 12:00:00 00:00:07";
        assert_eq!(extract_speakers(text), vec!["Host 12:00:00"]);
    }

    #[test]
    fn test_label_with_colons() {
        let text = "Dr. Who: narrator 01:02:03";
        assert_eq!(extract_speakers(text), vec!["Dr. Who: narrator"]);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let text = "   Alice    00:00:01   \n\tBob\t00:00:02\t";
        assert_eq!(extract_speakers(text), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_malformed_timestamps_are_ignored() {
        let text = "Alice 0:01:23\nBob 00:02\nCarol 000:00:01\nDave 00:00:0a\nEve00:00:01\n";
        assert!(
            extract_speakers(text).is_empty(),
            "none of these lines is a valid header"
        );
    }

    #[test]
    fn test_bare_timestamp_is_not_a_speaker() {
        assert!(extract_speakers("00:00:01\n  00:00:02").is_empty());
    }

    #[test]
    fn test_text_after_timestamp_is_not_a_header() {
        assert!(extract_speakers("Alice 00:00:01 says hi").is_empty());
    }

    #[test]
    fn test_idempotent() {
        let text = "B 00:00:01\nA 00:00:02\nB 00:00:03\nC 00:00:04\nA 00:00:05";
        let first = extract_speakers(text);
        let second = extract_speakers(text);
        assert_eq!(first, second);
        assert_eq!(first, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_no_residual_state_between_calls() {
        assert_eq!(extract_speakers("Alice 00:00:01"), vec!["Alice"]);
        assert_eq!(extract_speakers("Bob 00:00:01"), vec!["Bob"]);
        assert_eq!(extract_speakers("Alice 00:00:09"), vec!["Alice"]);
    }

    #[test]
    fn test_first_occurrence_order_holds() {
        let text = "C 00:00:01\nA 00:00:02\nC 00:00:03\nB 00:00:04\nA 00:00:05\nD 00:00:06";
        let speakers = extract_speakers(text);
        let lines: Vec<&str> = text.lines().collect();
        let first_line = |label: &str| {
            lines
                .iter()
                .position(|l| parse_speaker_line(l).map(|(s, _)| s) == Some(label))
                .unwrap()
        };
        for pair in speakers.windows(2) {
            assert!(first_line(pair[0].as_str()) < first_line(pair[1].as_str()));
        }
        let unique: HashSet<_> = speakers.iter().collect();
        assert_eq!(unique.len(), speakers.len());
    }

    #[test]
    fn test_parse_speaker_line_returns_timestamp() {
        assert_eq!(
            parse_speaker_line("  Alice 00:01:23 "),
            Some(("Alice", "00:01:23"))
        );
        assert_eq!(parse_speaker_line("Hello world"), None);
        assert_eq!(parse_speaker_line(""), None);
    }
}
