//! Speaker segment preview.
//!
//! Groups transcript text under the speaker header that precedes it, the same
//! way the backend splits a transcript before translation. Used to show how
//! many turns each speaker has before anything is uploaded.

use crate::transcript::speakers::parse_speaker_line;

/// One speaker turn: the header plus the text lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub speaker: String,
    pub timestamp: String,
    /// Text lines of the turn, trimmed and joined with `\n`.
    pub text: String,
}

/// Split a transcript into speaker segments.
///
/// Text before the first header is dropped, as are headers with no text
/// before the next header.
pub fn parse_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current: Option<(String, String)> = None;
    let mut lines: Vec<&str> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((speaker, ts)) = parse_speaker_line(line) {
            flush_segment(&mut segments, current.take(), &mut lines);
            current = Some((speaker.to_string(), ts.to_string()));
        } else {
            lines.push(line);
        }
    }
    flush_segment(&mut segments, current, &mut lines);

    segments
}

fn flush_segment(
    segments: &mut Vec<Segment>,
    header: Option<(String, String)>,
    lines: &mut Vec<&str>,
) {
    if let Some((speaker, timestamp)) = header
        && !lines.is_empty()
    {
        segments.push(Segment {
            speaker,
            timestamp,
            text: lines.join("\n"),
        });
    }
    lines.clear();
}

/// Count turns per speaker, in order of first appearance.
pub fn speaker_turns(segments: &[Segment]) -> Vec<(String, usize)> {
    let mut turns: Vec<(String, usize)> = Vec::new();
    for segment in segments {
        match turns.iter_mut().find(|(s, _)| *s == segment.speaker) {
            Some((_, count)) => *count += 1,
            None => turns.push((segment.speaker.clone(), 1)),
        }
    }
    turns
}
