//! Newline framing for streamed records.

/// Splits a chunked byte stream into newline-terminated records.
///
/// Bytes are buffered until a `\n` arrives, so a record (or a multi-byte
/// character inside it) may straddle any number of chunk boundaries. Only
/// complete lines are decoded; `\n` never occurs inside a UTF-8 multi-byte
/// sequence, so splitting before decoding is safe. Invalid sequences decode
/// to U+FFFD.
///
/// One framer belongs to one response.
#[derive(Debug, Default)]
pub struct RecordFramer {
    buffer: Vec<u8>,
}

impl RecordFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every record it completed, in order.
    ///
    /// The bytes after the last newline stay buffered.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let Some(last_newline) = chunk.iter().rposition(|&b| b == b'\n') else {
            self.buffer.extend_from_slice(chunk);
            return Vec::new();
        };

        self.buffer.extend_from_slice(&chunk[..last_newline]);
        let complete = std::mem::replace(&mut self.buffer, chunk[last_newline + 1..].to_vec());

        complete
            .split(|&b| b == b'\n')
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Take whatever is buffered after the last newline.
    ///
    /// Called once the stream has ended; a final record is allowed to arrive
    /// without a trailing newline. Returns `None` when nothing is buffered.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }

    /// Number of buffered bytes not yet part of a complete record.
    #[cfg(test)]
    fn pending(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_complete_line() {
        let mut framer = RecordFramer::new();
        assert_eq!(framer.push(b"{\"a\":1}\n"), vec!["{\"a\":1}"]);
        assert_eq!(framer.pending(), 0);
        assert_eq!(framer.finish(), None);
    }

    #[test]
    fn test_partial_line_is_buffered() {
        let mut framer = RecordFramer::new();
        assert!(framer.push(b"{\"ty").is_empty());
        assert_eq!(framer.pending(), 4);
        assert_eq!(framer.push(b"pe\":1}\n"), vec!["{\"type\":1}"]);
    }

    #[test]
    fn test_record_split_across_many_chunks() {
        let mut framer = RecordFramer::new();
        let mut out = Vec::new();
        for byte in b"first\nsecond\n" {
            out.extend(framer.push(&[*byte]));
        }
        assert_eq!(out, vec!["first", "second"]);
    }

    #[test]
    fn test_several_records_in_one_chunk_with_tail() {
        let mut framer = RecordFramer::new();
        assert_eq!(framer.push(b"a\nb\nc"), vec!["a", "b"]);
        assert_eq!(framer.finish(), Some("c".to_string()));
    }

    #[test]
    fn test_empty_lines_are_returned_as_empty_records() {
        let mut framer = RecordFramer::new();
        assert_eq!(framer.push(b"a\n\n\nb\n"), vec!["a", "", "", "b"]);
    }

    #[test]
    fn test_crlf_is_left_for_the_caller_to_trim() {
        let mut framer = RecordFramer::new();
        assert_eq!(framer.push(b"a\r\nb\r\n"), vec!["a\r", "b\r"]);
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let text = "{\"message\":\"Спикер ✓\"}\n";
        let bytes = text.as_bytes();
        // Split inside the two-byte 'С' and inside the three-byte '✓'.
        let first_cut = text.find('С').unwrap() + 1;
        let second_cut = text.find('✓').unwrap() + 2;

        let mut framer = RecordFramer::new();
        assert!(framer.push(&bytes[..first_cut]).is_empty());
        assert!(framer.push(&bytes[first_cut..second_cut]).is_empty());
        let records = framer.push(&bytes[second_cut..]);
        assert_eq!(records, vec!["{\"message\":\"Спикер ✓\"}"]);
    }

    #[test]
    fn test_multibyte_character_split_in_trailing_record() {
        let bytes = "ü".as_bytes();
        let mut framer = RecordFramer::new();
        assert!(framer.push(&bytes[..1]).is_empty());
        assert!(framer.push(&bytes[1..]).is_empty());
        assert_eq!(framer.finish(), Some("ü".to_string()));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut framer = RecordFramer::new();
        assert_eq!(framer.push(b"a\xffb\n"), vec!["a\u{FFFD}b"]);
    }

    #[test]
    fn test_finish_is_empty_after_trailing_newline() {
        let mut framer = RecordFramer::new();
        framer.push(b"x\n");
        assert_eq!(framer.finish(), None);
    }

    #[test]
    fn test_finish_drains_buffer() {
        let mut framer = RecordFramer::new();
        framer.push(b"tail");
        assert_eq!(framer.finish(), Some("tail".to_string()));
        assert_eq!(framer.finish(), None);
    }
}
