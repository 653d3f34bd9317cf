//! Incremental frame decoder.
//!
//! Network reads deliver the response body in arbitrary chunks: a chunk may
//! end in the middle of a line, or in the middle of a multi-byte UTF-8
//! character. [`LineBuffer`] keeps the unfinished tail as raw bytes and only
//! decodes complete lines, so feeding a body in any number of pieces yields
//! exactly the same lines as feeding it at once.
//!
//! [`FrameDecoder`] sits on top and turns lines into [`StreamFrame`]s.

use super::frame::StreamFrame;

/// Splits a byte stream into text lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk and return every line completed by it.
    ///
    /// Lines are returned without the `\n` terminator; a trailing `\r` is
    /// stripped as well.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        // `\n` never occurs inside a multi-byte sequence, so everything up to
        // the last newline consists of whole characters.
        let Some(last_newline) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };

        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        complete[..complete.len() - 1]
            .split(|b| *b == b'\n')
            .map(decode_line)
            .collect()
    }

    /// Flush whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(decode_line(&rest))
    }

    /// Number of bytes waiting for a line terminator.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Result of decoding one frame line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedLine {
    Frame(StreamFrame),
    /// A `data:` line whose payload could not be parsed. Carries the line.
    Malformed(String),
}

/// Turns raw response bytes into stream frames.
///
/// Once the `[DONE]` sentinel has been decoded, the decoder is finished and
/// ignores any further input.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    lines: LineBuffer,
    done: bool,
    malformed: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a newly received chunk.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<DecodedLine> {
        if self.done {
            return Vec::new();
        }
        let lines = self.lines.push(chunk);
        self.decode_lines(lines)
    }

    /// Decode whatever is left after the transport has closed.
    pub fn finish(&mut self) -> Vec<DecodedLine> {
        if self.done {
            return Vec::new();
        }
        let tail: Vec<String> = self.lines.finish().into_iter().collect();
        self.decode_lines(tail)
    }

    /// True once the terminal sentinel has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of malformed frames dropped so far.
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    fn decode_lines(&mut self, lines: Vec<String>) -> Vec<DecodedLine> {
        let mut decoded = Vec::new();
        for line in lines {
            match StreamFrame::parse_line(&line) {
                None => {}
                Some(Ok(StreamFrame::Done)) => {
                    self.done = true;
                    decoded.push(DecodedLine::Frame(StreamFrame::Done));
                    break;
                }
                Some(Ok(frame)) => decoded.push(DecodedLine::Frame(frame)),
                Some(Err(_)) => {
                    self.malformed += 1;
                    decoded.push(DecodedLine::Malformed(line));
                }
            }
        }
        decoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str =
        "data: {\"content\":\"Hel\"}\n\ndata: {\"content\":\"lo!\"}\n\ndata: [DONE]\n\n";

    fn content_of(decoded: &[DecodedLine]) -> String {
        decoded
            .iter()
            .filter_map(|d| match d {
                DecodedLine::Frame(StreamFrame::Content(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn decode_in_pieces(body: &[u8], sizes: &[usize]) -> (String, bool, usize) {
        let mut decoder = FrameDecoder::new();
        let mut decoded = Vec::new();
        let mut offset = 0;
        let mut i = 0;
        while offset < body.len() {
            let size = sizes[i % sizes.len()].max(1);
            let end = (offset + size).min(body.len());
            decoded.extend(decoder.feed(&body[offset..end]));
            offset = end;
            i += 1;
        }
        decoded.extend(decoder.finish());
        (content_of(&decoded), decoder.is_done(), decoder.malformed())
    }

    #[test]
    fn line_buffer_holds_partial_line() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"data: {\"con").is_empty());
        assert_eq!(buffer.pending_len(), 11);
        let lines = buffer.push(b"tent\":\"x\"}\n\n");
        assert_eq!(lines, vec!["data: {\"content\":\"x\"}".to_string(), String::new()]);
        assert_eq!(buffer.pending_len(), 0);
    }

    #[test]
    fn line_buffer_strips_carriage_return() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b"data: a\r\n"), vec!["data: a".to_string()]);
    }

    #[test]
    fn line_buffer_finish_flushes_tail() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"data: [DONE]");
        assert_eq!(buffer.finish(), Some("data: [DONE]".to_string()));
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn decodes_scenario_in_one_read() {
        let mut decoder = FrameDecoder::new();
        let decoded = decoder.feed(SCENARIO.as_bytes());
        assert_eq!(content_of(&decoded), "Hello!");
        assert!(decoder.is_done());
        assert_eq!(decoded.last(), Some(&DecodedLine::Frame(StreamFrame::Done)));
    }

    #[test]
    fn any_split_point_yields_same_text() {
        let body = SCENARIO.as_bytes();
        for split in 0..=body.len() {
            let mut decoder = FrameDecoder::new();
            let mut decoded = decoder.feed(&body[..split]);
            decoded.extend(decoder.feed(&body[split..]));
            decoded.extend(decoder.finish());
            assert_eq!(content_of(&decoded), "Hello!", "split at {}", split);
            assert!(decoder.is_done());
        }
    }

    #[test]
    fn splits_inside_multibyte_characters_are_reassembled() {
        let body = format!(
            "{}{}{}",
            StreamFrame::content("héllo ").encode(),
            StreamFrame::content("wörld 👋").encode(),
            StreamFrame::Done.encode()
        );
        let cases: [&[usize]; 5] = [&[1], &[2], &[3], &[5, 1, 7], &[13, 2]];
        for sizes in cases {
            let (text, done, malformed) = decode_in_pieces(body.as_bytes(), sizes);
            assert_eq!(text, "héllo wörld 👋", "chunk sizes {:?}", sizes);
            assert!(done);
            assert_eq!(malformed, 0);
        }
    }

    #[test]
    fn malformed_frame_is_skipped() {
        let body = concat!(
            "data: {\"content\":\"Hel\"}\n\n",
            "data: {\"content\": oops}\n\n",
            "data: {\"content\":\"lo!\"}\n\n",
            "data: [DONE]\n\n"
        );
        let mut decoder = FrameDecoder::new();
        let decoded = decoder.feed(body.as_bytes());

        assert_eq!(content_of(&decoded), "Hello!");
        assert_eq!(decoder.malformed(), 1);
        assert!(matches!(decoded[1], DecodedLine::Malformed(_)));
    }

    #[test]
    fn input_after_done_is_ignored() {
        let mut decoder = FrameDecoder::new();
        decoder.feed(b"data: [DONE]\n\ndata: {\"content\":\"late\"}\n\n");
        assert!(decoder.feed(b"data: {\"content\":\"later\"}\n\n").is_empty());
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn unterminated_last_frame_is_decoded_on_finish() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(b"data: {\"content\":\"tail\"}").is_empty());
        let decoded = decoder.finish();
        assert_eq!(content_of(&decoded), "tail");
        assert!(!decoder.is_done());
    }

    #[test]
    fn non_data_lines_are_ignored() {
        let mut decoder = FrameDecoder::new();
        let decoded = decoder.feed(b": ping\n\nevent: x\ndata: {\"content\":\"a\"}\n\n");
        assert_eq!(decoded, vec![DecodedLine::Frame(StreamFrame::content("a"))]);
        assert_eq!(decoder.malformed(), 0);
    }
}
