//! Server-sent event stream decoding
//!
//! Transports deliver response bodies in arbitrarily sized chunks with no
//! relation to event boundaries. [`SseDecoder`] reassembles the `data: `
//! event lines out of that byte stream and extracts the vendor-specific
//! text delta from each complete line.

use crate::protocol;
use crate::types::ProtocolKind;

const DATA_PREFIX: &str = "data: ";
/// End-of-stream payload sent by OpenAI-style backends
const DONE_SENTINEL: &str = "[DONE]";

/// Incremental decoder for one streaming response
///
/// Invariants: a line split across chunk boundaries is carried in the
/// residual buffer and never parsed early or dropped; byte-level chunking
/// of the input never changes the emitted delta sequence; a malformed event
/// line yields no delta and decoding continues (heartbeat and ping frames
/// fall out the same way).
#[derive(Debug)]
pub struct SseDecoder {
    protocol: ProtocolKind,
    /// Bytes of an incomplete trailing UTF-8 sequence
    pending: Vec<u8>,
    /// Text of the current incomplete line
    residual: String,
    done: bool,
}

impl SseDecoder {
    pub fn new(protocol: ProtocolKind) -> Self {
        Self {
            protocol,
            pending: Vec::new(),
            residual: String::new(),
            done: false,
        }
    }

    /// Whether the OpenAI `[DONE]` sentinel has been seen
    ///
    /// Informational: the read loop keeps draining the transport until it
    /// closes on its own, matching how backends actually end the stream.
    pub fn saw_done(&self) -> bool {
        self.done
    }

    /// Feed one transport chunk, returning the deltas it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        self.decode_pending();

        let mut deltas = Vec::new();
        while let Some(newline) = self.residual.find('\n') {
            let line: String = self.residual.drain(..=newline).collect();
            if let Some(delta) = self.decode_line(line.trim()) {
                deltas.push(delta);
            }
        }
        deltas
    }

    /// Flush the residual buffer at transport end-of-stream
    pub fn finish(&mut self) -> Vec<String> {
        if !self.pending.is_empty() {
            let tail = std::mem::take(&mut self.pending);
            self.residual.push_str(&String::from_utf8_lossy(&tail));
        }

        let line = std::mem::take(&mut self.residual);
        let mut deltas = Vec::new();
        if let Some(delta) = self.decode_line(line.trim()) {
            deltas.push(delta);
        }
        deltas
    }

    /// Move the longest valid UTF-8 prefix of `pending` into `residual`
    ///
    /// An incomplete trailing sequence stays buffered until the next chunk
    /// completes it; invalid bytes decode to U+FFFD and are skipped.
    fn decode_pending(&mut self) {
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    self.residual.push_str(text);
                    self.pending.clear();
                    return;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    self.residual
                        .push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match err.error_len() {
                        Some(invalid) => {
                            self.residual.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + invalid);
                        }
                        None => {
                            self.pending.drain(..valid);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn decode_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return None;
        }
        let payload = line.strip_prefix(DATA_PREFIX)?.trim();

        if self.protocol == ProtocolKind::OpenAi && payload == DONE_SENTINEL {
            self.done = true;
            return None;
        }

        let delta = protocol::stream_delta(self.protocol, payload)?;
        if delta.is_empty() {
            None
        } else {
            Some(delta)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(protocol: ProtocolKind, chunks: &[&[u8]]) -> Vec<String> {
        let mut decoder = SseDecoder::new(protocol);
        let mut deltas = Vec::new();
        for chunk in chunks {
            deltas.extend(decoder.feed(chunk));
        }
        deltas.extend(decoder.finish());
        deltas
    }

    #[test]
    fn openai_stream_with_done_sentinel() {
        let mut decoder = SseDecoder::new(ProtocolKind::OpenAi);
        let mut deltas = decoder.feed(b"data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n");
        deltas.extend(decoder.feed(b"data: [DONE]\n\n"));
        deltas.extend(decoder.finish());

        assert_eq!(deltas, vec!["Hi"]);
        assert!(decoder.saw_done());
    }

    #[test]
    fn malformed_line_does_not_abort_decoding() {
        let deltas = decode_all(
            ProtocolKind::OpenAi,
            &[b"data: not-json\ndata: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n".as_slice()],
        );
        assert_eq!(deltas, vec!["ok"]);
    }

    #[test]
    fn chunk_boundary_invariance() {
        let raw: &[u8] = b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n\
                          data: {\"choices\":[{\"delta\":{\"content\":\"lo \\u00e9!\"}}]}\n\n\
                          data: [DONE]\n\n";

        let whole = decode_all(ProtocolKind::OpenAi, &[raw]);
        let byte_at_a_time: Vec<&[u8]> = raw.chunks(1).collect();
        let fragmented = decode_all(ProtocolKind::OpenAi, &byte_at_a_time);

        assert_eq!(whole, vec!["Hel", "lo \u{e9}!"]);
        assert_eq!(fragmented, whole);
    }

    #[test]
    fn multibyte_utf8_split_across_chunks() {
        // "é" in the raw payload bytes, split mid-sequence.
        let raw = "data: {\"choices\":[{\"delta\":{\"content\":\"é\"}}]}\n".as_bytes();
        // Lands between the two bytes of the é sequence.
        let split = raw.len() - 7;
        let deltas = decode_all(ProtocolKind::OpenAi, &[&raw[..split], &raw[split..]]);
        assert_eq!(deltas, vec!["é"]);
    }

    #[test]
    fn round_trip_concatenation() {
        let deltas = decode_all(
            ProtocolKind::OpenAi,
            &[
                b"data: {\"choices\":[{\"delta\":{\"content\":\"one \"}}]}\n".as_slice(),
                b"data: {\"choices\":[{\"delta\":{\"content\":\"two \"}}]}\n".as_slice(),
                b"data: {\"choices\":[{\"delta\":{\"content\":\"three\"}}]}\n".as_slice(),
            ],
        );
        assert_eq!(deltas.concat(), "one two three");
    }

    #[test]
    fn non_data_lines_are_skipped() {
        let deltas = decode_all(
            ProtocolKind::OpenAi,
            &[b"event: ping\n: keepalive\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n".as_slice()],
        );
        assert_eq!(deltas, vec!["x"]);
    }

    #[test]
    fn residual_without_trailing_newline_flushes_on_finish() {
        let mut decoder = SseDecoder::new(ProtocolKind::OpenAi);
        let deltas = decoder.feed(b"data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}");
        assert!(deltas.is_empty());
        assert_eq!(decoder.finish(), vec!["tail"]);
    }

    #[test]
    fn empty_deltas_are_dropped() {
        let deltas = decode_all(
            ProtocolKind::OpenAi,
            &[b"data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n".as_slice()],
        );
        assert!(deltas.is_empty());
    }

    #[test]
    fn anthropic_frames() {
        let deltas = decode_all(
            ProtocolKind::Anthropic,
            &[
                b"data: {\"type\":\"message_start\",\"message\":{}}\n".as_slice(),
                b"data: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\"Hel\"}}\n".as_slice(),
                b"data: {\"type\":\"ping\"}\n".as_slice(),
                b"data: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\"lo\"}}\n".as_slice(),
                b"data: {\"type\":\"message_stop\"}\n".as_slice(),
            ],
        );
        assert_eq!(deltas, vec!["Hel", "lo"]);
    }

    #[test]
    fn google_frames() {
        let deltas = decode_all(
            ProtocolKind::Google,
            &[b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hi\"}]}}]}\n".as_slice()],
        );
        assert_eq!(deltas, vec!["Hi"]);
    }

    #[test]
    fn done_sentinel_is_openai_specific() {
        let mut decoder = SseDecoder::new(ProtocolKind::Anthropic);
        decoder.feed(b"data: [DONE]\n");
        assert!(!decoder.saw_done());
    }
}
