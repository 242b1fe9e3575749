//! Chunk-boundary-safe decoding of an SSE byte stream into text lines.
//!
//! Network chunks arrive at arbitrary offsets: a multi-byte UTF-8 sequence
//! or a line may be cut anywhere, including in the middle of a JSON token.
//! [`SseLineDecoder`] therefore keeps two buffers across `push` calls:
//!
//! * a **byte tail** holding an incomplete UTF-8 sequence from the end of
//!   the previous chunk, and
//! * a **line buffer** holding the decoded text of the current, not yet
//!   terminated line.
//!
//! Feeding the same payload in one chunk or split at every single byte
//! yields the identical sequence of lines.

/// Stateful bytes→lines decoder for one SSE stream.
///
/// Not restartable: once [`Self::finish`] consumes the decoder, the stream
/// is over.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    bytes: Vec<u8>,
    line: String,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every line completed by it, in order.
    ///
    /// A trailing `\r` is stripped so both `\n` and `\r\n` terminated
    /// streams produce the same lines. The terminator itself is never part
    /// of a returned line.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.bytes.extend_from_slice(chunk);
        self.decode_pending();
        self.drain_lines()
    }

    /// Flush the decoder at end of stream.
    ///
    /// Returns the final unterminated line, if any. A dangling incomplete
    /// UTF-8 sequence decodes to U+FFFD at this point, the same thing a
    /// streaming text decoder does when flushed.
    pub fn finish(mut self) -> Option<String> {
        if !self.bytes.is_empty() {
            self.line.push_str(&String::from_utf8_lossy(&self.bytes));
        }
        if self.line.is_empty() {
            None
        } else {
            Some(self.line)
        }
    }

    /// Move every decodable byte into the line buffer, keeping only an
    /// incomplete trailing sequence (at most 3 bytes) for the next chunk.
    /// Invalid runs in the middle decode to U+FFFD and are skipped.
    fn decode_pending(&mut self) {
        loop {
            match std::str::from_utf8(&self.bytes) {
                Ok(valid) => {
                    self.line.push_str(valid);
                    self.bytes.clear();
                    return;
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    let valid = std::str::from_utf8(&self.bytes[..valid_up_to])
                        .expect("prefix up to valid_up_to is valid UTF-8");
                    self.line.push_str(valid);

                    match err.error_len() {
                        // Incomplete sequence at the end of the buffer.
                        None => {
                            self.bytes.drain(..valid_up_to);
                            return;
                        }
                        Some(invalid_len) => {
                            self.line.push('\u{FFFD}');
                            self.bytes.drain(..valid_up_to + invalid_len);
                        }
                    }
                }
            }
        }
    }

    fn drain_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(newline) = self.line.find('\n') {
            let mut complete: String = self.line.drain(..=newline).collect();
            complete.pop();
            if complete.ends_with('\r') {
                complete.pop();
            }
            lines.push(complete);
        }
        lines
    }
}
