//! Incremental bytes-to-text decoding.
//!
//! One decoder instance lives for the whole read loop: a multi-byte character
//! may legitimately span a chunk boundary, so the trailing incomplete
//! sequence of each chunk is carried into the next decode call instead of
//! being decoded in isolation (which would corrupt it to U+FFFD).

use std::borrow::Cow;

/// Streaming UTF-8 decoder carrying partial sequences across chunks.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    // At most 3 pending bytes: the longest incomplete UTF-8 prefix.
    carry: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, returning all complete characters.
    ///
    /// Invalid interior bytes become U+FFFD; an incomplete trailing sequence
    /// is held back until the next chunk or [`flush`](Self::flush).
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let buf: Cow<'_, [u8]> = if self.carry.is_empty() {
            Cow::Borrowed(chunk)
        } else {
            let mut joined = std::mem::take(&mut self.carry);
            joined.extend_from_slice(chunk);
            Cow::Owned(joined)
        };

        let mut out = String::with_capacity(buf.len());
        let mut rest: &[u8] = &buf;
        while !rest.is_empty() {
            match std::str::from_utf8(rest) {
                Ok(s) => {
                    out.push_str(s);
                    break;
                }
                Err(err) => {
                    let (valid, tail) = rest.split_at(err.valid_up_to());
                    if let Ok(s) = std::str::from_utf8(valid) {
                        out.push_str(s);
                    }
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[len..];
                        }
                        None => {
                            // Incomplete trailing sequence; defer to next chunk.
                            self.carry = tail.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush at end-of-stream. A dangling partial sequence decodes to U+FFFD.
    pub fn flush(&mut self) -> String {
        if self.carry.is_empty() {
            String::new()
        } else {
            self.carry.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_passes_through() {
        let mut dec = Utf8StreamDecoder::new();
        assert_eq!(dec.decode(b"hello"), "hello");
        assert_eq!(dec.flush(), "");
    }

    #[test]
    fn two_byte_char_split_at_chunk_boundary() {
        let mut dec = Utf8StreamDecoder::new();
        let bytes = "café".as_bytes();
        let mut text = dec.decode(&bytes[..4]);
        text.push_str(&dec.decode(&bytes[4..]));
        text.push_str(&dec.flush());
        assert_eq!(text, "café");
    }

    #[test]
    fn four_byte_char_split_across_three_chunks() {
        let mut dec = Utf8StreamDecoder::new();
        let bytes = "🦀".as_bytes();
        let mut text = String::new();
        text.push_str(&dec.decode(&bytes[..1]));
        text.push_str(&dec.decode(&bytes[1..3]));
        text.push_str(&dec.decode(&bytes[3..]));
        assert_eq!(text, "🦀");
    }

    #[test]
    fn invalid_interior_byte_becomes_replacement() {
        let mut dec = Utf8StreamDecoder::new();
        assert_eq!(dec.decode(b"a\xFFb"), "a\u{FFFD}b");
    }

    #[test]
    fn dangling_partial_sequence_flushes_to_replacement() {
        let mut dec = Utf8StreamDecoder::new();
        assert_eq!(dec.decode(&[0xC3]), "");
        assert_eq!(dec.flush(), "\u{FFFD}");
    }
}
