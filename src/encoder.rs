//! Byte-level encoding of input text.
//!
//! The pipeline operates on an explicit byte representation of its input
//! rather than on `&str` directly: token offsets, match spans, and statement
//! provenance are all byte-addressed into the [`ByteSequence`] produced here.
//!
//! The encoding is configurable. UTF-8 is the default; ASCII and Latin-1 are
//! supported for inputs that must round-trip through single-byte protocols.
//! Conversion is strict in both directions: a code point the encoding cannot
//! represent, or a byte sequence the encoding cannot decode, is surfaced as an
//! [`EncodingError`] instead of being replaced.
//!
//! Invariant: `decode(encode(text)) == text` for every `text` the encoding
//! can represent.

use std::collections::HashMap;

use crate::error::EncodingError;

/// Supported byte encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
}

impl Encoding {
    /// Canonical name, as accepted by [`Encoding::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Ascii => "ascii",
            Encoding::Latin1 => "latin-1",
        }
    }

    /// Look up an encoding by name. Accepts the common aliases.
    pub fn from_name(name: &str) -> Option<Encoding> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Encoding::Utf8),
            "ascii" | "us-ascii" => Some(Encoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" => Some(Encoding::Latin1),
            _ => None,
        }
    }

    /// Encode `text` into its byte-level representation.
    pub fn encode(self, text: &str) -> Result<ByteSequence, EncodingError> {
        let bytes = match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Ascii => {
                for (position, ch) in text.char_indices() {
                    if !ch.is_ascii() {
                        return Err(EncodingError::Unrepresentable { ch, position, encoding: self.name() });
                    }
                }
                text.as_bytes().to_vec()
            }
            Encoding::Latin1 => {
                let mut out = Vec::with_capacity(text.len());
                for (position, ch) in text.char_indices() {
                    let code = ch as u32;
                    if code > 0xFF {
                        return Err(EncodingError::Unrepresentable { ch, position, encoding: self.name() });
                    }
                    out.push(code as u8);
                }
                out
            }
        };
        Ok(ByteSequence { bytes, encoding: self })
    }

    /// Decode `bytes` back into text.
    pub fn decode(self, bytes: &[u8]) -> Result<String, EncodingError> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|err| {
                let position = err.utf8_error().valid_up_to();
                EncodingError::InvalidByte { byte: err.as_bytes()[position], position, encoding: self.name() }
            }),
            Encoding::Ascii => {
                for (position, &byte) in bytes.iter().enumerate() {
                    if !byte.is_ascii() {
                        return Err(EncodingError::InvalidByte { byte, position, encoding: self.name() });
                    }
                }
                Ok(bytes.iter().map(|&b| b as char).collect())
            }
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }

    /// Best-effort decode for token text. Never fails; undecodable bytes
    /// become U+FFFD. The raw bytes on the token stay authoritative.
    pub(crate) fn decode_lossy(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Encoding::Ascii => bytes.iter().map(|&b| if b.is_ascii() { b as char } else { '\u{FFFD}' }).collect(),
            Encoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }

    /// Width in bytes of the character starting at `position`.
    ///
    /// Used by the tokenizer to advance through unclassified runs without
    /// splitting a multi-byte character. Clamped to the remaining input.
    pub(crate) fn char_width(self, bytes: &[u8], position: usize) -> usize {
        let remaining = bytes.len().saturating_sub(position);
        if remaining == 0 {
            return 0;
        }
        let width = match self {
            Encoding::Ascii | Encoding::Latin1 => 1,
            Encoding::Utf8 => {
                let lead = bytes[position];
                if lead < 0x80 {
                    1
                } else if lead & 0xE0 == 0xC0 {
                    2
                } else if lead & 0xF0 == 0xE0 {
                    3
                } else if lead & 0xF8 == 0xF0 {
                    4
                } else {
                    // Continuation or invalid lead byte; step one byte.
                    1
                }
            }
        };
        width.min(remaining)
    }
}

/// An ordered, immutable sequence of bytes derived from input text.
///
/// Only [`Encoding::encode`] constructs one, so the bytes are always valid
/// for their encoding. The sequence is owned by a single pipeline invocation
/// and discarded once tokenization is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteSequence {
    bytes: Vec<u8>,
    encoding: Encoding,
}

impl ByteSequence {
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Decode the full sequence back to text.
    pub fn decode(&self) -> Result<String, EncodingError> {
        self.encoding.decode(&self.bytes)
    }

    /// Sliding windows of `size` consecutive bytes.
    pub fn byte_patterns(&self, size: usize) -> Vec<&[u8]> {
        if size == 0 || size > self.bytes.len() {
            return Vec::new();
        }
        self.bytes.windows(size).collect()
    }

    /// Histogram of byte values in the sequence.
    pub fn byte_frequency(&self) -> HashMap<u8, usize> {
        let mut frequency = HashMap::new();
        for &byte in &self.bytes {
            *frequency.entry(byte).or_insert(0) += 1;
        }
        frequency
    }
}
