//! Error taxonomy for the processing pipeline.
//!
//! All three error kinds are fatal and fail-fast: the pipeline either returns
//! a complete [`crate::ProcessResult`] or one of these errors, never a partial
//! result. Unmatched input regions are not an error at all; they are a normal,
//! silent outcome of matching.

use thiserror::Error;

/// Text could not be converted to or from its byte-level representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// A code point in the input has no representation in the configured
    /// encoding. Surfaced instead of silently substituting a replacement.
    #[error("character {ch:?} at byte offset {position} is not representable in {encoding}")]
    Unrepresentable { ch: char, position: usize, encoding: &'static str },

    /// A byte sequence is not valid for the configured encoding.
    #[error("invalid {encoding} byte 0x{byte:02x} at offset {position}")]
    InvalidByte { byte: u8, position: usize, encoding: &'static str },
}

/// The tokenizer configuration is malformed.
///
/// Tokenization itself is total: arbitrary input bytes never produce an
/// error, only `UNKNOWN` tokens. These variants are raised when building a
/// [`crate::TokenizerConfig`], before any input is processed.
#[derive(Debug, Error)]
pub enum TokenizationError {
    #[error("token definition {index} has an empty kind name")]
    EmptyKind { index: usize },

    #[error("token kind {kind:?} is declared more than once (definitions {first} and {second})")]
    DuplicateKind { kind: String, first: usize, second: usize },

    #[error("token kind {kind:?} uses the reserved catch-all name")]
    ReservedKind { kind: String },

    #[error("token kind {kind:?} has an invalid pattern: {source}")]
    InvalidPattern {
        kind: String,
        #[source]
        source: regex::Error,
    },

    /// A definition whose pattern matches the empty string would stall the
    /// left-to-right scan.
    #[error("token kind {kind:?} pattern can match the empty string")]
    EmptyMatch { kind: String },
}

/// The rule set document is malformed or inconsistent.
///
/// Raised while compiling a rule set, before any matching starts. Each
/// variant carries the offending rule's document index and resolved id so the
/// caller can fix the rule set.
#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("rule set document is not valid JSON: {0}")]
    Document(#[from] serde_json::Error),

    #[error("rule {index} ({id}): pattern is empty")]
    EmptyPattern { index: usize, id: String },

    #[error("rule {index} ({id}): pattern references undefined token kind {kind:?}")]
    UnknownTokenKind { index: usize, id: String, kind: String },

    #[error("rule {index} ({id}): invalid regex matcher: {source}")]
    InvalidMatcher {
        index: usize,
        id: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule {index} ({id}): priority {priority} is outside 0..=100")]
    PriorityOutOfRange { index: usize, id: String, priority: i64 },

    #[error("rule {index} ({id}): capture slot {slot} is out of range for a {pattern_len}-element pattern")]
    CaptureOutOfRange { index: usize, id: String, slot: usize, pattern_len: usize },

    #[error("rule {index} ({id}): invalid statement template: {detail}")]
    InvalidTemplate { index: usize, id: String, detail: String },

    #[error("rule id {id:?} is declared more than once (rules {first} and {second})")]
    DuplicateId { id: String, first: usize, second: usize },
}

/// Unified error for [`crate::process`] and friends.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Tokenization(#[from] TokenizationError),

    #[error(transparent)]
    RuleSet(#[from] RuleSetError),
}
