//! synoptic-core: a deterministic symbolic-logic extraction pipeline.
//!
//! Text is encoded to an explicit byte representation, tokenized into
//! classified byte spans, matched against a declarative rule set, and the
//! matches are rendered as structured logic statements:
//!
//! ```text
//! text ─▶ Encoding::encode ─▶ tokenize ─▶ Scanner::scan ─▶ Statements
//!              (encoder)      (tokenizer)   (engine)       (statement)
//! ```
//!
//! The whole pipeline is synchronous, deterministic, and free of shared
//! mutable state; see [`process`] for the single public entry point.

use regex::Regex;
use serde::Serialize;

#[macro_use]
mod macros;
mod api;
mod encoder;
mod engine;
mod error;
mod rules;
mod ruleset;
mod statement;
mod tokenizer;

pub use api::{
    MatchSummary, Options, ProcessDetails, ProcessResult, ProcessResultVerbose, TokenSummary,
    default_rules, process, process_verbose_with, process_with,
};
pub use encoder::{ByteSequence, Encoding};
pub use engine::{RuleSet, RuleSummary};
pub use error::{EncodingError, ProcessError, RuleSetError, TokenizationError};
pub use ruleset::{ActionDoc, DEFAULT_PRIORITY, ExplicitMatcher, MatcherDoc, RuleDoc};
pub use statement::{FormatMode, Provenance, Statement};
pub use tokenizer::{TokenDef, TokenizerConfig, UNKNOWN_KIND};

use crate::engine::{InputSignals, RuleId};
use crate::statement::StatementTemplate;

// --- Core types --------------------------------------------------------------

/// Half-open byte range into the encoded input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

/// A classified, offset-addressed run of the encoded input.
///
/// Spans across a token stream are non-overlapping and monotonically
/// increasing, and together cover every byte of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Kind label from the tokenizer configuration, or
    /// [`UNKNOWN_KIND`] for unclassifiable runs.
    pub kind: String,
    /// Byte offsets into the [`ByteSequence`].
    pub span: Span,
    /// The raw byte slice of the run.
    pub bytes: Vec<u8>,
    /// The run decoded back to text; kept alongside the raw bytes so
    /// matching does not re-decode per comparison.
    pub text: String,
    /// Whether the producing definition is a skip class (e.g. whitespace).
    pub skip: bool,
}

/// A single element of a rule pattern.
///
/// Every variant implements one capability:
/// [`matches`](Matcher::matches) aligns the matcher against the token
/// stream at a position and reports how many tokens it consumed plus the
/// captured text. The engine is agnostic to which variant is used; new
/// matcher kinds are added here, not in the scanner.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Match one token by kind name.
    Kind(String),
    /// Match one token whose text equals the literal, ASCII
    /// case-insensitively.
    Literal(String),
    /// Match one token whose text matches the regex.
    Regex(Regex),
    /// Match any one token.
    Any,
}

/// Outcome of a successful matcher alignment.
#[derive(Debug, Clone)]
pub struct MatcherHit {
    /// Number of tokens consumed.
    pub advance: usize,
    /// Captured text for this pattern slot.
    pub text: String,
}

impl Matcher {
    /// Align this matcher against `tokens` at `position`.
    pub fn matches(&self, tokens: &[&Token], position: usize) -> Option<MatcherHit> {
        let token = tokens.get(position)?;
        let aligned = match self {
            Matcher::Kind(kind) => token.kind == *kind,
            Matcher::Literal(literal) => token.text.eq_ignore_ascii_case(literal),
            Matcher::Regex(regex) => regex.is_match(&token.text),
            Matcher::Any => true,
        };
        aligned.then(|| MatcherHit { advance: 1, text: token.text.clone() })
    }
}

/// A compiled parsing rule: an ordered matcher sequence plus the statement
/// to emit on a match.
///
/// Rules are produced by [`RuleSet::compile`] and never mutated afterwards;
/// the activation fields (`required_literals`, `signals`) are derived from
/// the matchers at compile time.
#[derive(Debug)]
pub struct Rule {
    /// Stable identifier, used in provenance and diagnostics.
    pub id: String,
    pub matchers: Vec<Matcher>,
    /// Ordering weight; higher is evaluated first.
    pub priority: u16,
    /// Pattern slots whose text feeds the template, in placeholder order.
    pub(crate) captures: Vec<usize>,
    pub(crate) template: StatementTemplate,
    /// Original template text, for listings.
    pub(crate) template_text: String,
    /// Optional statement class from the action document.
    pub(crate) kind: Option<String>,
    /// Lowercased literal texts that must occur in the input.
    pub(crate) required_literals: Vec<String>,
    /// Byte classes the input must contain.
    pub(crate) signals: InputSignals,
}

/// A rule bound to a concrete span of the token stream.
#[derive(Debug, Clone)]
pub(crate) struct Match {
    pub rule: RuleId,
    /// Half-open index range into the full token stream.
    pub token_span: (usize, usize),
    /// Byte offsets of the matched text.
    pub byte_span: Span,
    /// Matched text per pattern slot.
    pub slots: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: usize) -> Token {
        Token {
            kind: "WORD".to_string(),
            span: Span { start, end: start + text.len() },
            bytes: text.as_bytes().to_vec(),
            text: text.to_string(),
            skip: false,
        }
    }

    #[test]
    fn matcher_variants_align_tokens() {
        let tokens = [word("Hello", 0), word("42nd", 6)];
        let refs: Vec<&Token> = tokens.iter().collect();

        assert!(Matcher::Kind("WORD".to_string()).matches(&refs, 0).is_some());
        assert!(Matcher::Kind("NUMBER".to_string()).matches(&refs, 0).is_none());
        assert!(Matcher::Literal("hello".to_string()).matches(&refs, 0).is_some());
        assert!(Matcher::Literal("hell".to_string()).matches(&refs, 0).is_none());
        assert!(Matcher::Regex(Regex::new("^[0-9]+nd$").unwrap()).matches(&refs, 1).is_some());
        assert!(Matcher::Any.matches(&refs, 1).is_some());
        assert!(Matcher::Any.matches(&refs, 2).is_none(), "past the end never aligns");

        let hit = Matcher::Literal("hello".to_string()).matches(&refs, 0).unwrap();
        assert_eq!(hit.advance, 1);
        assert_eq!(hit.text, "Hello", "captures keep original case");
    }
}
