//! Tokenization of the encoded byte sequence.
//!
//! The tokenizer classifies every byte of its input into exactly one token:
//! a run matched by one of the configured definitions, a run of whitespace
//! (classified, marked `skip`, never silently dropped), or an `UNKNOWN`
//! catch-all run for bytes no definition covers. Token spans therefore
//! partition the input with no gaps and no overlaps, for any input.
//!
//! Definitions are ordered and regex-driven over raw bytes
//! (`regex::bytes`); at each position the first definition that matches
//! wins. All configuration problems are caught when the
//! [`TokenizerConfig`] is built — `tokenize` itself cannot fail.
//!
//! ```text
//! bytes: h e l l o ␠ w o r l d !
//!        └─WORD──┘ └WS┘ └─WORD─┘PUNCT
//! ```

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::encoder::ByteSequence;
use crate::error::TokenizationError;
use crate::{Span, Token};

/// Reserved kind assigned to byte runs no definition matches.
pub const UNKNOWN_KIND: &str = "UNKNOWN";

/// A declarative token class: a kind name and a byte-level regex.
///
/// Definitions marked `skip` still produce tokens (explicit classification),
/// but those tokens are excluded from the matching stream.
#[derive(Debug, Clone)]
pub struct TokenDef {
    pub kind: String,
    pub pattern: String,
    pub skip: bool,
}

impl TokenDef {
    pub fn new(kind: impl Into<String>, pattern: impl Into<String>) -> Self {
        TokenDef { kind: kind.into(), pattern: pattern.into(), skip: false }
    }

    /// A definition whose tokens are classified but not matched against.
    pub fn skip(kind: impl Into<String>, pattern: impl Into<String>) -> Self {
        TokenDef { kind: kind.into(), pattern: pattern.into(), skip: true }
    }
}

#[derive(Debug, Clone)]
struct CompiledDef {
    kind: String,
    regex: Regex,
    skip: bool,
}

/// Validated, ordered token definitions.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    defs: Vec<CompiledDef>,
}

static DEFAULT_CONFIG: Lazy<TokenizerConfig> = Lazy::new(|| {
    TokenizerConfig::new(vec![
        TokenDef::new("WORD", r"[A-Za-z][A-Za-z0-9_]*"),
        TokenDef::new("NUMBER", r"[0-9]+(?:\.[0-9]+)?"),
        TokenDef::new("PUNCT", r"[!-/:-@\[-`{-~]"),
        TokenDef::skip("WS", r"[ \t\r\n]+"),
    ])
    .expect("builtin token definitions are valid")
});

impl Default for TokenizerConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl TokenizerConfig {
    /// Build a configuration, validating every definition up front.
    pub fn new(defs: Vec<TokenDef>) -> Result<Self, TokenizationError> {
        let mut compiled = Vec::with_capacity(defs.len());
        for (index, def) in defs.into_iter().enumerate() {
            if def.kind.is_empty() {
                return Err(TokenizationError::EmptyKind { index });
            }
            if def.kind == UNKNOWN_KIND {
                return Err(TokenizationError::ReservedKind { kind: def.kind });
            }
            if let Some(first) = compiled.iter().position(|c: &CompiledDef| c.kind == def.kind) {
                return Err(TokenizationError::DuplicateKind { kind: def.kind, first, second: index });
            }
            let regex = Regex::new(&def.pattern)
                .map_err(|source| TokenizationError::InvalidPattern { kind: def.kind.clone(), source })?;
            if regex.is_match(b"") {
                return Err(TokenizationError::EmptyMatch { kind: def.kind });
            }
            compiled.push(CompiledDef { kind: def.kind, regex, skip: def.skip });
        }
        Ok(TokenizerConfig { defs: compiled })
    }

    /// All kind names a rule pattern may reference, including the catch-all.
    pub fn kind_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.defs.iter().map(|d| d.kind.as_str()).collect();
        names.push(UNKNOWN_KIND);
        names
    }

    pub fn knows_kind(&self, kind: &str) -> bool {
        kind == UNKNOWN_KIND || self.defs.iter().any(|d| d.kind == kind)
    }

    /// Classify the whole input left to right.
    ///
    /// Total for any input: unmatched positions accumulate into `UNKNOWN`
    /// runs, advancing by whole characters of the input's encoding so every
    /// token's raw bytes stay decodable.
    pub fn tokenize(&self, input: &ByteSequence) -> Vec<Token> {
        let data = input.as_slice();
        let encoding = input.encoding();
        let mut tokens = Vec::new();
        let mut position = 0;
        let mut unknown_start: Option<usize> = None;

        while position < data.len() {
            let hit = self.defs.iter().find_map(|def| {
                def.regex
                    .find_at(data, position)
                    .filter(|m| m.start() == position && m.end() > position)
                    .map(|m| (def, m.end()))
            });
            match hit {
                Some((def, end)) => {
                    if let Some(start) = unknown_start.take() {
                        tokens.push(make_token(UNKNOWN_KIND, start, position, data, encoding, false));
                    }
                    tokens.push(make_token(&def.kind, position, end, data, encoding, def.skip));
                    position = end;
                }
                None => {
                    if unknown_start.is_none() {
                        unknown_start = Some(position);
                    }
                    position += encoding.char_width(data, position).max(1);
                }
            }
        }
        if let Some(start) = unknown_start {
            tokens.push(make_token(UNKNOWN_KIND, start, data.len(), data, encoding, false));
        }
        tokens
    }
}

fn make_token(
    kind: &str,
    start: usize,
    end: usize,
    data: &[u8],
    encoding: crate::Encoding,
    skip: bool,
) -> Token {
    let bytes = data[start..end].to_vec();
    let text = encoding.decode_lossy(&bytes);
    Token { kind: kind.to_string(), span: Span { start, end }, bytes, text, skip }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Encoding;

    fn tokenize(text: &str) -> Vec<Token> {
        let bytes = Encoding::Utf8.encode(text).unwrap();
        TokenizerConfig::default().tokenize(&bytes)
    }

    /// Spans must partition the input: contiguous, in order, full coverage.
    fn assert_partition(text: &str, tokens: &[Token]) {
        let mut cursor = 0;
        for token in tokens {
            assert_eq!(token.span.start, cursor, "gap or overlap before {:?} in {text:?}", token.text);
            assert!(token.span.end > token.span.start);
            cursor = token.span.end;
        }
        assert_eq!(cursor, text.len(), "spans do not cover all of {text:?}");
    }

    #[test]
    fn default_config_classifies_words_numbers_punct() {
        let tokens = tokenize("hello, world 42!");
        let kinds: Vec<(&str, &str)> =
            tokens.iter().map(|t| (t.kind.as_str(), t.text.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                ("WORD", "hello"),
                ("PUNCT", ","),
                ("WS", " "),
                ("WORD", "world"),
                ("WS", " "),
                ("NUMBER", "42"),
                ("PUNCT", "!"),
            ]
        );
        assert_partition("hello, world 42!", &tokens);
    }

    #[test]
    fn whitespace_is_classified_not_dropped() {
        let tokens = tokenize("a  b");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, "WS");
        assert!(tokens[1].skip);
        assert_eq!(tokens[1].text, "  ");
    }

    #[test]
    fn unrecognized_runs_become_unknown_tokens() {
        let tokens = tokenize("héllo");
        let kinds: Vec<(&str, &str)> =
            tokens.iter().map(|t| (t.kind.as_str(), t.text.as_str())).collect();
        assert_eq!(kinds, vec![("WORD", "h"), ("UNKNOWN", "é"), ("WORD", "llo")]);
        assert_partition("héllo", &tokens);
    }

    #[test]
    fn unknown_runs_keep_char_boundaries() {
        let tokens = tokenize("🙂🙃ok");
        assert_eq!(tokens[0].kind, "UNKNOWN");
        assert_eq!(tokens[0].text, "🙂🙃");
        assert_eq!(tokens[0].bytes.len(), 8);
        assert_eq!(tokens[1].text, "ok");
    }

    #[test]
    fn total_coverage_over_varied_inputs() {
        let cases = ["", "   ", "hello world", "x=1+2;", "日本語 mixed 12.5", "\t\n", "§§§"];
        for text in cases {
            let tokens = tokenize(text);
            assert_partition(text, &tokens);
        }
    }

    #[test]
    fn trailing_unknown_run_is_flushed() {
        let tokens = tokenize("ok…");
        assert_eq!(tokens.last().unwrap().kind, "UNKNOWN");
        assert_eq!(tokens.last().unwrap().text, "…");
    }

    #[test]
    fn number_with_fraction_is_one_token() {
        let tokens = tokenize("3.14");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, "NUMBER");
    }

    #[test]
    fn config_rejects_duplicate_kinds() {
        let err = TokenizerConfig::new(vec![
            TokenDef::new("A", "a"),
            TokenDef::new("A", "b"),
        ])
        .unwrap_err();
        assert!(matches!(err, TokenizationError::DuplicateKind { first: 0, second: 1, .. }));
    }

    #[test]
    fn config_rejects_reserved_kind() {
        let err = TokenizerConfig::new(vec![TokenDef::new(UNKNOWN_KIND, "x")]).unwrap_err();
        assert!(matches!(err, TokenizationError::ReservedKind { .. }));
    }

    #[test]
    fn config_rejects_invalid_pattern() {
        let err = TokenizerConfig::new(vec![TokenDef::new("BAD", "([")]).unwrap_err();
        assert!(matches!(err, TokenizationError::InvalidPattern { .. }));
    }

    #[test]
    fn config_rejects_empty_matching_pattern() {
        let err = TokenizerConfig::new(vec![TokenDef::new("STAR", "a*")]).unwrap_err();
        assert!(matches!(err, TokenizationError::EmptyMatch { .. }));
    }

    #[test]
    fn config_rejects_empty_kind_name() {
        let err = TokenizerConfig::new(vec![TokenDef::new("", "a")]).unwrap_err();
        assert!(matches!(err, TokenizationError::EmptyKind { index: 0 }));
    }

    #[test]
    fn custom_config_first_definition_wins() {
        let config = TokenizerConfig::new(vec![
            TokenDef::new("KEYWORD", r"if|then"),
            TokenDef::new("IDENT", r"[a-z]+"),
            TokenDef::skip("WS", r" +"),
        ])
        .unwrap();
        let bytes = Encoding::Utf8.encode("if x then y").unwrap();
        let tokens = config.tokenize(&bytes);
        let kinds: Vec<&str> = tokens.iter().filter(|t| !t.skip).map(|t| t.kind.as_str()).collect();
        assert_eq!(kinds, vec!["KEYWORD", "IDENT", "KEYWORD", "IDENT"]);
    }
}
