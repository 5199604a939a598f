//! Input pre-classification for rule activation.
//!
//! Before scanning, the raw input is inspected once to produce cheap
//! signals that let the scanner discard rules which cannot possibly match:
//!
//! - **Signals** ([`InputSignals`]): coarse byte-class booleans such as
//!   "contains digits", checked against each rule's derived requirements.
//! - **Required literals**: every `Literal` matcher in a rule names text
//!   that must occur somewhere in the input for the rule to match at all;
//!   a lowercased substring check prunes the rest.
//!
//! Gating is a pure optimization. Both requirements are derived from the
//! rule's own matchers, so deactivating a rule here can never change the
//! match result — only skip work that was guaranteed to fail.

use crate::Rule;

bitflags::bitflags! {
    /// Coarse byte classes present in an input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InputSignals: u8 {
        const HAS_ALPHA  = 1 << 0;
        const HAS_DIGITS = 1 << 1;
        const HAS_PUNCT  = 1 << 2;
        const NON_ASCII  = 1 << 3;
    }
}

impl InputSignals {
    /// Classify a chunk of text by the byte classes it contains.
    pub(crate) fn classify(text: &str) -> Self {
        let mut signals = InputSignals::empty();
        for byte in text.bytes() {
            if byte.is_ascii_alphabetic() {
                signals |= InputSignals::HAS_ALPHA;
            } else if byte.is_ascii_digit() {
                signals |= InputSignals::HAS_DIGITS;
            } else if byte.is_ascii_punctuation() {
                signals |= InputSignals::HAS_PUNCT;
            } else if !byte.is_ascii() {
                signals |= InputSignals::NON_ASCII;
            }
        }
        signals
    }
}

/// Characteristics of one input, scanned once per invocation.
#[derive(Debug, Clone)]
pub(crate) struct TriggerInfo {
    pub signals: InputSignals,
    lower: String,
}

impl TriggerInfo {
    /// Note: uses ASCII lowercasing, matching the ASCII case-insensitive
    /// semantics of `Literal` matchers.
    pub fn scan(input: &str) -> Self {
        TriggerInfo { signals: InputSignals::classify(input), lower: input.to_ascii_lowercase() }
    }

    /// Whether `rule` can possibly match this input.
    pub fn allows(&self, rule: &Rule) -> bool {
        self.signals.contains(rule.signals)
            && rule.required_literals.iter().all(|lit| self.lower.contains(lit.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_detects_byte_classes() {
        assert_eq!(InputSignals::classify(""), InputSignals::empty());
        assert_eq!(InputSignals::classify("abc"), InputSignals::HAS_ALPHA);
        assert_eq!(
            InputSignals::classify("a1!"),
            InputSignals::HAS_ALPHA | InputSignals::HAS_DIGITS | InputSignals::HAS_PUNCT
        );
        assert!(InputSignals::classify("é").contains(InputSignals::NON_ASCII));
    }

    #[test]
    fn literal_gating_is_case_insensitive() {
        let info = TriggerInfo::scan("Hello World");
        assert!(info.lower.contains("hello"));
        assert!(info.lower.contains("world"));
    }
}
