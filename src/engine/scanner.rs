//! The matching scan.
//!
//! This module is the operational core of the engine. Given the token
//! stream and a compiled rule set, it performs a single deterministic
//! left-to-right pass:
//!
//! ```text
//! position ──▶ try rules in priority order ──▶ first match wins
//!    │                │ no rule matched            │
//!    │                ▼                            ▼
//!    │          advance one token        record Match, advance
//!    └──────────── repeat until the end of the stream ──────────┘
//! ```
//!
//! Matches never overlap: recording a match advances the scan past the
//! matched span. Positions no rule matches are skipped silently — an
//! unmatched region is a normal outcome, not an error.
//!
//! Matching operates over the *significant* token stream: tokens whose
//! definition is marked `skip` (whitespace by default) are classified by
//! the tokenizer but invisible here, so `WORD WORD` matches across a
//! space. Recorded spans index back into the full stream.
//!
//! Set `SYNOPTIC_DEBUG_RULES=1` to print activation and match traces.

use super::compiled_rules::{RuleId, RuleSet};
use super::metrics::ScanStats;
use super::trigger::TriggerInfo;
use crate::{Match, Span, Token};

pub(crate) struct Scanner<'a> {
    /// Full token stream, including skip tokens.
    tokens: &'a [Token],
    /// Indices of non-skip tokens, in order.
    sig: Vec<usize>,
    ruleset: &'a RuleSet,
    /// Rules that can possibly match this input, in evaluation order.
    active: Vec<RuleId>,
}

impl<'a> Scanner<'a> {
    pub fn new(tokens: &'a [Token], ruleset: &'a RuleSet, trigger: &TriggerInfo) -> Self {
        let sig: Vec<usize> =
            tokens.iter().enumerate().filter(|(_, t)| !t.skip).map(|(i, _)| i).collect();
        let active: Vec<RuleId> = ruleset
            .order
            .iter()
            .copied()
            .filter(|&id| trigger.allows(ruleset.rule(id)))
            .collect();

        if debug_rules() {
            eprintln!(
                "[active_rules] {}/{} rules active, {} significant tokens",
                active.len(),
                ruleset.len(),
                sig.len()
            );
            for &id in &active {
                eprintln!("  - {}", ruleset.rule(id).id);
            }
        }

        Scanner { tokens, sig, ruleset, active }
    }

    /// Ids of rules that survived activation gating, in evaluation order.
    pub fn active_rule_ids(&self) -> Vec<&str> {
        self.active.iter().map(|&id| self.ruleset.rule(id).id.as_str()).collect()
    }

    /// Run the scan and return matches in stream order.
    pub fn scan(&self) -> (Vec<Match>, ScanStats) {
        let sig_tokens: Vec<&Token> = self.sig.iter().map(|&i| &self.tokens[i]).collect();
        let mut matches = Vec::new();
        let mut stats = ScanStats::default();
        let mut position = 0;

        while position < sig_tokens.len() {
            stats.positions += 1;
            let mut advanced = false;
            for &id in &self.active {
                stats.attempts += 1;
                if let Some((m, consumed)) = self.try_rule(id, &sig_tokens, position) {
                    if debug_rules() {
                        let rule = self.ruleset.rule(id);
                        eprintln!(
                            "[rule:matched] id=\"{}\" tokens={}..{} bytes={}..{}",
                            rule.id, m.token_span.0, m.token_span.1, m.byte_span.start, m.byte_span.end
                        );
                    }
                    matches.push(m);
                    stats.matched += 1;
                    position += consumed;
                    advanced = true;
                    break;
                }
            }
            if !advanced {
                position += 1;
            }
        }
        (matches, stats)
    }

    /// Align one rule's matcher sequence at `position`; `None` on the first
    /// matcher that fails.
    fn try_rule(
        &self,
        id: RuleId,
        sig_tokens: &[&Token],
        position: usize,
    ) -> Option<(Match, usize)> {
        let rule = self.ruleset.rule(id);
        let mut cursor = position;
        let mut slots = Vec::with_capacity(rule.matchers.len());
        for matcher in &rule.matchers {
            let hit = matcher.matches(sig_tokens, cursor)?;
            slots.push(hit.text);
            cursor += hit.advance;
        }
        let first = self.sig[position];
        let last = self.sig[cursor - 1];
        let m = Match {
            rule: id,
            token_span: (first, last + 1),
            byte_span: Span { start: self.tokens[first].span.start, end: self.tokens[last].span.end },
            slots,
        };
        Some((m, cursor - position))
    }
}

fn debug_rules() -> bool {
    std::env::var_os("SYNOPTIC_DEBUG_RULES").is_some()
}
