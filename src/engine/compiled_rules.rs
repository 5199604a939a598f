//! Rule-set compilation and validation.
//!
//! This module holds the *static* side of the engine: turning rule-set
//! documents into a [`RuleSet`] the scanner can evaluate. Compilation is
//! deliberately fail-fast — every structural problem in the document is
//! reported here, with the offending rule's index, before any input is
//! processed. Once a `RuleSet` exists, matching cannot fail.
//!
//! Compilation also derives the per-rule activation requirements used by
//! the scanner's gating (required literals and [`InputSignals`]), and the
//! evaluation order: priority descending, document order on ties (the sort
//! is stable, so the first-declared rule wins a tie).

use std::collections::HashMap;

use super::trigger::InputSignals;
use crate::error::RuleSetError;
use crate::ruleset::{ExplicitMatcher, MatcherDoc, RuleDoc};
use crate::statement::StatementTemplate;
use crate::tokenizer::TokenizerConfig;
use crate::{Matcher, Rule};

/// Rule identifier: index into [`RuleSet::rules`].
pub(crate) type RuleId = usize;

/// A validated, ordered set of rules. Immutable once compiled; concurrent
/// invocations may share one without locking.
#[derive(Debug)]
pub struct RuleSet {
    pub(crate) rules: Vec<Rule>,
    /// Rule ids sorted by priority descending, declaration order on ties.
    pub(crate) order: Vec<RuleId>,
}

/// Public summary of one compiled rule, for listings and reports.
#[derive(Debug, Clone, Copy)]
pub struct RuleSummary<'a> {
    pub id: &'a str,
    pub priority: u16,
    pub template: &'a str,
    pub kind: Option<&'a str>,
}

impl RuleSet {
    /// Parse a JSON rule-set document and compile it.
    pub fn from_json(json: &str, config: &TokenizerConfig) -> Result<Self, RuleSetError> {
        let docs: Vec<RuleDoc> = serde_json::from_str(json)?;
        Self::compile(docs, config)
    }

    /// Validate and compile rule records against a tokenizer configuration.
    ///
    /// All records are validated, including disabled ones; only enabled
    /// records end up in the compiled set.
    pub fn compile(docs: Vec<RuleDoc>, config: &TokenizerConfig) -> Result<Self, RuleSetError> {
        let mut rules = Vec::with_capacity(docs.len());
        let mut seen_ids: HashMap<String, usize> = HashMap::new();

        for (index, doc) in docs.into_iter().enumerate() {
            let id = doc.id.clone().unwrap_or_else(|| format!("rule-{index}"));
            if let Some(&first) = seen_ids.get(&id) {
                return Err(RuleSetError::DuplicateId { id, first, second: index });
            }
            seen_ids.insert(id.clone(), index);

            if !(0..=100).contains(&doc.priority) {
                return Err(RuleSetError::PriorityOutOfRange { index, id, priority: doc.priority });
            }
            if doc.pattern.is_empty() {
                return Err(RuleSetError::EmptyPattern { index, id });
            }

            let mut matchers = Vec::with_capacity(doc.pattern.len());
            let mut required_literals = Vec::new();
            let mut signals = InputSignals::empty();
            for element in &doc.pattern {
                matchers.push(compile_matcher(element, config, index, &id)?);
                if let Matcher::Literal(text) = matchers.last().unwrap() {
                    signals |= InputSignals::classify(text);
                    required_literals.push(text.to_ascii_lowercase());
                }
            }

            let captures = doc
                .action
                .captures
                .clone()
                .unwrap_or_else(|| (0..matchers.len()).collect());
            if let Some(&slot) = captures.iter().find(|&&slot| slot >= matchers.len()) {
                return Err(RuleSetError::CaptureOutOfRange {
                    index,
                    id,
                    slot,
                    pattern_len: matchers.len(),
                });
            }

            let template = StatementTemplate::parse(&doc.action.template, captures.len())
                .map_err(|detail| RuleSetError::InvalidTemplate { index, id: id.clone(), detail })?;

            if !doc.enabled {
                continue;
            }
            rules.push(Rule {
                id,
                matchers,
                priority: doc.priority as u16,
                captures,
                template,
                template_text: doc.action.template,
                kind: doc.action.kind,
                required_literals,
                signals,
            });
        }

        // Stable sort: equal priorities keep declaration order.
        let mut order: Vec<RuleId> = (0..rules.len()).collect();
        order.sort_by_key(|&id| std::cmp::Reverse(rules[id].priority));

        Ok(RuleSet { rules, order })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn summaries(&self) -> impl Iterator<Item = RuleSummary<'_>> {
        self.rules.iter().map(|rule| RuleSummary {
            id: &rule.id,
            priority: rule.priority,
            template: &rule.template_text,
            kind: rule.kind.as_deref(),
        })
    }

    pub(crate) fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id]
    }
}

fn compile_matcher(
    element: &MatcherDoc,
    config: &TokenizerConfig,
    index: usize,
    id: &str,
) -> Result<Matcher, RuleSetError> {
    let explicit = match element {
        MatcherDoc::Shorthand(kind) => return compile_kind(kind, config, index, id),
        MatcherDoc::Explicit(explicit) => explicit,
    };
    match explicit {
        ExplicitMatcher::Kind(kind) => compile_kind(kind, config, index, id),
        ExplicitMatcher::Literal(text) => Ok(Matcher::Literal(text.clone())),
        ExplicitMatcher::Regex(pattern) => regex::Regex::new(pattern)
            .map(Matcher::Regex)
            .map_err(|source| RuleSetError::InvalidMatcher { index, id: id.to_string(), source }),
        ExplicitMatcher::Any(_) => Ok(Matcher::Any),
    }
}

fn compile_kind(
    kind: &str,
    config: &TokenizerConfig,
    index: usize,
    id: &str,
) -> Result<Matcher, RuleSetError> {
    if !config.knows_kind(kind) {
        return Err(RuleSetError::UnknownTokenKind {
            index,
            id: id.to_string(),
            kind: kind.to_string(),
        });
    }
    Ok(Matcher::Kind(kind.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::ActionDoc;

    fn doc(pattern: Vec<MatcherDoc>, template: &str) -> RuleDoc {
        RuleDoc {
            id: None,
            pattern,
            priority: crate::DEFAULT_PRIORITY,
            enabled: true,
            action: ActionDoc { template: template.to_string(), captures: None, kind: None },
        }
    }

    fn config() -> TokenizerConfig {
        TokenizerConfig::default()
    }

    #[test]
    fn compiles_a_minimal_rule() {
        let rules = RuleSet::compile(vec![doc(vec![kind!("WORD")], "seen({0})")], &config()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.rule(0).id, "rule-0");
        assert_eq!(rules.rule(0).priority, 50);
    }

    #[test]
    fn rejects_undefined_token_kind() {
        let err = RuleSet::compile(vec![doc(vec![kind!("NOPE")], "x({0})")], &config()).unwrap_err();
        assert!(matches!(err, RuleSetError::UnknownTokenKind { index: 0, ref kind, .. } if kind == "NOPE"));
    }

    #[test]
    fn rejects_empty_pattern() {
        let err = RuleSet::compile(vec![doc(vec![], "x")], &config()).unwrap_err();
        assert!(matches!(err, RuleSetError::EmptyPattern { index: 0, .. }));
    }

    #[test]
    fn rejects_invalid_regex_matcher() {
        let err = RuleSet::compile(vec![doc(vec![re!("([")], "x({0})")], &config()).unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidMatcher { index: 0, .. }));
    }

    #[test]
    fn rejects_priority_out_of_range() {
        let mut bad = doc(vec![kind!("WORD")], "x({0})");
        bad.priority = 101;
        let err = RuleSet::compile(vec![bad], &config()).unwrap_err();
        assert!(matches!(err, RuleSetError::PriorityOutOfRange { priority: 101, .. }));
    }

    #[test]
    fn rejects_capture_slot_out_of_range() {
        let mut bad = doc(vec![kind!("WORD")], "x({0})");
        bad.action.captures = Some(vec![1]);
        let err = RuleSet::compile(vec![bad], &config()).unwrap_err();
        assert!(matches!(err, RuleSetError::CaptureOutOfRange { slot: 1, pattern_len: 1, .. }));
    }

    #[test]
    fn rejects_template_placeholder_beyond_captures() {
        let err = RuleSet::compile(vec![doc(vec![kind!("WORD")], "x({1})")], &config()).unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidTemplate { index: 0, .. }));
    }

    #[test]
    fn rejects_duplicate_rule_ids() {
        let mut a = doc(vec![kind!("WORD")], "a({0})");
        a.id = Some("twin".to_string());
        let mut b = doc(vec![kind!("WORD")], "b({0})");
        b.id = Some("twin".to_string());
        let err = RuleSet::compile(vec![a, b], &config()).unwrap_err();
        assert!(matches!(err, RuleSetError::DuplicateId { first: 0, second: 1, .. }));
    }

    #[test]
    fn disabled_rules_are_validated_but_not_compiled() {
        let mut off = doc(vec![kind!("WORD")], "off({0})");
        off.enabled = false;
        let rules = RuleSet::compile(vec![off, doc(vec![kind!("WORD")], "on({0})")], &config()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.rule(0).id, "rule-1");

        // A disabled rule with a broken pattern still fails compilation.
        let mut broken = doc(vec![kind!("NOPE")], "off({0})");
        broken.enabled = false;
        assert!(RuleSet::compile(vec![broken], &config()).is_err());
    }

    #[test]
    fn evaluation_order_is_priority_then_declaration() {
        let mut low = doc(vec![kind!("WORD")], "low({0})");
        low.priority = 10;
        let mid_a = doc(vec![kind!("WORD")], "mid_a({0})");
        let mid_b = doc(vec![kind!("WORD")], "mid_b({0})");
        let mut high = doc(vec![kind!("WORD")], "high({0})");
        high.priority = 90;
        let rules = RuleSet::compile(vec![low, mid_a, mid_b, high], &config()).unwrap();
        assert_eq!(rules.order, vec![3, 1, 2, 0]);
    }

    #[test]
    fn derives_activation_requirements_from_literals() {
        let rules = RuleSet::compile(
            vec![doc(vec![kind!("WORD"), lit!("Has"), kind!("NUMBER")], "has({0},{2})")],
            &config(),
        )
        .unwrap();
        let rule = rules.rule(0);
        assert_eq!(rule.required_literals, vec!["has".to_string()]);
        assert!(rule.signals.contains(InputSignals::HAS_ALPHA));
        assert!(!rule.signals.contains(InputSignals::HAS_DIGITS));
    }

    #[test]
    fn from_json_reports_document_errors() {
        let err = RuleSet::from_json("not json", &config()).unwrap_err();
        assert!(matches!(err, RuleSetError::Document(_)));
    }
}
