//! The external rule-set document model.
//!
//! A rule set arrives as a JSON array of rule records:
//!
//! ```text
//! [
//!   {
//!     "id": "greeting",
//!     "pattern": ["WORD", {"literal": "world"}],
//!     "priority": 60,
//!     "action": {"template": "greet({0},{1})", "captures": [0, 1]}
//!   }
//! ]
//! ```
//!
//! Pattern elements are either a bare string (shorthand for a token-kind
//! matcher) or a single-key object selecting a matcher variant. The core
//! never reads files itself; callers hand the document text (or already
//! deserialized [`RuleDoc`]s) to [`crate::RuleSet`], which validates and
//! compiles it before any matching starts.

use serde::{Deserialize, Serialize};

/// Priority assigned when a rule record omits the field.
pub const DEFAULT_PRIORITY: i64 = 50;

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

fn default_enabled() -> bool {
    true
}

/// One rule record, as declared in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDoc {
    /// Stable identifier used in provenance; defaults to `rule-<index>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Ordered matcher sequence; must be non-empty.
    pub pattern: Vec<MatcherDoc>,
    /// Ordering weight, `0..=100`; higher is evaluated first.
    #[serde(default = "default_priority")]
    pub priority: i64,
    /// Disabled rules are validated but excluded from matching.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub action: ActionDoc,
}

/// The statement to emit when the pattern matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionDoc {
    /// Statement template, e.g. `"is_a({0},{1})"`. Placeholders index into
    /// `captures`.
    pub template: String,
    /// Pattern slots to capture, in placeholder order. Defaults to every
    /// slot in pattern order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captures: Option<Vec<usize>>,
    /// Optional statement class, carried into verbose output and JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A pattern element as written in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatcherDoc {
    /// Bare string shorthand: `"WORD"` matches one token of that kind.
    Shorthand(String),
    Explicit(ExplicitMatcher),
}

/// Explicit matcher object, e.g. `{"literal": "is"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplicitMatcher {
    /// Match one token by kind name.
    Kind(String),
    /// Match one token whose text equals the literal (ASCII case-insensitive).
    Literal(String),
    /// Match one token whose text matches the regex.
    Regex(String),
    /// Match any one non-skip token.
    Any(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_rule_record() {
        let json = r#"
            [{
                "id": "greeting",
                "pattern": ["WORD", {"literal": "world"}, {"regex": "^!+$"}, {"any": true}],
                "priority": 70,
                "action": {"template": "greet({0},{1})", "captures": [0, 1], "kind": "salutation"}
            }]
        "#;
        let docs: Vec<RuleDoc> = serde_json::from_str(json).unwrap();
        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.id.as_deref(), Some("greeting"));
        assert_eq!(doc.priority, 70);
        assert!(doc.enabled);
        assert_eq!(doc.pattern.len(), 4);
        assert!(matches!(&doc.pattern[0], MatcherDoc::Shorthand(k) if k == "WORD"));
        assert!(matches!(
            &doc.pattern[1],
            MatcherDoc::Explicit(ExplicitMatcher::Literal(s)) if s == "world"
        ));
        assert!(matches!(&doc.pattern[3], MatcherDoc::Explicit(ExplicitMatcher::Any(true))));
        assert_eq!(doc.action.captures, Some(vec![0, 1]));
        assert_eq!(doc.action.kind.as_deref(), Some("salutation"));
    }

    #[test]
    fn defaults_apply_when_fields_are_omitted() {
        let json = r#"[{"pattern": ["WORD"], "action": {"template": "seen({0})"}}]"#;
        let docs: Vec<RuleDoc> = serde_json::from_str(json).unwrap();
        let doc = &docs[0];
        assert_eq!(doc.id, None);
        assert_eq!(doc.priority, DEFAULT_PRIORITY);
        assert!(doc.enabled);
        assert_eq!(doc.action.captures, None);
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let missing_action = r#"[{"pattern": ["WORD"]}]"#;
        assert!(serde_json::from_str::<Vec<RuleDoc>>(missing_action).is_err());
        let missing_template = r#"[{"pattern": ["WORD"], "action": {}}]"#;
        assert!(serde_json::from_str::<Vec<RuleDoc>>(missing_template).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = r#"[{"pattern": ["WORD"], "action": {"template": "x"}, "weight": 3}]"#;
        assert!(serde_json::from_str::<Vec<RuleDoc>>(json).is_err());
    }

    #[test]
    fn macros_build_the_same_shape_as_json() {
        let doc = rule! {
            id: "greeting",
            pattern: [kind!("WORD"), lit!("world"), re!("^!$"), any!()],
            priority: 70,
            captures: [0, 1],
            template: "greet({0},{1})",
            kind: "salutation",
        };
        assert_eq!(doc.id.as_deref(), Some("greeting"));
        assert_eq!(doc.priority, 70);
        assert_eq!(doc.pattern.len(), 4);
        assert_eq!(doc.action.template, "greet({0},{1})");
        assert_eq!(doc.action.captures, Some(vec![0, 1]));
    }
}
