//! Builtin rule set.
//!
//! A small default set of relation-extraction rules, used whenever the
//! caller supplies no rule-set document. Each rule is declared with the
//! same document model external rule sets use, so everything here could
//! equally be written as JSON.
//!
//! Priorities: the most specific phrasing wins. `definition` outranks
//! `is-a-relation` so "X is defined as Y" is not swallowed by the shorter
//! "X is a Y" pattern; `action-object` sits lowest because its verb test
//! (a bare `...s` word) is the loosest.

use crate::RuleDoc;

pub(crate) fn get() -> Vec<RuleDoc> {
    vec![
        rule! {
            id: "definition",
            pattern: [kind!("WORD"), lit!("is"), lit!("defined"), lit!("as"), kind!("WORD")],
            priority: 60,
            captures: [0, 4],
            template: "defined_as({0},{1})",
            kind: "definition",
        },
        rule! {
            id: "is-a-relation",
            pattern: [kind!("WORD"), lit!("is"), re!("(?i)^an?$"), kind!("WORD")],
            priority: 55,
            captures: [0, 3],
            template: "is_a({0},{1})",
            kind: "classification",
        },
        rule! {
            id: "has-relation",
            pattern: [kind!("WORD"), lit!("has"), kind!("WORD")],
            priority: 55,
            captures: [0, 2],
            template: "has({0},{1})",
            kind: "property",
        },
        rule! {
            id: "conditional",
            pattern: [lit!("if"), kind!("WORD"), lit!("then"), kind!("WORD")],
            priority: 55,
            captures: [1, 3],
            template: "implies({0},{1})",
            kind: "conditional",
        },
        rule! {
            id: "action-object",
            pattern: [kind!("WORD"), re!("(?i)^[a-z]+s$"), kind!("WORD")],
            priority: 40,
            captures: [0, 1, 2],
            template: "acts_on({0},{2})",
            kind: "action",
        },
    ]
}

#[cfg(test)]
mod tests {
    use crate::{FormatMode, process};

    /// Table of (input, expected default-format statements).
    #[test]
    fn builtin_rules_extract_relations() {
        let cases: Vec<(&str, Vec<&str>)> = vec![
            ("socrates is a man", vec!["is_a(socrates,man)"]),
            ("Rust is an ally", vec!["is_a(Rust,ally)"]),
            ("water is defined as liquid", vec!["defined_as(water,liquid)"]),
            ("a cat has whiskers", vec!["has(cat,whiskers)"]),
            ("if rain then wet", vec!["implies(rain,wet)"]),
            ("the dog chases cats", vec!["acts_on(dog,cats)"]),
            (
                "socrates is a man and plato is a man",
                vec!["is_a(socrates,man)", "is_a(plato,man)"],
            ),
            ("zzz qqq", vec![]),
            ("", vec![]),
        ];
        for (input, expected) in cases {
            let result = process(input).unwrap();
            let rendered: Vec<String> =
                result.statements.iter().map(|s| s.format(FormatMode::Default)).collect();
            assert_eq!(rendered, expected, "input {input:?}");
        }
    }

    #[test]
    fn definition_outranks_is_a() {
        let result = process("pi is defined as irrational").unwrap();
        assert_eq!(result.statements.len(), 1);
        assert_eq!(result.statements[0].provenance.rule_id, "definition");
    }

    #[test]
    fn statement_kind_comes_from_the_rule_action() {
        let result = process("socrates is a man").unwrap();
        assert_eq!(result.statements[0].kind.as_deref(), Some("classification"));
    }
}
