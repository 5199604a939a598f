//! Statement templates, rendering, and the match-to-statement builder.
//!
//! A rule's action carries a template string such as `greet({0},{1})`.
//! Templates are parsed once, at rule-set compile time, into a
//! [`StatementTemplate`]; malformed templates are rejected there, so
//! building statements from matches can no longer fail.
//!
//! Placeholders index into the rule's capture list, not into the raw
//! pattern: a rule with `captures: [0, 3]` exposes the texts of pattern
//! slots 0 and 3 as `{0}` and `{1}`.

use serde::Serialize;

use crate::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(usize),
}

/// Parsed action template: a predicate part and zero or more argument parts,
/// each a mix of literal text and capture placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatementTemplate {
    predicate: Vec<Segment>,
    args: Vec<Vec<Segment>>,
}

impl StatementTemplate {
    /// Parse `template`, validating placeholders against `capture_count`.
    ///
    /// Accepted shapes: `pred`, `pred()`, `pred({0},{1})`, and literal text
    /// mixed into any part (`rel_{0}(x,{1})`). Errors return a human-readable
    /// detail string; the caller attaches rule index/id.
    pub(crate) fn parse(template: &str, capture_count: usize) -> Result<Self, String> {
        if template.is_empty() {
            return Err("template is empty".to_string());
        }
        let (predicate_part, args_part) = match template.find('(') {
            None => {
                if template.contains(')') {
                    return Err("unmatched ')'".to_string());
                }
                (template, None)
            }
            Some(open) => {
                if !template.ends_with(')') {
                    return Err("missing closing ')'".to_string());
                }
                (&template[..open], Some(&template[open + 1..template.len() - 1]))
            }
        };
        if predicate_part.is_empty() {
            return Err("empty predicate".to_string());
        }
        let predicate = parse_segments(predicate_part, capture_count)?;
        let mut args = Vec::new();
        if let Some(inner) = args_part {
            if inner.contains('(') || inner.contains(')') {
                return Err("nested parentheses are not supported".to_string());
            }
            if !inner.is_empty() {
                for raw in inner.split(',') {
                    let arg = raw.trim();
                    if arg.is_empty() {
                        return Err("empty argument".to_string());
                    }
                    args.push(parse_segments(arg, capture_count)?);
                }
            }
        }
        Ok(StatementTemplate { predicate, args })
    }

    /// Substitute captured texts into the template.
    pub(crate) fn instantiate(&self, captured: &[String]) -> (String, Vec<String>) {
        let render = |segments: &[Segment]| {
            let mut out = String::new();
            for segment in segments {
                match segment {
                    Segment::Literal(text) => out.push_str(text),
                    Segment::Placeholder(index) => out.push_str(&captured[*index]),
                }
            }
            out
        };
        (render(&self.predicate), self.args.iter().map(|a| render(a)).collect())
    }
}

fn parse_segments(part: &str, capture_count: usize) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = part.char_indices();
    while let Some((_, ch)) = chars.next() {
        if ch != '{' {
            literal.push(ch);
            continue;
        }
        let mut digits = String::new();
        let mut closed = false;
        for (_, inner) in chars.by_ref() {
            if inner == '}' {
                closed = true;
                break;
            }
            digits.push(inner);
        }
        if !closed {
            return Err(format!("unterminated placeholder in {part:?}"));
        }
        let index: usize = digits
            .parse()
            .map_err(|_| format!("malformed placeholder {{{digits}}} in {part:?}"))?;
        if index >= capture_count {
            return Err(format!("placeholder {{{index}}} exceeds capture count {capture_count}"));
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(index));
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Rendering mode for [`Statement::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatMode {
    /// Compact one-line rendering: `pred(a,b)`.
    #[default]
    Default,
    /// Compact rendering plus originating rule id and matched span.
    Verbose,
}

impl FormatMode {
    pub fn from_name(name: &str) -> Option<FormatMode> {
        match name {
            "default" => Some(FormatMode::Default),
            "verbose" => Some(FormatMode::Verbose),
            _ => None,
        }
    }
}

/// Where a statement came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    /// Id of the rule that produced the statement.
    pub rule_id: String,
    /// Half-open index range into the token stream.
    pub token_span: (usize, usize),
    /// Byte offsets of the matched text in the encoded input.
    pub byte_span: Span,
}

/// A structured logic statement: a predicate applied to zero or more
/// arguments, with provenance back to the rule and span that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub predicate: String,
    pub args: Vec<String>,
    /// Statement class declared by the rule's action, e.g. `"classification"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub provenance: Provenance,
}

impl Statement {
    /// Render the statement. Pure: the same statement and mode always yield
    /// the same string.
    pub fn format(&self, mode: FormatMode) -> String {
        let compact = if self.args.is_empty() {
            self.predicate.clone()
        } else {
            format!("{}({})", self.predicate, self.args.join(","))
        };
        match mode {
            FormatMode::Default => compact,
            FormatMode::Verbose => {
                let Provenance { rule_id, token_span, byte_span } = &self.provenance;
                let mut out = format!(
                    "{compact}  [rule={rule_id} tokens={}..{} bytes={}..{}",
                    token_span.0, token_span.1, byte_span.start, byte_span.end
                );
                if let Some(kind) = &self.kind {
                    out.push_str(&format!(" kind={kind}"));
                }
                out.push(']');
                out
            }
        }
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format(FormatMode::Default))
    }
}

/// Turn matches into statements, in match order.
pub(crate) fn build_statements(matches: &[crate::Match], rules: &crate::RuleSet) -> Vec<Statement> {
    matches
        .iter()
        .map(|m| {
            let rule = rules.rule(m.rule);
            let captured: Vec<String> =
                rule.captures.iter().map(|&slot| m.slots[slot].clone()).collect();
            let (predicate, args) = rule.template.instantiate(&captured);
            Statement {
                predicate,
                args,
                kind: rule.kind.clone(),
                provenance: Provenance {
                    rule_id: rule.id.clone(),
                    token_span: m.token_span,
                    byte_span: m.byte_span,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_and_instantiate_basic_template() {
        let template = StatementTemplate::parse("greet({0},{1})", 2).unwrap();
        let (predicate, args) = template.instantiate(&strings(&["hello", "world"]));
        assert_eq!(predicate, "greet");
        assert_eq!(args, strings(&["hello", "world"]));
    }

    #[test]
    fn parse_bare_predicate() {
        let template = StatementTemplate::parse("greeting_present", 0).unwrap();
        let (predicate, args) = template.instantiate(&[]);
        assert_eq!(predicate, "greeting_present");
        assert!(args.is_empty());
    }

    #[test]
    fn parse_literal_text_in_arguments() {
        let template = StatementTemplate::parse("tagged({0}, lit_{1})", 2).unwrap();
        let (_, args) = template.instantiate(&strings(&["a", "b"]));
        assert_eq!(args, strings(&["a", "lit_b"]));
    }

    #[test]
    fn parse_placeholder_in_predicate() {
        let template = StatementTemplate::parse("{0}_rel({1})", 2).unwrap();
        let (predicate, args) = template.instantiate(&strings(&["is", "man"]));
        assert_eq!(predicate, "is_rel");
        assert_eq!(args, strings(&["man"]));
    }

    #[test]
    fn parse_rejects_malformed_templates() {
        let cases = [
            ("", 0, "empty"),
            ("(x)", 1, "empty predicate"),
            ("f({0}", 1, "closing"),
            ("f)", 0, "unmatched"),
            ("f({0},)", 1, "empty argument"),
            ("f({x})", 1, "malformed placeholder"),
            ("f({0)", 1, "unterminated"),
            ("f(g({0}))", 1, "nested"),
            ("f({2})", 2, "exceeds capture count"),
        ];
        for (template, captures, needle) in cases {
            let err = StatementTemplate::parse(template, captures).unwrap_err();
            assert!(err.contains(needle), "template {template:?}: {err:?} missing {needle:?}");
        }
    }

    fn sample_statement(kind: Option<&str>) -> Statement {
        Statement {
            predicate: "greet".to_string(),
            args: strings(&["hello", "world"]),
            kind: kind.map(|k| k.to_string()),
            provenance: Provenance {
                rule_id: "greeting".to_string(),
                token_span: (0, 3),
                byte_span: Span { start: 0, end: 11 },
            },
        }
    }

    #[test]
    fn default_format_is_compact() {
        assert_eq!(sample_statement(None).format(FormatMode::Default), "greet(hello,world)");
    }

    #[test]
    fn verbose_format_carries_provenance() {
        let rendered = sample_statement(None).format(FormatMode::Verbose);
        assert_eq!(rendered, "greet(hello,world)  [rule=greeting tokens=0..3 bytes=0..11]");
    }

    #[test]
    fn verbose_format_includes_statement_kind() {
        let rendered = sample_statement(Some("assertion")).format(FormatMode::Verbose);
        assert!(rendered.ends_with("kind=assertion]"));
    }

    #[test]
    fn zero_argument_statement_renders_bare_predicate() {
        let mut statement = sample_statement(None);
        statement.args.clear();
        assert_eq!(statement.format(FormatMode::Default), "greet");
    }
}
