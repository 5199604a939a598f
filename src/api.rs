use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

use crate::engine::{RuleSet, RunMetrics, Scanner, TriggerInfo};
use crate::error::ProcessError;
use crate::statement::{FormatMode, Statement, build_statements};
use crate::tokenizer::TokenizerConfig;
use crate::{Encoding, Match, Span, Token};

static DEFAULT_RULES: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::compile(crate::rules::get(), &TokenizerConfig::default())
        .expect("builtin rule set compiles against the default tokenizer")
});

/// The builtin rule set, compiled once against the default tokenizer.
pub fn default_rules() -> &'static RuleSet {
    &DEFAULT_RULES
}

/// Options that affect processing.
///
/// The defaults match the common case: UTF-8 input, the builtin token
/// definitions, compact output.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Byte encoding for the input text.
    pub encoding: Encoding,
    /// Rendering mode recorded on the result.
    pub format: FormatMode,
    /// Token definitions; must be the configuration the rule set was
    /// compiled against.
    pub tokenizer: TokenizerConfig,
}

/// Result from [`process`] and [`process_with`].
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// The processed input text.
    pub text: String,
    /// Statements in match order.
    pub statements: Vec<Statement>,
    /// Rendering mode selected for this run.
    pub format: FormatMode,
    /// Total elapsed processing time.
    pub elapsed: Duration,
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
}

impl ProcessResult {
    /// Each statement rendered in the run's format.
    pub fn rendered(&self) -> Vec<String> {
        self.statements.iter().map(|s| s.format(self.format)).collect()
    }

    /// JSON export of the statements and run metadata.
    pub fn to_json(&self) -> String {
        let value = serde_json::json!({
            "text": self.text,
            "statements": self.statements,
            "count": self.statements.len(),
            "timestamp": self.timestamp.to_rfc3339(),
        });
        serde_json::to_string_pretty(&value).expect("json value serializes")
    }
}

/// A compact token summary used in diagnostics.
#[derive(Debug, Clone)]
pub struct TokenSummary {
    pub kind: String,
    pub start: usize,
    pub end: usize,
    pub preview: String,
    pub skip: bool,
}

/// A compact match summary used in diagnostics.
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub rule: String,
    pub token_span: (usize, usize),
    pub byte_span: Span,
}

/// Additional details returned by [`process_verbose_with`].
///
/// Intentionally compact: meant for debugging and performance inspection
/// without dumping the entire internal state.
#[derive(Debug, Clone)]
pub struct ProcessDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Encoding + tokenization time.
    pub tokenize: Duration,
    /// Activation + scan time.
    pub matching: Duration,
    /// Statement construction time.
    pub build: Duration,
    /// Token positions visited by the scan.
    pub positions_scanned: usize,
    /// Rule evaluation attempts across all positions.
    pub rules_attempted: usize,
    /// Ids of rules active for this input, in evaluation order.
    pub active_rules: Vec<String>,
    /// The full classified token stream.
    pub tokens: Vec<TokenSummary>,
    /// Every recorded match.
    pub matches: Vec<MatchSummary>,
}

/// Result from [`process_verbose_with`].
#[derive(Debug, Clone)]
pub struct ProcessResultVerbose {
    pub result: ProcessResult,
    pub details: ProcessDetails,
}

/// Process `text` with the builtin rule set and default [`Options`].
///
/// # Example
/// ```
/// use synoptic_core::process;
///
/// let out = process("socrates is a man").unwrap();
/// assert_eq!(out.rendered(), vec!["is_a(socrates,man)"]);
/// ```
pub fn process(text: &str) -> Result<ProcessResult, ProcessError> {
    process_with(text, &DEFAULT_RULES, &Options::default())
}

/// Process `text` with an explicit rule set and options.
///
/// This is the single entry point every caller (CLI, library, service
/// wrapper) goes through. The whole pipeline runs synchronously; either a
/// complete result is returned or the first error is surfaced, never a
/// partial result.
pub fn process_with(
    text: &str,
    rules: &RuleSet,
    options: &Options,
) -> Result<ProcessResult, ProcessError> {
    let run = run_pipeline(text, rules, options)?;
    Ok(run.into_result(text, options))
}

/// Process `text` and return extra (compact) diagnostic details.
///
/// Useful for rule debugging and profiling. The plain [`process_with`]
/// path does not allocate these extra traces.
pub fn process_verbose_with(
    text: &str,
    rules: &RuleSet,
    options: &Options,
) -> Result<ProcessResultVerbose, ProcessError> {
    let run = run_pipeline(text, rules, options)?;

    let details = ProcessDetails {
        total: run.metrics.total,
        tokenize: run.metrics.tokenize,
        matching: run.metrics.matching,
        build: run.metrics.build,
        positions_scanned: run.metrics.stats.positions,
        rules_attempted: run.metrics.stats.attempts,
        active_rules: run.active_rules.clone(),
        tokens: run.tokens.iter().map(token_summary).collect(),
        matches: run.matches.iter().map(|m| match_summary(m, rules)).collect(),
    };
    let result = run.into_result(text, options);

    Ok(ProcessResultVerbose { result, details })
}

struct PipelineRun {
    tokens: Vec<Token>,
    matches: Vec<Match>,
    statements: Vec<Statement>,
    active_rules: Vec<String>,
    metrics: RunMetrics,
}

impl PipelineRun {
    fn into_result(self, text: &str, options: &Options) -> ProcessResult {
        ProcessResult {
            text: text.to_string(),
            statements: self.statements,
            format: options.format,
            elapsed: self.metrics.total,
            timestamp: Utc::now(),
        }
    }
}

fn run_pipeline(
    text: &str,
    rules: &RuleSet,
    options: &Options,
) -> Result<PipelineRun, ProcessError> {
    let total_start = Instant::now();
    let mut metrics = RunMetrics::default();

    // Encode + tokenize. The byte sequence lives only for this stage.
    let stage = Instant::now();
    let bytes = options.encoding.encode(text)?;
    let tokens = options.tokenizer.tokenize(&bytes);
    metrics.tokenize = stage.elapsed();

    // Match.
    let stage = Instant::now();
    let trigger = TriggerInfo::scan(text);
    let scanner = Scanner::new(&tokens, rules, &trigger);
    let active_rules: Vec<String> =
        scanner.active_rule_ids().into_iter().map(str::to_string).collect();
    let (matches, stats) = scanner.scan();
    metrics.stats = stats;
    metrics.matching = stage.elapsed();

    // Build statements.
    let stage = Instant::now();
    let statements = build_statements(&matches, rules);
    metrics.build = stage.elapsed();

    metrics.total = total_start.elapsed();
    Ok(PipelineRun { tokens, matches, statements, active_rules, metrics })
}

fn token_summary(token: &Token) -> TokenSummary {
    TokenSummary {
        kind: token.kind.clone(),
        start: token.span.start,
        end: token.span.end,
        preview: token.text.chars().take(40).collect(),
        skip: token.skip,
    }
}

fn match_summary(m: &Match, rules: &RuleSet) -> MatchSummary {
    MatchSummary {
        rule: rules.rule(m.rule).id.clone(),
        token_span: m.token_span,
        byte_span: m.byte_span,
    }
}
