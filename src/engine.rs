//! Rule compilation and the matching engine.
//!
//! ## How the parts work together
//!
//! Processing one input is a fixed pipeline:
//!
//! ```text
//! rule docs ──┐
//!             │  RuleSet::compile            (compiled_rules.rs)
//!             └──────────────┬───────────── fail-fast validation
//!                            │
//! input ── TriggerInfo::scan ┼─ select active rules (signals + literals)
//!          (trigger.rs)      │
//!                            ▼
//!                   Scanner::scan (scanner.rs)
//!                     - left-to-right, priority order
//!                     - first match wins, no overlap
//!                            │
//!                            ▼
//!                        Vec<Match>
//! ```
//!
//! The engine is deliberately simple: one deterministic pass, no
//! backtracking across recorded matches, no state shared between
//! invocations. A compiled [`RuleSet`] is read-only during matching, so
//! concurrent invocations against the same set need no locking.
//!
//! ## Responsibilities by module
//!
//! - `compiled_rules.rs`: validates rule documents and derives evaluation
//!   order plus per-rule activation requirements.
//! - `trigger.rs`: scans the raw input for coarse signals used to gate
//!   rule activation.
//! - `scanner.rs`: the matching loop itself.
//! - `metrics.rs`: timing/counter structs surfaced by the verbose API.
//!
//! ## Adding new matcher kinds
//!
//! Add a variant to [`crate::Matcher`] (and its document form in
//! `ruleset.rs`); the scanner only ever calls `Matcher::matches`, so no
//! engine change is needed.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/scanner.rs"]
mod scanner;
#[path = "engine/trigger.rs"]
mod trigger;

pub use compiled_rules::{RuleSet, RuleSummary};
pub use metrics::{RunMetrics, ScanStats};

pub(crate) use compiled_rules::RuleId;
pub(crate) use scanner::Scanner;
pub(crate) use trigger::{InputSignals, TriggerInfo};
