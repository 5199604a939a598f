//! Run timing and scan counters.
//!
//! Collected on every run and surfaced through
//! [`crate::process_verbose_with`]; the plain [`crate::process_with`] path
//! only keeps the total.

use std::time::Duration;

/// Stage timings for one pipeline invocation.
#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for the invocation.
    pub total: Duration,
    /// Encoding + tokenization.
    pub tokenize: Duration,
    /// Rule activation + scan.
    pub matching: Duration,
    /// Statement construction.
    pub build: Duration,
    /// Scan-loop counters.
    pub stats: ScanStats,
}

/// Counters from the scan loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanStats {
    /// Token positions visited.
    pub positions: usize,
    /// Rule evaluation attempts across all positions.
    pub attempts: usize,
    /// Matches recorded.
    pub matched: usize,
}
