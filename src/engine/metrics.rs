//! Load and query metrics.
//!
//! Counters are collected unconditionally; they are cheap and the load summary
//! reports them. Timings use `Instant` and are only meaningful for profiling.

use super::parser::RejectReason;
use std::time::Duration;

/// What happened while parsing one document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadMetrics {
    /// Elapsed time for the whole parse.
    pub elapsed: Duration,
    /// Lines inside the `Attributes:` block.
    pub attribute_lines: usize,
    /// Candidate rule lines matched by the rule grammar.
    pub candidates: usize,
    /// Candidates that became rules.
    pub accepted: usize,
    /// Candidates whose antecedent decoded to nothing.
    pub empty_antecedent: usize,
    /// Candidates without a `Disease=<name>=t` consequent.
    pub missing_consequent: usize,
    /// Candidates whose confidence was unparsable or outside `[0, 1]`.
    pub bad_confidence: usize,
}

impl LoadMetrics {
    /// Total candidates dropped.
    pub fn rejected(&self) -> usize {
        self.empty_antecedent + self.missing_consequent + self.bad_confidence
    }

    pub(crate) fn record_rejection(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::EmptyAntecedent => self.empty_antecedent += 1,
            RejectReason::MissingConsequent => self.missing_consequent += 1,
            RejectReason::BadConfidence => self.bad_confidence += 1,
        }
    }
}

/// What happened while answering one query.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryMetrics {
    /// Elapsed time for matching and ranking.
    pub elapsed: Duration,
    /// Rules evaluated against the selection.
    pub rules_evaluated: usize,
    /// Rules whose antecedent was a subset of the selection.
    pub symptom_matches: usize,
    /// Of those, rules dropped by the Critical check.
    pub critical_mismatches: usize,
    /// Rules contributing a result.
    pub matched: usize,
}
