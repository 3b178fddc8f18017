//! Diagnostic matcher.
//!
//! A rule matches a selection when both hold:
//!
//! 1. every antecedent condition is satisfied by the selection (extra selected
//!    symptoms are irrelevant), and
//! 2. if the rule has a `Critical=` condition, it equals the selection's
//!    `Critical=` token.
//!
//! Check 2 is implied by check 1 while a selection holds at most one Critical
//! token. It stays as a separate step because the single-valued Critical slot
//! is an invariant of the selection layer, not of this type.
//!
//! Matching rules are reported as `(diagnosis, confidence)` pairs, sorted by
//! confidence (highest first). The sort is stable, so equal confidences keep
//! rule-set order.

use super::metrics::QueryMetrics;
use crate::{Error, MatchResult, Result, Rule, RuleSet, Selection};
use std::time::Instant;

fn symptoms_match(rule: &Rule, selection: &Selection) -> bool {
    rule.antecedent().iter().all(|condition| selection.satisfies(condition))
}

fn critical_match(rule: &Rule, selection: &Selection) -> bool {
    match rule.critical() {
        Some(required) => selection.critical() == Some(required),
        None => true,
    }
}

/// Rank every rule of `rules` that matches `selection`.
///
/// An empty result is a valid answer ("no matching diagnosis"); an empty
/// selection is a caller error.
///
/// # Example
/// ```
/// use dxrules::{Selection, diagnose, parse_document};
///
/// let doc = parse_document("===\n1. [Fever=t, Critical=Yes] ==> [Disease=Flu=t] <conf:(0.9)>\n");
/// let ranked = diagnose(&doc.rules, &Selection::new(["Fever=t", "Critical=Yes"])).unwrap();
/// assert_eq!(ranked[0].diagnosis, "Flu");
/// ```
pub fn diagnose(rules: &RuleSet, selection: &Selection) -> Result<Vec<MatchResult>> {
    diagnose_with_metrics(rules, selection).map(|(results, _)| results)
}

pub(crate) fn diagnose_with_metrics(rules: &RuleSet, selection: &Selection) -> Result<(Vec<MatchResult>, QueryMetrics)> {
    if selection.is_empty() {
        return Err(Error::EmptySelection);
    }

    let start = Instant::now();
    let mut metrics = QueryMetrics::default();
    let mut results = Vec::new();

    for rule in rules {
        metrics.rules_evaluated += 1;
        if !symptoms_match(rule, selection) {
            continue;
        }
        metrics.symptom_matches += 1;
        if !critical_match(rule, selection) {
            metrics.critical_mismatches += 1;
            tracing::trace!(rule = %rule, "dropped by Critical check");
            continue;
        }
        results.push(MatchResult { diagnosis: rule.consequent().to_string(), confidence: rule.confidence() });
    }

    results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    metrics.matched = results.len();
    metrics.elapsed = start.elapsed();
    tracing::debug!(
        selected = selection.len(),
        evaluated = metrics.rules_evaluated,
        matched = metrics.matched,
        "diagnosis complete"
    );

    Ok((results, metrics))
}
