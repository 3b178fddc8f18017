use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;

pub use api::{Diagnosis, KnowledgeBase, LoadSummary, Options, Session};
pub use engine::{
    LoadMetrics, ParsedDocument, QueryMetrics, RejectReason, RuleParser, SectionMask, diagnose, parse_document,
};
pub use error::{Error, Result};

// --- Symptom tokens ---------------------------------------------------------

/// An atomic `Category=Value` identifier, e.g. `Fever=t` or `Critical=Yes`.
///
/// Tokens compare by exact, case-sensitive string equality. Construction trims
/// surrounding whitespace and does nothing else.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymptomToken(String);

impl SymptomToken {
    /// Prefix shared by every token of the reserved `Critical` category.
    pub const CRITICAL_PREFIX: &'static str = "Critical=";

    pub fn new(text: impl AsRef<str>) -> Self {
        SymptomToken(text.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `=`, or the whole token when it has none.
    pub fn category(&self) -> &str {
        self.0.split_once('=').map_or(self.0.as_str(), |(category, _)| category)
    }

    /// Text after the first `=`.
    pub fn value(&self) -> Option<&str> {
        self.0.split_once('=').map(|(_, value)| value)
    }

    pub fn is_critical(&self) -> bool {
        self.0.starts_with(Self::CRITICAL_PREFIX)
    }
}

impl fmt::Display for SymptomToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SymptomToken {
    fn from(text: &str) -> Self {
        SymptomToken::new(text)
    }
}

impl From<String> for SymptomToken {
    fn from(text: String) -> Self {
        SymptomToken::new(text)
    }
}

impl AsRef<str> for SymptomToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SymptomToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// --- Rules ------------------------------------------------------------------

/// One learned rule: `antecedent ==> consequent` with a confidence in `[0, 1]`.
///
/// A `Rule` always has a non-empty antecedent, a non-empty consequent and a
/// finite confidence inside `[0, 1]`; [`Rule::new`] refuses anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    antecedent: BTreeSet<SymptomToken>,
    consequent: String,
    confidence: f64,
}

impl Rule {
    pub fn new(
        antecedent: impl IntoIterator<Item = SymptomToken>,
        consequent: impl Into<String>,
        confidence: f64,
    ) -> Option<Self> {
        let antecedent: BTreeSet<SymptomToken> = antecedent.into_iter().collect();
        let consequent = consequent.into();
        if antecedent.is_empty() || consequent.is_empty() || !(0.0..=1.0).contains(&confidence) {
            return None;
        }
        Some(Rule { antecedent, consequent, confidence })
    }

    pub fn antecedent(&self) -> &BTreeSet<SymptomToken> {
        &self.antecedent
    }

    pub fn consequent(&self) -> &str {
        &self.consequent
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// The rule's `Critical=` condition, if it has one.
    ///
    /// Rules carry at most one in practice; when a document yields several,
    /// the smallest in token order is reported.
    pub fn critical(&self) -> Option<&SymptomToken> {
        self.antecedent.iter().find(|token| token.is_critical())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conditions: Vec<&str> = self.antecedent.iter().map(SymptomToken::as_str).collect();
        write!(f, "[{}] ==> [{}] <conf:({})>", conditions.join(", "), self.consequent, self.confidence)
    }
}

/// Rules in the order they appeared in the source document.
///
/// The order only matters for tie-breaking in the ranking and for debugging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn empty() -> Self {
        RuleSet::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub(crate) fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        RuleSet { rules: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

// --- Catalog ----------------------------------------------------------------

/// Distinct symptom declarations found in a document's `Attributes:` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomCatalog {
    tokens: BTreeSet<SymptomToken>,
}

impl SymptomCatalog {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymptomToken> {
        self.tokens.iter()
    }

    /// Catalog values keyed by category, e.g. `Fever -> ["f", "t"]`.
    pub fn grouped(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for token in &self.tokens {
            groups.entry(token.category()).or_default().push(token.value().unwrap_or(""));
        }
        groups
    }

    pub(crate) fn insert(&mut self, token: SymptomToken) -> bool {
        self.tokens.insert(token)
    }
}

// --- Selection --------------------------------------------------------------

/// The symptoms chosen for one query.
///
/// Tokens are kept as declared (`Fever=t`) and in their decoded condition form
/// (`Fever`), the same decoding the parser applies to rule antecedents. A rule
/// condition is satisfied by either form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    tokens: BTreeSet<SymptomToken>,
    conditions: BTreeSet<SymptomToken>,
}

impl Selection {
    /// Build a selection, skipping blank entries.
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut selection = Selection::default();
        for token in tokens {
            selection.insert(token.as_ref());
        }
        selection
    }

    /// Add one symptom; returns `false` for blank input or a repeat.
    pub fn insert(&mut self, token: &str) -> bool {
        let token = SymptomToken::new(token);
        if token.as_str().is_empty() {
            return false;
        }
        if let Some(condition) = engine::decode_condition(token.as_str()) {
            self.conditions.insert(condition);
        }
        self.tokens.insert(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymptomToken> {
        self.tokens.iter()
    }

    /// Exact membership of a declared token.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Whether a rule condition is present, as declared or in decoded form.
    pub fn satisfies(&self, condition: &SymptomToken) -> bool {
        self.tokens.contains(condition) || self.conditions.contains(condition)
    }

    /// The selected `Critical=` token (smallest one if several were selected).
    pub fn critical(&self) -> Option<&SymptomToken> {
        self.tokens.iter().find(|token| token.is_critical())
    }
}

impl<T: AsRef<str>> FromIterator<T> for Selection {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Selection::new(iter)
    }
}

// --- Results ----------------------------------------------------------------

/// One ranked diagnosis.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub diagnosis: String,
    pub confidence: f64,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Disease: {} (Confidence: {:.1}%)", self.diagnosis, self.confidence * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_trims_and_splits_on_first_equals() {
        let token = SymptomToken::new("  Disease=Flu=t ");
        assert_eq!(token.as_str(), "Disease=Flu=t");
        assert_eq!(token.category(), "Disease");
        assert_eq!(token.value(), Some("Flu=t"));

        let bare = SymptomToken::new("Fever");
        assert_eq!(bare.category(), "Fever");
        assert_eq!(bare.value(), None);
    }

    #[test]
    fn critical_detection_is_case_sensitive() {
        assert!(SymptomToken::new("Critical=Yes").is_critical());
        assert!(!SymptomToken::new("critical=Yes").is_critical());
        assert!(!SymptomToken::new("Critical").is_critical());
    }

    #[test]
    fn rule_new_enforces_invariants() {
        assert!(Rule::new(Vec::new(), "Flu", 0.5).is_none());
        assert!(Rule::new(vec![SymptomToken::new("Fever")], "", 0.5).is_none());
        assert!(Rule::new(vec![SymptomToken::new("Fever")], "Flu", 1.5).is_none());
        assert!(Rule::new(vec![SymptomToken::new("Fever")], "Flu", f64::NAN).is_none());

        let rule = Rule::new(vec![SymptomToken::new("Fever"), SymptomToken::new("Fever")], "Flu", 1.0).unwrap();
        assert_eq!(rule.antecedent().len(), 1);
        assert_eq!(rule.to_string(), "[Fever] ==> [Flu] <conf:(1)>");
    }

    #[test]
    fn catalog_groups_by_category() {
        let mut catalog = SymptomCatalog::default();
        for token in ["Fever=t", "Fever=f", "Critical=Yes", "Cough=t"] {
            catalog.insert(SymptomToken::new(token));
        }
        assert!(!catalog.insert(SymptomToken::new("Fever=t")));

        let groups = catalog.grouped();
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["Cough", "Critical", "Fever"]);
        assert_eq!(groups["Fever"], vec!["f", "t"]);
        assert!(catalog.contains("Critical=Yes"));
    }

    #[test]
    fn selection_skips_blanks_and_exposes_both_forms() {
        let selection = Selection::new(["Fever=t", "  ", "Critical=No", "Fever=t"]);
        assert_eq!(selection.len(), 2);
        assert!(selection.contains("Fever=t"));
        assert!(selection.satisfies(&SymptomToken::new("Fever")));
        assert!(selection.satisfies(&SymptomToken::new("Fever=t")));
        assert!(!selection.satisfies(&SymptomToken::new("Cough")));
        assert_eq!(selection.critical().map(SymptomToken::as_str), Some("Critical=No"));
    }

    #[test]
    fn match_result_formats_as_percentage() {
        let result = MatchResult { diagnosis: "Flu".to_string(), confidence: 0.8 };
        assert_eq!(result.to_string(), "Disease: Flu (Confidence: 80.0%)");
    }
}
