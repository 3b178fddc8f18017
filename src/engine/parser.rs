//! Rule-export parser.
//!
//! A rule-export document looks like this:
//!
//! ```text
//! Attributes:
//!    Fever=t
//!    Critical=Yes
//!    Disease=Flu
//! ===
//! ... anything ...
//! ===
//!  1. [Fever=t, Critical=Yes]: 12 ==> [Disease=Flu=t]: 11    <conf:(0.92)>
//!  2. [Cough=t]: 30 ==> [Disease=Cold=t]: 18    <conf:(0.6)>
//! ```
//!
//! Two independent extractions run over the text:
//!
//! - **Catalog**: every non-blank line containing `=` between the first
//!   `Attributes:` and the next `===`, except `Disease=` declarations.
//! - **Rules**: the grammar regex is applied to the text after the *last*
//!   `===` (the whole document when there is none). Earlier `===`-delimited
//!   segments never contribute rules.
//!
//! Parsing is permissive. Text that does not match the grammar is ignored, and
//! a candidate that matches but fails to decode (no positive condition, no
//! diagnosis, confidence outside `[0, 1]`) is dropped and counted. Nothing in
//! the document content can make a parse fail.

use super::decode::{decode_antecedent, decode_confidence, decode_consequent};
use super::metrics::LoadMetrics;
use super::scan::SectionMask;
use crate::{Rule, RuleSet, SymptomCatalog, SymptomToken};
use regex::Captures;
use std::fmt;
use std::time::Instant;

pub(crate) const ATTRIBUTES_MARKER: &str = "Attributes:";
pub(crate) const SECTION_SEPARATOR: &str = "===";
pub(crate) const RULE_ARROW: &str = "==>";

/// Attribute lines with this prefix declare diagnoses, not symptoms.
const DIAGNOSIS_PREFIX: &str = "Disease=";

/// Why a candidate rule line was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// No antecedent token decoded to a condition.
    EmptyAntecedent,
    /// The consequent has no `Disease=<name>=t`.
    MissingConsequent,
    /// The confidence is not a number in `[0, 1]`.
    BadConfidence,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::EmptyAntecedent => "empty antecedent",
            RejectReason::MissingConsequent => "missing consequent",
            RejectReason::BadConfidence => "confidence outside [0, 1]",
        };
        f.write_str(text)
    }
}

/// Output of one document parse.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub rules: RuleSet,
    pub catalog: SymptomCatalog,
    pub sections: SectionMask,
    pub metrics: LoadMetrics,
}

/// Parses one rule-export document.
///
/// Usage: `RuleParser::new(text).run()`, or the [`parse_document`] shorthand.
#[derive(Debug)]
pub struct RuleParser<'a> {
    input: &'a str,
    sections: SectionMask,
}

impl<'a> RuleParser<'a> {
    pub fn new(input: &'a str) -> Self {
        let sections = SectionMask::scan(input);
        tracing::debug!(sections = ?sections, bytes = input.len(), "scanned rule document");
        RuleParser { input, sections }
    }

    pub fn sections(&self) -> SectionMask {
        self.sections
    }

    /// Text between the first `Attributes:` and the following `===`.
    fn attribute_block(&self) -> Option<&'a str> {
        regex!(r"(?s)Attributes:(.*?)===").captures(self.input).and_then(|caps| caps.get(1)).map(|m| m.as_str())
    }

    /// Text after the last `===`.
    fn rule_block(&self) -> &'a str {
        self.input.rsplit(SECTION_SEPARATOR).next().unwrap_or(self.input)
    }

    fn extract_catalog(&self, metrics: &mut LoadMetrics) -> SymptomCatalog {
        let mut catalog = SymptomCatalog::default();
        let Some(block) = self.attribute_block() else {
            tracing::debug!("no attribute block; symptom catalog is empty");
            return catalog;
        };

        for line in block.lines() {
            metrics.attribute_lines += 1;
            let line = line.trim();
            if line.contains('=') && !line.starts_with(DIAGNOSIS_PREFIX) {
                catalog.insert(SymptomToken::new(line));
            }
        }
        catalog
    }

    /// Turn one grammar match into a rule.
    ///
    /// Capture groups: 1 = antecedent text, 2 = consequent text, 3 = confidence.
    fn decode_candidate(caps: &Captures<'_>) -> Result<Rule, RejectReason> {
        let antecedent = decode_antecedent(&caps[1]);
        if antecedent.is_empty() {
            return Err(RejectReason::EmptyAntecedent);
        }
        let consequent = decode_consequent(&caps[2]).ok_or(RejectReason::MissingConsequent)?;
        let confidence = decode_confidence(&caps[3]).ok_or(RejectReason::BadConfidence)?;

        Rule::new(antecedent, consequent, confidence).ok_or(RejectReason::BadConfidence)
    }

    /// Extract the catalog and every valid rule.
    pub fn run(self) -> ParsedDocument {
        let start = Instant::now();
        let mut metrics = LoadMetrics::default();

        let catalog = self.extract_catalog(&mut metrics);

        let grammar = regex!(r"\d+\.\s+\[(.*?)\](?::\s*\d+)?\s*==>\s*\[(.*?)\](?::\s*\d+)?\s*<conf:\(([\d.]+)\)>");
        let mut rules = RuleSet::empty();
        for caps in grammar.captures_iter(self.rule_block()) {
            metrics.candidates += 1;
            match Self::decode_candidate(&caps) {
                Ok(rule) => {
                    tracing::trace!(rule = %rule, "accepted rule");
                    rules.push(rule);
                    metrics.accepted += 1;
                }
                Err(reason) => {
                    tracing::trace!(%reason, line = &caps[0], "skipping candidate rule");
                    metrics.record_rejection(reason);
                }
            }
        }

        metrics.elapsed = start.elapsed();
        tracing::debug!(
            rules = rules.len(),
            symptoms = catalog.len(),
            rejected = metrics.rejected(),
            "parsed rule document"
        );

        ParsedDocument { rules, catalog, sections: self.sections, metrics }
    }
}

/// Parse a rule-export document into its rule set and symptom catalog.
///
/// # Example
/// ```
/// use dxrules::parse_document;
///
/// let doc = parse_document("Attributes:\nFever=t\n===\n1. [Fever=t] ==> [Disease=Flu=t] <conf:(0.8)>\n");
/// assert_eq!(doc.rules.len(), 1);
/// assert!(doc.catalog.contains("Fever=t"));
/// ```
pub fn parse_document(text: &str) -> ParsedDocument {
    RuleParser::new(text).run()
}
