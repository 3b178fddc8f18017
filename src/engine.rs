//! Rule-export parsing and diagnostic matching engine.
//!
//! The engine has two halves that run in dependency order: a parser that turns
//! a rule-export document into a [`RuleSet`](crate::RuleSet) plus a
//! [`SymptomCatalog`](crate::SymptomCatalog), and a matcher that evaluates a
//! [`Selection`](crate::Selection) against that rule set.
//!
//! ## How the parts work together
//!
//! ```text
//! document text
//!      │
//!      ├── SectionMask::scan           (scan.rs)
//!      │     - which structural markers are present
//!      │
//!      ├── RuleParser::run             (parser.rs)
//!      │     - Attributes: block  ──▶ SymptomCatalog
//!      │     - text after last === ──▶ candidate rule lines
//!      │     - decode_* helpers         (decode.rs)
//!      │     - invalid candidates dropped, counted in LoadMetrics
//!      │
//!      v
//!  ParsedDocument { rules, catalog, sections, metrics }
//!
//! RuleSet + Selection ── diagnose (matcher.rs) ──▶ Vec<MatchResult>
//!                          - subset check + Critical check
//!                          - stable sort by confidence, descending
//! ```
//!
//! Both halves are pure functions of their inputs: the same document always
//! yields the same rule set, and the same query against the same rule set
//! always yields the same ranking.
//!
//! ## Debugging
//!
//! The engine emits `tracing` events at `debug` and `trace` level (section
//! detection, every rejected candidate, per-query match counts). Install a
//! subscriber, or run the binary with `RUST_LOG=dxrules=trace`, to see them.

#[path = "engine/decode.rs"]
mod decode;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[cfg(test)]
#[path = "engine/scenarios.rs"]
mod scenarios;
#[path = "engine/scan.rs"]
mod scan;

pub(crate) use decode::decode_condition;
pub use matcher::diagnose;
pub(crate) use matcher::diagnose_with_metrics;
pub use metrics::{LoadMetrics, QueryMetrics};
pub use parser::{ParsedDocument, RejectReason, RuleParser, parse_document};
pub use scan::SectionMask;
