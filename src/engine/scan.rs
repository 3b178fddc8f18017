//! Structural pre-scan of a rule-export document.
//!
//! The scan records which of the format's markers a document contains. It is
//! purely informational: the parser's output does not depend on it, but load
//! summaries and debug traces use it to explain an unexpectedly empty result
//! (for example a document with no `===` separator at all).

use super::parser::{ATTRIBUTES_MARKER, RULE_ARROW, SECTION_SEPARATOR};

bitflags::bitflags! {
    /// Coarse structural features of a rule-export document.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SectionMask: u8 {
        /// An `Attributes:` marker is present.
        const HAS_ATTRIBUTES      = 1 << 0;
        /// At least one `===` separator is present.
        const HAS_SEPARATOR       = 1 << 1;
        /// More than one `===` separator; only the last segment holds rules.
        const MULTIPLE_SEPARATORS = 1 << 2;
        /// The rule segment contains at least one `==>` arrow.
        const HAS_RULE_ARROW      = 1 << 3;
    }
}

impl SectionMask {
    /// Scan `input` for the structural markers of the rule-export format.
    pub fn scan(input: &str) -> Self {
        let mut mask = SectionMask::empty();

        if input.contains(ATTRIBUTES_MARKER) {
            mask |= SectionMask::HAS_ATTRIBUTES;
        }

        match input.matches(SECTION_SEPARATOR).count() {
            0 => {}
            1 => mask |= SectionMask::HAS_SEPARATOR,
            _ => mask |= SectionMask::HAS_SEPARATOR | SectionMask::MULTIPLE_SEPARATORS,
        }

        let rule_segment = input.rsplit(SECTION_SEPARATOR).next().unwrap_or(input);
        if rule_segment.contains(RULE_ARROW) {
            mask |= SectionMask::HAS_RULE_ARROW;
        }

        mask
    }
}
