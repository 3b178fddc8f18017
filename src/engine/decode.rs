//! Field decoders for the bracketed parts of a rule line.
//!
//! A rule line has already been split by the grammar regex into antecedent
//! text, consequent text and confidence text; the helpers here turn each of
//! those into typed values.

use crate::SymptomToken;
use std::collections::BTreeSet;

/// Marker for a boolean-positive condition inside a token.
const POSITIVE_MARKER: &str = "=t";

/// Decode one antecedent token into its condition form.
///
/// The token must contain `=t` somewhere; its *first* occurrence is removed
/// (not a suffix trim), so `Fever=t` becomes `Fever` and `Rash=tiny=t`
/// becomes `Rashiny=t`. Returns `None` for tokens without the marker and for
/// tokens that decode to nothing.
pub(crate) fn decode_condition(token: &str) -> Option<SymptomToken> {
    let token = token.trim();
    if !token.contains(POSITIVE_MARKER) {
        return None;
    }
    let condition = SymptomToken::new(token.replacen(POSITIVE_MARKER, "", 1));
    if condition.as_str().is_empty() { None } else { Some(condition) }
}

/// Decode the comma-separated antecedent text into a condition set.
///
/// A `Critical=<word>` pattern anywhere in the untouched text contributes the
/// literal token `Critical=<word>` in addition to whatever the generic `=t`
/// decoding produced.
pub(crate) fn decode_antecedent(text: &str) -> BTreeSet<SymptomToken> {
    let mut conditions: BTreeSet<SymptomToken> = text.split(',').filter_map(decode_condition).collect();

    if let Some(caps) = regex!(r"Critical=(\w+)").captures(text) {
        conditions.insert(SymptomToken::new(format!("{}{}", SymptomToken::CRITICAL_PREFIX, &caps[1])));
    }

    conditions
}

/// Extract the diagnosis name from `Disease=<word>=t`.
pub(crate) fn decode_consequent(text: &str) -> Option<String> {
    regex!(r"Disease=(\w+)=t").captures(text).map(|caps| caps[1].to_string())
}

/// Parse the confidence text; only finite values inside `[0, 1]` are accepted.
pub(crate) fn decode_confidence(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| (0.0..=1.0).contains(value))
}
