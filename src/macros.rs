/// Compile a regex literal once and hand out a `&'static Regex`.
///
/// Every grammar pattern of the rule-export format goes through this macro so
/// a document load never recompiles them.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}
