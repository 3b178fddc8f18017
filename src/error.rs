use thiserror::Error;

/// Errors surfaced to callers of the load and query entry points.
///
/// Malformed rule lines are not part of this enum: the parser drops them and
/// only counts them (see [`RejectReason`](crate::RejectReason)).
#[derive(Error, Debug)]
pub enum Error {
    /// The rule document could not be read or was not valid UTF-8.
    ///
    /// A failed load leaves any previously loaded knowledge base untouched.
    #[error("failed to read rule document '{source_name}': {source}")]
    DocumentRead {
        /// Path or label of the document that failed.
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    /// A diagnosis was requested with no symptoms selected.
    #[error("no symptoms selected: select at least one symptom before diagnosing")]
    EmptySelection,
}

impl Error {
    pub(crate) fn document_read(source_name: impl Into<String>, source: std::io::Error) -> Self {
        Error::DocumentRead { source_name: source_name.into(), source }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn document_read_message_names_the_source() {
        let err = Error::document_read("rules.txt", io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert_eq!(err.to_string(), "failed to read rule document 'rules.txt': missing");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn empty_selection_has_no_source() {
        let err = Error::EmptySelection;
        assert!(std::error::Error::source(&err).is_none());
        assert!(err.to_string().contains("no symptoms selected"));
    }
}
