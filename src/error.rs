//! Recoverable viewer errors.

/// Failures surfaced to the user during a session or while reading the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewerError {
    /// A selection or link pointed at an id no annotation carries.
    #[error("annotation `{id}` doesn't exist")]
    DanglingReference { id: String },

    /// Isolation needs every node to carry its connectivity set.
    #[error("annotation `{id}` has no connectivity data; isolation is unavailable")]
    MissingConnectivityData { id: String },

    /// The grouping primitive was asked about a node it doesn't hold.
    #[error("node `{id}` is not part of the graph")]
    UnknownNode { id: String },

    /// An action that needs a selection was dispatched without one.
    #[error("no annotation is selected")]
    NothingSelected,

    /// The input document could not be decoded.
    #[error("invalid annotation document: {0}")]
    InvalidDocument(String),

    /// A validator in the upstream chain rejected the document.
    #[error("{0}")]
    Validation(String),
}
