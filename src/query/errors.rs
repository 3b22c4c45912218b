//! Query assembly errors.

use thiserror::Error;

/// Error returned when a query element cannot be turned into parameters.
///
/// Typed elements always assemble; this only arises from the loosely typed
/// inputs (`key=value` strings and raw JSON values).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The element matches none of the accepted shapes.
    #[error("Unsupported query element: {element}")]
    UnsupportedElement {
        /// A short rendering of the rejected element.
        element: String,
    },
}
