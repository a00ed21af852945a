//! Errors raised by the table renderers.

use tabula_core::ConfigError;
use thiserror::Error;

/// A table render that cannot proceed.
///
/// Nothing is emitted when a render fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The collection to render is null.
    #[error("the collection to render in a table is null")]
    NullCollection,

    /// The model is not a collection of rows.
    #[error("cannot render a table for {0}")]
    UnsupportedShape(&'static str),

    /// An editable table needs a default row to build its template row.
    #[error("type '{0}' has no parameterless construction path")]
    NoConstructor(String),

    /// An option list names a property the view model does not have.
    #[error("the view model does not contain an option list named '{0}'")]
    MissingOptions(String),

    /// An option list property is null.
    #[error("the option list '{0}' is null")]
    NullOptions(String),

    /// An option list property has the wrong shape.
    #[error("the option list '{0}' is not a list of options")]
    InvalidOptions(String),

    /// An option list property is empty.
    #[error("the option list '{0}' is empty")]
    EmptyOptions(String),

    /// Invalid model metadata.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
