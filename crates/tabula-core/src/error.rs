//! Configuration errors raised while building model metadata.

use thiserror::Error;

/// An annotation or descriptor that cannot be honored.
///
/// Every variant is a developer mistake in the model declaration; none of
/// them is recoverable at render time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An annotation names a property the type does not declare.
    #[error("type '{type_name}' does not contain a property named '{property}'")]
    MissingProperty {
        /// Type that was searched.
        type_name: String,
        /// Property that was requested.
        property: String,
    },

    /// An active/dirty property is not a non-nullable boolean.
    #[error("property '{property}' of type '{type_name}' must be a non-nullable boolean")]
    NotBoolean {
        /// Owning type.
        type_name: String,
        /// Offending property.
        property: String,
    },

    /// A link or row action was configured without a controller.
    #[error("{annotation} on '{target}' requires a controller")]
    MissingController {
        /// Annotation name, e.g. `table-link`.
        annotation: &'static str,
        /// Type or property the annotation is attached to.
        target: String,
    },

    /// Two properties of one type share a name.
    #[error("type '{type_name}' declares property '{property}' more than once")]
    DuplicateProperty {
        /// Owning type.
        type_name: String,
        /// Duplicated name.
        property: String,
    },

    /// A complex property refers to a type that was never declared.
    #[error("unknown type '{0}'")]
    UnknownType(String),
}

impl ConfigError {
    pub(crate) fn missing(type_name: &str, property: &str) -> Self {
        Self::MissingProperty {
            type_name: type_name.to_string(),
            property: property.to_string(),
        }
    }
}
