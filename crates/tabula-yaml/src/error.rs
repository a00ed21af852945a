//! Error types for YAML loading.

use tabula_core::ConfigError;
use thiserror::Error;

/// Error raised while loading a manifest, row data or options.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The document is not valid YAML for its schema.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A property or request names a type that is not declared.
    #[error("unknown type '{name}' referenced by '{owner}'")]
    UnknownType {
        /// Referenced type.
        name: String,
        /// Property or request holding the reference.
        owner: String,
    },

    /// Complex properties refer back to a type being declared.
    #[error("type graph cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    /// A data value has the wrong shape for its property.
    #[error("value at '{path}' is not {expected}")]
    Mismatch {
        /// Dotted path of the value.
        path: String,
        /// Expected shape.
        expected: &'static str,
    },

    /// An enum value is not one of the declared members.
    #[error("'{member}' at '{path}' is not a member of enum '{enum_name}'")]
    UnknownMember {
        /// Dotted path of the value.
        path: String,
        /// Enum type.
        enum_name: String,
        /// Offending member.
        member: String,
    },

    /// A declared type failed annotation validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
