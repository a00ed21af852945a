//! YAML configuration for Tabula.
//!
//! - [`Manifest`]: enum and row types with their table annotations, resolved
//!   into shareable [`TypeDescriptor`](tabula_core::TypeDescriptor)s by
//!   [`Manifest::resolve`].
//! - [`TableData`]: row collections and view models, converted to
//!   [`Value`](tabula_core::Value)s along the declared types.
//! - [`load_options`]: render options.

mod data;
mod error;
mod manifest;

pub use data::{load_options, to_value, value_for, TableData};
pub use error::ManifestError;
pub use manifest::{EnumSpec, Manifest, MemberSpec, PropertySpec, Schema, TypeSpec};
