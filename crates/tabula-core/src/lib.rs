//! Core types for the Tabula table renderer.
//!
//! This crate provides the foundations shared by the renderers and the client
//! controller:
//! - Model metadata: [`TypeDescriptor`], [`PropertyDescriptor`], [`PropertyKind`]
//! - Table annotations: [`TableDisplay`], [`TableEdit`], [`TableColumn`],
//!   [`TableLink`], [`DropDownList`], [`DataList`]
//! - Dynamic values: [`Value`]
//! - Display formatting: [`format`]
//! - Markup: [`Element`], [`Fragment`]
//! - Row lifecycle contract: [`State`], [`Command`]

mod annotation;
pub mod dom;
mod error;
pub mod format;
mod metadata;
mod options;
mod state;
mod value;

pub use annotation::{DataList, DropDownList, TableColumn, TableDisplay, TableEdit, TableLink};
pub use dom::{Element, Fragment, Node};
pub use error::ConfigError;
pub use metadata::{
    Construction, DataType, EnumDescriptor, EnumMember, PropertyDescriptor, PropertyKind,
    ScalarKind, TypeBuilder, TypeDescriptor, ROW_CONTRACT_ACTIVE, ROW_CONTRACT_DIRTY,
};
pub use options::RenderOptions;
pub use state::{Behavior, Command, State, TableEvent};
pub use value::{parse_decimal, Object, Value};

/// Decimal type used for totals.
pub use rust_decimal::Decimal;
