//! Table renderers for Tabula.
//!
//! A table is rendered in passes that share one [`ColumnPlan`]: header,
//! read-only or editable body, the hidden template row and the footer.
//! [`TableHelper`] is the entry point; the pass functions are public for
//! callers that assemble tables themselves.

pub mod body;
pub mod context;
pub mod controls;
pub mod editor;
mod error;
pub mod footer;
pub mod header;
pub mod hidden;
pub mod link;
pub mod lists;
pub mod plan;
mod table;

pub use context::TableRenderContext;
pub use controls::{form_control, ControlSpec, ARCHIVE_TEXT_CLASS, CONTROL_CLASS};
pub use editor::{
    ADD_BUTTON_CLASS, ARCHIVED_CLASS, DELETE_BUTTON_CLASS, EDIT_ROW_CLASS, TEMPLATE_CLASS,
    VALIDATION_ROW_CLASS,
};
pub use error::TableError;
pub use footer::TOTAL_CLASS;
pub use hidden::{hidden_input, hidden_inputs_for};
pub use link::{LinkResolver, RouteLinks};
pub use lists::{data_list, select_list, SelectOption};
pub use plan::{ColumnDescriptor, ColumnLink, ColumnPlan, ColumnRole, RenderMode};
pub use table::{TableHelper, EDIT_TABLE_CLASS, READONLY_TABLE_CLASS};
