//! Tabula: metadata-driven HTML tables.
//!
//! Describe a row type once with [`TypeDescriptor`] (or load it from YAML
//! through [`yaml`]), then render read-only and editable tables for
//! collections of rows with [`TableHelper`]. The [`client`] module holds the
//! row-lifecycle controller that drives an editable table once it is on the
//! page: adding rows from the template, archiving and restoring existing
//! rows, dirty tracking and footer totals.
//!
//! ```
//! use tabula::{PropertyDescriptor, TableColumn, TableEdit, TableHelper, TypeDescriptor, Value};
//!
//! let row_type = TypeDescriptor::builder("Line")
//!     .property(PropertyDescriptor::text("Name"))
//!     .property(PropertyDescriptor::integer("Qty").column(TableColumn::default().total()))
//!     .edit(TableEdit::default())
//!     .build()
//!     .unwrap();
//! let rows = Value::List(vec![Value::object([
//!     ("Name", Value::from("Bolt")),
//!     ("Qty", Value::from(4)),
//! ])]);
//! let html = TableHelper::new()
//!     .editor_for("Lines", &rows, &row_type, &Value::Null)
//!     .unwrap()
//!     .to_html();
//! assert!(html.contains(r#"name="Lines[0].Qty""#));
//! ```

pub use tabula_core::*;
pub use tabula_widgets as widgets;
pub use tabula_widgets::{LinkResolver, RouteLinks, TableError, TableHelper};
pub use tabula_yaml as yaml;

pub mod client;

pub use client::{ClientError, RowStatus, TableController, TableMessage, TableRegistry};
