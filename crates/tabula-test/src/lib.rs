#![allow(clippy::missing_panics_doc)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::must_use_candidate)]
//! Testing fixtures and HTML queries for Tabula.
//!
//! [`fixture`] declares the sample model types the test suites share.
//! [`html`] parses rendered markup with `scraper` and answers the questions
//! the suites ask of it: cell counts per row, hidden inputs, attribute
//! lookups.
//!
//! ```
//! use tabula_test::html::Markup;
//!
//! let markup = Markup::parse(r#"<table><tr><td>1</td><td>2</td></tr></table>"#);
//! assert_eq!(markup.row_cell_counts("tr"), vec![2]);
//! ```

pub mod fixture;
pub mod html;

pub use fixture::{line, lines, order_line_type, HiddenFixture};
pub use html::Markup;
