//! Render options shared by the server renderers and the client controller.

use serde::{Deserialize, Serialize};

/// Texts and tokens used while rendering tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Label for `true`.
    pub yes_label: String,
    /// Label for `false`.
    pub no_label: String,
    /// Header of the row-number column.
    pub row_number_header: String,
    /// Text of row details links.
    pub details_text: String,
    /// Text of row edit links.
    pub edit_text: String,
    /// Index token of the template row, substituted when a row is added.
    pub placeholder_token: String,
    /// Decimal places the client rounds numeric input to, if any.
    pub rounding: Option<u32>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            yes_label: "Yes".to_string(),
            no_label: "No".to_string(),
            row_number_header: "No.".to_string(),
            details_text: "Details".to_string(),
            edit_text: "Edit".to_string(),
            placeholder_token: "#".to_string(),
            rounding: None,
        }
    }
}

impl RenderOptions {
    /// Label for a boolean.
    #[must_use]
    pub fn bool_label(&self, value: bool) -> &str {
        if value {
            &self.yes_label
        } else {
            &self.no_label
        }
    }
}
