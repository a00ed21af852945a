//! Declarative table annotations.
//!
//! Each annotation is a typed record attached to a [`TypeDescriptor`] or a
//! [`PropertyDescriptor`]. They deserialize from camelCase keys with the
//! documented defaults, so manifests only spell out what differs.
//!
//! [`TypeDescriptor`]: crate::TypeDescriptor
//! [`PropertyDescriptor`]: crate::PropertyDescriptor

use serde::{Deserialize, Serialize};

fn default_id_property() -> String {
    "ID".to_string()
}

fn default_action() -> String {
    "Details".to_string()
}

fn default_display_property() -> String {
    "Name".to_string()
}

#[allow(clippy::unnecessary_wraps)]
fn default_option_label() -> Option<String> {
    Some(String::new())
}

const fn yes() -> bool {
    true
}

/// Row numbering and row-level navigation links for read-only tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDisplay {
    /// Lead every row with its 1-based row number.
    #[serde(default)]
    pub include_row_numbers: bool,
    /// Controller used for the details/edit links.
    #[serde(default)]
    pub controller: Option<String>,
    /// Action of the details link, if any.
    #[serde(default)]
    pub details_action: Option<String>,
    /// Action of the edit link, if any.
    #[serde(default)]
    pub edit_action: Option<String>,
    /// Property supplying the route id.
    #[serde(default = "default_id_property")]
    pub id_property: String,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self {
            include_row_numbers: false,
            controller: None,
            details_action: None,
            edit_action: None,
            id_property: default_id_property(),
        }
    }
}

impl TableDisplay {
    /// Number the rows.
    #[must_use]
    pub const fn row_numbers(mut self) -> Self {
        self.include_row_numbers = true;
        self
    }

    /// Set the controller for row links.
    #[must_use]
    pub fn controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    /// Add a details link using `action`.
    #[must_use]
    pub fn details(mut self, action: impl Into<String>) -> Self {
        self.details_action = Some(action.into());
        self
    }

    /// Add an edit link using `action`.
    #[must_use]
    pub fn edit(mut self, action: impl Into<String>) -> Self {
        self.edit_action = Some(action.into());
        self
    }

    /// Override the id property.
    #[must_use]
    pub fn id_property(mut self, property: impl Into<String>) -> Self {
        self.id_property = property.into();
        self
    }

    /// Whether any row-level link is configured.
    #[must_use]
    pub const fn has_actions(&self) -> bool {
        self.details_action.is_some() || self.edit_action.is_some()
    }
}

/// Additions, deletions and row-state tracking for editable tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEdit {
    /// Render an add button in the footer.
    #[serde(default = "yes")]
    pub allow_additions: bool,
    /// Render a delete button on each row.
    #[serde(default = "yes")]
    pub allow_deletions: bool,
    /// Boolean property tracking whether a row changed.
    #[serde(default)]
    pub is_dirty_property: Option<String>,
    /// Boolean property tracking whether a row is active (not archived).
    #[serde(default)]
    pub is_active_property: Option<String>,
}

impl Default for TableEdit {
    fn default() -> Self {
        Self {
            allow_additions: true,
            allow_deletions: true,
            is_dirty_property: None,
            is_active_property: None,
        }
    }
}

impl TableEdit {
    /// Disable the add button.
    #[must_use]
    pub const fn no_additions(mut self) -> Self {
        self.allow_additions = false;
        self
    }

    /// Disable the delete buttons.
    #[must_use]
    pub const fn no_deletions(mut self) -> Self {
        self.allow_deletions = false;
        self
    }

    /// Name the dirty-flag property.
    #[must_use]
    pub fn dirty_property(mut self, property: impl Into<String>) -> Self {
        self.is_dirty_property = Some(property.into());
        self
    }

    /// Name the active-flag property.
    #[must_use]
    pub fn active_property(mut self, property: impl Into<String>) -> Self {
        self.is_active_property = Some(property.into());
        self
    }
}

/// Per-column rendering directives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableColumn {
    /// Omit the column entirely.
    pub exclude: bool,
    /// Render as text in editable tables.
    pub readonly: bool,
    /// Child property shown in place of a complex value.
    pub display_property: Option<String>,
    /// Sum the column in the footer. Numeric properties only.
    pub include_total: bool,
    /// Blank out values equal to the previous row's.
    pub no_repeat: bool,
}

impl TableColumn {
    /// Column excluded from all output.
    #[must_use]
    pub fn excluded() -> Self {
        Self {
            exclude: true,
            ..Self::default()
        }
    }

    /// Read-only in edit mode.
    #[must_use]
    pub const fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Show a complex value through one of its children.
    #[must_use]
    pub fn display_property(mut self, property: impl Into<String>) -> Self {
        self.display_property = Some(property.into());
        self
    }

    /// Total the column.
    #[must_use]
    pub const fn total(mut self) -> Self {
        self.include_total = true;
        self
    }

    /// Suppress repeated values.
    #[must_use]
    pub const fn no_repeat(mut self) -> Self {
        self.no_repeat = true;
        self
    }
}

/// Hyperlink rendering for a row type or a complex property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableLink {
    /// Target controller.
    #[serde(default)]
    pub controller: String,
    /// Target action.
    #[serde(default = "default_action")]
    pub action: String,
    /// Property supplying the route id.
    #[serde(default = "default_id_property")]
    pub id_property: String,
    /// Property supplying the link text.
    #[serde(default = "default_display_property")]
    pub display_property: String,
}

impl TableLink {
    /// Link to `controller` with the default action and properties.
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: default_action(),
            id_property: default_id_property(),
            display_property: default_display_property(),
        }
    }

    /// Override the action.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Override the id property.
    #[must_use]
    pub fn id_property(mut self, property: impl Into<String>) -> Self {
        self.id_property = property.into();
        self
    }

    /// Override the display property.
    #[must_use]
    pub fn display_property(mut self, property: impl Into<String>) -> Self {
        self.display_property = property.into();
        self
    }
}

/// Binds an editable column to a select list held by the view model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropDownList {
    /// Sibling property of the table's field holding the options.
    pub select_list_property: String,
    /// Text of a leading empty-valued option; `None` omits it.
    #[serde(default = "default_option_label")]
    pub option_label: Option<String>,
}

impl DropDownList {
    /// Select list read from `property`, with an empty leading option.
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            select_list_property: property.into(),
            option_label: default_option_label(),
        }
    }

    /// Override the leading option's text.
    #[must_use]
    pub fn option_label(mut self, label: Option<String>) -> Self {
        self.option_label = label;
        self
    }
}

/// Binds an editable text column to a browser suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataList {
    /// Sibling property of the table's field holding the suggestions.
    pub data_list_property: String,
}

impl DataList {
    /// Suggestions read from `property`.
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            data_list_property: property.into(),
        }
    }
}
