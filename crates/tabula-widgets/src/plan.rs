//! Column plan: the flattened column sequence shared by every render pass.
//!
//! A plan is built once per table by walking the row type depth-first. Nested
//! complex properties are flattened in place, so `Order.Customer.Name` becomes
//! one column next to `Order.Total`. Header, body, editable body, template
//! and footer all iterate the same [`ColumnDescriptor`]s by position and skip
//! exactly the same excluded and hidden entries, which keeps their cell counts
//! aligned.

use std::sync::Arc;
use tabula_core::format::total_format;
use tabula_core::{DataType, Decimal, PropertyDescriptor, TableLink, TypeDescriptor, Value};
use tracing::{debug, warn};

/// Whether a table is rendered for display or for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Read-only display table.
    ReadOnly,
    /// Editable table with form controls.
    Editable,
}

/// What a column contributes to the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Omitted from every pass.
    Excluded,
    /// Posted as hidden inputs; never a visible cell.
    Hidden,
    /// Active-flag input of an editable row.
    Active,
    /// Dirty-flag input of an editable row.
    Dirty,
    /// A visible cell.
    Visible,
}

/// Link resolved for a column.
#[derive(Debug, Clone)]
pub struct ColumnLink {
    /// The link directive.
    pub link: TableLink,
    /// Type holding the id and display properties.
    pub target: Arc<TypeDescriptor>,
    /// The link is declared on the containing type, so the id and text are
    /// read from the object holding the column rather than the column value.
    pub on_container: bool,
}

/// One flattened column.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    /// Property names from the row down to this column's property.
    pub path: Vec<String>,
    /// Markup role.
    pub role: ColumnRole,
    /// The property at `path`.
    pub property: PropertyDescriptor,
    /// Header text.
    pub label: String,
    /// Link rendering (read-only tables).
    pub link: Option<ColumnLink>,
    /// Rendered as a `mailto:` link (read-only tables).
    pub email: bool,
    /// Repeated values are blanked.
    pub no_repeat: bool,
    /// Totals format, for totalled columns.
    pub total_format: Option<String>,
    /// Text instead of a control in editable tables.
    pub read_only: bool,
    /// Editable column with a validation message slot.
    pub require_validation: bool,
    /// Child property shown in place of the complex value.
    pub display_property: Option<PropertyDescriptor>,
    /// View-model property holding this column's select list.
    pub select_list: Option<String>,
    /// View-model property holding this column's suggestion list.
    pub data_list: Option<String>,
    pub(crate) previous: Option<String>,
    pub(crate) running_total: Decimal,
}

impl ColumnDescriptor {
    fn new(path: Vec<String>, role: ColumnRole, property: &PropertyDescriptor) -> Self {
        Self {
            path,
            role,
            label: property.label().to_string(),
            property: property.clone(),
            link: None,
            email: false,
            no_repeat: false,
            total_format: None,
            read_only: false,
            require_validation: false,
            display_property: None,
            select_list: None,
            data_list: None,
            previous: None,
            running_total: Decimal::ZERO,
        }
    }

    /// Whether the column renders a visible cell.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.role == ColumnRole::Visible
    }

    /// Whether the column is totalled in the footer.
    #[must_use]
    pub const fn has_total(&self) -> bool {
        self.total_format.is_some()
    }

    /// Running total accumulated so far.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.running_total
    }

    /// Dotted field path, e.g. `Customer.Name`.
    #[must_use]
    pub fn field_path(&self) -> String {
        self.path.join(".")
    }

    /// This column's value within a row.
    #[must_use]
    pub fn resolve<'v>(&self, row: &'v Value) -> &'v Value {
        self.path.iter().fold(row, |v, name| v.field(name))
    }

    /// The object holding this column's value within a row.
    #[must_use]
    pub fn container<'v>(&self, row: &'v Value) -> &'v Value {
        let parents = self.path.len().saturating_sub(1);
        self.path[..parents].iter().fold(row, |v, name| v.field(name))
    }

    /// Blank `text` when it repeats the previous row's text, remembering it
    /// otherwise.
    pub(crate) fn suppress_repeat(&mut self, text: String) -> String {
        if !self.no_repeat {
            return text;
        }
        if self.previous.as_deref() == Some(text.as_str()) {
            String::new()
        } else {
            self.previous = Some(text.clone());
            text
        }
    }

    /// Add `value` to the running total, saturating on overflow.
    pub(crate) fn accumulate(&mut self, value: &Value) {
        if !self.has_total() {
            return;
        }
        let n = value.to_decimal();
        self.running_total = self.running_total.checked_add(n).unwrap_or_else(|| {
            warn!(property = %self.property.name, "column total overflowed, saturating");
            if n.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        });
    }
}

/// The ordered column sequence plus the structural cells of a table.
#[derive(Debug, Clone)]
pub struct ColumnPlan {
    /// Mode the plan was built for.
    pub mode: RenderMode,
    /// Columns in property order.
    pub columns: Vec<ColumnDescriptor>,
    /// Leading row-number cell (read-only).
    pub row_numbers: bool,
    /// Trailing details-link cell (read-only).
    pub details_link: bool,
    /// Trailing edit-link cell (read-only).
    pub edit_link: bool,
    /// Trailing add/delete button cell (editable).
    pub buttons: bool,
    /// Trailing cell carrying a row's hidden inputs (editable).
    pub technical: bool,
}

impl ColumnPlan {
    /// Plan the columns of `row_type` for `mode`.
    pub fn build(row_type: &Arc<TypeDescriptor>, mode: RenderMode) -> Self {
        let read_only = mode == RenderMode::ReadOnly;
        let display = row_type.display.as_ref().filter(|_| read_only);
        let mut plan = Self {
            mode,
            columns: Vec::new(),
            row_numbers: display.is_some_and(|d| d.include_row_numbers),
            details_link: display.is_some_and(|d| d.details_action.is_some()),
            edit_link: display.is_some_and(|d| d.edit_action.is_some()),
            buttons: !read_only && (row_type.allow_additions() || row_type.allow_deletions()),
            technical: !read_only,
        };
        let (active, dirty) = if read_only {
            (None, None)
        } else {
            (row_type.active_property(), row_type.dirty_property())
        };
        let walk = Walk { mode, active, dirty };
        walk.properties(&mut plan.columns, row_type, &[], false);
        debug!(
            row_type = %row_type.name,
            ?mode,
            columns = plan.columns.len(),
            visible = plan.visible_count(),
            "column plan built"
        );
        plan
    }

    /// Visible columns, in order.
    pub fn visible(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.is_visible())
    }

    /// Number of visible columns.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// Number of structural cells every pass adds to the visible columns.
    #[must_use]
    pub fn structural_count(&self) -> usize {
        [
            self.row_numbers,
            self.details_link,
            self.edit_link,
            self.buttons,
            self.technical,
        ]
        .into_iter()
        .filter(|b| *b)
        .count()
    }

    /// Total cells in every row of the table.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.visible_count() + self.structural_count()
    }

    /// Whether any column is totalled.
    #[must_use]
    pub fn has_totals(&self) -> bool {
        self.columns.iter().any(ColumnDescriptor::has_total)
    }

    /// Forget running totals and repeat caches.
    pub fn reset(&mut self) {
        for column in &mut self.columns {
            column.previous = None;
            column.running_total = Decimal::ZERO;
        }
    }
}

struct Walk<'a> {
    mode: RenderMode,
    active: Option<&'a str>,
    dirty: Option<&'a str>,
}

impl Walk<'_> {
    fn properties(
        &self,
        columns: &mut Vec<ColumnDescriptor>,
        ty: &Arc<TypeDescriptor>,
        parent: &[String],
        container_read_only: bool,
    ) {
        let read_only_mode = self.mode == RenderMode::ReadOnly;
        let read_only_type = container_read_only || ty.read_only;
        for property in &ty.properties {
            let mut path = parent.to_vec();
            path.push(property.name.clone());
            let is_root = parent.is_empty();

            if property.is_excluded() {
                columns.push(ColumnDescriptor::new(path, ColumnRole::Excluded, property));
                continue;
            }
            if is_root && self.active == Some(property.name.as_str()) {
                columns.push(ColumnDescriptor::new(path, ColumnRole::Active, property));
                continue;
            }
            if is_root && self.dirty == Some(property.name.as_str()) {
                columns.push(ColumnDescriptor::new(path, ColumnRole::Dirty, property));
                continue;
            }
            if property.hidden {
                columns.push(ColumnDescriptor::new(path, ColumnRole::Hidden, property));
                continue;
            }
            if property.is_collection() {
                debug!(property = %property.name, "collection property excluded from table");
                columns.push(ColumnDescriptor::new(path, ColumnRole::Excluded, property));
                continue;
            }

            let mut column = ColumnDescriptor::new(path, ColumnRole::Visible, property);
            if property.has_no_repeat() {
                let previous = columns.iter().rev().find(|c| c.is_visible());
                if previous.map_or(true, |c| c.no_repeat) {
                    column.no_repeat = true;
                } else {
                    warn!(property = %property.name, "noRepeat ignored: the preceding column repeats");
                }
            }
            if !read_only_mode {
                column.select_list = property
                    .drop_down
                    .as_ref()
                    .map(|d| d.select_list_property.clone());
                column.data_list = property
                    .data_list
                    .as_ref()
                    .map(|d| d.data_list_property.clone());
            }

            if let Some(nested) = property.complex_type() {
                if let Some(child) = property.indirection().and_then(|n| nested.property(n)) {
                    column.label = child.label().to_string();
                    column.display_property = Some(child.clone());
                    column.read_only = read_only_type || property.is_readonly_column();
                    columns.push(column);
                } else if let Some(link) = property.effective_link().filter(|_| read_only_mode) {
                    column.link = Some(ColumnLink {
                        link: link.clone(),
                        target: Arc::clone(nested),
                        on_container: false,
                    });
                    columns.push(column);
                } else {
                    let nested_read_only = read_only_type || property.is_readonly_column();
                    self.properties(columns, nested, &column.path, nested_read_only);
                }
                continue;
            }

            if read_only_mode {
                match ty.link.as_ref().filter(|l| l.display_property == property.name) {
                    Some(link) => {
                        column.link = Some(ColumnLink {
                            link: link.clone(),
                            target: Arc::clone(ty),
                            on_container: true,
                        });
                    }
                    None => column.email = property.data_type == DataType::EmailAddress,
                }
            }
            if property.has_total() {
                column.total_format = Some(total_format(property).to_string());
            }
            column.read_only = read_only_type || property.is_readonly_column();
            column.require_validation = !column.read_only;
            columns.push(column);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::{TableColumn, TableDisplay, TableEdit};

    fn bar() -> Arc<TypeDescriptor> {
        TypeDescriptor::builder("Bar")
            .property(PropertyDescriptor::integer("ID"))
            .property(PropertyDescriptor::text("Name").display_name("Bar name"))
            .build()
            .unwrap()
    }

    fn roles(plan: &ColumnPlan) -> Vec<(String, ColumnRole)> {
        plan.columns
            .iter()
            .map(|c| (c.field_path(), c.role))
            .collect()
    }

    // ===== Flattening Tests =====

    #[test]
    fn test_nested_complex_is_flattened() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::integer("ID"))
            .property(PropertyDescriptor::complex("Bar", bar()))
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        let paths: Vec<_> = plan.visible().map(ColumnDescriptor::field_path).collect();
        assert_eq!(paths, vec!["ID", "Bar.ID", "Bar.Name"]);
    }

    #[test]
    fn test_excluded_and_hidden_are_kept_in_sequence() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::integer("ID").hidden())
            .property(PropertyDescriptor::text("Secret").column(TableColumn::excluded()))
            .property(PropertyDescriptor::text("Name"))
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        assert_eq!(
            roles(&plan),
            vec![
                ("ID".to_string(), ColumnRole::Hidden),
                ("Secret".to_string(), ColumnRole::Excluded),
                ("Name".to_string(), ColumnRole::Visible),
            ]
        );
    }

    #[test]
    fn test_excluded_complex_is_not_walked() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::complex("Bar", bar()).column(TableColumn::excluded()))
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        assert_eq!(plan.columns.len(), 1);
        assert_eq!(plan.visible_count(), 0);
    }

    #[test]
    fn test_collections_are_excluded_but_bytes_are_not() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::collection(
                "Tags",
                tabula_core::PropertyKind::Scalar(tabula_core::ScalarKind::Text),
            ))
            .property(PropertyDescriptor::bytes("Stamp"))
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        assert_eq!(plan.columns[0].role, ColumnRole::Excluded);
        assert_eq!(plan.columns[1].role, ColumnRole::Visible);
    }

    // ===== Indirection and Link Tests =====

    #[test]
    fn test_display_property_wins_over_link() {
        let ty = TypeDescriptor::builder("Foo")
            .property(
                PropertyDescriptor::complex("Bar", bar())
                    .column(TableColumn::default().display_property("Name"))
                    .link(TableLink::new("Bar")),
            )
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        assert_eq!(plan.visible_count(), 1);
        let column = &plan.columns[0];
        assert!(column.link.is_none());
        assert_eq!(column.label, "Bar name");
        assert_eq!(column.display_property.as_ref().unwrap().name, "Name");
    }

    #[test]
    fn test_property_link_only_in_read_only_mode() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::complex("Bar", bar()).link(TableLink::new("Bar")))
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        assert_eq!(plan.visible_count(), 1);
        assert!(plan.columns[0].link.is_some());

        let plan = ColumnPlan::build(&ty, RenderMode::Editable);
        assert_eq!(plan.visible_count(), 2);
    }

    #[test]
    fn test_class_link_marks_display_property_column() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::integer("ID"))
            .property(PropertyDescriptor::text("Name"))
            .link(TableLink::new("Foo"))
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        assert!(plan.columns[0].link.is_none());
        assert!(plan.columns[1].link.as_ref().unwrap().on_container);
    }

    #[test]
    fn test_email_column() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::text("Mail").data_type(DataType::EmailAddress))
            .build()
            .unwrap();
        assert!(ColumnPlan::build(&ty, RenderMode::ReadOnly).columns[0].email);
        assert!(!ColumnPlan::build(&ty, RenderMode::Editable).columns[0].email);
    }

    // ===== No-repeat Tests =====

    #[test]
    fn test_no_repeat_chain_from_first_column() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::text("A").column(TableColumn::default().no_repeat()))
            .property(PropertyDescriptor::text("B").column(TableColumn::default().no_repeat()))
            .property(PropertyDescriptor::text("C"))
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        let flags: Vec<_> = plan.columns.iter().map(|c| c.no_repeat).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn test_no_repeat_broken_chain_is_ignored() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::text("A"))
            .property(PropertyDescriptor::text("B").column(TableColumn::default().no_repeat()))
            .property(PropertyDescriptor::text("C"))
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        assert!(!plan.columns[1].no_repeat);
    }

    #[test]
    fn test_no_repeat_skips_hidden_predecessors() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::integer("ID").hidden())
            .property(PropertyDescriptor::text("A").column(TableColumn::default().no_repeat()))
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        assert!(plan.columns[1].no_repeat);
    }

    #[test]
    fn test_suppress_repeat() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::text("A").column(TableColumn::default().no_repeat()))
            .build()
            .unwrap();
        let mut plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        let column = &mut plan.columns[0];
        assert_eq!(column.suppress_repeat("x".to_string()), "x");
        assert_eq!(column.suppress_repeat("x".to_string()), "");
        assert_eq!(column.suppress_repeat("y".to_string()), "y");
        plan.reset();
        assert_eq!(plan.columns[0].suppress_repeat("y".to_string()), "y");
    }

    // ===== Totals and Read-only Tests =====

    #[test]
    fn test_total_formats() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::integer("Qty").column(TableColumn::default().total()))
            .property(PropertyDescriptor::decimal("Cost").column(TableColumn::default().total()))
            .property(PropertyDescriptor::text("Name").column(TableColumn::default().total()))
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        assert_eq!(plan.columns[0].total_format.as_deref(), Some("{0:N0}"));
        assert_eq!(plan.columns[1].total_format.as_deref(), Some("{0:N2}"));
        assert!(plan.columns[2].total_format.is_none());
        assert!(plan.has_totals());
    }

    #[test]
    fn test_total_saturates_on_overflow() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::decimal("Cost").column(TableColumn::default().total()))
            .build()
            .unwrap();
        let mut plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        let column = &mut plan.columns[0];
        column.accumulate(&Value::Decimal(Decimal::MAX));
        column.accumulate(&Value::Decimal(Decimal::MAX));
        assert_eq!(column.total(), Decimal::MAX);
        column.accumulate(&Value::Decimal(Decimal::MIN));
        assert_eq!(column.total(), Decimal::ZERO);
    }

    #[test]
    fn test_read_only_type_propagates_to_nested_columns() {
        let inner = TypeDescriptor::builder("Inner")
            .property(PropertyDescriptor::text("Code"))
            .read_only()
            .build()
            .unwrap();
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::text("Name"))
            .property(PropertyDescriptor::complex("Inner", inner))
            .property(PropertyDescriptor::complex("Bar", bar()).read_only())
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::Editable);
        let read_only: Vec<_> = plan.visible().map(|c| c.read_only).collect();
        assert_eq!(read_only, vec![false, true, true, true]);
        assert!(plan.columns[0].require_validation);
    }

    // ===== Structural Cell Tests =====

    #[test]
    fn test_structural_cells_read_only() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::integer("ID"))
            .display(
                TableDisplay::default()
                    .row_numbers()
                    .controller("Foo")
                    .details("Details")
                    .edit("Edit"),
            )
            .edit(TableEdit::default())
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        assert!(plan.row_numbers && plan.details_link && plan.edit_link);
        assert!(!plan.buttons && !plan.technical);
        assert_eq!(plan.cell_count(), 4);
    }

    #[test]
    fn test_structural_cells_editable() {
        let ty = TypeDescriptor::builder("Foo")
            .property(PropertyDescriptor::integer("ID"))
            .display(TableDisplay::default().row_numbers())
            .edit(TableEdit::default().no_additions())
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::Editable);
        assert!(!plan.row_numbers);
        assert!(plan.buttons && plan.technical);
        assert_eq!(plan.structural_count(), 2);
    }

    #[test]
    fn test_row_state_columns_only_when_editing() {
        let ty = TypeDescriptor::builder("Row")
            .property(PropertyDescriptor::text("Name"))
            .property(PropertyDescriptor::boolean("IsActive"))
            .property(PropertyDescriptor::boolean("IsDirty"))
            .row_contract()
            .build()
            .unwrap();
        let plan = ColumnPlan::build(&ty, RenderMode::Editable);
        assert_eq!(plan.columns[1].role, ColumnRole::Active);
        assert_eq!(plan.columns[2].role, ColumnRole::Dirty);
        let plan = ColumnPlan::build(&ty, RenderMode::ReadOnly);
        assert_eq!(plan.visible_count(), 3);
    }
}
