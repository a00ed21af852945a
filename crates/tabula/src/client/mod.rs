//! Client row-lifecycle controller.
//!
//! A [`TableController`] is bound to one editable table produced by
//! [`TableHelper::editor_for`](tabula_widgets::TableHelper::editor_for) and
//! driven through [`State::update`]. Rows are added from the hidden template,
//! rows added this way are removed outright when deleted, server rows are
//! archived and restored instead. Every field change recomputes the row's
//! dirty flag from scratch, and numeric changes recompute the footer totals.
//!
//! The controller owns and mutates the table's element tree. The
//! [`Command`]s it returns are the side effects left to the host page:
//! binding enhancement behaviors, validation upkeep, focus, events and the
//! final form post.
//!
//! ```
//! use tabula::{Behavior, State, TableController, TableMessage, Value};
//! use tabula::{PropertyDescriptor, TableColumn, TableEdit, TableHelper, TypeDescriptor};
//!
//! let row_type = TypeDescriptor::builder("Line")
//!     .property(PropertyDescriptor::integer("Qty").column(TableColumn::default().total()))
//!     .edit(TableEdit::default())
//!     .build()
//!     .unwrap();
//! let rows = Value::List(vec![Value::object([("Qty", Value::from(4))])]);
//! let helper = TableHelper::new();
//! let markup = helper.editor_for("Lines", &rows, &row_type, &Value::Null).unwrap();
//! let table = markup.elements().next().unwrap().clone();
//!
//! let mut controller = TableController::attach(table, &Behavior::ALL, helper.options()).unwrap();
//! controller.update(TableMessage::AddRow).unwrap();
//! controller
//!     .update(TableMessage::ChangeValue {
//!         name: "Lines[1].Qty".to_string(),
//!         value: "6".to_string(),
//!     })
//!     .unwrap();
//! assert_eq!(controller.footer_totals(), vec!["10".to_string()]);
//! ```

mod controls;
mod registry;

pub use registry::TableRegistry;

use controls::{control_label, is_control, payload, set_control_value, snapshot};
use rust_decimal::RoundingStrategy;
use tabula_core::format::{apply, DECIMAL_TOTAL_FORMAT};
use tabula_core::{
    parse_decimal, Behavior, Command, Decimal, Element, Node, RenderOptions, State, TableEvent,
    Value,
};
use tabula_widgets::{
    ADD_BUTTON_CLASS, ARCHIVED_CLASS, ARCHIVE_TEXT_CLASS, DELETE_BUTTON_CLASS, EDIT_ROW_CLASS,
    EDIT_TABLE_CLASS, TEMPLATE_CLASS, TOTAL_CLASS, VALIDATION_ROW_CLASS,
};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors raised while attaching to or driving a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The markup references a behavior the page does not provide.
    #[error("table markup requires the `{}` behavior, which is not available", .0.marker_class())]
    MissingEnhancement(Behavior),

    /// The element is not an editable table.
    #[error("element is not an editable table")]
    NotAnEditTable,

    /// The table has no usable template row.
    #[error("editable table has no template row")]
    MissingTemplate,

    /// No row carries this index token.
    #[error("no row with index token `{0}`")]
    UnknownRow(String),

    /// No row owns a control with this name.
    #[error("no row control named `{0}`")]
    UnknownControl(String),

    /// Archived rows do not take input until restored.
    #[error("row `{0}` is archived")]
    RowArchived(String),

    /// The table's edit settings forbid the action.
    #[error("{0} is not allowed on this table")]
    NotAllowed(&'static str),
}

/// User actions on an editable table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableMessage {
    /// Add a row from the template.
    AddRow,
    /// Delete a new row, or archive an existing one. Deleting an archived
    /// row restores it.
    DeleteRow {
        /// Index token of the row.
        token: String,
    },
    /// Restore an archived row.
    RestoreRow {
        /// Index token of the row.
        token: String,
    },
    /// A control's value changed.
    ChangeValue {
        /// Control name.
        name: String,
        /// New value; `true`/`false` for checkboxes.
        value: String,
    },
    /// The form is being posted.
    Submit,
}

/// Lifecycle state of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowStatus {
    /// Index token.
    pub token: String,
    /// Added on the client, unknown to the server.
    pub is_new: bool,
    /// Archived and waiting to be posted as inactive.
    pub archived: bool,
    /// Changed since it was rendered or added.
    pub dirty: bool,
}

#[derive(Debug, Clone)]
struct RowState {
    token: String,
    is_new: bool,
    archived: bool,
    // Archived or restored at least once; keeps the row dirty.
    toggled: bool,
    originals: Vec<(String, String)>,
}

/// Row-lifecycle controller bound to one editable table.
#[derive(Debug, Clone)]
pub struct TableController {
    table: Element,
    field: String,
    options: RenderOptions,
    template: Option<Vec<Element>>,
    behaviors: Vec<Behavior>,
    active_property: Option<String>,
    dirty_property: Option<String>,
    allow_additions: bool,
    allow_deletions: bool,
    rows: Vec<RowState>,
    next_token: usize,
}

impl TableController {
    /// Bind a controller to a rendered editable table.
    ///
    /// `available` lists the enhancement behaviors the page provides. Setup
    /// fails if the template row references any other.
    pub fn attach(
        table: Element,
        available: &[Behavior],
        options: &RenderOptions,
    ) -> Result<Self, ClientError> {
        if table.tag() != "table" || !table.has_class(EDIT_TABLE_CLASS) {
            return Err(ClientError::NotAnEditTable);
        }
        let template: Vec<Element> = table
            .elements()
            .find(|e| is_template(e))
            .ok_or(ClientError::MissingTemplate)?
            .elements()
            .cloned()
            .collect();
        let edit_row = template
            .iter()
            .find(|e| e.has_class(EDIT_ROW_CLASS))
            .ok_or(ClientError::MissingTemplate)?;

        let mut behaviors = Vec::new();
        for behavior in Behavior::ALL {
            let marker = behavior.marker_class();
            if edit_row.find(&|e: &Element| e.has_class(marker)).is_none() {
                continue;
            }
            if !available.contains(&behavior) {
                error!(behavior = marker, "enhancement behavior missing, table setup aborted");
                return Err(ClientError::MissingEnhancement(behavior));
            }
            behaviors.push(behavior);
        }

        let field = row_index_input(edit_row)
            .and_then(|input| input.get_attr("name"))
            .and_then(|name| name.strip_suffix(".Index"))
            .ok_or(ClientError::MissingTemplate)?
            .to_string();
        let placeholder = options.placeholder_token.as_str();
        let flag_property = |attr: &str| -> Option<String> {
            let property = table.get_attr(attr)?;
            let name = format!("{field}[{placeholder}].{property}");
            edit_row.find(&|e: &Element| e.get_attr("name") == Some(name.as_str()))?;
            Some(property.to_string())
        };
        let active_property = flag_property("data-isactiveproperty");
        let dirty_property = flag_property("data-isdirtyproperty");
        let allow_additions = table
            .find(&|e: &Element| e.has_class(ADD_BUTTON_CLASS))
            .is_some();
        let allow_deletions = edit_row
            .find(&|e: &Element| e.has_class(DELETE_BUTTON_CLASS))
            .is_some();

        let rows: Vec<RowState> = body(&table)
            .ok_or(ClientError::NotAnEditTable)?
            .elements()
            .filter(|e| e.has_class(EDIT_ROW_CLASS))
            .filter_map(|row| {
                Some(RowState {
                    token: row_token(row)?,
                    is_new: false,
                    archived: row.has_class(ARCHIVED_CLASS),
                    toggled: false,
                    originals: snapshot(row),
                })
            })
            .collect();

        debug!(
            field = %field,
            rows = rows.len(),
            behaviors = behaviors.len(),
            "table controller attached"
        );
        Ok(Self {
            next_token: rows.len(),
            table,
            field,
            options: options.clone(),
            template: Some(template),
            behaviors,
            active_property,
            dirty_property,
            allow_additions,
            allow_deletions,
            rows,
        })
    }

    /// The live table.
    #[must_use]
    pub const fn table(&self) -> &Element {
        &self.table
    }

    /// Release the table.
    #[must_use]
    pub fn into_table(self) -> Element {
        self.table
    }

    /// Field name rows are posted under.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Behaviors bound to the table's controls.
    #[must_use]
    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Index tokens of the live rows, in document order.
    #[must_use]
    pub fn row_tokens(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.token.as_str()).collect()
    }

    /// Lifecycle state of the row with `token`.
    #[must_use]
    pub fn row(&self, token: &str) -> Option<RowStatus> {
        let state = self.rows.iter().find(|r| r.token == token)?;
        Some(RowStatus {
            token: state.token.clone(),
            is_new: state.is_new,
            archived: state.archived,
            dirty: self.is_dirty(state),
        })
    }

    /// Footer totals as displayed, left to right.
    #[must_use]
    pub fn footer_totals(&self) -> Vec<String> {
        self.table
            .elements()
            .filter(|e| e.tag() == "tfoot")
            .flat_map(|f| f.find_all(&|e: &Element| e.has_class(TOTAL_CLASS)))
            .map(Element::text_content)
            .collect()
    }

    fn is_dirty(&self, state: &RowState) -> bool {
        state.toggled
            || find_row(&self.table, &state.token).is_some_and(|row| snapshot(row) != state.originals)
    }

    fn state_index(&self, token: &str) -> Result<usize, ClientError> {
        self.rows
            .iter()
            .position(|r| r.token == token)
            .ok_or_else(|| ClientError::UnknownRow(token.to_string()))
    }

    fn flag_name(&self, property: Option<&String>, token: &str) -> Option<String> {
        property.map(|p| format!("{}[{token}].{p}", self.field))
    }

    fn fresh_token(&mut self) -> String {
        loop {
            let token = self.next_token.to_string();
            self.next_token += 1;
            if !self.rows.iter().any(|r| r.token == token) {
                return token;
            }
        }
    }

    fn add_row(&mut self) -> Result<Command, ClientError> {
        if !self.allow_additions {
            return Err(ClientError::NotAllowed("adding rows"));
        }
        if self.template.is_none() {
            return Err(ClientError::MissingTemplate);
        }
        let token = self.fresh_token();
        let template = self.template.as_deref().ok_or(ClientError::MissingTemplate)?;
        let new_rows = instantiate(template, &self.options.placeholder_token, &token);
        let edit_row = new_rows
            .iter()
            .find(|e| e.has_class(EDIT_ROW_CLASS))
            .ok_or(ClientError::MissingTemplate)?;

        let controls = edit_row.find_all(&is_control);
        let mut commands: Vec<Command> = self
            .behaviors
            .iter()
            .filter_map(|&behavior| {
                let marked = names(
                    controls
                        .iter()
                        .copied()
                        .filter(|c| c.has_class(behavior.marker_class())),
                );
                (!marked.is_empty()).then_some(Command::Bind {
                    behavior,
                    controls: marked,
                })
            })
            .collect();
        let validated = names(controls.iter().copied().filter(|c| c.has_attr("data-val")));
        if !validated.is_empty() {
            commands.push(Command::Revalidate {
                controls: validated,
            });
        }
        if let Some(first) = controls.first().and_then(|c| c.get_attr("name")) {
            commands.push(Command::Focus {
                control: first.to_string(),
            });
        }
        let originals = snapshot(edit_row);

        let body = body_mut(&mut self.table).ok_or(ClientError::NotAnEditTable)?;
        for row in new_rows {
            body.push(row);
        }
        self.rows.push(RowState {
            token: token.clone(),
            is_new: true,
            archived: false,
            toggled: false,
            originals,
        });
        self.recompute_totals();
        debug!(field = %self.field, token = %token, "row added");
        Ok(Command::batch(commands))
    }

    fn delete_row(&mut self, token: &str) -> Result<Command, ClientError> {
        if !self.allow_deletions {
            return Err(ClientError::NotAllowed("deleting rows"));
        }
        let index = self.state_index(token)?;
        let state = &self.rows[index];
        if state.is_new {
            self.remove_row(index)
        } else if state.archived {
            self.restore_row(token)
        } else {
            self.archive_row(index)
        }
    }

    fn remove_row(&mut self, index: usize) -> Result<Command, ClientError> {
        let token = self.rows[index].token.clone();
        let nodes = body_mut(&mut self.table)
            .ok_or(ClientError::NotAnEditTable)?
            .nodes_mut();
        let position = nodes
            .iter()
            .position(|n| n.as_element().is_some_and(|e| is_row(e, &token)))
            .ok_or_else(|| ClientError::UnknownRow(token.clone()))?;
        let removed = nodes.remove(position);
        if nodes
            .get(position)
            .and_then(Node::as_element)
            .is_some_and(|e| e.has_class(VALIDATION_ROW_CLASS))
        {
            nodes.remove(position);
        }
        let controls = removed
            .as_element()
            .map(|row| names(row.find_all(&is_control)))
            .unwrap_or_default();

        self.rows.remove(index);
        self.recompute_totals();
        debug!(field = %self.field, token = %token, "new row removed");
        Ok(Command::DropValidation { controls })
    }

    fn archive_row(&mut self, index: usize) -> Result<Command, ClientError> {
        let token = self.rows[index].token.clone();
        let active = self.flag_name(self.active_property.as_ref(), &token);
        let dirty = self.flag_name(self.dirty_property.as_ref(), &token);
        let row = find_row_mut(&mut self.table, &token)?;

        row.add_class(ARCHIVED_CLASS);
        if let Some(name) = &active {
            set_flag(row, name, false);
        }
        if let Some(name) = &dirty {
            set_flag(row, name, true);
        }
        for cell in row.elements_mut() {
            let Some(label) = cell
                .elements()
                .find(|e| is_control(e))
                .map(|c| control_label(c, &self.options))
            else {
                continue;
            };
            for control in cell.elements_mut().filter(|e| is_control(e)) {
                control.set_attr("style", "display:none;");
            }
            cell.push(
                Element::new("div")
                    .class("table-text")
                    .class(ARCHIVE_TEXT_CLASS)
                    .text(label),
            );
        }

        let state = &mut self.rows[index];
        state.archived = true;
        state.toggled = true;
        self.recompute_totals();
        debug!(field = %self.field, token = %token, "row archived");
        Ok(Command::Emit(TableEvent::RowDeleted { token }))
    }

    fn restore_row(&mut self, token: &str) -> Result<Command, ClientError> {
        let index = self.state_index(token)?;
        if !self.rows[index].archived {
            return Ok(Command::None);
        }
        let active = self.flag_name(self.active_property.as_ref(), token);
        let dirty = self.flag_name(self.dirty_property.as_ref(), token);
        let row = find_row_mut(&mut self.table, token)?;

        row.remove_class(ARCHIVED_CLASS);
        if let Some(name) = &active {
            set_flag(row, name, true);
        }
        if let Some(name) = &dirty {
            set_flag(row, name, true);
        }
        for cell in row.elements_mut() {
            cell.nodes_mut().retain(|n| {
                !n.as_element()
                    .is_some_and(|e| e.has_class(ARCHIVE_TEXT_CLASS))
            });
            for control in cell.elements_mut().filter(|e| is_control(e)) {
                control.remove_attr("style");
            }
        }

        let state = &mut self.rows[index];
        state.archived = false;
        state.toggled = true;
        self.recompute_totals();
        debug!(field = %self.field, token = %token, "row restored");
        Ok(Command::Emit(TableEvent::RowActivated {
            token: token.to_string(),
        }))
    }

    fn change_value(&mut self, name: &str, value: &str) -> Result<Command, ClientError> {
        let index = self
            .rows
            .iter()
            .position(|r| r.originals.iter().any(|(n, _)| n == name))
            .ok_or_else(|| ClientError::UnknownControl(name.to_string()))?;
        let token = self.rows[index].token.clone();
        if self.rows[index].archived {
            return Err(ClientError::RowArchived(token));
        }
        let dirty_name = self.flag_name(self.dirty_property.as_ref(), &token);
        let row = find_row_mut(&mut self.table, &token)?;
        let control = row
            .find_mut(&|e: &Element| is_control(e) && e.get_attr("name") == Some(name))
            .ok_or_else(|| ClientError::UnknownControl(name.to_string()))?;
        set_control_value(control, value);
        let numeric = control.has_class(Behavior::NumericInput.marker_class());

        let state = &self.rows[index];
        let dirty = state.toggled || snapshot(row) != state.originals;
        if let Some(flag) = &dirty_name {
            set_flag(row, flag, dirty);
        }
        if numeric {
            self.recompute_totals();
        }
        debug!(field = %self.field, token = %token, control = name, dirty, "value changed");
        Ok(Command::None)
    }

    fn submit(&mut self) -> Command {
        self.table
            .nodes_mut()
            .retain(|n| !n.as_element().is_some_and(is_template));
        self.template = None;

        let archived: Vec<String> = self
            .rows
            .iter()
            .filter(|r| r.archived)
            .map(|r| r.token.clone())
            .collect();
        for token in archived {
            let Some(name) = self.flag_name(self.dirty_property.as_ref(), &token) else {
                break;
            };
            if let Ok(row) = find_row_mut(&mut self.table, &token) {
                set_flag(row, &name, true);
            }
        }

        let payload = payload(&self.table);
        debug!(field = %self.field, fields = payload.len(), "table submitted");
        Command::Submit { payload }
    }

    /// Recompute every footer total from the rows that are not archived.
    fn recompute_totals(&mut self) {
        let Some(footer) = footer_row(&self.table) else {
            return;
        };
        let columns: Vec<(usize, String)> = footer
            .elements()
            .enumerate()
            .filter_map(|(i, cell)| {
                let total = cell.find(&|e: &Element| e.has_class(TOTAL_CLASS))?;
                let format = total.get_attr("data-format").unwrap_or(DECIMAL_TOTAL_FORMAT);
                Some((i, format.to_string()))
            })
            .collect();
        if columns.is_empty() {
            return;
        }

        let live: Vec<&Element> = body(&self.table)
            .map(|b| {
                b.elements()
                    .filter(|r| r.has_class(EDIT_ROW_CLASS) && !r.has_class(ARCHIVED_CLASS))
                    .collect()
            })
            .unwrap_or_default();
        let rounding = self.options.rounding;
        let field = &self.field;
        let totals: Vec<(usize, String)> = columns
            .into_iter()
            .map(|(i, format)| {
                let sum = live
                    .iter()
                    .filter_map(|row| row.elements().nth(i))
                    .filter_map(cell_number)
                    .map(|n| match rounding {
                        Some(dp) => n.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
                        None => n,
                    })
                    .fold(Decimal::ZERO, |sum, n| {
                        sum.checked_add(n).unwrap_or_else(|| {
                            warn!(field = %field, column = i, "footer total overflowed, saturating");
                            if n.is_sign_negative() {
                                Decimal::MIN
                            } else {
                                Decimal::MAX
                            }
                        })
                    });
                (i, apply(&format, &Value::Decimal(sum)))
            })
            .collect();

        let Some(footer) = footer_row_mut(&mut self.table) else {
            return;
        };
        for (i, text) in totals {
            let total = footer
                .elements_mut()
                .nth(i)
                .and_then(|cell| cell.find_mut(&|e: &Element| e.has_class(TOTAL_CLASS)));
            if let Some(total) = total {
                let nodes = total.nodes_mut();
                nodes.clear();
                nodes.push(Node::Text(text));
            }
        }
    }
}

impl State for TableController {
    type Message = TableMessage;
    type Error = ClientError;

    fn update(&mut self, msg: TableMessage) -> Result<Command, ClientError> {
        debug!(field = %self.field, message = ?msg, "table message");
        match msg {
            TableMessage::AddRow => self.add_row(),
            TableMessage::DeleteRow { token } => self.delete_row(&token),
            TableMessage::RestoreRow { token } => self.restore_row(&token),
            TableMessage::ChangeValue { name, value } => self.change_value(&name, &value),
            TableMessage::Submit => Ok(self.submit()),
        }
    }
}

fn is_template(e: &Element) -> bool {
    e.tag() == "tbody" && e.has_class(TEMPLATE_CLASS)
}

fn is_body(e: &Element) -> bool {
    e.tag() == "tbody" && !e.has_class(TEMPLATE_CLASS)
}

fn body(table: &Element) -> Option<&Element> {
    table.elements().find(|e| is_body(e))
}

fn body_mut(table: &mut Element) -> Option<&mut Element> {
    table.elements_mut().find(|e| is_body(e))
}

fn footer_row(table: &Element) -> Option<&Element> {
    table
        .elements()
        .find(|e| e.tag() == "tfoot")
        .and_then(|f| f.elements().next())
}

fn footer_row_mut(table: &mut Element) -> Option<&mut Element> {
    table
        .elements_mut()
        .find(|e| e.tag() == "tfoot")
        .and_then(|f| f.elements_mut().next())
}

/// The `Field.Index` input closing a row's technical cell.
fn row_index_input(row: &Element) -> Option<&Element> {
    row.elements().last()?.elements_named("input").last()
}

fn row_token(row: &Element) -> Option<String> {
    row_index_input(row)?.get_attr("value").map(str::to_string)
}

fn is_row(e: &Element, token: &str) -> bool {
    e.has_class(EDIT_ROW_CLASS) && row_token(e).as_deref() == Some(token)
}

fn find_row<'a>(table: &'a Element, token: &str) -> Option<&'a Element> {
    body(table)?.elements().find(|e| is_row(e, token))
}

fn find_row_mut<'a>(table: &'a mut Element, token: &str) -> Result<&'a mut Element, ClientError> {
    body_mut(table)
        .and_then(|b| b.elements_mut().find(|e| is_row(e, token)))
        .ok_or_else(|| ClientError::UnknownRow(token.to_string()))
}

fn set_flag(row: &mut Element, name: &str, value: bool) {
    let input = row.find_mut(&|e: &Element| e.tag() == "input" && e.get_attr("name") == Some(name));
    if let Some(input) = input {
        input.set_attr("value", Value::Bool(value).to_input_string());
    }
}

fn names<'a>(controls: impl IntoIterator<Item = &'a Element>) -> Vec<String> {
    controls
        .into_iter()
        .filter_map(|c| c.get_attr("name"))
        .map(str::to_string)
        .collect()
}

/// Numeric value of a cell: a numeric control's value, or the raw
/// `data-value` of a read-only cell. Formatted text is only a fallback.
fn cell_number(cell: &Element) -> Option<Decimal> {
    let marker = Behavior::NumericInput.marker_class();
    let text = match cell.find(&|e: &Element| e.has_class(marker)) {
        Some(control) => control.get_attr("value").unwrap_or_default().to_string(),
        None => {
            let div = cell.find(&|e: &Element| e.has_class("table-text"))?;
            match div.get_attr("data-value") {
                Some(raw) => raw.to_string(),
                None => div.text_content(),
            }
        }
    };
    parse_decimal(&text)
}

/// Copy the template rows for a new row with index `token`.
///
/// The placeholder is only substituted inside the `[..]` index of `name`,
/// `for` and `data-valmsg-for`, inside the `_.._` index of `id`, and in a
/// `value` that is exactly the placeholder.
fn instantiate(template: &[Element], placeholder: &str, token: &str) -> Vec<Element> {
    let from_index = format!("[{placeholder}]");
    let to_index = format!("[{token}]");
    let from_id = format!("_{placeholder}_");
    let to_id = format!("_{token}_");
    template
        .iter()
        .cloned()
        .map(|mut row| {
            row.visit_mut(&mut |e: &mut Element| {
                for (attr, value) in e.attrs_mut() {
                    match attr {
                        "name" | "for" | "data-valmsg-for" => {
                            *value = value.replace(&from_index, &to_index);
                        }
                        "id" => *value = value.replace(&from_id, &to_id),
                        "value" if value.as_str() == placeholder => *value = token.to_string(),
                        _ => {}
                    }
                }
            });
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Vec<Element> {
        vec![
            Element::new("tr")
                .class(EDIT_ROW_CLASS)
                .child(
                    Element::new("td").child(
                        Element::new("input")
                            .attr("name", "Lines[#].Qty")
                            .attr("id", "Lines_#__Qty")
                            .attr("value", "#"),
                    ),
                )
                .child(
                    Element::new("td").child(
                        Element::new("input")
                            .attr("type", "hidden")
                            .attr("name", "Lines.Index")
                            .attr("value", "#"),
                    ),
                ),
            Element::new("tr").class(VALIDATION_ROW_CLASS).child(
                Element::new("td").child(
                    Element::new("span")
                        .attr("data-valmsg-for", "Lines[#].Qty")
                        .text("#"),
                ),
            ),
        ]
    }

    // ===== Template Instantiation Tests =====

    #[test]
    fn test_instantiate_substitutes_index_attributes() {
        let rows = instantiate(&template(), "#", "7");
        let html: String = rows.iter().map(Element::to_html).collect();
        assert!(html.contains(r#"name="Lines[7].Qty""#));
        assert!(html.contains(r#"id="Lines_7__Qty""#));
        assert!(html.contains(r#"name="Lines.Index" value="7""#));
        assert!(html.contains(r#"data-valmsg-for="Lines[7].Qty""#));
    }

    #[test]
    fn test_instantiate_leaves_text_alone() {
        let rows = instantiate(&template(), "#", "7");
        assert_eq!(rows[1].text_content(), "#");
    }

    #[test]
    fn test_instantiate_leaves_template_untouched() {
        let template = template();
        let _ = instantiate(&template, "#", "3");
        assert_eq!(row_token(&template[0]).as_deref(), Some("#"));
    }

    // ===== Row Lookup Tests =====

    #[test]
    fn test_row_token_reads_index_input() {
        let rows = instantiate(&template(), "#", "12");
        assert_eq!(row_token(&rows[0]).as_deref(), Some("12"));
        assert!(is_row(&rows[0], "12"));
        assert!(!is_row(&rows[1], "12"));
    }

    #[test]
    fn test_cell_number_prefers_numeric_control() {
        let cell = Element::new("td")
            .child(
                Element::new("input")
                    .class("numeric-input")
                    .attr("value", "1,250.5"),
            )
            .child(Element::new("div").class("table-text").text("9"));
        assert_eq!(cell_number(&cell), Some(Decimal::new(12505, 1)));
        let text = Element::new("td").child(Element::new("div").class("table-text").text("4"));
        assert_eq!(cell_number(&text), Some(Decimal::from(4)));
        let raw = Element::new("td").child(
            Element::new("div")
                .class("table-text")
                .attr("data-value", "1234")
                .text("$1,234.00"),
        );
        assert_eq!(cell_number(&raw), Some(Decimal::from(1234)));
        assert_eq!(cell_number(&Element::new("td")), None);
    }

    // ===== Error Tests =====

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ClientError::MissingEnhancement(Behavior::DatePicker).to_string(),
            "table markup requires the `datepicker-input` behavior, which is not available"
        );
        assert_eq!(
            ClientError::NotAllowed("adding rows").to_string(),
            "adding rows is not allowed on this table"
        );
    }

    #[test]
    fn test_attach_rejects_plain_elements() {
        let err = TableController::attach(Element::new("div"), &[], &RenderOptions::default());
        assert_eq!(err.unwrap_err(), ClientError::NotAnEditTable);
        let table = Element::new("table").class(EDIT_TABLE_CLASS).child(Element::new("tbody"));
        let err = TableController::attach(table, &[], &RenderOptions::default());
        assert_eq!(err.unwrap_err(), ClientError::MissingTemplate);
    }
}
