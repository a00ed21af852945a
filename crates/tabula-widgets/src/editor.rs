//! Editable table body and template row.
//!
//! Every row is posted as `Field[i].Path`. Its hidden inputs (hidden columns,
//! read-only values, row-state flags and the `Field.Index` indexer) are
//! collected while the cells are emitted and flushed into the trailing
//! technical cell. Each edit row is followed by a validation row aligned with
//! it cell for cell.

use crate::context::{data_list_id, TableRenderContext};
use crate::controls::{form_control, ControlSpec};
use crate::hidden::{self, hidden_input};
use crate::plan::ColumnRole;
use tabula_core::format::display_text;
use tabula_core::{Element, Value};

/// Marks the tbody holding the template row.
pub const TEMPLATE_CLASS: &str = "template-body";
/// Class of an editable row.
pub const EDIT_ROW_CLASS: &str = "edit-row";
/// Class of the validation-message row following each editable row.
pub const VALIDATION_ROW_CLASS: &str = "validation-row";
/// Added to an editable row whose active flag is false.
pub const ARCHIVED_CLASS: &str = "archived";
/// Class of the footer button adding a row.
pub const ADD_BUTTON_CLASS: &str = "add-button";
/// Class of the row button deleting or archiving its row.
pub const DELETE_BUTTON_CLASS: &str = "delete-button";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Data,
    Template,
}

/// `<tbody>` with an edit row and a validation row per item.
pub fn render_edit_body(ctx: &mut TableRenderContext<'_>, rows: &[Value]) -> Element {
    let mut body = Element::new("tbody");
    for (i, row) in rows.iter().enumerate() {
        let token = i.to_string();
        ctx.archived = ctx
            .active_property
            .as_deref()
            .is_some_and(|p| row.field(p).as_bool() == Some(false));
        let (edit, validation) = render_edit_row(ctx, row, &token, RowKind::Data);
        body.push(edit);
        body.push(validation);
    }
    ctx.archived = false;
    body
}

/// Hidden `<tbody>` holding the template row the client clones.
///
/// The row is rendered from `default_row` with the placeholder token as its
/// index. It never contributes to totals or repeat suppression, and it is
/// always active.
pub fn render_template(ctx: &mut TableRenderContext<'_>, default_row: &Value) -> Element {
    ctx.archived = false;
    let token = ctx.options.placeholder_token.clone();
    let (edit, validation) = render_edit_row(ctx, default_row, &token, RowKind::Template);
    Element::new("tbody")
        .class(TEMPLATE_CLASS)
        .attr("style", "display:none;")
        .child(edit)
        .child(validation)
}

fn render_edit_row(
    ctx: &mut TableRenderContext<'_>,
    row: &Value,
    token: &str,
    kind: RowKind,
) -> (Element, Element) {
    let options = ctx.options;
    let prefix = format!("{}[{token}]", ctx.field);
    let archived = ctx.archived;
    ctx.hidden.clear();

    let mut tr = Element::new("tr").class(EDIT_ROW_CLASS);
    if archived {
        tr.add_class(ARCHIVED_CLASS);
    }
    let mut validation = Element::new("tr").class(VALIDATION_ROW_CLASS);

    for (index, column) in ctx.plan.columns.iter_mut().enumerate() {
        let name = format!("{prefix}.{}", column.field_path());
        let value = column.resolve(row);
        match column.role {
            ColumnRole::Excluded => continue,
            ColumnRole::Active | ColumnRole::Dirty => {
                let text = if kind == RowKind::Template && column.role == ColumnRole::Active {
                    Value::Bool(true).to_input_string()
                } else if value.is_null() {
                    column.property.default_value().to_input_string()
                } else {
                    value.to_input_string()
                };
                ctx.hidden
                    .push(hidden_input(&name, text).class(&column.property.name));
                continue;
            }
            ColumnRole::Hidden => {
                hidden::write(&mut ctx.hidden, &name, value, &column.property, false);
                continue;
            }
            ColumnRole::Visible => {}
        }

        let (property, control_name, control_value) = match &column.display_property {
            Some(child) => {
                hidden::write(&mut ctx.hidden, &name, value, &column.property, true);
                (child.clone(), format!("{name}.{}", child.name), value.field(&child.name))
            }
            None => (column.property.clone(), name, value),
        };

        if kind == RowKind::Data && !archived {
            column.accumulate(control_value);
        }

        if column.read_only {
            let mut text = display_text(&property, control_value, options);
            if kind == RowKind::Data {
                text = column.suppress_repeat(text);
            }
            let mut div = Element::new("div").class("table-text").text(text);
            if column.has_total() {
                div.set_attr("data-value", control_value.to_input_string());
            }
            tr.push(Element::new("td").child(div));
            if column.display_property.is_none() {
                hidden::write(&mut ctx.hidden, &control_name, control_value, &property, true);
            }
        } else {
            let data_list = column
                .data_list
                .as_ref()
                .map(|_| data_list_id(&property.name));
            let spec = ControlSpec {
                property: &property,
                name: &control_name,
                value: control_value,
                numeric: column.has_total(),
                select_list: ctx.select_lists.get(&index).map(Vec::as_slice),
                data_list: data_list.as_deref(),
                archived,
            };
            tr.push(form_control(&spec, options));
        }

        let mut message = Element::new("td");
        if column.require_validation {
            message.push(
                Element::new("span")
                    .class("field-validation-valid")
                    .attr("data-valmsg-for", control_name.as_str())
                    .attr("data-valmsg-replace", "true"),
            );
        }
        validation.push(message);
    }

    if ctx.plan.buttons {
        let mut cell = Element::new("td").class("button-cell");
        if ctx.allow_deletions {
            cell.push(button(DELETE_BUTTON_CLASS));
        }
        tr.push(cell);
        validation.push(Element::new("td").class("button-cell"));
    }

    ctx.hidden
        .push(hidden_input(&format!("{}.Index", ctx.field), token));
    let technical = Element::new("td").children(ctx.hidden.drain(..));
    tr.push(technical);
    validation.push(Element::new("td"));

    (tr, validation)
}

/// Add or delete button.
pub(crate) fn button(class: &str) -> Element {
    Element::new("button")
        .class("table-button")
        .class(class)
        .attr("type", "button")
}
