//! Form controls of editable table cells.
//!
//! The control kind follows the property: an option-list select when bound
//! to a select list, a textarea for multi-line text, a checkbox for booleans,
//! a tri-state select for nullable booleans, an enum select for enums and a
//! text input otherwise. Every control carries the `table-control` class plus
//! the marker classes of the client behaviors it needs.

use crate::lists::SelectOption;
use tabula_core::format::display_text;
use tabula_core::{
    Behavior, DataType, Element, PropertyDescriptor, PropertyKind, RenderOptions, ScalarKind, Value,
};

/// Class shared by every editable control.
pub const CONTROL_CLASS: &str = "table-control";
/// Read-only rendition shown in place of a control of an archived row.
pub const ARCHIVE_TEXT_CLASS: &str = "archive-text";

/// Inputs to [`form_control`].
#[derive(Debug, Clone, Copy)]
pub struct ControlSpec<'a> {
    /// Property being edited.
    pub property: &'a PropertyDescriptor,
    /// Posted name.
    pub name: &'a str,
    /// Current value.
    pub value: &'a Value,
    /// Column is totalled, so the control formats numbers.
    pub numeric: bool,
    /// Bound select list.
    pub select_list: Option<&'a [SelectOption]>,
    /// Id of a bound suggestion list.
    pub data_list: Option<&'a str>,
    /// Row is archived: hide the control and show its text.
    pub archived: bool,
}

/// Unobtrusive validation attributes for a property.
pub fn validation_attrs(property: &PropertyDescriptor) -> Vec<(String, String)> {
    let label = property.label();
    let implicit = !property.nullable
        && match property.kind {
            PropertyKind::Scalar(kind) => kind.is_numeric(),
            PropertyKind::Boolean | PropertyKind::Enum(_) => true,
            _ => false,
        };
    let mut attrs = Vec::new();
    if property.is_numeric() {
        attrs.push((
            "data-val-number".to_string(),
            format!("The field {label} must be a number."),
        ));
    }
    if property.required || implicit {
        attrs.push((
            "data-val-required".to_string(),
            format!("The {label} field is required."),
        ));
    }
    if !attrs.is_empty() {
        attrs.insert(0, ("data-val".to_string(), "true".to_string()));
    }
    attrs
}

/// Class list of a control.
fn control_class(spec: &ControlSpec<'_>) -> String {
    let mut classes = vec![CONTROL_CLASS];
    if spec.numeric {
        classes.push(Behavior::NumericInput.marker_class());
    }
    if spec.select_list.is_some() {
        classes.push(Behavior::SearchableSelect.marker_class());
    }
    if spec.property.scalar_kind() == Some(ScalarKind::Date) {
        classes.push(Behavior::DatePicker.marker_class());
    }
    classes.join(" ")
}

fn decorate(mut control: Element, spec: &ControlSpec<'_>) -> Element {
    control.set_attr("class", control_class(spec));
    for (k, v) in validation_attrs(spec.property) {
        control.set_attr(k, v);
    }
    if spec.archived {
        control.set_attr("style", "display:none;");
    }
    control
}

/// Text input.
pub fn text_input(name: &str, value: &Value) -> Element {
    Element::new("input")
        .attr("type", "text")
        .attr("name", name)
        .attr("value", value.to_input_string())
}

/// Multi-line text area.
pub fn textarea(name: &str, value: &Value) -> Element {
    Element::new("textarea")
        .attr("name", name)
        .attr("rows", "2")
        .attr("cols", "20")
        .text(value.to_input_string())
}

/// Checkbox posting `true` when checked.
pub fn checkbox(name: &str, checked: bool) -> Element {
    let input = Element::new("input")
        .attr("type", "checkbox")
        .attr("name", name)
        .attr("value", "true");
    if checked {
        input.attr("checked", "checked")
    } else {
        input
    }
}

/// Hidden companion of a checkbox, posting `false` when unchecked.
pub fn checkbox_companion(name: &str) -> Element {
    Element::new("input")
        .attr("type", "hidden")
        .attr("name", name)
        .attr("value", "false")
}

/// Select with `options`, marking the one whose value is `selected`.
pub fn select(name: &str, options: &[SelectOption], selected: &str) -> Element {
    let mut element = Element::new("select").attr("name", name);
    let mut marked = false;
    for option in options {
        let mut item = Element::new("option").attr("value", option.value.as_str());
        if !marked && option.value == selected {
            item.set_attr("selected", "selected");
            marked = true;
        }
        element.push(item.text(option.text.as_str()));
    }
    element
}

/// Tri-state select of a nullable boolean: unset, yes, no.
pub fn tri_state_select(name: &str, value: &Value, options: &RenderOptions) -> Element {
    let items = [
        SelectOption::new("", ""),
        SelectOption::new("true", options.yes_label.as_str()),
        SelectOption::new("false", options.no_label.as_str()),
    ];
    let selected = match value {
        Value::Bool(true) => "true",
        Value::Bool(false) => "false",
        _ => "",
    };
    select(name, &items, selected)
}

/// Select of an enum's members, led by an unset option.
pub fn enum_select(name: &str, property: &PropertyDescriptor, value: &Value) -> Element {
    let mut items = vec![SelectOption::new(
        "",
        property.null_display.clone().unwrap_or_default(),
    )];
    if let PropertyKind::Enum(e) = &property.kind {
        items.extend(
            e.members
                .iter()
                .map(|m| SelectOption::new(m.name.as_str(), m.label())),
        );
    }
    let selected = match value {
        Value::Null => String::new(),
        v => v.to_input_string(),
    };
    select(name, &items, &selected)
}

/// `<td>` holding the control for `spec`.
pub fn form_control(spec: &ControlSpec<'_>, options: &RenderOptions) -> Element {
    let property = spec.property;
    let mut cell = Element::new("td");
    if let Some(list) = spec.select_list {
        cell.push(decorate(select(spec.name, list, &spec.value.to_input_string()), spec));
    } else if property.data_type == DataType::MultilineText {
        cell.push(decorate(textarea(spec.name, spec.value), spec));
    } else if property.is_plain_boolean() {
        let checked = spec.value.as_bool().unwrap_or(false);
        cell.push(decorate(checkbox(spec.name, checked), spec));
        cell.push(checkbox_companion(spec.name));
    } else if matches!(property.kind, PropertyKind::Boolean) {
        cell.push(decorate(tri_state_select(spec.name, spec.value, options), spec));
    } else if matches!(property.kind, PropertyKind::Enum(_)) {
        cell.push(decorate(enum_select(spec.name, property, spec.value), spec));
    } else {
        let mut input = text_input(spec.name, spec.value);
        if let Some(id) = spec.data_list.filter(|_| !spec.numeric) {
            input.set_attr("list", id);
        }
        cell.push(decorate(input, spec));
    }
    if spec.archived {
        cell.push(
            Element::new("div")
                .class("table-text")
                .class(ARCHIVE_TEXT_CLASS)
                .text(display_text(property, spec.value, options)),
        );
    }
    cell
}
