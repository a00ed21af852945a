//! Reading and writing the form controls of a live table.

use tabula_core::{Element, Node, RenderOptions};
use tabula_widgets::CONTROL_CLASS;

/// Whether `e` is an editable control.
pub(crate) fn is_control(e: &Element) -> bool {
    e.has_class(CONTROL_CLASS)
}

fn is_checkbox(e: &Element) -> bool {
    e.tag() == "input" && e.get_attr("type") == Some("checkbox")
}

fn selected_option(select: &Element) -> Option<&Element> {
    select
        .elements_named("option")
        .find(|o| o.has_attr("selected"))
        .or_else(|| select.elements_named("option").next())
}

/// Current value of a control: the checked state of a checkbox, the selected
/// option of a select, the text of a textarea, the value of anything else.
pub(crate) fn control_value(control: &Element) -> String {
    match control.tag() {
        _ if is_checkbox(control) => control.has_attr("checked").to_string(),
        "select" => selected_option(control)
            .and_then(|o| o.get_attr("value"))
            .unwrap_or_default()
            .to_string(),
        "textarea" => control.text_content(),
        _ => control.get_attr("value").unwrap_or_default().to_string(),
    }
}

/// Set a control's value. Checkboxes take `true`/`false`; selects mark the
/// option whose value matches.
pub(crate) fn set_control_value(control: &mut Element, value: &str) {
    match control.tag() {
        _ if is_checkbox(control) => {
            if value.eq_ignore_ascii_case("true") {
                control.set_attr("checked", "checked");
            } else {
                control.remove_attr("checked");
            }
        }
        "select" => {
            let mut marked = false;
            for option in control.elements_mut().filter(|e| e.tag() == "option") {
                if !marked && option.get_attr("value") == Some(value) {
                    option.set_attr("selected", "selected");
                    marked = true;
                } else {
                    option.remove_attr("selected");
                }
            }
        }
        "textarea" => {
            let nodes = control.nodes_mut();
            nodes.clear();
            if !value.is_empty() {
                nodes.push(Node::Text(value.to_string()));
            }
        }
        _ => control.set_attr("value", value),
    }
}

/// Text shown in place of a control while its row is archived.
pub(crate) fn control_label(control: &Element, options: &RenderOptions) -> String {
    match control.tag() {
        _ if is_checkbox(control) => options.bool_label(control.has_attr("checked")).to_string(),
        "select" => selected_option(control)
            .map(Element::text_content)
            .unwrap_or_default(),
        _ => control_value(control),
    }
}

/// `(name, value)` of every named control a row posts, in document order.
pub(crate) fn snapshot(row: &Element) -> Vec<(String, String)> {
    row.find_all(&is_control)
        .into_iter()
        .filter_map(|c| Some((c.get_attr("name")?.to_string(), control_value(c))))
        .collect()
}

/// Form payload of everything under `root`, in document order.
///
/// Unchecked checkboxes post nothing; their hidden companions post `false`.
pub(crate) fn payload(root: &Element) -> Vec<(String, String)> {
    root.find_all(&|e: &Element| {
        matches!(e.tag(), "input" | "select" | "textarea") && e.has_attr("name")
    })
    .into_iter()
    .filter_map(|e| {
        let name = e.get_attr("name")?.to_string();
        if is_checkbox(e) {
            return e
                .has_attr("checked")
                .then(|| (name, e.get_attr("value").unwrap_or("true").to_string()));
        }
        Some((name, control_value(e)))
    })
    .collect()
}
