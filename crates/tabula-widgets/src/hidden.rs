//! Hidden-input serialization of nested values.
//!
//! A value is posted back as one `<input type="hidden">` per leaf, named with
//! its dotted path (`Order.Customer.Name`). Byte arrays are written as base64.
//! Collections are skipped. A null non-text property is skipped unless it is
//! required, in which case its type's default instance is serialized so the
//! server still receives every leaf.

use tabula_core::{Element, PropertyDescriptor, PropertyKind, ScalarKind, Value};

/// A single hidden input.
pub fn hidden_input(name: &str, value: impl Into<String>) -> Element {
    Element::new("input")
        .attr("type", "hidden")
        .attr("name", name)
        .attr("value", value)
}

/// Hidden inputs for `value` posted as `name`.
///
/// Null leaves are written with the property's default value. An empty
/// `name` posts the fields of a complex value under their own names.
pub fn hidden_inputs_for(name: &str, value: &Value, property: &PropertyDescriptor) -> Vec<Element> {
    let mut out = Vec::new();
    write(&mut out, name, value, property, true);
    out
}

pub(crate) fn write(
    out: &mut Vec<Element>,
    name: &str,
    value: &Value,
    property: &PropertyDescriptor,
    include_default: bool,
) {
    match (&property.kind, value) {
        (PropertyKind::Scalar(ScalarKind::Bytes), Value::Bytes(_)) => {
            out.push(hidden_input(name, value.to_input_string()));
        }
        (PropertyKind::Complex(ty), _) => {
            let substitute;
            let value = if value.is_null() {
                substitute = ty.default_instance().unwrap_or_default();
                &substitute
            } else {
                value
            };
            for child in &ty.properties {
                if child.is_collection() {
                    continue;
                }
                let child_value = value.field(&child.name);
                if child_value.is_null() && !is_text(child) && !child.required {
                    continue;
                }
                let child_name = if name.is_empty() {
                    child.name.clone()
                } else {
                    format!("{name}.{}", child.name)
                };
                write(out, &child_name, child_value, child, false);
            }
        }
        (PropertyKind::Collection(_), _) => {}
        _ => {
            let text = if value.is_null() && include_default {
                property.default_value().to_input_string()
            } else {
                value.to_input_string()
            };
            out.push(hidden_input(name, text));
        }
    }
}

fn is_text(property: &PropertyDescriptor) -> bool {
    matches!(property.kind, PropertyKind::Scalar(ScalarKind::Text))
}
