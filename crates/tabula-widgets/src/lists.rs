//! Option lists read from the view model for select and suggestion lists.

use crate::error::TableError;
use tabula_core::Value;

/// One `<option>` of a select list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Posted value.
    pub value: String,
    /// Display text.
    pub text: String,
}

impl SelectOption {
    /// Option with a value and a text.
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }
}

fn source<'v>(view_model: &'v Value, property: &str) -> Result<&'v [Value], TableError> {
    let value = view_model
        .as_object()
        .and_then(|o| o.get(property))
        .ok_or_else(|| TableError::MissingOptions(property.to_string()))?;
    let items = match value {
        Value::Null => return Err(TableError::NullOptions(property.to_string())),
        Value::List(items) => items,
        _ => return Err(TableError::InvalidOptions(property.to_string())),
    };
    if items.is_empty() {
        return Err(TableError::EmptyOptions(property.to_string()));
    }
    Ok(items)
}

/// Read a select list from `view_model.property`, prefixed with an
/// empty-valued `option_label` entry when one is given.
///
/// Items are either objects with `Value` and `Text` fields or plain texts
/// used as both.
pub fn select_list(
    view_model: &Value,
    property: &str,
    option_label: Option<&str>,
) -> Result<Vec<SelectOption>, TableError> {
    let items = source(view_model, property)?;
    let mut options = Vec::with_capacity(items.len() + 1);
    if let Some(label) = option_label {
        options.push(SelectOption::new("", label));
    }
    for item in items {
        let option = match item {
            Value::Object(o) => {
                let text = o
                    .get("Text")
                    .map(Value::to_input_string)
                    .ok_or_else(|| TableError::InvalidOptions(property.to_string()))?;
                let value = o.get("Value").map_or_else(|| text.clone(), Value::to_input_string);
                SelectOption { value, text }
            }
            Value::Text(s) => SelectOption::new(s.clone(), s.clone()),
            _ => return Err(TableError::InvalidOptions(property.to_string())),
        };
        options.push(option);
    }
    Ok(options)
}

/// Read a suggestion list of texts from `view_model.property`.
pub fn data_list(view_model: &Value, property: &str) -> Result<Vec<String>, TableError> {
    source(view_model, property)?
        .iter()
        .map(|item| match item {
            Value::Text(s) => Ok(s.clone()),
            _ => Err(TableError::InvalidOptions(property.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_model() -> Value {
        Value::object([
            (
                "Colours",
                Value::List(vec![
                    Value::object([("Value", Value::from(1)), ("Text", Value::from("Red"))]),
                    Value::object([("Value", Value::from(2)), ("Text", Value::from("Blue"))]),
                ]),
            ),
            ("Sizes", Value::List(vec![Value::from("S"), Value::from("M")])),
            ("Nothing", Value::Null),
            ("Empty", Value::List(vec![])),
            ("Number", Value::from(3)),
            ("Mixed", Value::List(vec![Value::from(1)])),
        ])
    }

    // ===== Select List Tests =====

    #[test]
    fn test_select_list_with_label() {
        let options = select_list(&view_model(), "Colours", Some("")).unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0], SelectOption::new("", ""));
        assert_eq!(options[1], SelectOption::new("1", "Red"));
    }

    #[test]
    fn test_select_list_without_label() {
        let options = select_list(&view_model(), "Sizes", None).unwrap();
        assert_eq!(options, vec![SelectOption::new("S", "S"), SelectOption::new("M", "M")]);
    }

    #[test]
    fn test_select_list_errors() {
        let vm = view_model();
        assert_eq!(
            select_list(&vm, "Missing", None),
            Err(TableError::MissingOptions("Missing".to_string()))
        );
        assert_eq!(
            select_list(&vm, "Nothing", None),
            Err(TableError::NullOptions("Nothing".to_string()))
        );
        assert_eq!(
            select_list(&vm, "Number", None),
            Err(TableError::InvalidOptions("Number".to_string()))
        );
        assert_eq!(
            select_list(&vm, "Empty", None),
            Err(TableError::EmptyOptions("Empty".to_string()))
        );
    }

    // ===== Data List Tests =====

    #[test]
    fn test_data_list() {
        assert_eq!(data_list(&view_model(), "Sizes").unwrap(), vec!["S", "M"]);
    }

    #[test]
    fn test_data_list_rejects_non_text() {
        assert_eq!(
            data_list(&view_model(), "Mixed"),
            Err(TableError::InvalidOptions("Mixed".to_string()))
        );
        assert_eq!(
            data_list(&view_model(), "Colours"),
            Err(TableError::InvalidOptions("Colours".to_string()))
        );
    }
}
