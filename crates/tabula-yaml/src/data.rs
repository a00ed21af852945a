//! Row data, view models and render options from YAML.

use crate::error::ManifestError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_yaml_ng::Value as Yaml;
use tabula_core::{
    parse_decimal, Decimal, Object, PropertyDescriptor, PropertyKind, RenderOptions, ScalarKind,
    TypeDescriptor, Value,
};
use tracing::{debug, warn};

/// A row collection and the view model holding its option lists.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    /// Rows, typed along the row type. Shapes other than a sequence are
    /// passed through untyped so the renderer can reject them.
    pub rows: Value,
    /// Everything else in the document.
    pub view: Value,
}

impl TableData {
    /// Load rows of `row_type`.
    ///
    /// The document is either a sequence of rows, or a mapping whose `rows`
    /// key holds them and whose other keys form the view model.
    pub fn from_yaml(yaml: &str, row_type: &TypeDescriptor) -> Result<Self, ManifestError> {
        let doc: Yaml = serde_yaml_ng::from_str(yaml)?;
        let data = match &doc {
            Yaml::Mapping(mapping) => {
                let rows = match mapping.get("rows") {
                    Some(rows) => rows_value(row_type, rows)?,
                    None => Value::Null,
                };
                let view: Object = mapping
                    .iter()
                    .filter_map(|(k, v)| Some((k.as_str()?, v)))
                    .filter(|(k, _)| *k != "rows")
                    .map(|(k, v)| (k.to_string(), to_value(v)))
                    .collect();
                Self {
                    rows,
                    view: Value::Object(view),
                }
            }
            other => Self {
                rows: rows_value(row_type, other)?,
                view: Value::Null,
            },
        };
        debug!(
            row_type = %row_type.name,
            rows = data.rows.as_list().map_or(0, |rows| rows.len()),
            "table data loaded"
        );
        Ok(data)
    }
}

fn rows_value(row_type: &TypeDescriptor, yaml: &Yaml) -> Result<Value, ManifestError> {
    match yaml {
        Yaml::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| value_for(row_type, item, &format!("rows[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        other => Ok(to_value(other)),
    }
}

/// Untyped conversion: mappings with text keys become objects, other
/// mappings become keyed collections.
#[must_use]
pub fn to_value(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => n
            .as_i64()
            .map_or_else(|| Value::Float(n.as_f64().unwrap_or_default()), Value::Int),
        Yaml::String(s) => Value::Text(s.clone()),
        Yaml::Sequence(items) => Value::List(items.iter().map(to_value).collect()),
        Yaml::Mapping(mapping) => {
            if mapping.keys().all(Yaml::is_string) {
                Value::Object(
                    mapping
                        .iter()
                        .filter_map(|(k, v)| Some((k.as_str()?.to_string(), to_value(v))))
                        .collect(),
                )
            } else {
                Value::Map(mapping.iter().map(|(k, v)| (to_value(k), to_value(v))).collect())
            }
        }
        Yaml::Tagged(tagged) => to_value(&tagged.value),
    }
}

/// Typed conversion of one `ty` value at `path`.
///
/// Missing fields take their property default; unknown fields are skipped.
pub fn value_for(ty: &TypeDescriptor, yaml: &Yaml, path: &str) -> Result<Value, ManifestError> {
    let mapping = match yaml {
        Yaml::Null => return Ok(Value::Null),
        Yaml::Mapping(mapping) => mapping,
        _ => return Err(mismatch(path, "a mapping")),
    };
    for key in mapping.keys() {
        let known = key.as_str().is_some_and(|k| ty.property(k).is_some());
        if !known {
            warn!(path, field = ?key, row_type = %ty.name, "undeclared field skipped");
        }
    }
    let mut object = Object::new();
    for property in &ty.properties {
        let value = match mapping.get(property.name.as_str()) {
            Some(field) => property_value(property, field, &format!("{path}.{}", property.name))?,
            None => property.default_value(),
        };
        object.insert(property.name.clone(), value);
    }
    Ok(Value::Object(object))
}

/// Typed conversion of a value of `property`.
pub(crate) fn property_value(
    property: &PropertyDescriptor,
    yaml: &Yaml,
    path: &str,
) -> Result<Value, ManifestError> {
    kind_value(&property.kind, yaml, path)
}

fn kind_value(kind: &PropertyKind, yaml: &Yaml, path: &str) -> Result<Value, ManifestError> {
    if yaml.is_null() {
        return Ok(Value::Null);
    }
    match kind {
        PropertyKind::Scalar(scalar) => scalar_value(*scalar, yaml, path),
        PropertyKind::Boolean => yaml
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| mismatch(path, "a boolean")),
        PropertyKind::Enum(e) => {
            let member = yaml.as_str().ok_or_else(|| mismatch(path, "an enum member name"))?;
            if e.members.iter().any(|m| m.name == member) {
                Ok(Value::Enum(member.to_string()))
            } else {
                Err(ManifestError::UnknownMember {
                    path: path.to_string(),
                    enum_name: e.name.clone(),
                    member: member.to_string(),
                })
            }
        }
        PropertyKind::Complex(ty) => value_for(ty, yaml, path),
        PropertyKind::Collection(item) => match yaml {
            Yaml::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| kind_value(item, v, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            _ => Err(mismatch(path, "a sequence")),
        },
    }
}

fn scalar_value(kind: ScalarKind, yaml: &Yaml, path: &str) -> Result<Value, ManifestError> {
    match kind {
        ScalarKind::Text | ScalarKind::Date => match yaml {
            Yaml::String(s) => Ok(Value::Text(s.clone())),
            Yaml::Number(n) => Ok(Value::Text(n.to_string())),
            Yaml::Bool(b) => Ok(Value::Text(b.to_string())),
            _ => Err(mismatch(path, "text")),
        },
        ScalarKind::Integer => yaml
            .as_i64()
            .map(Value::Int)
            .ok_or_else(|| mismatch(path, "an integer")),
        ScalarKind::Decimal => {
            let number = match yaml {
                Yaml::Number(n) => n.to_string().parse::<Decimal>().ok(),
                Yaml::String(s) => parse_decimal(s),
                _ => None,
            };
            number
                .map(Value::Decimal)
                .ok_or_else(|| mismatch(path, "a decimal number"))
        }
        ScalarKind::Float => yaml
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| mismatch(path, "a number")),
        ScalarKind::Bytes => yaml
            .as_str()
            .and_then(|s| STANDARD.decode(s).ok())
            .map(Value::Bytes)
            .ok_or_else(|| mismatch(path, "base64 text")),
    }
}

fn mismatch(path: &str, expected: &'static str) -> ManifestError {
    ManifestError::Mismatch {
        path: path.to_string(),
        expected,
    }
}

/// Load render options; absent keys keep their defaults.
pub fn load_options(yaml: &str) -> Result<RenderOptions, ManifestError> {
    if yaml.trim().is_empty() {
        return Ok(RenderOptions::default());
    }
    Ok(serde_yaml_ng::from_str(yaml)?)
}
