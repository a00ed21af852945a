//! Dynamic values bound to model descriptors.
//!
//! A [`Value`] is what a row, a nested complex property or a whole view model
//! holds at render time. Objects keep their field order so that hidden-input
//! and column output is deterministic.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use indexmap::IndexMap;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ordered field map of a complex value.
pub type Object = IndexMap<String, Value>;

static NULL: Value = Value::Null;

/// A dynamically typed model value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integral number.
    Int(i64),
    /// Exact decimal number.
    Decimal(Decimal),
    /// Floating-point number.
    Float(f64),
    /// Text (also used for dates, which are carried pre-formatted).
    Text(String),
    /// Enum member, by member name.
    Enum(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Complex value.
    Object(Object),
    /// Sequence of values.
    List(Vec<Value>),
    /// Keyed or grouped collection.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Build an object value from `(name, value)` pairs.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether the value is [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the field map of an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Mutably borrow the field map of an object.
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Borrow the items of a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the text of a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, `None` unless this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Field of an object; [`Value::Null`] for missing fields and non-objects.
    #[must_use]
    pub fn field(&self, name: &str) -> &Self {
        self.as_object().and_then(|o| o.get(name)).unwrap_or(&NULL)
    }

    /// Whether the value is numeric.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Decimal(_) | Self::Float(_))
    }

    /// Numeric content as a decimal. Non-numeric values count as zero, text
    /// is parsed leniently.
    #[must_use]
    pub fn to_decimal(&self) -> Decimal {
        match self {
            Self::Int(i) => Decimal::from(*i),
            Self::Decimal(d) => *d,
            Self::Float(f) => Decimal::from_f64(*f).unwrap_or_default(),
            Self::Text(s) => parse_decimal(s).unwrap_or_default(),
            _ => Decimal::ZERO,
        }
    }

    /// Raw value as written into an `<input value>` attribute.
    ///
    /// Booleans use `True`/`False`, bytes are base64, composite values render
    /// empty.
    #[must_use]
    pub fn to_input_string(&self) -> String {
        match self {
            Self::Null | Self::Object(_) | Self::List(_) | Self::Map(_) => String::new(),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Int(i) => i.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) | Self::Enum(s) => s.clone(),
            Self::Bytes(b) => STANDARD.encode(b),
        }
    }
}

/// Parse user-entered numeric text, tolerating thousands separators.
#[must_use]
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let v = Value::object([("ID", Value::from(1)), ("Name", Value::from("a"))]);
        assert_eq!(v.field("ID"), &Value::Int(1));
        assert!(v.field("Missing").is_null());
        assert!(Value::Null.field("ID").is_null());
    }

    #[test]
    fn test_object_preserves_order() {
        let v = Value::object([("b", Value::Null), ("a", Value::Null)]);
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_input_string_booleans() {
        assert_eq!(Value::Bool(true).to_input_string(), "True");
        assert_eq!(Value::Bool(false).to_input_string(), "False");
    }

    #[test]
    fn test_input_string_bytes_are_base64() {
        assert_eq!(Value::Bytes(vec![1, 2, 3]).to_input_string(), "AQID");
    }

    #[test]
    fn test_input_string_decimal_keeps_scale() {
        let d = Decimal::new(1050, 2);
        assert_eq!(Value::Decimal(d).to_input_string(), "10.50");
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Value::Int(5).to_decimal(), Decimal::from(5));
        assert_eq!(Value::from("1,234.5").to_decimal(), Decimal::new(12345, 1));
        assert_eq!(Value::from("abc").to_decimal(), Decimal::ZERO);
        assert_eq!(Value::Null.to_decimal(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_decimal_empty() {
        assert_eq!(parse_decimal("  "), None);
    }

    #[test]
    fn test_from_option() {
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(Some(3)), Value::Int(3));
    }
}
