//! Display formatting of values.
//!
//! Format strings use the composite syntax properties are annotated with:
//! literal text with `{0}` placeholders, optionally carrying a numeric
//! specifier such as `{0:N2}`. Supported specifiers:
//!
//! | Spec | Meaning | Example (`1234.5`) |
//! |------|---------|--------------------|
//! | `N`n | grouped, n decimals (default 2) | `1,234.50` |
//! | `F`n | fixed, n decimals (default 2) | `1234.50` |
//! | `D`n | integer, zero padded to n digits | |
//! | `C`n | currency | `$1,234.50` |
//! | `P`n | percent | `123,450.00 %` |
//!
//! Midpoints round away from zero. Unknown specifiers fall back to the raw
//! value; non-numeric values ignore the specifier.

use crate::metadata::{PropertyDescriptor, PropertyKind};
use crate::options::RenderOptions;
use crate::value::Value;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format used for totals of integral columns without an explicit format.
pub const INTEGRAL_TOTAL_FORMAT: &str = "{0:N0}";
/// Format used for totals of other numeric columns without an explicit format.
pub const DECIMAL_TOTAL_FORMAT: &str = "{0:N2}";

/// Apply a composite format string to a value.
#[must_use]
pub fn apply(format: &str, value: &Value) -> String {
    let mut out = String::with_capacity(format.len() + 8);
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut item = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    item.push(c);
                }
                out.push_str(&format_item(&item, value));
            }
            _ => out.push(c),
        }
    }
    out
}

fn format_item(item: &str, value: &Value) -> String {
    match item.split_once(':').map(|(_, spec)| spec.trim()) {
        Some(spec) if !spec.is_empty() => {
            numeric(spec, value).unwrap_or_else(|| value.to_input_string())
        }
        _ => value.to_input_string(),
    }
}

/// Widest zero padding a `D` format may request.
const MAX_PAD_WIDTH: usize = 64;

fn numeric(spec: &str, value: &Value) -> Option<String> {
    let number = match value {
        Value::Int(i) => Decimal::from(*i),
        Value::Decimal(d) => *d,
        Value::Float(f) => Decimal::from_f64(*f)?,
        _ => return None,
    };
    let mut chars = spec.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let digits = chars.as_str();
    let precision = if digits.is_empty() {
        None
    } else {
        Some(digits.parse::<u32>().ok()?)
    };
    match letter {
        'N' => Some(grouped(number, precision.unwrap_or(2))),
        'F' => Some(fixed(number, precision.unwrap_or(2))),
        'D' => match value {
            Value::Int(i) => {
                let width = (precision.unwrap_or(0) as usize).min(MAX_PAD_WIDTH);
                let sign = if *i < 0 { "-" } else { "" };
                Some(format!("{sign}{:0width$}", i.unsigned_abs()))
            }
            _ => None,
        },
        'C' => {
            let text = grouped(number.abs(), precision.unwrap_or(2));
            Some(if number.is_sign_negative() && !number.is_zero() {
                format!("-${text}")
            } else {
                format!("${text}")
            })
        }
        'P' => {
            let percent = number.checked_mul(Decimal::ONE_HUNDRED)?;
            Some(format!("{} %", grouped(percent, precision.unwrap_or(2))))
        }
        _ => None,
    }
}

/// Round half away from zero to exactly `precision` decimals.
#[must_use]
pub fn fixed(number: Decimal, precision: u32) -> String {
    let mut rounded = number.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(precision);
    rounded.to_string()
}

/// [`fixed`] with thousands separators.
#[must_use]
pub fn grouped(number: Decimal, precision: u32) -> String {
    let text = fixed(number, precision);
    let (sign, unsigned) = text
        .strip_prefix('-')
        .map_or(("", text.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let mut out = String::with_capacity(text.len() + int_part.len() / 3);
    out.push_str(sign);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format string used for a column's footer total.
#[must_use]
pub fn total_format(property: &PropertyDescriptor) -> &str {
    match &property.format {
        Some(format) => format,
        None if property.is_integral() => INTEGRAL_TOTAL_FORMAT,
        None => DECIMAL_TOTAL_FORMAT,
    }
}

/// Text shown for a property value in read-only output.
///
/// Null values use the property's null display text, booleans the option
/// labels, enums their member display names, everything else the property's
/// format string.
#[must_use]
pub fn display_text(property: &PropertyDescriptor, value: &Value, options: &RenderOptions) -> String {
    match value {
        Value::Null => property.null_display.clone().unwrap_or_default(),
        Value::Bool(b) => options.bool_label(*b).to_string(),
        Value::Enum(member) => match &property.kind {
            PropertyKind::Enum(e) => e.label_of(member).to_string(),
            _ => member.clone(),
        },
        _ => match &property.format {
            Some(format) => apply(format, value),
            None => value.to_input_string(),
        },
    }
}
