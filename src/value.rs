// Typed attribute values and their Amazon XML text representation
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};

use crate::element::Element;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<FixedOffset>),
    // Already-built XML passed through untouched
    Element(Element),
}

impl Value {
    /// Truthiness used by every lookup: empty text, zero and `false` count as
    /// absent. Dates and elements are always present.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Text(text) => !text.is_empty(),
            Value::Integer(number) => *number != 0,
            Value::Decimal(number) => *number != 0.0,
            Value::Boolean(flag) => *flag,
            Value::Date(_) | Value::DateTime(_) | Value::Timestamp(_) => true,
            Value::Element(_) => true,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Value::Text(text) => text.clone(),
            Value::Integer(number) => number.to_string(),
            Value::Decimal(number) => format_decimal(*number),
            Value::Boolean(flag) => flag.to_string(),
            Value::Date(date) => date.format("%Y-%m-%d").to_string(),
            Value::DateTime(datetime) => format_naive(datetime),
            Value::Timestamp(timestamp) => format!(
                "{}{}",
                format_naive(&timestamp.naive_local()),
                timestamp.format("%:z")
            ),
            // Markup comes from the element writer, which can fail
            Value::Element(elem) => elem.text_content().to_string(),
        }
    }
}

/// Very basic serialiser from typed values to the Amazon XML text form.
/// Absent and falsy values become the empty string.
pub fn serialise(value: Option<&Value>) -> String {
    match value {
        Some(value) if value.is_truthy() => value.to_text(),
        _ => String::new(),
    }
}

fn format_naive(datetime: &NaiveDateTime) -> String {
    let base = datetime.format("%Y-%m-%dT%H:%M:%S").to_string();
    let micros = datetime.nanosecond() / 1_000;
    if micros == 0 {
        base
    } else {
        format!("{}.{:06}", base, micros)
    }
}

// Shortest round-trip digits. Whole numbers keep a trailing ".0"; magnitudes
// below 1e-4 or from 1e16 up use a signed two-digit exponent ("1e-05", "1.5e+16").
fn format_decimal(number: f64) -> String {
    if !number.is_finite() {
        return number.to_string();
    }
    let magnitude = number.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{:e}", number);
        return match scientific.split_once('e') {
            Some((mantissa, exponent)) => match exponent.strip_prefix('-') {
                Some(digits) => format!("{}e-{:0>2}", mantissa, digits),
                None => format!("{}e+{:0>2}", mantissa, exponent),
            },
            None => scientific,
        };
    }
    if number.fract() == 0.0 {
        format!("{:.1}", number)
    } else {
        number.to_string()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Element> for Value {
    fn from(value: Element) -> Self {
        Value::Element(value)
    }
}
