//! Per-value type classification.
//!
//! [`classify`] looks at a single sample value, optionally with the name of
//! the column it came from, and decides its elementary [`ColumnType`]
//! together with a length or precision hint. It never fails: values it cannot
//! place fall back to `varchar`.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::{Number, Value};

use crate::schema::ColumnType;

/// Longest string that still classifies as `varchar`.
pub const MAX_VARCHAR_VALUE_LENGTH: u32 = 255;
/// Fractional precision never drops below this.
pub const MIN_PRECISION: u32 = 2;

const MONETARY_KEYWORDS: &[&str] = &[
    "decimal", "amount", "total", "cost", "price", "gst", "pst", "discount",
];

/// Classification of one sample value before cross-row reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementType {
    pub column_type: ColumnType,
    pub length: Option<u32>,
    pub precision: Option<u32>,
}

impl ElementType {
    pub fn plain(column_type: ColumnType) -> Self {
        Self {
            column_type,
            length: None,
            precision: None,
        }
    }

    pub fn with_length(column_type: ColumnType, length: u32) -> Self {
        Self {
            column_type,
            length: Some(length),
            precision: None,
        }
    }

    pub fn with_precision(column_type: ColumnType, precision: u32) -> Self {
        Self {
            column_type,
            length: None,
            precision: Some(precision),
        }
    }
}

pub fn classify(value: &Value, column_hint: Option<&str>) -> ElementType {
    match value {
        Value::Array(_) | Value::Object(_) => ElementType::plain(ColumnType::Json),
        // booleans are stored as 0/1
        Value::Bool(_) => ElementType::plain(ColumnType::Int),
        Value::Number(number) => classify_number(number, column_hint),
        Value::String(text) => classify_string(text),
        Value::Null => ElementType::with_length(ColumnType::Varchar, 0),
    }
}

fn classify_number(number: &Number, column_hint: Option<&str>) -> ElementType {
    if number.is_i64() || number.is_u64() {
        return ElementType::plain(ColumnType::Int);
    }
    let canonical = number
        .as_f64()
        .map(|value| value.to_string())
        .unwrap_or_else(|| number.to_string());
    let precision = fractional_precision(&canonical);
    let column_type = if column_hint.is_some_and(is_monetary_column) {
        ColumnType::Decimal
    } else {
        ColumnType::Float
    };
    ElementType::with_precision(column_type, precision)
}

fn classify_string(text: &str) -> ElementType {
    if is_date_string(text) {
        return ElementType::plain(ColumnType::Date);
    }
    let length = char_length(text);
    if length > MAX_VARCHAR_VALUE_LENGTH {
        ElementType::with_length(ColumnType::Text, length)
    } else {
        ElementType::with_length(ColumnType::Varchar, length)
    }
}

/// True when a column name suggests currency amounts that should be stored
/// as fixed-point decimals rather than floats.
pub fn is_monetary_column(name: &str) -> bool {
    let lowered = name.to_lowercase();
    if MONETARY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        return true;
    }
    lowered.contains("tax") && !lowered.contains("rate")
}

/// Digits after the last `.` in `text`, floored at [`MIN_PRECISION`].
pub fn fractional_precision(text: &str) -> u32 {
    let digits = text
        .rfind('.')
        .map(|idx| char_length(&text[idx + 1..]))
        .unwrap_or(0);
    digits.max(MIN_PRECISION)
}

pub fn char_length(text: &str) -> u32 {
    u32::try_from(text.chars().count()).unwrap_or(u32::MAX)
}

/// Plain numeric text: optional sign, ASCII digits with an optional fraction
/// and exponent, surrounding ASCII whitespace allowed.
pub fn is_numeric_text(text: &str) -> bool {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    NUMERIC
        .get_or_init(|| {
            Regex::new(r"^[ \t\n\r\x0B\x0C]*[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?[ \t\n\r\x0B\x0C]*$")
                .expect("numeric pattern is valid")
        })
        .is_match(text)
}

#[derive(Debug, Clone, Copy)]
enum TemporalFormat {
    Date(&'static str),
    DateTime(&'static str),
    Time(&'static str),
}

impl TemporalFormat {
    fn parses(&self, value: &str) -> bool {
        match self {
            TemporalFormat::Date(fmt) => NaiveDate::parse_from_str(value, fmt).is_ok(),
            TemporalFormat::DateTime(fmt) => NaiveDateTime::parse_from_str(value, fmt).is_ok(),
            TemporalFormat::Time(fmt) => NaiveTime::parse_from_str(value, fmt).is_ok(),
        }
    }
}

const DATE_SHAPES: &[(&str, TemporalFormat)] = &[
    (r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$", TemporalFormat::Date("%Y-%m-%d")),
    (
        r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}$",
        TemporalFormat::DateTime("%Y-%m-%d %H:%M:%S"),
    ),
    (r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$", TemporalFormat::Date("%m/%d/%Y")),
    (r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$", TemporalFormat::Date("%m-%d-%Y")),
    (r"^[0-9]{4}/[0-9]{2}/[0-9]{2}$", TemporalFormat::Date("%Y/%m/%d")),
    (
        r"^[0-9]{4}/[0-9]{2}/[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}$",
        TemporalFormat::DateTime("%Y/%m/%d %H:%M:%S"),
    ),
    (r"^[0-9]{1,2}:[0-9]{2}:[0-9]{2}$", TemporalFormat::Time("%H:%M:%S")),
    (r"^[0-9]{1,2}:[0-9]{2}$", TemporalFormat::Time("%H:%M")),
    (
        r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}Z$",
        TemporalFormat::DateTime("%Y-%m-%dT%H:%M:%SZ"),
    ),
    (
        r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]+Z$",
        TemporalFormat::DateTime("%Y-%m-%dT%H:%M:%S%.fZ"),
    ),
];

fn date_shapes() -> &'static [(Regex, TemporalFormat)] {
    static SHAPES: OnceLock<Vec<(Regex, TemporalFormat)>> = OnceLock::new();
    SHAPES.get_or_init(|| {
        DATE_SHAPES
            .iter()
            .map(|(pattern, format)| {
                (
                    Regex::new(pattern).expect("date shape pattern is valid"),
                    *format,
                )
            })
            .collect()
    })
}

/// A value is a date only when it has one of the known shapes and is also a
/// real calendar date or clock time. The first matching shape decides.
pub fn is_date_string(value: &str) -> bool {
    date_shapes()
        .iter()
        .find(|(shape, _)| shape.is_match(value))
        .is_some_and(|(_, format)| format.parses(value))
}
