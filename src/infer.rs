//! Column type reconciliation.
//!
//! Every usable value of a column is classified on its own (see
//! [`crate::classify`]) and the results are folded through the promotion
//! lattice `int < float < decimal < date < varchar < text < json` into a
//! single [`ColumnDescriptor`].
//!
//! Two rules sit outside the plain rank ordering and are order sensitive:
//!
//! - a date arriving in a column that has only seen `int`/`float` turns the
//!   column into `varchar`, while a number arriving after dates leaves it as
//!   `date`;
//! - a short string arriving after dates bumps the tracked length to the
//!   date-sized floor, the reverse order does not.

use itertools::Itertools;
use log::debug;
use serde_json::{Map, Value};

use crate::{
    classify::{self, ElementType},
    schema::{ColumnDescriptor, ColumnType, Schema},
};

/// Floor applied to every inferred varchar length, and the length used when
/// a column carries no usable values.
pub const VARCHAR_MIN_LENGTH: u32 = 50;
pub const VARCHAR_MAX_LENGTH: u32 = 255;
/// Minimum tracked length once a date has been mixed with other values.
pub const DATE_VARCHAR_LENGTH: u32 = 25;
/// Column name used when the sample is a flat list of values.
pub const FLAT_COLUMN_NAME: &str = "data";

pub type Record = Map<String, Value>;

/// Sample rows ready for inference.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    /// Key/value rows such as a JSON array of objects or CSV with headers.
    Records(Vec<Record>),
    /// A flat list analysed as a single column.
    Values(Vec<Value>),
}

impl Dataset {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                if items.first().is_some_and(Value::is_object) {
                    let records = items
                        .into_iter()
                        .map(|item| match item {
                            Value::Object(record) => record,
                            _ => Record::new(),
                        })
                        .collect();
                    Dataset::Records(records)
                } else {
                    Dataset::Values(items)
                }
            }
            Value::Object(record) => Dataset::Records(vec![record]),
            scalar => Dataset::Values(vec![scalar]),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            Dataset::Records(records) => records.len(),
            Dataset::Values(values) => values.len(),
        }
    }
}

/// Union of the keys of every record, in first-seen order.
pub fn discover_columns(rows: &[Record]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.keys())
        .unique()
        .cloned()
        .collect()
}

pub fn analyze(dataset: &Dataset) -> Schema {
    let columns = match dataset {
        Dataset::Records(rows) => discover_columns(rows)
            .iter()
            .map(|name| reconcile(rows, name))
            .collect(),
        Dataset::Values(values) if values.is_empty() => Vec::new(),
        Dataset::Values(values) => {
            vec![reconcile_values(FLAT_COLUMN_NAME, values.iter().map(Some))]
        }
    };
    for column in &columns {
        debug!(
            "Column '{}' resolved to {} (length {:?}, precision {:?})",
            column.name, column.column_type, column.length, column.precision
        );
    }
    Schema::new(columns)
}

/// Decides the descriptor for `column` across every row. Rows lacking the
/// column count as null.
pub fn reconcile(rows: &[Record], column: &str) -> ColumnDescriptor {
    if rows.is_empty() {
        return unresolved(column);
    }
    reconcile_values(column, rows.iter().map(|row| row.get(column)))
}

pub fn reconcile_values<'a, I>(column: &str, values: I) -> ColumnDescriptor
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    values
        .into_iter()
        .filter_map(|value| observe(value?, column))
        .fold(Reconciliation::default(), Reconciliation::absorb)
        .finish(column)
}

/// Classifies one value, or `None` when it is null or an empty string.
pub fn observe(value: &Value, column: &str) -> Option<ElementType> {
    match value {
        Value::Null => return None,
        Value::String(text) if text.is_empty() => return None,
        _ => {}
    }
    let element = classify::classify(value, Some(column));
    match value {
        Value::String(text)
            if element.column_type == ColumnType::Varchar && classify::is_numeric_text(text) =>
        {
            Some(reinterpret_numeric(text, element.length))
        }
        _ => Some(element),
    }
}

/// Numeric text keeps its string length so a later demotion to varchar
/// still sizes the column for it.
fn reinterpret_numeric(text: &str, length: Option<u32>) -> ElementType {
    let element = if text.contains('.') {
        ElementType::with_precision(ColumnType::Float, classify::fractional_precision(text))
    } else {
        ElementType::plain(ColumnType::Int)
    };
    ElementType { length, ..element }
}

fn unresolved(column: &str) -> ColumnDescriptor {
    ColumnDescriptor::new(column, ColumnType::Varchar, Some(VARCHAR_MIN_LENGTH), None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Reconciliation {
    best: ColumnType,
    max_length: u32,
    max_precision: u32,
    seen: usize,
}

impl Default for Reconciliation {
    fn default() -> Self {
        Self {
            best: ColumnType::Int,
            max_length: 0,
            max_precision: 0,
            seen: 0,
        }
    }
}

impl Reconciliation {
    fn absorb(self, element: ElementType) -> Self {
        let current = element.column_type;
        let previous = self.best;
        let mut max_length = self.max_length.max(element.length.unwrap_or(0));
        let max_precision = self.max_precision.max(element.precision.unwrap_or(0));

        // The first usable value decides on its own; `Int` is only the
        // starting point of the fold, not an observation.
        if self.seen == 0 {
            return Self {
                best: current,
                max_length,
                max_precision,
                seen: 1,
            };
        }

        let mut best = if current.rank() > previous.rank() {
            current
        } else {
            previous
        };
        match (previous, current) {
            (ColumnType::Int, ColumnType::Float) => best = ColumnType::Float,
            (ColumnType::Int | ColumnType::Float, ColumnType::Decimal) => {
                best = ColumnType::Decimal
            }
            (ColumnType::Int | ColumnType::Float, ColumnType::Date)
            | (ColumnType::Date, ColumnType::Varchar) => {
                best = ColumnType::Varchar;
                max_length = max_length.max(DATE_VARCHAR_LENGTH);
            }
            _ => {}
        }

        Self {
            best,
            max_length,
            max_precision,
            seen: self.seen + 1,
        }
    }

    fn finish(self, column: &str) -> ColumnDescriptor {
        if self.seen == 0 {
            return unresolved(column);
        }
        match self.best {
            ColumnType::Varchar => ColumnDescriptor::new(
                column,
                ColumnType::Varchar,
                Some(
                    self.max_length
                        .min(VARCHAR_MAX_LENGTH)
                        .max(VARCHAR_MIN_LENGTH),
                ),
                None,
            ),
            ColumnType::Float | ColumnType::Decimal => ColumnDescriptor::new(
                column,
                self.best,
                None,
                Some(self.max_precision.max(classify::MIN_PRECISION)),
            ),
            other => ColumnDescriptor::new(column, other, None, None),
        }
    }
}
