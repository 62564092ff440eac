//! Typed view over the host's query rows.
//!
//! The host ships rows as loose JSON objects (`field name -> { value, rendered?, ... }`).
//! [`Table::from_json`] converts them once, up front, into [`Row`]s whose cells are
//! a [`Cell`] sum type picked by the column's [`FieldKind`]. The transforms then
//! only deal with `DimensionCell` / `MeasureCell` and never with raw JSON.
//!
//! Columns that are neither a known dimension nor a known measure (table
//! calculations, links, ...) are dropped during conversion.

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::fields::{Field, FieldKind, QueryFields};

/// Errors raised while converting host rows.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    /// The data payload is not a JSON array.
    #[error("query data must be an array of rows")]
    NotAnArray,
    /// A row is not a JSON object.
    #[error("row {index} is not an object")]
    RowNotObject {
        /// Position of the offending row.
        index: usize,
    },
    /// A measure cell holds something that is neither a number nor null.
    #[error("row {index}: measure '{field}' has a non-numeric value")]
    NonNumericMeasure {
        /// Position of the offending row.
        index: usize,
        /// Measure column name.
        field: String,
    },
}

/// A dimension cell. `None` covers JSON `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionCell {
    /// Stringified dimension value.
    pub value: Option<String>,
}

impl DimensionCell {
    /// The value if it is non-empty (the host treats `""` and `null` as falsy).
    pub fn truthy(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }
}

/// A measure cell. `value == None` is a null point.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureCell {
    /// Numeric value.
    pub value: Option<f64>,
    /// Host pre-formatted value, if any.
    pub rendered: Option<String>,
}

impl MeasureCell {
    /// Host rendering if present and non-empty.
    pub fn rendered(&self) -> Option<&str> {
        self.rendered.as_deref().filter(|r| !r.is_empty())
    }
}

/// One typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Cell of a dimension column.
    Dimension(DimensionCell),
    /// Cell of a measure column.
    Measure(MeasureCell),
}

/// One query row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: IndexMap<String, Cell>,
}

impl Row {
    /// Empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style dimension insert.
    pub fn dim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.insert(
            name.into(),
            Cell::Dimension(DimensionCell {
                value: Some(value.into()),
            }),
        );
        self
    }

    /// Builder-style measure insert without a host rendering.
    pub fn measure(mut self, name: impl Into<String>, value: f64) -> Self {
        self.cells.insert(
            name.into(),
            Cell::Measure(MeasureCell {
                value: Some(value),
                rendered: None,
            }),
        );
        self
    }

    /// Builder-style measure insert with a host rendering.
    pub fn measure_rendered(
        mut self,
        name: impl Into<String>,
        value: f64,
        rendered: impl Into<String>,
    ) -> Self {
        self.cells.insert(
            name.into(),
            Cell::Measure(MeasureCell {
                value: Some(value),
                rendered: Some(rendered.into()),
            }),
        );
        self
    }

    /// Insert an arbitrary cell.
    pub fn insert(&mut self, name: impl Into<String>, cell: Cell) {
        self.cells.insert(name.into(), cell);
    }

    /// Dimension cell for `field`, if the row has one.
    pub fn dimension(&self, field: &Field) -> Option<&DimensionCell> {
        match self.cells.get(&field.name) {
            Some(Cell::Dimension(c)) => Some(c),
            _ => None,
        }
    }

    /// Measure cell for `field`, if the row has one.
    pub fn measure_cell(&self, field: &Field) -> Option<&MeasureCell> {
        match self.cells.get(&field.name) {
            Some(Cell::Measure(c)) => Some(c),
            _ => None,
        }
    }

    /// Measure value for `field`; missing cells and nulls both yield `None`.
    pub fn measure_value(&self, field: &Field) -> Option<f64> {
        self.measure_cell(field).and_then(|c| c.value)
    }
}

/// Ordered, immutable set of typed rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Wrap already-typed rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Convert the host's JSON data array using `fields` to type each column.
    pub fn from_json(data: &Value, fields: &QueryFields) -> Result<Self, DataError> {
        let items = data.as_array().ok_or(DataError::NotAnArray)?;
        let mut rows = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let obj = item
                .as_object()
                .ok_or(DataError::RowNotObject { index })?;
            let mut row = Row::new();
            for (name, raw) in obj {
                let Some(kind) = fields.kind_of(name) else {
                    continue;
                };
                let cell = match kind {
                    FieldKind::Dimension => Cell::Dimension(DimensionCell {
                        value: stringify(cell_value(raw)),
                    }),
                    FieldKind::Measure => {
                        let value = match cell_value(raw) {
                            Value::Null => None,
                            Value::Number(n) => n.as_f64(),
                            _ => {
                                return Err(DataError::NonNumericMeasure {
                                    index,
                                    field: name.clone(),
                                });
                            }
                        };
                        let rendered = raw
                            .get("rendered")
                            .and_then(Value::as_str)
                            .map(str::to_string);
                        Cell::Measure(MeasureCell { value, rendered })
                    }
                };
                row.insert(name.clone(), cell);
            }
            rows.push(row);
        }

        Ok(Self { rows })
    }

    /// Rows in input order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of a measure column; nulls and missing cells count as 0.
    pub fn column_sum(&self, field: &Field) -> f64 {
        self.rows
            .iter()
            .filter_map(|r| r.measure_value(field))
            .sum()
    }
}

impl From<Vec<Row>> for Table {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

// `{ "value": x, ... }` -> x; a bare scalar is accepted as its own value.
fn cell_value(raw: &Value) -> &Value {
    match raw {
        Value::Object(map) => map.get("value").unwrap_or(&Value::Null),
        other => other,
    }
}

fn stringify(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
