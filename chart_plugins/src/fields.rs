//! Field metadata supplied by the dashboard host.
//!
//! The host describes every query column with a [`Field`]. Columns come in two
//! kinds: dimensions (categorical, used for grouping and labels) and measures
//! (numeric, plotted). [`QueryFields`] keeps both lists in query order; the
//! order matters, since e.g. the first of two measures is the waterfall
//! baseline.

use serde::{Deserialize, Serialize};

/// Which side of the query a column sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Categorical column.
    Dimension,
    /// Numeric column.
    Measure,
}

/// A single dimension or measure column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Field {
    /// Stable column name, used as the key in every data row.
    pub name: String,
    /// Display label (e.g., "Orders Total Revenue").
    #[serde(default)]
    pub label: String,
    /// Optional short display label (e.g., "Total Revenue").
    #[serde(default)]
    pub label_short: Option<String>,
    /// Field-group variant, used to group measures in tooltips.
    #[serde(default)]
    pub field_group_variant: Option<String>,
}

impl Field {
    /// Convenience constructor used by tests and the CLI fixtures.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            label_short: None,
            field_group_variant: None,
        }
    }

    /// Builder-style setter for [`Field::label_short`].
    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.label_short = Some(short.into());
        self
    }

    /// Builder-style setter for [`Field::field_group_variant`].
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.field_group_variant = Some(variant.into());
        self
    }

    /// Short label if present and non-empty.
    pub fn short_label(&self) -> Option<&str> {
        self.label_short.as_deref().filter(|s| !s.is_empty())
    }

    /// Field-group variant if present and non-empty.
    pub fn group_variant(&self) -> Option<&str> {
        self.field_group_variant.as_deref().filter(|s| !s.is_empty())
    }
}

/// Ordered field lists of one query response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct QueryFields {
    /// Dimensions, in query order.
    #[serde(default)]
    pub dimension_like: Vec<Field>,
    /// Measures, in query order.
    #[serde(default)]
    pub measure_like: Vec<Field>,
    /// Pivot columns. Only the count is consulted (for validation).
    #[serde(default)]
    pub pivots: Vec<Field>,
}

impl QueryFields {
    /// Build a field set without pivots.
    pub fn new(dimension_like: Vec<Field>, measure_like: Vec<Field>) -> Self {
        Self {
            dimension_like,
            measure_like,
            pivots: Vec::new(),
        }
    }

    /// Look up the kind of a column by name.
    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        if self.dimension_like.iter().any(|f| f.name == name) {
            Some(FieldKind::Dimension)
        } else if self.measure_like.iter().any(|f| f.name == name) {
            Some(FieldKind::Measure)
        } else {
            None
        }
    }
}
