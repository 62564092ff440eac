use std::fmt;

use serde::Serialize;

/// Name used when a bar would otherwise have an empty label.
pub const LABEL_PLACEHOLDER: &str = "(empty)";

/// Name and tooltip of the synthetic total bar.
pub const TOTAL_LABEL: &str = "Total";

/// Styling category of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarClass {
    /// `value >= 0`.
    Positive,
    /// `value < 0`.
    Negative,
    /// Synthetic total; excluded from sign styling and connector lines.
    Total,
}

impl BarClass {
    /// Sign category of a value.
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            BarClass::Positive
        } else {
            BarClass::Negative
        }
    }

    /// CSS class name used by the renderer.
    pub fn as_str(&self) -> &'static str {
        match self {
            BarClass::Positive => "positive",
            BarClass::Negative => "negative",
            BarClass::Total => "total",
        }
    }
}

/// Where a bar came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarKind {
    /// One row (or, without dimensions, one measure of a row).
    Measure,
    /// Synthetic starting value from the baseline measure.
    Baseline,
    /// Synthetic running total.
    Total,
}

/// One waterfall bar, ready for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    /// Axis label.
    pub name: String,
    /// Delta (or, for synthetic bars, the baseline / total value).
    pub value: f64,
    /// Start of the cumulative segment; `None` for independent bars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    /// End of the cumulative segment; `None` for independent bars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    /// Host rendering of `value`, or [`crate::format::humanize`] of it.
    pub rendered: String,
    /// Share of the chart total; `None` when the total is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    /// Tooltip title.
    pub tooltip_label: String,
    /// Styling category.
    pub class: BarClass,
    /// Origin of the bar.
    pub kind: BarKind,
    /// Fixed colour for synthetic bars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Bar {
    /// Top of the bar on the value axis (`end`, or `value` for independent bars).
    pub fn top(&self) -> f64 {
        self.end.unwrap_or(self.value)
    }

    /// Bottom of the bar on the value axis.
    pub fn bottom(&self) -> f64 {
        self.start.unwrap_or(0.0)
    }
}

/// Plain-text table of bars, for the CLI and for eyeballing in tests.
pub struct BarTable<'a>(pub &'a [Bar]);

impl fmt::Display for BarTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No bars");
        }
        let width = self
            .0
            .iter()
            .map(|b| b.name.chars().count())
            .max()
            .unwrap_or(0);
        for bar in self.0 {
            let span = match (bar.start, bar.end) {
                (Some(s), Some(e)) => format!("{s} -> {e}"),
                _ => "-".to_string(),
            };
            writeln!(
                f,
                "{:<width$}  {:<8}  {:>12}  {}",
                bar.name,
                bar.class.as_str(),
                bar.rendered,
                span
            )?;
        }
        Ok(())
    }
}
