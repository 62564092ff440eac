use tracing::debug;

use crate::config::{PercentBasis, WaterfallConfig};
use crate::fields::{Field, QueryFields};
use crate::format::humanize;
use crate::table::{DimensionCell, Row, Table};
use crate::waterfall::bar::{Bar, BarClass, BarKind, LABEL_PLACEHOLDER};
use crate::waterfall::classify::ChartShape;

/// Separator between dimension values in a bar name.
pub const NAME_SEPARATOR: &str = " - ";

/// Output of the row reducer.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    /// Bars in row order.
    pub bars: Vec<Bar>,
    /// Final value of the running total.
    pub cumulative: f64,
}

/// Walk the rows once and emit one bar per row (or per measure, without
/// dimensions), tracking the running total.
pub fn reduce_rows(
    shape: &ChartShape<'_>,
    fields: &QueryFields,
    table: &Table,
    cfg: &WaterfallConfig,
) -> Reduction {
    if shape.has_no_dimensions {
        return Reduction {
            bars: independent_bars(&fields.measure_like, table, cfg),
            cumulative: 0.0,
        };
    }

    let total = chart_total(shape, table, cfg.percent_basis);
    let share = |value: f64| (total != 0.0 && total.is_finite()).then(|| value / total);

    let mut cumulative = 0.0;
    let mut bars = Vec::with_capacity(table.len() + 2);

    if let (Some(base), Some(first)) = (shape.base_measure, table.rows().first()) {
        let value = if cfg.sum_for_baseline {
            table.column_sum(base)
        } else {
            first.measure_value(base).unwrap_or(0.0)
        };
        let label = base.group_variant().unwrap_or(LABEL_PLACEHOLDER).to_string();
        bars.push(Bar {
            name: label.clone(),
            value,
            start: Some(0.0),
            end: Some(value),
            rendered: humanize(value, 2),
            percent: share(value),
            tooltip_label: label,
            class: BarClass::of(value),
            kind: BarKind::Baseline,
            color: cfg.baseline_color.clone(),
        });
        cumulative += value;
    }

    let tooltip = shape
        .measure
        .group_variant()
        .unwrap_or(&shape.measure.label)
        .to_string();
    let mut skipped = 0usize;

    for row in table.rows() {
        let cell = row.measure_cell(shape.measure);
        let value = match cell.and_then(|c| c.value) {
            Some(v) => v,
            None if cfg.show_null_points => 0.0,
            None => {
                skipped += 1;
                continue;
            }
        };
        let rendered = cell
            .and_then(|c| c.rendered())
            .map(str::to_string)
            .unwrap_or_else(|| humanize(value, 2));

        bars.push(Bar {
            name: row_name(row, &fields.dimension_like),
            value,
            start: Some(cumulative),
            end: Some(cumulative + value),
            rendered,
            percent: share(value),
            tooltip_label: tooltip.clone(),
            class: BarClass::of(value),
            kind: BarKind::Measure,
            color: None,
        });
        cumulative += value;
    }

    if skipped > 0 {
        debug!(skipped, "dropped rows with a null delta");
    }

    Reduction { bars, cumulative }
}

/// Denominator for `percent`.
fn chart_total(shape: &ChartShape<'_>, table: &Table, basis: PercentBasis) -> f64 {
    let base = match (shape.base_measure, basis) {
        (Some(b), PercentBasis::IncludeBaseline) => table.column_sum(b),
        _ => 0.0,
    };
    base + table.column_sum(shape.measure)
}

/// Join the truthy dimension values of a row; placeholder if none.
pub fn row_name(row: &Row, dimensions: &[Field]) -> String {
    let name = dimensions
        .iter()
        .filter_map(|d| row.dimension(d).and_then(DimensionCell::truthy))
        .collect::<Vec<_>>()
        .join(NAME_SEPARATOR);
    if name.is_empty() {
        LABEL_PLACEHOLDER.to_string()
    } else {
        name
    }
}

// No dimensions: each measure of each row is a standalone bar.
fn independent_bars(measures: &[Field], table: &Table, cfg: &WaterfallConfig) -> Vec<Bar> {
    let mut bars = Vec::with_capacity(table.len() * measures.len());
    for row in table.rows() {
        for measure in measures {
            let cell = row.measure_cell(measure);
            let value = match cell.and_then(|c| c.value) {
                Some(v) => v,
                None if cfg.show_null_points => 0.0,
                None => continue,
            };
            let rendered = cell
                .and_then(|c| c.rendered())
                .map(str::to_string)
                .unwrap_or_else(|| humanize(value, 2));
            bars.push(Bar {
                name: measure.short_label().unwrap_or(LABEL_PLACEHOLDER).to_string(),
                value,
                start: None,
                end: None,
                rendered,
                percent: None,
                tooltip_label: measure.label.clone(),
                class: BarClass::of(value),
                kind: BarKind::Measure,
                color: None,
            });
        }
    }
    bars
}
