//! Waterfall data transform.
//!
//! ## Pipeline
//! 1. [`classify`] reads the field lists and decides the chart shape
//!    (no dimensions / baseline measure / single measure).
//! 2. [`reduce_rows`] walks the rows once, emitting bars with a running total.
//! 3. [`inject_total`] appends the synthetic `Total` bar when the shape wants one.
//!
//! [`compute_bars`] runs all three. [`format_label`] is separate: the renderer
//! calls it per bar with the active [`LabelType`].
//!
//! ## Shapes
//! - **No dimensions**: every measure of every row becomes an independent bar
//!   (`start`/`end` are `None`); no cumulative stacking, no Total.
//! - **Two measures**: the first is a baseline, plotted as one bar before the
//!   first row; it is either the first row's value or the column sum
//!   ([`WaterfallConfig::sum_for_baseline`]).
//! - **One measure**: classic waterfall closed by a Total bar.
//!
//! A fresh sequence is computed on every update; nothing carries over.

mod bar;
mod classify;
mod label;
mod reduce;
mod total;

use tracing::debug;

pub use bar::{Bar, BarClass, BarKind, BarTable, LABEL_PLACEHOLDER, TOTAL_LABEL};
pub use classify::{ChartShape, classify};
pub use label::{LabelType, format_label};
pub use reduce::{NAME_SEPARATOR, Reduction, reduce_rows, row_name};
pub use total::inject_total;

use crate::config::WaterfallConfig;
use crate::fields::QueryFields;
use crate::table::Table;

/// Run the whole transform. Returns an empty sequence when the query has no
/// measure.
pub fn compute_bars(fields: &QueryFields, table: &Table, cfg: &WaterfallConfig) -> Vec<Bar> {
    let Some(shape) = classify(fields) else {
        return Vec::new();
    };
    debug!(
        rows = table.len(),
        no_dimensions = shape.has_no_dimensions,
        base_measure = shape.has_base_measure,
        one_measure = shape.has_one_measure_only,
        "classified waterfall"
    );

    let Reduction {
        mut bars,
        cumulative,
    } = reduce_rows(&shape, fields, table, cfg);
    inject_total(&mut bars, &shape, cumulative, cfg);

    debug!(bars = bars.len(), cumulative, "computed waterfall bars");
    bars
}

/// Value-axis extent `(min, max)` covering every bar; `(0, 0)` when empty.
pub fn value_domain(bars: &[Bar]) -> (f64, f64) {
    let min = bars
        .iter()
        .map(|b| b.bottom().min(b.top()))
        .fold(f64::INFINITY, f64::min);
    let max = bars
        .iter()
        .map(|b| b.bottom().max(b.top()))
        .fold(f64::NEG_INFINITY, f64::max);
    if bars.is_empty() {
        (0.0, 0.0)
    } else {
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Field;
    use crate::table::Row;

    fn fields() -> QueryFields {
        QueryFields::new(vec![Field::new("step", "Step")], vec![Field::new("delta", "Delta")])
    }

    fn rows(values: &[f64]) -> Table {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Row::new().dim("step", format!("s{i}")).measure("delta", *v))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn total_equals_sum_of_preceding_bars() {
        let bars = compute_bars(&fields(), &rows(&[10.0, -4.0, 7.5]), &WaterfallConfig::default());
        assert_eq!(bars.len(), 4);
        let total = bars.last().unwrap();
        assert_eq!(total.kind, BarKind::Total);
        let sum: f64 = bars[..3].iter().map(|b| b.value).sum();
        assert_eq!(total.value, sum);
    }

    #[test]
    fn total_includes_the_baseline() {
        let fields = QueryFields::new(
            vec![Field::new("step", "Step")],
            vec![Field::new("start", "Start"), Field::new("delta", "Delta")],
        );
        let table = Table::new(vec![
            Row::new().dim("step", "x").measure("start", 100.0).measure("delta", 10.0),
            Row::new().dim("step", "y").measure("start", 100.0).measure("delta", -20.0),
        ]);
        let bars = compute_bars(&fields, &table, &WaterfallConfig::default());

        let kinds: Vec<_> = bars.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BarKind::Baseline, BarKind::Measure, BarKind::Measure, BarKind::Total]
        );
        let (total, steps) = bars.split_last().unwrap();
        assert_eq!(total.value, steps.iter().map(|b| b.value).sum::<f64>());
        assert_eq!(total.value, 90.0);
        assert_eq!((total.start, total.end), (Some(0.0), Some(90.0)));
        assert_eq!(bars[2].start, Some(110.0));
        assert_eq!(bars[2].class, BarClass::Negative);
    }

    #[test]
    fn empty_rows_still_close_with_zero_total() {
        let bars = compute_bars(&fields(), &Table::default(), &WaterfallConfig::default());
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].value, 0.0);
        assert_eq!(bars[0].rendered, "0");
    }

    #[test]
    fn no_measures_yields_nothing() {
        let f = QueryFields::new(vec![Field::new("step", "Step")], vec![]);
        assert!(compute_bars(&f, &rows(&[1.0]), &WaterfallConfig::default()).is_empty());
    }

    #[test]
    fn domain_spans_every_bar() {
        let bars = compute_bars(&fields(), &rows(&[10.0, -25.0, 5.0]), &WaterfallConfig::default());
        assert_eq!(value_domain(&bars), (-15.0, 10.0));
        assert_eq!(value_domain(&[]), (0.0, 0.0));
    }

    #[test]
    fn table_rendering() {
        let bars = compute_bars(&fields(), &rows(&[1200.0, -300.0]), &WaterfallConfig::default());
        insta::assert_snapshot!(BarTable(&bars).to_string(), @r"
        s0     positive        1.20 K  0 -> 1200
        s1     negative          -300  1200 -> 900
        Total  total              900  0 -> 900
        ");
    }
}
