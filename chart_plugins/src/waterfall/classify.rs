use crate::fields::{Field, QueryFields};

/// Chart shape derived from the query's field lists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartShape<'a> {
    /// No dimensions: every measure is its own independent bar.
    pub has_no_dimensions: bool,
    /// Exactly two measures: the first is a baseline.
    pub has_base_measure: bool,
    /// Exactly one measure.
    pub has_one_measure_only: bool,
    /// Baseline measure, when `has_base_measure`.
    pub base_measure: Option<&'a Field>,
    /// Per-row delta measure.
    pub measure: &'a Field,
}

impl ChartShape<'_> {
    /// Whether a synthetic Total bar closes the sequence.
    pub fn displays_total(&self) -> bool {
        !self.has_no_dimensions && (self.has_base_measure || self.has_one_measure_only)
    }
}

/// Classify a query. Returns `None` when there is no measure at all, which
/// validation is expected to have rejected already.
pub fn classify(fields: &QueryFields) -> Option<ChartShape<'_>> {
    let measures = &fields.measure_like;
    let has_base_measure = measures.len() == 2;
    let (base_measure, measure) = if has_base_measure {
        (Some(&measures[0]), &measures[1])
    } else {
        (None, measures.first()?)
    };

    Some(ChartShape {
        has_no_dimensions: fields.dimension_like.is_empty(),
        has_base_measure,
        has_one_measure_only: measures.len() == 1,
        base_measure,
        measure,
    })
}
