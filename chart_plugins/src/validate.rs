//! Query-shape validation.
//!
//! Each chart declares [`QueryBounds`] on how many dimensions, measures and
//! pivots it can draw. [`validate`] checks a response against them before any
//! transform runs; a violation aborts the update cycle so nothing is rendered.

use thiserror::Error;

use crate::fields::QueryFields;

/// Inclusive bounds on the query shape. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryBounds {
    /// Minimum number of dimensions.
    pub min_dimensions: Option<usize>,
    /// Maximum number of dimensions.
    pub max_dimensions: Option<usize>,
    /// Minimum number of measures.
    pub min_measures: Option<usize>,
    /// Maximum number of measures.
    pub max_measures: Option<usize>,
    /// Minimum number of pivots.
    pub min_pivots: Option<usize>,
    /// Maximum number of pivots.
    pub max_pivots: Option<usize>,
}

/// Column category named in a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    /// Dimension columns.
    Dimensions,
    /// Measure columns.
    Measures,
    /// Pivot columns.
    Pivots,
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Subject::Dimensions => "dimension",
            Subject::Measures => "measure",
            Subject::Pivots => "pivot",
        })
    }
}

/// A violated bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Fewer columns than the chart needs.
    #[error("not enough {subject}s: this chart requires at least {min}, got {got}")]
    TooFew {
        /// Which column list.
        subject: Subject,
        /// Required minimum.
        min: usize,
        /// Actual count.
        got: usize,
    },
    /// More columns than the chart can draw.
    #[error("too many {subject}s: this chart allows at most {max}, got {got}")]
    TooMany {
        /// Which column list.
        subject: Subject,
        /// Allowed maximum.
        max: usize,
        /// Actual count.
        got: usize,
    },
}

/// Check `fields` against `bounds`, reporting the first violation.
///
/// Order of checks: pivots, dimensions, measures; minimum before maximum.
pub fn validate(fields: &QueryFields, bounds: &QueryBounds) -> Result<(), ValidationError> {
    check(
        Subject::Pivots,
        fields.pivots.len(),
        bounds.min_pivots,
        bounds.max_pivots,
    )?;
    check(
        Subject::Dimensions,
        fields.dimension_like.len(),
        bounds.min_dimensions,
        bounds.max_dimensions,
    )?;
    check(
        Subject::Measures,
        fields.measure_like.len(),
        bounds.min_measures,
        bounds.max_measures,
    )
}

fn check(
    subject: Subject,
    got: usize,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<(), ValidationError> {
    match (min, max) {
        (Some(min), _) if got < min => Err(ValidationError::TooFew { subject, min, got }),
        (_, Some(max)) if got > max => Err(ValidationError::TooMany { subject, max, got }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Field;

    fn fields(dims: usize, measures: usize) -> QueryFields {
        QueryFields::new(
            (0..dims).map(|i| Field::new(format!("d{i}"), "D")).collect(),
            (0..measures).map(|i| Field::new(format!("m{i}"), "M")).collect(),
        )
    }

    #[test]
    fn unbounded_accepts_anything() {
        assert!(validate(&fields(0, 0), &QueryBounds::default()).is_ok());
        assert!(validate(&fields(7, 9), &QueryBounds::default()).is_ok());
    }

    #[test]
    fn reports_too_few_and_too_many() {
        let bounds = QueryBounds {
            min_measures: Some(1),
            max_measures: Some(1),
            min_dimensions: Some(2),
            ..Default::default()
        };
        assert_eq!(
            validate(&fields(1, 1), &bounds).unwrap_err(),
            ValidationError::TooFew {
                subject: Subject::Dimensions,
                min: 2,
                got: 1
            }
        );
        let err = validate(&fields(2, 3), &bounds).unwrap_err();
        assert_eq!(
            err.to_string(),
            "too many measures: this chart allows at most 1, got 3"
        );
    }

    #[test]
    fn pivots_are_checked_first() {
        let mut f = fields(0, 0);
        f.pivots.push(Field::new("p", "P"));
        let bounds = QueryBounds {
            max_pivots: Some(0),
            min_measures: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            validate(&f, &bounds),
            Err(ValidationError::TooMany {
                subject: Subject::Pivots,
                ..
            })
        ));
    }
}
