use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::format::to_fixed;
use crate::waterfall::bar::Bar;

/// Bar label policy (`label_type` option).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelType {
    /// The rendered value.
    #[default]
    Value,
    /// The rendered value followed by its share, e.g. `50 (25.00%)`.
    ValuePercentage,
    /// Any label type this build does not know; renders nothing.
    #[serde(other)]
    Unknown,
}

/// Text drawn on (and in the tooltip of) a bar.
pub fn format_label(bar: &Bar, label_type: LabelType) -> String {
    match label_type {
        LabelType::Value => bar.rendered.clone(),
        LabelType::ValuePercentage => match bar.percent {
            Some(p) if p != 0.0 => format!("{} ({}%)", bar.rendered, to_fixed(p * 100.0, 2)),
            _ => bar.rendered.clone(),
        },
        LabelType::Unknown => {
            warn!(bar = %bar.name, "unknown label type, rendering empty label");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waterfall::bar::{BarClass, BarKind};

    fn bar(rendered: &str, percent: Option<f64>) -> Bar {
        Bar {
            name: "a".into(),
            value: 50.0,
            start: Some(0.0),
            end: Some(50.0),
            rendered: rendered.into(),
            percent,
            tooltip_label: "A".into(),
            class: BarClass::Positive,
            kind: BarKind::Measure,
            color: None,
        }
    }

    #[test]
    fn value_policy_returns_rendered() {
        assert_eq!(format_label(&bar("50", Some(0.25)), LabelType::Value), "50");
    }

    #[test]
    fn percentage_policy_appends_share() {
        assert_eq!(
            format_label(&bar("50", Some(0.25)), LabelType::ValuePercentage),
            "50 (25.00%)"
        );
        assert_eq!(
            format_label(&bar("-5", Some(-0.025)), LabelType::ValuePercentage),
            "-5 (-2.50%)"
        );
    }

    #[test]
    fn percentage_policy_falls_back_without_share() {
        assert_eq!(format_label(&bar("7", None), LabelType::ValuePercentage), "7");
        assert_eq!(format_label(&bar("7", Some(0.0)), LabelType::ValuePercentage), "7");
    }

    #[test]
    fn unknown_policy_is_empty() {
        assert_eq!(format_label(&bar("7", Some(0.5)), LabelType::Unknown), "");
    }
}
