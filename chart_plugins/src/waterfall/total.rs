use crate::config::WaterfallConfig;
use crate::format::humanize;
use crate::waterfall::bar::{Bar, BarClass, BarKind, TOTAL_LABEL};
use crate::waterfall::classify::ChartShape;

/// Append the synthetic Total bar when the chart shape calls for one.
pub fn inject_total(
    bars: &mut Vec<Bar>,
    shape: &ChartShape<'_>,
    cumulative: f64,
    cfg: &WaterfallConfig,
) {
    if !shape.displays_total() {
        return;
    }
    bars.push(Bar {
        name: TOTAL_LABEL.to_string(),
        value: cumulative,
        start: Some(0.0),
        end: Some(cumulative),
        rendered: humanize(cumulative, 2),
        percent: None,
        tooltip_label: TOTAL_LABEL.to_string(),
        class: BarClass::Total,
        kind: BarKind::Total,
        color: cfg.total_color.clone(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Field, QueryFields};
    use crate::waterfall::classify::classify;

    #[test]
    fn appends_total_last() {
        let f = QueryFields::new(vec![Field::new("d", "D")], vec![Field::new("m", "M")]);
        let shape = classify(&f).unwrap();
        let cfg = WaterfallConfig {
            total_color: Some("steelblue".into()),
            ..Default::default()
        };
        let mut bars = Vec::new();
        inject_total(&mut bars, &shape, 2500.0, &cfg);
        let total = bars.last().unwrap();
        assert_eq!(total.name, "Total");
        assert_eq!(total.class, BarClass::Total);
        assert_eq!((total.start, total.end), (Some(0.0), Some(2500.0)));
        assert_eq!(total.rendered, "2.50 K");
        assert_eq!(total.color.as_deref(), Some("steelblue"));
    }

    #[test]
    fn no_total_without_dimensions() {
        let f = QueryFields::new(vec![], vec![Field::new("m", "M")]);
        let shape = classify(&f).unwrap();
        let mut bars = Vec::new();
        inject_total(&mut bars, &shape, 10.0, &WaterfallConfig::default());
        assert!(bars.is_empty());
    }
}
