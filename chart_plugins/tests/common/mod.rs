#![allow(dead_code)]

use chart_plugins::fields::{Field, QueryFields};
use chart_plugins::table::{Row, Table};
use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::TempDir;

/// One dimension (`step`), one measure (`delta`).
pub fn step_fields() -> QueryFields {
    QueryFields::new(
        vec![Field::new("step", "Step")],
        vec![Field::new("delta", "Delta")],
    )
}

/// One row per value, named `s0`, `s1`, ...
pub fn step_table(values: &[f64]) -> Table {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| Row::new().dim("step", format!("s{i}")).measure("delta", *v))
        .collect::<Vec<_>>()
        .into()
}

/// Query export in the shape the CLI reads.
pub fn sales_export() -> Value {
    json!({
        "fields": {
            "dimension_like": [
                {"name": "region", "label": "Region"},
                {"name": "country", "label": "Country"}
            ],
            "measure_like": [
                {"name": "sales", "label": "Sales"}
            ]
        },
        "data": [
            {"region": {"value": "EMEA"}, "country": {"value": "FR"}, "sales": {"value": 40}},
            {"region": {"value": "EMEA"}, "country": {"value": "DE"}, "sales": {"value": 35}},
            {"region": {"value": "AMER"}, "country": {"value": "US"}, "sales": {"value": 25}}
        ]
    })
}

pub struct TempConfig {
    _dir: TempDir, // keep alive for the life of the test
    pub path: PathBuf,
}

/// Write `toml` to `<tmpdir>/chart.toml`.
pub fn write_config(toml: &str) -> TempConfig {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("chart.toml");
    std::fs::write(&path, toml).expect("write config");
    TempConfig { _dir: dir, path }
}
