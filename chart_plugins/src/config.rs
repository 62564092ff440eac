//! Chart configuration: typed options, defaults, and loading.
//!
//! The host hands every update a JSON object of option values; keys the user
//! never touched are missing or `null`. Both cases fall back to the option
//! defaults declared here (which also back the option list in
//! [`crate::chart::ChartDefinition`]). Unknown keys are ignored, since the host
//! mixes its own settings into the same object.
//!
//! Entrypoints:
//! - From the host payload: [`from_host_json`]
//! - From a TOML string / file (CLI): [`load_config_str`], [`load_config_path`]

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::waterfall::LabelType;

/// Default palette offered by both charts.
pub const DEFAULT_COLOR_RANGE: [&str; 8] = [
    "#dd3333", "#80ce5d", "#f78131", "#369dc1", "#c572d3", "#36c1b3", "#b57052", "#ed69af",
];

/// Which values make up the denominator of a bar's `percent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentBasis {
    /// Sum of the delta column plus the baseline column.
    #[default]
    IncludeBaseline,
    /// Sum of the delta column only.
    DeltaOnly,
}

/// Waterfall options.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WaterfallConfig {
    /// Bar label policy.
    #[serde(deserialize_with = "nullable")]
    pub label_type: LabelType,
    /// Draw horizontal gridlines.
    #[serde(deserialize_with = "nullable_or_true")]
    pub show_gridlines: bool,
    /// Draw connector lines between consecutive bars.
    #[serde(deserialize_with = "nullable_or_true")]
    pub show_lines_between_blocks: bool,
    /// Plot rows whose delta is null (as a zero-height bar).
    #[serde(deserialize_with = "nullable_or_true")]
    pub show_null_points: bool,
    /// Draw value labels on bars.
    #[serde(deserialize_with = "nullable_or_true")]
    pub value_labels: bool,
    /// Palette.
    #[serde(deserialize_with = "nullable_color_range")]
    pub color_range: Vec<String>,
    /// Baseline = sum of the baseline column (true) or its first row (false).
    #[serde(deserialize_with = "nullable")]
    pub sum_for_baseline: bool,
    /// Colour of the synthetic baseline bar.
    pub baseline_color: Option<String>,
    /// Colour of the synthetic Total bar.
    pub total_color: Option<String>,
    /// Denominator policy for `percent`.
    #[serde(deserialize_with = "nullable")]
    pub percent_basis: PercentBasis,
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        Self {
            label_type: LabelType::default(),
            show_gridlines: true,
            show_lines_between_blocks: true,
            show_null_points: true,
            value_labels: true,
            color_range: default_color_range(),
            sum_for_baseline: false,
            baseline_color: None,
            total_color: None,
            percent_basis: PercentBasis::default(),
        }
    }
}

/// Explicit colour for one dimension value in the weighted tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColorOverride {
    /// Matched as a suffix of the node's dimension name (`orders.region` ends with `region`).
    pub dimension_name: String,
    /// Exact dimension value.
    pub dimension_value: String,
    /// CSS colour.
    pub color_code: String,
}

/// Weighted-tree options.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Palette for nodes without an override.
    #[serde(deserialize_with = "nullable_color_range")]
    pub color_range: Vec<String>,
    /// Fixed colours for specific dimension values.
    #[serde(deserialize_with = "nullable")]
    pub color_overrides: Vec<ColorOverride>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            color_range: default_color_range(),
            color_overrides: Vec::new(),
        }
    }
}

fn default_color_range() -> Vec<String> {
    DEFAULT_COLOR_RANGE.iter().map(|c| c.to_string()).collect()
}

fn nullable<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

fn nullable_or_true<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Option::<bool>::deserialize(d).map(|b| b.unwrap_or(true))
}

// An empty palette is as good as none.
fn nullable_color_range<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Option::<Vec<String>>::deserialize(d).map(|v| match v {
        Some(v) if !v.is_empty() => v,
        _ => default_color_range(),
    })
}

/// Parse the host's option object.
pub fn from_host_json<T: DeserializeOwned>(value: &serde_json::Value) -> anyhow::Result<T> {
    if value.is_null() {
        return serde_json::from_value(serde_json::Value::Object(Default::default()))
            .context("failed to apply option defaults");
    }
    T::deserialize(value).context("failed to parse chart options")
}

/// Parse chart options from a TOML string.
pub fn load_config_str<T: DeserializeOwned>(toml_str: &str) -> anyhow::Result<T> {
    toml::from_str(toml_str).context("failed to parse chart config TOML")
}

/// Read a TOML config file from disk and parse it.
///
/// See [`load_config_str`].
pub fn load_config_path<T: DeserializeOwned>(
    path: impl AsRef<std::path::Path>,
) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read chart config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
