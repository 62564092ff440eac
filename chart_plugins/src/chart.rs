//! Chart definitions and the explicit registry the host integration talks to.
//!
//! Each chart is a self-contained value built by a factory
//! ([`WaterfallChart::new`], [`WeightedTreeChart::new`]) and handed to
//! [`Registry::register`]; nothing registers itself on load.
//!
//! One update cycle is [`Visualization::update`]:
//! 1. validate the query shape against the chart's [`QueryBounds`];
//! 2. type the host rows ([`Table::from_json`]);
//! 3. parse options (missing / `null` -> defaults);
//! 4. run the chart's transform.
//!
//! A failure at any step aborts the cycle and nothing should be drawn.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{DEFAULT_COLOR_RANGE, TreeConfig, WaterfallConfig, from_host_json};
use crate::fields::QueryFields;
use crate::table::{DataError, Table};
use crate::tree::{TreeNode, build_colored_tree};
use crate::validate::{QueryBounds, ValidationError, validate};
use crate::waterfall::{Bar, compute_bars, format_label, value_domain};

/// Everything that can abort an update cycle.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The query shape is outside the chart's bounds.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The rows could not be typed.
    #[error(transparent)]
    Data(#[from] DataError),
    /// The option object could not be parsed.
    #[error(transparent)]
    Options(#[from] anyhow::Error),
    /// No chart with this id is registered.
    #[error("unknown chart: {0}")]
    UnknownChart(String),
    /// A chart with this id is already registered.
    #[error("chart already registered: {0}")]
    AlreadyRegistered(String),
}

/// Kind of editor the host shows for an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Checkbox.
    Boolean,
    /// Select box.
    Select,
    /// Colour list editor.
    Colors,
}

/// One user-facing option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSpec {
    /// Option key in the config object.
    pub id: &'static str,
    /// Label shown by the host.
    pub label: &'static str,
    /// Editor kind.
    pub kind: OptionKind,
    /// Default value.
    pub default: Value,
    /// `(label, value)` choices for [`OptionKind::Select`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<(&'static str, &'static str)>,
}

impl OptionSpec {
    fn boolean(id: &'static str, label: &'static str, default: bool) -> Self {
        Self {
            id,
            label,
            kind: OptionKind::Boolean,
            default: Value::Bool(default),
            values: Vec::new(),
        }
    }

    fn colors() -> Self {
        Self {
            id: "color_range",
            label: "Color Range",
            kind: OptionKind::Colors,
            default: json!(DEFAULT_COLOR_RANGE),
            values: Vec::new(),
        }
    }
}

/// Static description of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDefinition {
    /// Stable id used for registration.
    pub id: &'static str,
    /// Human-readable name.
    pub label: &'static str,
    /// User-facing options.
    pub options: Vec<OptionSpec>,
}

/// Result of one waterfall update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallOutput {
    /// Bars in draw order.
    pub bars: Vec<Bar>,
    /// Value-axis extent.
    pub domain: (f64, f64),
    /// Parsed options, for the renderer's toggles.
    pub options: WaterfallConfig,
}

impl WaterfallOutput {
    /// Label of every bar under the active label type.
    pub fn labels(&self) -> Vec<String> {
        self.bars
            .iter()
            .map(|b| format_label(b, self.options.label_type))
            .collect()
    }
}

/// Result of one update, by chart family.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum ChartOutput {
    /// Waterfall bars.
    Waterfall(WaterfallOutput),
    /// Weighted tree root.
    WeightedTree(TreeNode),
}

/// A chart the host can drive.
pub trait Visualization {
    /// Static description.
    fn definition(&self) -> &ChartDefinition;

    /// Accepted query shape; may depend on the fields themselves.
    fn bounds(&self, fields: &QueryFields) -> QueryBounds;

    /// Transform already-typed rows.
    fn transform(
        &self,
        fields: &QueryFields,
        table: &Table,
        options: &Value,
    ) -> Result<ChartOutput, ChartError>;

    /// Run one full update cycle on raw host payloads.
    fn update(
        &self,
        fields: &QueryFields,
        data: &Value,
        options: &Value,
    ) -> Result<ChartOutput, ChartError> {
        validate(fields, &self.bounds(fields))?;
        let table = Table::from_json(data, fields)?;
        self.transform(fields, &table, options)
    }
}

/// The waterfall chart.
#[derive(Debug, Clone)]
pub struct WaterfallChart {
    definition: ChartDefinition,
}

impl WaterfallChart {
    /// Registration id.
    pub const ID: &'static str = "custom_waterfall";

    /// Build a fresh instance.
    pub fn new() -> Self {
        Self {
            definition: ChartDefinition {
                id: Self::ID,
                label: "Waterfall",
                options: vec![
                    OptionSpec::colors(),
                    OptionSpec::boolean("value_labels", "Value Labels", true),
                    OptionSpec {
                        id: "label_type",
                        label: "Label Type",
                        kind: OptionKind::Select,
                        default: json!("value"),
                        values: vec![
                            ("Value", "value"),
                            ("Value (percentage)", "value_percentage"),
                        ],
                    },
                    OptionSpec::boolean("show_gridlines", "Gridlines", true),
                    OptionSpec::boolean("show_lines_between_blocks", "Lines between blocks", true),
                    OptionSpec::boolean("show_null_points", "Plot Null Values", true),
                    OptionSpec::boolean("sum_for_baseline", "Sum baseline column", false),
                    OptionSpec {
                        id: "percent_basis",
                        label: "Percentage of",
                        kind: OptionKind::Select,
                        default: json!("include_baseline"),
                        values: vec![
                            ("Baseline and changes", "include_baseline"),
                            ("Changes only", "delta_only"),
                        ],
                    },
                ],
            },
        }
    }
}

impl Default for WaterfallChart {
    fn default() -> Self {
        Self::new()
    }
}

impl Visualization for WaterfallChart {
    fn definition(&self) -> &ChartDefinition {
        &self.definition
    }

    fn bounds(&self, fields: &QueryFields) -> QueryBounds {
        QueryBounds {
            min_pivots: Some(0),
            max_pivots: Some(0),
            min_dimensions: Some(0),
            min_measures: Some(1),
            max_measures: (!fields.dimension_like.is_empty()).then_some(2),
            ..Default::default()
        }
    }

    fn transform(
        &self,
        fields: &QueryFields,
        table: &Table,
        options: &Value,
    ) -> Result<ChartOutput, ChartError> {
        let cfg: WaterfallConfig = from_host_json(options)?;
        let bars = compute_bars(fields, table, &cfg);
        let domain = value_domain(&bars);
        Ok(ChartOutput::Waterfall(WaterfallOutput {
            bars,
            domain,
            options: cfg,
        }))
    }
}

/// The weighted-tree chart.
#[derive(Debug, Clone)]
pub struct WeightedTreeChart {
    definition: ChartDefinition,
}

impl WeightedTreeChart {
    /// Registration id.
    pub const ID: &'static str = "weighted-tree";

    /// Build a fresh instance.
    pub fn new() -> Self {
        Self {
            definition: ChartDefinition {
                id: Self::ID,
                label: "Weighted Tree",
                options: vec![OptionSpec::colors()],
            },
        }
    }
}

impl Default for WeightedTreeChart {
    fn default() -> Self {
        Self::new()
    }
}

impl Visualization for WeightedTreeChart {
    fn definition(&self) -> &ChartDefinition {
        &self.definition
    }

    fn bounds(&self, _fields: &QueryFields) -> QueryBounds {
        QueryBounds {
            min_pivots: Some(0),
            max_pivots: Some(0),
            min_dimensions: Some(2),
            max_dimensions: None,
            min_measures: Some(1),
            max_measures: Some(1),
        }
    }

    fn transform(
        &self,
        fields: &QueryFields,
        table: &Table,
        options: &Value,
    ) -> Result<ChartOutput, ChartError> {
        let cfg: TreeConfig = from_host_json(options)?;
        let root = build_colored_tree(fields, table, &cfg).ok_or(ValidationError::TooFew {
            subject: crate::validate::Subject::Measures,
            min: 1,
            got: 0,
        })?;
        Ok(ChartOutput::WeightedTree(root))
    }
}

/// Charts known to one host integration, by id.
#[derive(Default)]
pub struct Registry {
    charts: IndexMap<String, Box<dyn Visualization>>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the waterfall and weighted-tree charts.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        // ids are distinct constants, registration cannot collide
        let _ = registry.register(Box::new(WaterfallChart::new()));
        let _ = registry.register(Box::new(WeightedTreeChart::new()));
        registry
    }

    /// Add a chart. Ids must be unique.
    pub fn register(&mut self, chart: Box<dyn Visualization>) -> Result<(), ChartError> {
        let id = chart.definition().id;
        if self.charts.contains_key(id) {
            return Err(ChartError::AlreadyRegistered(id.to_string()));
        }
        info!(chart = id, "registered chart");
        self.charts.insert(id.to_string(), chart);
        Ok(())
    }

    /// Look up a chart.
    pub fn get(&self, id: &str) -> Option<&dyn Visualization> {
        self.charts.get(id).map(|c| c.as_ref())
    }

    /// Registered ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    /// Run an update cycle on the chart `id`.
    pub fn update(
        &self,
        id: &str,
        fields: &QueryFields,
        data: &Value,
        options: &Value,
    ) -> Result<ChartOutput, ChartError> {
        let chart = self
            .get(id)
            .ok_or_else(|| ChartError::UnknownChart(id.to_string()))?;
        debug!(chart = id, "update cycle");
        chart.update(fields, data, options)
    }
}
