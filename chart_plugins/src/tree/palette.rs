use indexmap::IndexMap;

use crate::config::{ColorOverride, DEFAULT_COLOR_RANGE, TreeConfig};
use crate::tree::nest::TreeNode;

/// Colours tree nodes: explicit overrides first, then an ordinal scale over
/// the configured palette.
///
/// The ordinal scale hands out palette entries in the order keys are first
/// seen and wraps around, so the same `(dimension, key)` always gets the same
/// colour within one palette instance.
#[derive(Debug, Clone)]
pub struct NodePalette {
    overrides: Vec<ColorOverride>,
    range: Vec<String>,
    assigned: IndexMap<String, usize>,
}

impl NodePalette {
    /// Palette from tree options.
    pub fn new(cfg: &TreeConfig) -> Self {
        Self {
            overrides: cfg.color_overrides.clone(),
            range: cfg.color_range.clone(),
            assigned: IndexMap::new(),
        }
    }

    /// Colour for the node `key` of `dimension`.
    pub fn color(&mut self, dimension: Option<&str>, key: &str) -> String {
        let hit = dimension.and_then(|dim| {
            self.overrides
                .iter()
                .find(|o| dim.ends_with(&o.dimension_name) && o.dimension_value == key)
        });
        if let Some(hit) = hit {
            return hit.color_code.clone();
        }
        self.ordinal(&format!("{}.{key}", dimension.unwrap_or_default()))
    }

    fn ordinal(&mut self, scale_key: &str) -> String {
        if self.range.is_empty() {
            return DEFAULT_COLOR_RANGE[0].to_string();
        }
        let next = self.assigned.len();
        let slot = *self.assigned.entry(scale_key.to_string()).or_insert(next);
        self.range[slot % self.range.len()].clone()
    }
}

/// Assign a colour to `node` and all of its descendants.
pub fn paint(node: &mut TreeNode, palette: &mut NodePalette) {
    node.color = Some(palette.color(node.dimension.as_deref(), &node.key));
    for child in &mut node.children {
        paint(child, palette);
    }
}
