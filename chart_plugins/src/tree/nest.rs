use indexmap::IndexMap;
use serde::Serialize;

use crate::fields::Field;
use crate::format::compact;
use crate::table::Row;
use crate::waterfall::LABEL_PLACEHOLDER;

/// Key of the synthetic root node.
pub const ROOT_KEY: &str = "Overall";

/// Labels longer than this are trimmed.
pub const MAX_LABEL_CHARS: usize = 20;

/// One node of the weighted tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    /// Dimension value this node stands for (`"Overall"` for the root).
    pub key: String,
    /// Name of the dimension the key belongs to; `None` for the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    /// Key trimmed to [`MAX_LABEL_CHARS`] for display.
    pub label: String,
    /// Leaf: the row's measure value. Branch: sum of its children.
    pub value: f64,
    /// Hover text: full key and compact value.
    pub data_tip: String,
    /// Assigned by [`crate::tree::paint`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Child nodes, in first-appearance order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Leaf node carrying one row's value.
    pub fn leaf(key: impl Into<String>, dimension: Option<String>, value: f64) -> Self {
        let key = key.into();
        Self {
            label: trim_label(&key),
            data_tip: format!("{key}: {}", compact(value)),
            key,
            dimension,
            value,
            color: None,
            children: Vec::new(),
        }
    }

    /// Branch node whose value is the sum of `children`.
    pub fn branch(key: impl Into<String>, dimension: Option<String>, children: Vec<TreeNode>) -> Self {
        let value = children.iter().map(|c| c.value).sum();
        Self {
            children,
            ..Self::leaf(key, dimension, value)
        }
    }

    /// True when the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of leaves below (or at) this node.
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(TreeNode::leaf_count).sum()
        }
    }
}

/// Group `rows` by each dimension but the last, recursively; the rows
/// themselves become leaves keyed by the last dimension.
pub fn nest_tree(dimensions: &[Field], rows: &[&Row], measure: &Field) -> Vec<TreeNode> {
    match dimensions {
        [dimension, rest @ ..] if !rest.is_empty() => {
            let mut groups: IndexMap<Option<&str>, Vec<&Row>> = IndexMap::new();
            for row in rows {
                groups.entry(raw_value(row, dimension)).or_default().push(*row);
            }
            groups
                .into_iter()
                .map(|(raw, members)| {
                    TreeNode::branch(
                        raw.unwrap_or(LABEL_PLACEHOLDER),
                        Some(dimension.name.clone()),
                        nest_tree(rest, &members, measure),
                    )
                })
                .collect()
        }
        _ => {
            let category = dimensions.last();
            rows.iter()
                .map(|row| {
                    TreeNode::leaf(
                        category
                            .and_then(|c| raw_value(row, c))
                            .unwrap_or(LABEL_PLACEHOLDER),
                        category.map(|c| c.name.clone()),
                        row.measure_value(measure).unwrap_or(0.0),
                    )
                })
                .collect()
        }
    }
}

// Rows group by the raw value: null, "" and a literal "(empty)" are three
// distinct groups even though null is displayed as the placeholder.
fn raw_value<'r>(row: &'r Row, dimension: &Field) -> Option<&'r str> {
    row.dimension(dimension).and_then(|c| c.value.as_deref())
}

/// Cut labels over [`MAX_LABEL_CHARS`] to 17 characters plus `...`.
pub fn trim_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL_CHARS {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 3).collect();
        format!("{head}...")
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_long_labels_only() {
        assert_eq!(trim_label("short"), "short");
        assert_eq!(trim_label("exactly twenty chars"), "exactly twenty chars");
        assert_eq!(trim_label("twenty-one characters"), "twenty-one charac...");
        assert_eq!(trim_label("ééééééééééééééééééééé").chars().count(), 20);
    }

    #[test]
    fn groups_in_first_appearance_order() {
        let dims = vec![Field::new("region", "Region"), Field::new("city", "City")];
        let measure = Field::new("sales", "Sales");
        let rows = [
            Row::new().dim("region", "West").dim("city", "LA").measure("sales", 3.0),
            Row::new().dim("region", "East").dim("city", "NYC").measure("sales", 5.0),
            Row::new().dim("region", "West").dim("city", "SF").measure("sales", 2.0),
        ];
        let refs: Vec<&Row> = rows.iter().collect();
        let nodes = nest_tree(&dims, &refs, &measure);

        let keys: Vec<_> = nodes.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["West", "East"]);
        assert_eq!(nodes[0].value, 5.0);
        assert_eq!(nodes[0].dimension.as_deref(), Some("region"));
        let leaves: Vec<_> = nodes[0].children.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(leaves, vec!["LA", "SF"]);
        assert_eq!(nodes[0].children[0].dimension.as_deref(), Some("city"));
        assert_eq!(nodes[1].leaf_count(), 1);
    }

    #[test]
    fn nodes_carry_trimmed_label_and_data_tip() {
        let node = TreeNode::leaf("Los Angeles International", Some("city".into()), 15_300.0);
        assert_eq!(node.label, "Los Angeles Inter...");
        assert_eq!(node.data_tip, "Los Angeles International: 15K");

        let branch = TreeNode::branch("West", None, vec![node, TreeNode::leaf("SF", None, 700.0)]);
        assert_eq!(branch.label, "West");
        assert_eq!(branch.data_tip, "West: 16K");
    }

    #[test]
    fn null_and_empty_values_group_apart() {
        let dims = vec![Field::new("region", "Region"), Field::new("city", "City")];
        let measure = Field::new("sales", "Sales");
        let mut null_region = Row::new().dim("city", "A").measure("sales", 1.0);
        null_region.insert(
            "region",
            crate::table::Cell::Dimension(crate::table::DimensionCell { value: None }),
        );
        let rows = [
            null_region,
            Row::new().dim("region", "").dim("city", "B").measure("sales", 2.0),
            Row::new().dim("region", LABEL_PLACEHOLDER).dim("city", "C").measure("sales", 4.0),
            Row::new().dim("city", "D").measure("sales", 8.0),
        ];
        let refs: Vec<&Row> = rows.iter().collect();
        let nodes = nest_tree(&dims, &refs, &measure);

        let groups: Vec<_> = nodes.iter().map(|n| (n.key.as_str(), n.value)).collect();
        assert_eq!(
            groups,
            vec![(LABEL_PLACEHOLDER, 9.0), ("", 2.0), (LABEL_PLACEHOLDER, 4.0)]
        );
    }
}
