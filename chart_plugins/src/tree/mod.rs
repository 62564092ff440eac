//! Weighted-tree data transform.
//!
//! Rows are nested under a synthetic `"Overall"` root: one level per
//! dimension except the last, grouping rows that share a value (in the order
//! values first appear). The rows themselves are the leaves, keyed by the
//! last ("category") dimension and weighted by the single measure. A branch
//! weighs the sum of its children, so the root carries the measure's total.
//!
//! Colours come from [`NodePalette`]; labels are trimmed with [`trim_label`]
//! and data tips use [`crate::format::compact`].

mod nest;
mod palette;

use tracing::debug;

pub use nest::{MAX_LABEL_CHARS, ROOT_KEY, TreeNode, nest_tree, trim_label};
pub use palette::{NodePalette, paint};

use crate::config::TreeConfig;
use crate::fields::QueryFields;
use crate::table::{Row, Table};

/// Build the (uncoloured) tree. `None` when the query has no measure.
pub fn build_tree(fields: &QueryFields, table: &Table) -> Option<TreeNode> {
    let measure = fields.measure_like.first()?;
    let rows: Vec<&Row> = table.rows().iter().collect();
    let root = TreeNode::branch(
        ROOT_KEY,
        None,
        nest_tree(&fields.dimension_like, &rows, measure),
    );
    debug!(
        leaves = root.leaf_count(),
        depth = fields.dimension_like.len(),
        "nested weighted tree"
    );
    Some(root)
}

/// Build the tree and colour every node.
pub fn build_colored_tree(fields: &QueryFields, table: &Table, cfg: &TreeConfig) -> Option<TreeNode> {
    let mut root = build_tree(fields, table)?;
    let mut palette = NodePalette::new(cfg);
    paint(&mut root, &mut palette);
    Some(root)
}
