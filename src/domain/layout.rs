//! Subtree-width tree layout.
//!
//! Every visible node gets a horizontal band proportional to the number of leaf
//! columns its visible subtree occupies, and is centred over that band. Depth
//! maps directly to `y`. Collapsed nodes count as a single column and their
//! descendants are left out of the pass entirely.

use std::collections::HashMap;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::collapse::CollapsedSet;
use crate::domain::tree::Tree;

pub const DEFAULT_HORIZONTAL_SPACING: f64 = 200.0;
pub const DEFAULT_VERTICAL_SPACING: f64 = 120.0;

/// Spacing between sibling columns and between depth levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: DEFAULT_HORIZONTAL_SPACING,
            vertical_spacing: DEFAULT_VERTICAL_SPACING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A visible node with its absolute position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: String,
    pub position: Position,
    pub label: String,
    pub has_children: bool,
    pub collapsed: bool,
    /// Root is 0
    pub depth: usize,
    /// Leaf columns occupied by the visible subtree (always >= 1)
    pub span: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl LayoutEdge {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            id: format!("{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// Result of one layout pass. Nodes are in pre-order; edges in the order their
/// target was visited.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Lay out the part of `tree` visible under `collapsed`.
///
/// Pure: the same inputs always produce an identical `Layout`.
#[instrument(level = "debug", skip_all, fields(tree_nodes = tree.len(), collapsed = collapsed.len()))]
pub fn compute_layout(tree: &Tree, collapsed: &CollapsedSet, config: &LayoutConfig) -> Layout {
    let mut pass = LayoutPass {
        tree,
        collapsed,
        config,
        widths: HashMap::new(),
        layout: Layout::default(),
    };

    if let Some(root) = tree.root() {
        pass.place(root, 0, 0.0, None);
    }

    debug!(
        "layout pass: {} nodes, {} edges",
        pass.layout.nodes.len(),
        pass.layout.edges.len()
    );
    pass.layout
}

struct LayoutPass<'a> {
    tree: &'a Tree,
    collapsed: &'a CollapsedSet,
    config: &'a LayoutConfig,
    /// Subtree widths, valid for this pass only
    widths: HashMap<Index, usize>,
    layout: Layout,
}

impl<'a> LayoutPass<'a> {
    fn subtree_width(&mut self, idx: Index) -> usize {
        if let Some(&width) = self.widths.get(&idx) {
            return width;
        }
        let tree = self.tree;
        let width: usize = match tree.get_node(idx) {
            Some(node) if node.has_children() && !self.collapsed.contains(&node.data.id) => node
                .children
                .iter()
                .map(|&child| self.subtree_width(child))
                .sum(),
            _ => 1,
        };
        self.widths.insert(idx, width);
        width
    }

    fn place(&mut self, idx: Index, depth: usize, left_offset: f64, parent: Option<&'a str>) {
        let tree = self.tree;
        let Some(node) = tree.get_node(idx) else {
            return;
        };

        let span = self.subtree_width(idx);
        let horizontal = self.config.horizontal_spacing;
        let collapsed = self.collapsed.contains(&node.data.id);

        self.layout.nodes.push(LayoutNode {
            id: node.data.id.clone(),
            position: Position {
                x: left_offset + span as f64 * horizontal / 2.0,
                y: depth as f64 * self.config.vertical_spacing,
            },
            label: node.data.label.clone(),
            has_children: node.has_children(),
            collapsed,
            depth,
            span,
        });

        if let Some(parent_id) = parent {
            self.layout.edges.push(LayoutEdge::new(parent_id, &node.data.id));
        }

        if collapsed {
            return;
        }

        let mut child_offset = left_offset;
        for &child in &node.children {
            let child_width = self.subtree_width(child);
            self.place(child, depth + 1, child_offset, Some(node.data.id.as_str()));
            child_offset += child_width as f64 * horizontal;
        }
    }
}
