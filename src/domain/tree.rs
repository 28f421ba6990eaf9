//! Arena-backed tree model and its nested input form.

use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

/// Nested tree document as supplied by the user (JSON or TOML).
///
/// `children` may be omitted for leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSpec>,
}

impl TreeSpec {
    pub fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(
        id: impl Into<String>,
        label: impl Into<String>,
        children: Vec<TreeSpec>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children,
        }
    }
}

/// Data payload for tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Unique node identifier
    pub id: String,
    /// Display label
    pub label: String,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.label, self.id)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in display order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Arena-based tree with an id lookup.
///
/// Node ids are unique and non-empty; `insert_node` enforces both, so a `Tree`
/// built through it is always well formed.
#[derive(Debug)]
pub struct Tree {
    arena: Arena<TreeNode>,
    root: Option<Index>,
    ids: HashMap<String, Index>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            ids: HashMap::new(),
        }
    }

    /// Build and validate a tree from its nested form.
    ///
    /// Children keep their input order. Fails on the first duplicate or empty id.
    #[instrument(level = "debug", skip(spec), fields(root = %spec.id))]
    pub fn from_spec(spec: &TreeSpec) -> DomainResult<Self> {
        let mut tree = Tree::new();
        let mut stack: Vec<(&TreeSpec, Option<Index>)> = vec![(spec, None)];

        while let Some((current, parent_idx)) = stack.pop() {
            let data = NodeData {
                id: current.id.clone(),
                label: current.label.clone(),
            };
            let current_idx = tree.insert_node(data, parent_idx)?;

            // Reverse so children pop (and get inserted) left to right
            for child in current.children.iter().rev() {
                stack.push((child, Some(current_idx)));
            }
        }

        debug!("built tree with {} nodes", tree.len());
        Ok(tree)
    }

    /// Insert a node below `parent`, or as the root when `parent` is None.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> DomainResult<Index> {
        if data.id.trim().is_empty() {
            return Err(DomainError::EmptyId { label: data.label });
        }
        if self.ids.contains_key(&data.id) {
            return Err(DomainError::DuplicateId(data.id));
        }

        let id = data.id.clone();
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);
        self.ids.insert(id, node_idx);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        Ok(node_idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// Look up a node index by id.
    pub fn find(&self, id: &str) -> Option<Index> {
        self.ids.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Depth-first pre-order iteration, children left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of levels in the tree (root only = 1, empty = 0).
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Ids of all leaf nodes, in pre-order.
    pub fn leaf_ids(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| !node.has_children())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }

    /// Ids of every node below the root that has at least one child.
    ///
    /// This is the set "collapse all" hides; the root is never part of it.
    pub fn branch_ids_below_root(&self) -> Vec<String> {
        self.iter()
            .filter(|(idx, node)| Some(*idx) != self.root && node.has_children())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }

    /// Count of all nodes strictly below `idx`.
    pub fn descendant_count(&self, idx: Index) -> usize {
        self.get_node(idx)
            .map(|node| {
                node.children
                    .iter()
                    .map(|&child| 1 + self.descendant_count(child))
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Convert back to the nested form.
    pub fn to_spec(&self) -> Option<TreeSpec> {
        self.root.and_then(|root| self.spec_at(root))
    }

    fn spec_at(&self, idx: Index) -> Option<TreeSpec> {
        let node = self.get_node(idx)?;
        Some(TreeSpec {
            id: node.data.id.clone(),
            label: node.data.label.clone(),
            children: node
                .children
                .iter()
                .filter_map(|&child| self.spec_at(child))
                .collect(),
        })
    }
}

pub struct TreeIterator<'a> {
    tree: &'a Tree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample_tree;
    use rstest::rstest;

    #[test]
    fn given_sample_spec_when_building_then_preserves_preorder() {
        let tree = Tree::from_spec(&sample_tree()).unwrap();

        let ids: Vec<_> = tree.iter().map(|(_, n)| n.data.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["root", "a", "a1", "a2", "b", "b1", "b2", "c", "c1", "c2", "c3"]
        );
        assert_eq!(tree.len(), 11);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn given_sample_tree_when_querying_branches_then_root_and_leaves_are_excluded() {
        let tree = Tree::from_spec(&sample_tree()).unwrap();

        assert_eq!(tree.branch_ids_below_root(), vec!["a", "b", "c"]);
        assert_eq!(
            tree.leaf_ids(),
            vec!["a1", "a2", "b1", "b2", "c1", "c2", "c3"]
        );
    }

    #[test]
    fn given_duplicate_id_when_building_then_rejects() {
        let spec = TreeSpec::branch(
            "root",
            "Root",
            vec![
                TreeSpec::branch("a", "A", vec![TreeSpec::leaf("x", "X")]),
                TreeSpec::branch("b", "B", vec![TreeSpec::leaf("x", "X again")]),
            ],
        );

        let err = Tree::from_spec(&spec).unwrap_err();
        assert_eq!(err, DomainError::DuplicateId("x".to_string()));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn given_blank_id_when_building_then_rejects(#[case] id: &str) {
        let spec = TreeSpec::branch("root", "Root", vec![TreeSpec::leaf(id, "Nameless")]);

        let err = Tree::from_spec(&spec).unwrap_err();
        assert!(matches!(err, DomainError::EmptyId { .. }));
    }

    #[test]
    fn given_node_when_counting_descendants_then_counts_whole_subtree() {
        let tree = Tree::from_spec(&sample_tree()).unwrap();

        assert_eq!(tree.descendant_count(tree.root().unwrap()), 10);
        assert_eq!(tree.descendant_count(tree.find("c").unwrap()), 3);
        assert_eq!(tree.descendant_count(tree.find("c1").unwrap()), 0);
    }

    #[test]
    fn given_tree_when_converting_to_spec_then_round_trips_structure() {
        let spec = sample_tree();
        let tree = Tree::from_spec(&spec).unwrap();

        assert_eq!(tree.to_spec(), Some(spec));
    }

    #[test]
    fn given_empty_tree_then_has_no_root_and_zero_depth() {
        let tree = Tree::default();

        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.iter().count(), 0);
    }
}
