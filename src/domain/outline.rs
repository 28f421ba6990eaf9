//! Terminal outline of the visible tree.

use generational_arena::Index;
use termtree::Tree as TermTree;
use tracing::instrument;

use crate::domain::collapse::CollapsedSet;
use crate::domain::tree::Tree;

const EXPANDED: &str = "▼";
const COLLAPSED: &str = "▶";
const LEAF: &str = "•";

pub trait ToOutline {
    /// Render the visible part of the tree; collapsed branches show how many
    /// nodes they hide.
    fn to_outline(&self, collapsed: &CollapsedSet) -> TermTree<String>;
}

impl ToOutline for Tree {
    #[instrument(level = "debug", skip_all)]
    fn to_outline(&self, collapsed: &CollapsedSet) -> TermTree<String> {
        match self.root() {
            Some(root_idx) => outline_node(self, root_idx, collapsed),
            None => TermTree::new("(empty tree)".to_string()),
        }
    }
}

fn outline_node(tree: &Tree, idx: Index, collapsed: &CollapsedSet) -> TermTree<String> {
    let Some(node) = tree.get_node(idx) else {
        return TermTree::new(String::new());
    };

    if !node.has_children() {
        return TermTree::new(format!("{} {}", LEAF, node.data));
    }

    if collapsed.contains(&node.data.id) {
        let hidden = tree.descendant_count(idx);
        return TermTree::new(format!("{} {} ({} hidden)", COLLAPSED, node.data, hidden));
    }

    let leaves: Vec<_> = node
        .children
        .iter()
        .map(|&child| outline_node(tree, child, collapsed))
        .collect();
    TermTree::new(format!("{} {}", EXPANDED, node.data)).with_leaves(leaves)
}
