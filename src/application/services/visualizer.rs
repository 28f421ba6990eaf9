//! Tree visualizer: sole owner of collapse state
//!
//! Every state change goes through `dispatch`, which re-runs the layout before
//! returning. The stored layout therefore always matches the current collapsed set.

use termtree::Tree as TermTree;
use tracing::{debug, instrument, warn};

use crate::domain::{
    compute_layout, CollapseCommand, CollapsedSet, FlowDocument, Layout, LayoutConfig,
    RenderStyle, ToOutline, Tree,
};

#[derive(Debug)]
pub struct TreeVisualizer {
    tree: Tree,
    collapsed: CollapsedSet,
    config: LayoutConfig,
    layout: Layout,
}

impl TreeVisualizer {
    /// Start fully expanded.
    pub fn new(tree: Tree, config: LayoutConfig) -> Self {
        Self::with_collapsed(tree, config, CollapsedSet::new())
    }

    pub fn with_collapsed(tree: Tree, config: LayoutConfig, collapsed: CollapsedSet) -> Self {
        let layout = compute_layout(&tree, &collapsed, &config);
        Self {
            tree,
            collapsed,
            config,
            layout,
        }
    }

    /// Apply a command and recompute the layout.
    #[instrument(level = "debug", skip(self, command), fields(command = %command))]
    pub fn dispatch(&mut self, command: CollapseCommand) -> &Layout {
        if let CollapseCommand::Toggle { id } = &command {
            if !self.tree.contains(id) {
                warn!("toggle of unknown node id: {}", id);
            }
        }

        self.collapsed.apply(&command, &self.tree);
        self.layout = compute_layout(&self.tree, &self.collapsed, &self.config);
        debug!(
            "{} collapsed, {} visible nodes",
            self.collapsed.len(),
            self.layout.nodes.len()
        );
        &self.layout
    }

    pub fn toggle(&mut self, id: &str) -> &Layout {
        self.dispatch(CollapseCommand::toggle(id))
    }

    pub fn expand_all(&mut self) -> &Layout {
        self.dispatch(CollapseCommand::ExpandAll)
    }

    pub fn collapse_all(&mut self) -> &Layout {
        self.dispatch(CollapseCommand::CollapseAll)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn collapsed(&self) -> &CollapsedSet {
        &self.collapsed
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn document(&self, style: &RenderStyle) -> FlowDocument {
        FlowDocument::from_layout(&self.layout, style)
    }

    pub fn outline(&self) -> TermTree<String> {
        self.tree.to_outline(&self.collapsed)
    }
}
