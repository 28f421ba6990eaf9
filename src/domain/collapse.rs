//! Collapse state: which nodes have their children hidden.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use crate::domain::error::DomainError;
use crate::domain::tree::Tree;

/// Set of collapsed node ids.
///
/// Ids need not exist in the tree; unknown ids never match a node and so have no effect
/// on layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollapsedSet(BTreeSet<String>);

impl CollapsedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Flip membership of `id`. Returns true if the node is now collapsed.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.to_string());
            true
        }
    }

    /// Expand everything.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Replace the set with every non-root node that has children.
    pub fn collapse_all(&mut self, tree: &Tree) {
        self.0 = tree.branch_ids_below_root().into_iter().collect();
    }

    /// Apply one store command.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn apply(&mut self, command: &CollapseCommand, tree: &Tree) {
        match command {
            CollapseCommand::Toggle { id } => {
                let collapsed = self.toggle(id);
                trace!(id = %id, collapsed, "toggled");
            }
            CollapseCommand::ExpandAll => self.clear(),
            CollapseCommand::CollapseAll => self.collapse_all(tree),
        }
    }
}

impl FromIterator<String> for CollapsedSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The only ways collapse state can change.
///
/// Render payloads carry a `Toggle` per expandable node instead of a callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum CollapseCommand {
    Toggle { id: String },
    ExpandAll,
    CollapseAll,
}

impl CollapseCommand {
    pub fn toggle(id: impl Into<String>) -> Self {
        Self::Toggle { id: id.into() }
    }
}

impl fmt::Display for CollapseCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollapseCommand::Toggle { id } => write!(f, "toggle {}", id),
            CollapseCommand::ExpandAll => write!(f, "expand-all"),
            CollapseCommand::CollapseAll => write!(f, "collapse-all"),
        }
    }
}

/// Accepts `toggle <id>`, `toggle:<id>`, `expand-all` and `collapse-all`
/// (keywords are case-insensitive, `_` works in place of `-`).
impl FromStr for CollapseCommand {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (keyword, rest) = match trimmed.split_once(|c: char| c == ':' || c.is_whitespace()) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (trimmed, ""),
        };

        match keyword.to_ascii_lowercase().replace('_', "-").as_str() {
            "toggle" if !rest.is_empty() => Ok(CollapseCommand::toggle(rest)),
            "expand-all" if rest.is_empty() => Ok(CollapseCommand::ExpandAll),
            "collapse-all" if rest.is_empty() => Ok(CollapseCommand::CollapseAll),
            _ => Err(DomainError::InvalidCommand(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample_tree;
    use rstest::{fixture, rstest};

    #[fixture]
    fn tree() -> Tree {
        Tree::from_spec(&sample_tree()).unwrap()
    }

    #[rstest]
    #[case(&[])]
    #[case(&["a"])]
    #[case(&["a", "c", "ghost"])]
    fn given_any_set_when_toggling_twice_then_set_is_unchanged(#[case] initial: &[&str]) {
        let mut set: CollapsedSet = initial.iter().map(|s| s.to_string()).collect();
        let before = set.clone();

        for id in ["a", "b", "ghost"] {
            set.toggle(id);
            set.toggle(id);
            assert_eq!(set, before);
        }
    }

    #[test]
    fn given_empty_set_when_toggling_then_reports_new_state() {
        let mut set = CollapsedSet::new();

        assert!(set.toggle("c"));
        assert!(set.contains("c"));
        assert!(!set.toggle("c"));
        assert!(set.is_empty());
    }

    #[rstest]
    fn given_sample_tree_when_collapsing_all_then_only_inner_non_root_nodes(tree: Tree) {
        let mut set = CollapsedSet::new();
        set.toggle("a1");

        set.apply(&CollapseCommand::CollapseAll, &tree);

        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(!set.contains("root"));
        for leaf in tree.leaf_ids() {
            assert!(!set.contains(&leaf), "leaf {} must not be collapsed", leaf);
        }
    }

    #[rstest]
    fn given_collapsed_nodes_when_expanding_all_then_set_is_empty(tree: Tree) {
        let mut set: CollapsedSet = ["a", "root", "zzz"].iter().map(|s| s.to_string()).collect();

        set.apply(&CollapseCommand::ExpandAll, &tree);

        assert!(set.is_empty());
    }

    #[rstest]
    #[case("toggle c", CollapseCommand::toggle("c"))]
    #[case("toggle:c", CollapseCommand::toggle("c"))]
    #[case("  TOGGLE   node-7 ", CollapseCommand::toggle("node-7"))]
    #[case("expand-all", CollapseCommand::ExpandAll)]
    #[case("expand_all", CollapseCommand::ExpandAll)]
    #[case("Collapse-All", CollapseCommand::CollapseAll)]
    fn given_valid_text_when_parsing_then_returns_command(
        #[case] input: &str,
        #[case] expected: CollapseCommand,
    ) {
        assert_eq!(input.parse::<CollapseCommand>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("toggle")]
    #[case("expand-all now")]
    #[case("collapse")]
    fn given_invalid_text_when_parsing_then_fails(#[case] input: &str) {
        assert!(matches!(
            input.parse::<CollapseCommand>(),
            Err(DomainError::InvalidCommand(_))
        ));
    }

    #[test]
    fn given_toggle_command_when_serializing_then_is_tagged_with_id() {
        let json = serde_json::to_value(CollapseCommand::toggle("b")).unwrap();

        assert_eq!(json, serde_json::json!({"command": "toggle", "id": "b"}));
    }
}
