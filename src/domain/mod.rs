//! Domain layer: tree model, collapse state and layout
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod collapse;
pub mod error;
pub mod layout;
pub mod outline;
pub mod render;
pub mod sample;
pub mod tree;

pub use collapse::{CollapseCommand, CollapsedSet};
pub use error::{DomainError, DomainResult};
pub use layout::{compute_layout, Layout, LayoutConfig, LayoutEdge, LayoutNode, Position};
pub use outline::ToOutline;
pub use render::{FlowDocument, RenderStyle};
pub use sample::sample_tree;
pub use tree::{NodeData, Tree, TreeNode, TreeSpec};
