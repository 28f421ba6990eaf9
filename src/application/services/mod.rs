//! Application services
//!
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod tree_source;
mod visualizer;

pub use tree_source::{TreeFormat, TreeService};
pub use visualizer::TreeVisualizer;
