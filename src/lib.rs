//! Collapsible tree diagrams.
//!
//! A tree plus a set of collapsed node ids is laid out into absolute node
//! positions and parent/child edges, ready for a graph canvas to draw.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

#[cfg(test)]
mod tests {
    #[ctor::ctor]
    fn init() {
        crate::util::testing::init_test_setup();
    }
}
