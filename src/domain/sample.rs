//! Built-in sample tree.

use crate::domain::tree::TreeSpec;

/// Root with three branches of two, two and three leaves.
pub fn sample_tree() -> TreeSpec {
    TreeSpec::branch(
        "root",
        "Root",
        vec![
            TreeSpec::branch(
                "a",
                "Node A",
                vec![
                    TreeSpec::leaf("a1", "Node A1"),
                    TreeSpec::leaf("a2", "Node A2"),
                ],
            ),
            TreeSpec::branch(
                "b",
                "Node B",
                vec![
                    TreeSpec::leaf("b1", "Node B1"),
                    TreeSpec::leaf("b2", "Node B2"),
                ],
            ),
            TreeSpec::branch(
                "c",
                "Node C",
                vec![
                    TreeSpec::leaf("c1", "Node C1"),
                    TreeSpec::leaf("c2", "Node C2"),
                    TreeSpec::leaf("c3", "Node C3"),
                ],
            ),
        ],
    )
}
