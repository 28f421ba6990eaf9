//! Renderer-facing node/edge document.
//!
//! The graph canvas that draws the diagram wants each node tagged with a widget
//! kind and a data payload, and each edge with stroke and arrowhead styling.
//! Expandable nodes carry the `CollapseCommand` that toggles them.

use serde::{Deserialize, Serialize};

use crate::domain::collapse::CollapseCommand;
use crate::domain::layout::{Layout, LayoutEdge, LayoutNode, Position};

/// Visual settings stamped onto the render document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Widget kind the renderer uses for tree nodes
    pub node_kind: String,
    /// Edge path kind (e.g. "smoothstep", "straight")
    pub edge_kind: String,
    /// Stroke and arrowhead color
    pub accent: String,
    pub stroke_width: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            node_kind: "treeNode".into(),
            edge_kind: "smoothstep".into(),
            accent: "#60a5fa".into(),
            stroke_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNodeData {
    pub label: String,
    pub has_children: bool,
    pub collapsed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_toggle: Option<CollapseCommand>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
    pub data: FlowNodeData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    ArrowClosed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub style: EdgeStyle,
    pub marker_end: Marker,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowDocument {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowDocument {
    pub fn from_layout(layout: &Layout, style: &RenderStyle) -> Self {
        Self {
            nodes: layout.nodes.iter().map(|n| flow_node(n, style)).collect(),
            edges: layout.edges.iter().map(|e| flow_edge(e, style)).collect(),
        }
    }
}

fn flow_node(node: &LayoutNode, style: &RenderStyle) -> FlowNode {
    FlowNode {
        id: node.id.clone(),
        kind: style.node_kind.clone(),
        position: node.position,
        data: FlowNodeData {
            label: node.label.clone(),
            has_children: node.has_children,
            collapsed: node.collapsed,
            on_toggle: node
                .has_children
                .then(|| CollapseCommand::toggle(node.id.clone())),
        },
    }
}

fn flow_edge(edge: &LayoutEdge, style: &RenderStyle) -> FlowEdge {
    FlowEdge {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        kind: style.edge_kind.clone(),
        style: EdgeStyle {
            stroke: style.accent.clone(),
            stroke_width: style.stroke_width,
        },
        marker_end: Marker {
            kind: MarkerKind::ArrowClosed,
            color: style.accent.clone(),
        },
    }
}
