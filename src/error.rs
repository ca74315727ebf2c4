// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ripple Spreading Engine - Error Types

use crate::types::NodeId;

/// Errors raised while building a graph or running a ripple simulation.
#[derive(Debug, thiserror::Error)]
pub enum RippleError {
    /// The graph has no edges, so the propagation speed is undefined.
    #[error("graph has no edges; propagation speed is undefined")]
    EmptyGraph,

    /// The active set ran dry while these sources were still unassigned.
    #[error("no feasible path to any destination from source(s) {unresolved:?}")]
    Infeasible { unresolved: Vec<NodeId> },

    #[error("node {node} is out of range for a graph of {node_count} nodes")]
    NodeOutOfRange { node: NodeId, node_count: usize },

    #[error("edge {from} -> {to} has invalid weight {weight}; weights must be positive and finite")]
    InvalidWeight { from: NodeId, to: NodeId, weight: String },

    /// A wave radius or path length reaching `node` left the `Decimal` range.
    #[error("distance to node {node} exceeds the representable weight range")]
    WeightOverflow { node: NodeId },

    #[error("malformed query: {0}")]
    Json(#[from] serde_json::Error),
}
