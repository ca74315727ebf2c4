// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ripple Spreading Engine - Adapter

//! Adapter layer: converts between callers' f64 / JSON world and the
//! engine's exact `Decimal` weights.

use std::collections::BTreeMap;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::RippleError;
use crate::graph::Graph;
use crate::types::{NodeId, Solution, Weight};

/// Convert an f64 edge weight. Non-finite values cannot be represented.
pub fn to_weight(from: NodeId, to: NodeId, value: f64) -> Result<Weight, RippleError> {
    Weight::from_f64(value)
        .filter(|_| value.is_finite())
        .ok_or_else(|| RippleError::InvalidWeight { from, to, weight: value.to_string() })
}

/// Convert a weight back to f64 (lossy but sufficient for reporting).
pub fn from_weight(w: Weight) -> f64 {
    w.to_f64().unwrap_or(f64::NAN)
}

// ─── Query Input ─────────────────────────────────────────────────────────────

/// Adjacency mapping `{ node: { neighbor: weight } }`.
pub type AdjacencySpec = BTreeMap<NodeId, BTreeMap<NodeId, f64>>;

/// A complete many-to-many query as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySpec {
    pub graph: AdjacencySpec,
    pub sources: Vec<NodeId>,
    pub destinations: Vec<NodeId>,
}

impl QuerySpec {
    pub fn from_json(json: &str) -> Result<Self, RippleError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Build a graph from an adjacency mapping. The node count is one past the
/// highest id mentioned anywhere in the mapping.
pub fn graph_from_adjacency(spec: &AdjacencySpec) -> Result<Graph, RippleError> {
    let max_id = spec
        .iter()
        .flat_map(|(&from, row)| std::iter::once(from).chain(row.keys().copied()))
        .max();
    let mut graph = Graph::new(max_id.map_or(0, |m| m as usize + 1));
    for (&from, row) in spec {
        for (&to, &w) in row {
            graph.add_edge(from, to, to_weight(from, to, w)?)?;
        }
    }
    Ok(graph)
}

// ─── Report Output ───────────────────────────────────────────────────────────

/// Flat, f64-valued view of one resolved source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathReport {
    pub source: NodeId,
    pub path: Vec<NodeId>,
    pub length: f64,
}

/// One report per source, ascending.
pub fn to_reports(solution: &Solution) -> Vec<PathReport> {
    solution
        .paths
        .iter()
        .map(|(&source, r)| PathReport {
            source,
            path: r.path.clone(),
            length: from_weight(r.length),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn weight_round_trip() {
        let w = to_weight(0, 1, 2.5).unwrap();
        assert_eq!(w, dec!(2.5));
        assert_eq!(from_weight(w), 2.5);
    }

    #[test]
    fn non_finite_weight_rejected() {
        assert!(matches!(to_weight(0, 1, f64::NAN), Err(RippleError::InvalidWeight { .. })));
        assert!(matches!(to_weight(0, 1, f64::INFINITY), Err(RippleError::InvalidWeight { .. })));
    }

    #[test]
    fn adjacency_json_builds_graph() {
        let json = r#"{
            "graph": { "0": { "1": 10, "2": 1.5 }, "2": { "3": 3 } },
            "sources": [3],
            "destinations": [0]
        }"#;
        let query = QuerySpec::from_json(json).unwrap();
        let graph = graph_from_adjacency(&query.graph).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.weight(0, 2), Some(dec!(1.5)));
        assert_eq!(query.sources, vec![3]);
    }

    #[test]
    fn negative_weight_in_json_rejected() {
        let mut spec = AdjacencySpec::new();
        spec.entry(0).or_default().insert(1, -1.0);
        assert!(matches!(
            graph_from_adjacency(&spec),
            Err(RippleError::InvalidWeight { from: 0, to: 1, .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(QuerySpec::from_json("{"), Err(RippleError::Json(_))));
    }
}
