// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ripple Spreading Engine - Graph Model

//! Directed weighted graph, its reversal, and the neighbor index the
//! simulation expands over.
//!
//! Adjacency is a `BTreeMap` per node so neighbor iteration is always in
//! ascending node order. Every downstream tie-break inherits that order.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::RippleError;
use crate::types::{NodeId, Weight};

// ─── Graph ───────────────────────────────────────────────────────────────────

/// Directed graph: node → {neighbor → positive weight}.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<BTreeMap<NodeId, Weight>>,
}

impl Graph {
    /// Graph with `node_count` nodes and no edges.
    pub fn new(node_count: usize) -> Self {
        Self { adjacency: vec![BTreeMap::new(); node_count] }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeMap::len).sum()
    }

    /// Insert `from -> to`. Re-adding an existing edge replaces its weight.
    ///
    /// Rejects endpoints outside `[0, N)` and non-positive weights instead of
    /// letting them corrupt distances later.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: Weight) -> Result<(), RippleError> {
        self.check_node(from)?;
        self.check_node(to)?;
        if weight <= Decimal::ZERO {
            return Err(RippleError::InvalidWeight { from, to, weight: weight.to_string() });
        }
        self.adjacency[from as usize].insert(to, weight);
        Ok(())
    }

    /// Insert both `a -> b` and `b -> a` with the same weight.
    pub fn add_undirected_edge(&mut self, a: NodeId, b: NodeId, weight: Weight) -> Result<(), RippleError> {
        self.add_edge(a, b, weight)?;
        self.add_edge(b, a, weight)
    }

    pub fn weight(&self, from: NodeId, to: NodeId) -> Option<Weight> {
        self.adjacency.get(from as usize)?.get(&to).copied()
    }

    /// Outgoing edges of `node` in ascending neighbor order.
    pub fn edges_from(&self, node: NodeId) -> impl Iterator<Item = (NodeId, Weight)> + '_ {
        self.adjacency
            .get(node as usize)
            .into_iter()
            .flat_map(|m| m.iter().map(|(&to, &w)| (to, w)))
    }

    /// Every edge as `(from, to, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, Weight)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(from, m)| {
            m.iter().map(move |(&to, &w)| (from as NodeId, to, w))
        })
    }

    /// Same nodes, every edge inverted. Nodes without incoming edges in
    /// `self` still get an (empty) entry.
    pub fn reverse(&self) -> Graph {
        let mut reversed = Graph::new(self.node_count());
        for (from, to, w) in self.edges() {
            reversed.adjacency[to as usize].insert(from, w);
        }
        reversed
    }

    /// Sum of weights along `path`, or `None` if some hop is not an edge or
    /// the sum overflows.
    pub fn path_length(&self, path: &[NodeId]) -> Option<Weight> {
        path.windows(2).try_fold(Weight::ZERO, |acc, hop| {
            acc.checked_add(self.weight(hop[0], hop[1])?)
        })
    }

    pub(crate) fn check_node(&self, node: NodeId) -> Result<(), RippleError> {
        if (node as usize) < self.node_count() {
            Ok(())
        } else {
            Err(RippleError::NodeOutOfRange { node, node_count: self.node_count() })
        }
    }
}

// ─── Neighbor Index ──────────────────────────────────────────────────────────

/// Flattened per-node outgoing edge lists for O(degree) expansion.
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    lists: Vec<Vec<(NodeId, Weight)>>,
}

impl NeighborIndex {
    pub fn build(graph: &Graph) -> Self {
        let lists = (0..graph.node_count())
            .map(|node| graph.edges_from(node as NodeId).collect())
            .collect();
        Self { lists }
    }

    pub fn neighbors(&self, node: NodeId) -> &[(NodeId, Weight)] {
        self.lists.get(node as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Global propagation speed: the minimum edge weight. No edge is shorter
    /// than one tick of growth, so no crossing can be skipped.
    pub fn propagation_speed(&self) -> Result<Weight, RippleError> {
        self.lists
            .iter()
            .flatten()
            .map(|&(_, w)| w)
            .min()
            .ok_or(RippleError::EmptyGraph)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
