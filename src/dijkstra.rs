// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ripple Spreading Engine - Reference Solver

//! Classical binary-heap Dijkstra, run once per source. Used to cross-check
//! the ripple engine's distances.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::Graph;
use crate::types::{NodeId, Weight};

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: Weight,
    node: NodeId,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Distance from `source` to every node, `None` where unreachable.
pub fn shortest_distances(graph: &Graph, source: NodeId) -> Vec<Option<Weight>> {
    let mut dist: Vec<Option<Weight>> = vec![None; graph.node_count()];
    if source as usize >= dist.len() {
        return dist;
    }
    let mut heap = BinaryHeap::new();

    dist[source as usize] = Some(Weight::ZERO);
    heap.push(State { cost: Weight::ZERO, node: source });

    while let Some(State { cost, node }) = heap.pop() {
        if dist[node as usize].is_some_and(|d| cost > d) {
            continue;
        }
        for (next, weight) in graph.edges_from(node) {
            // Routes longer than `Decimal::MAX` are treated as unreachable.
            let Some(next_cost) = cost.checked_add(weight) else { continue };
            if dist[next as usize].map_or(true, |d| next_cost < d) {
                dist[next as usize] = Some(next_cost);
                heap.push(State { cost: next_cost, node: next });
            }
        }
    }
    dist
}

/// Nearest destination reachable from `source` and its distance. Ties go to
/// the lowest destination id.
pub fn nearest_destination(
    graph: &Graph,
    source: NodeId,
    destinations: &[NodeId],
) -> Option<(NodeId, Weight)> {
    let dist = shortest_distances(graph, source);
    destinations
        .iter()
        .filter_map(|&d| Some((d, (*dist.get(d as usize)?)?)))
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn distances_follow_cheapest_route() {
        let mut g = Graph::new(4);
        g.add_edge(0, 1, dec!(10)).unwrap();
        g.add_edge(0, 2, dec!(1)).unwrap();
        g.add_edge(2, 1, dec!(2)).unwrap();
        let dist = shortest_distances(&g, 0);
        assert_eq!(dist, vec![Some(dec!(0)), Some(dec!(3)), Some(dec!(1)), None]);
    }

    #[test]
    fn nearest_picks_minimum_over_destinations() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, dec!(5)).unwrap();
        g.add_edge(0, 2, dec!(2)).unwrap();
        assert_eq!(nearest_destination(&g, 0, &[1, 2]), Some((2, dec!(2))));
        assert_eq!(nearest_destination(&g, 1, &[0, 2]), None);
    }

    #[test]
    fn overflowing_route_is_unreachable() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, Weight::MAX).unwrap();
        g.add_edge(1, 2, dec!(1)).unwrap();
        assert_eq!(shortest_distances(&g, 0), vec![Some(dec!(0)), Some(Weight::MAX), None]);
    }
}
