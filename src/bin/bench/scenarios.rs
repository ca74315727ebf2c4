// Scenario Definitions — fixed reference query plus seeded random topologies
// Each scenario builds its query from the run's generator; no engine changes

use ripple_engine::Graph;
use rust_decimal_macros::dec;

use crate::generator::{GraphGenerator, Query, WeightProfile};

// ─── Scenario Configuration ─────────────────────────────────────────────────

/// What the run must report to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Every source resolves.
    Feasible,
    /// The run must abort with the unreachable sources listed.
    Infeasible,
    /// Whatever Dijkstra says about this seed.
    MatchReference,
}

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub expect: Expectation,
    pub build: fn(&mut GraphGenerator) -> Query,
}

impl Scenario {
    /// Case-insensitive substring match on name, label or category.
    pub fn matches(&self, filter: &str) -> bool {
        let filter = filter.to_lowercase();
        [self.name, self.label, self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(&filter))
    }
}

// ─── Builders ───────────────────────────────────────────────────────────────

fn reference_query(_gen: &mut GraphGenerator) -> Query {
    let mut graph = Graph::new(7);
    let edges = [
        (0, 1, dec!(10)),
        (0, 2, dec!(1)),
        (1, 3, dec!(2)),
        (1, 4, dec!(9)),
        (2, 3, dec!(3)),
        (2, 5, dec!(2)),
        (3, 4, dec!(5)),
        (3, 5, dec!(6)),
        (4, 6, dec!(4)),
        (5, 6, dec!(9)),
    ];
    for (a, b, w) in edges {
        if let Err(e) = graph.add_undirected_edge(a, b, w) {
            eprintln!("  Warning: reference edge rejected: {}", e);
        }
    }
    Query { graph, sources: vec![1, 3, 5], destinations: vec![0, 6] }
}

fn ring_small(gen: &mut GraphGenerator) -> Query {
    let graph = gen.ring_with_chords(50, 60, WeightProfile::Integer(20));
    let sources = gen.pick_nodes(0..50, 10);
    let destinations = gen.pick_nodes(0..50, 3);
    Query { graph, sources, destinations }
}

fn ring_large(gen: &mut GraphGenerator) -> Query {
    let graph = gen.ring_with_chords(500, 1500, WeightProfile::Integer(50));
    let sources = gen.pick_nodes(0..500, 100);
    let destinations = gen.pick_nodes(0..500, 8);
    Query { graph, sources, destinations }
}

fn grid_unit(gen: &mut GraphGenerator) -> Query {
    let graph = gen.grid(20, 20, WeightProfile::Unit);
    let sources = gen.pick_nodes(0..400, 40);
    let destinations = gen.pick_nodes(0..400, 4);
    Query { graph, sources, destinations }
}

fn grid_fractional(gen: &mut GraphGenerator) -> Query {
    let graph = gen.grid(12, 12, WeightProfile::Tenths(35));
    let sources = gen.pick_nodes(0..144, 20);
    let destinations = gen.pick_nodes(0..144, 2);
    Query { graph, sources, destinations }
}

fn directed_sparse(gen: &mut GraphGenerator) -> Query {
    let graph = gen.random_directed(80, 2, WeightProfile::Integer(15));
    let sources = gen.pick_nodes(0..80, 12);
    let destinations = gen.pick_nodes(0..80, 4);
    Query { graph, sources, destinations }
}

fn split_components(gen: &mut GraphGenerator) -> Query {
    // Two strongly connected halves. Bridges only point from the destination
    // half (0..30) into the other one, so sources in 30..60 are stranded.
    let half = gen.ring_with_chords(30, 20, WeightProfile::Integer(10));
    let mut graph = Graph::new(60);
    for (a, b, w) in half.edges() {
        add(&mut graph, a, b, w);
        add(&mut graph, a + 30, b + 30, w);
    }
    let w = gen.weight(WeightProfile::Integer(10));
    add(&mut graph, 29, 30, w);
    add(&mut graph, 0, 59, w);

    let mut sources = gen.pick_nodes(0..60, 6);
    if sources.iter().all(|&s| s < 30) {
        sources.push(45);
    }
    let destinations = gen.pick_nodes(0..30, 2);
    Query { graph, sources, destinations }
}

fn add(g: &mut Graph, a: u32, b: u32, w: ripple_engine::Weight) {
    if let Err(e) = g.add_edge(a, b, w) {
        eprintln!("  Warning: scenario edge rejected: {}", e);
    }
}

// ─── Scenario Table ─────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "REFERENCE",
            label: "Reference 7-node graph",
            category: "fixed",
            expect: Expectation::Feasible,
            build: reference_query,
        },
        Scenario {
            name: "RING_SMALL",
            label: "Ring+chords 50n int weights",
            category: "connected",
            expect: Expectation::Feasible,
            build: ring_small,
        },
        Scenario {
            name: "RING_LARGE",
            label: "Ring+chords 500n int weights",
            category: "connected",
            expect: Expectation::Feasible,
            build: ring_large,
        },
        Scenario {
            name: "GRID_UNIT",
            label: "Grid 20x20 unit weights",
            category: "connected",
            expect: Expectation::Feasible,
            build: grid_unit,
        },
        Scenario {
            name: "GRID_FRACTIONAL",
            label: "Grid 12x12 tenth weights",
            category: "connected",
            expect: Expectation::Feasible,
            build: grid_fractional,
        },
        Scenario {
            name: "DIRECTED_SPARSE",
            label: "Random directed 80n deg 2",
            category: "directed",
            expect: Expectation::MatchReference,
            build: directed_sparse,
        },
        Scenario {
            name: "SPLIT_COMPONENTS",
            label: "Split halves, one-way bridge",
            category: "infeasible",
            expect: Expectation::Infeasible,
            build: split_components,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_any_field_ignoring_case() {
        let all = scenarios();
        let grids: Vec<&str> = all.iter().filter(|s| s.matches("grid")).map(|s| s.name).collect();
        assert_eq!(grids, vec!["GRID_UNIT", "GRID_FRACTIONAL"]);
        assert!(all.iter().any(|s| s.matches("REFERENCE")));
        assert!(!all.iter().any(|s| s.matches("no-such-scenario")));
    }
}
