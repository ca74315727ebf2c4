// Seeded Graph Generator — ChaCha8Rng-driven topologies for bench scenarios
// Every run is reproducible from (scenario, seed)

use rand::seq::index::sample;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use ripple_engine::{Graph, NodeId, Weight};

/// Edge weight distribution.
#[derive(Debug, Clone, Copy)]
pub enum WeightProfile {
    /// Every edge weighs 1.
    Unit,
    /// Integers in `1..=max`.
    Integer(u32),
    /// Tenths in `0.1..=max/10`; small speeds, many ticks.
    Tenths(u32),
}

/// Graph plus the endpoint sets of one query.
pub struct Query {
    pub graph: Graph,
    pub sources: Vec<NodeId>,
    pub destinations: Vec<NodeId>,
}

pub struct GraphGenerator {
    rng: ChaCha8Rng,
}

impl GraphGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    pub fn weight(&mut self, profile: WeightProfile) -> Weight {
        match profile {
            WeightProfile::Unit => Weight::ONE,
            WeightProfile::Integer(max) => Weight::from(self.rng.gen_range(1..=max.max(1))),
            WeightProfile::Tenths(max) => Weight::new(self.rng.gen_range(1..=max.max(1)) as i64, 1),
        }
    }

    fn add(&mut self, g: &mut Graph, a: NodeId, b: NodeId, w: Weight) {
        // Endpoints are generated in range and weights are positive.
        if let Err(e) = g.add_edge(a, b, w) {
            eprintln!("  Warning: generator produced a bad edge: {}", e);
        }
    }

    /// Bidirectional ring plus random chords. Strongly connected.
    pub fn ring_with_chords(&mut self, nodes: u32, chords: u32, profile: WeightProfile) -> Graph {
        let mut g = Graph::new(nodes as usize);
        for i in 0..nodes {
            let j = (i + 1) % nodes;
            let w = self.weight(profile);
            self.add(&mut g, i, j, w);
            self.add(&mut g, j, i, w);
        }
        for _ in 0..chords {
            let a = self.rng.gen_range(0..nodes);
            let b = self.rng.gen_range(0..nodes);
            let w = self.weight(profile);
            self.add(&mut g, a, b, w);
        }
        g
    }

    /// Undirected 4-neighbour grid, `width * height` nodes.
    pub fn grid(&mut self, width: u32, height: u32, profile: WeightProfile) -> Graph {
        let mut g = Graph::new((width * height) as usize);
        for row in 0..height {
            for col in 0..width {
                let id = row * width + col;
                if col + 1 < width {
                    let w = self.weight(profile);
                    self.add(&mut g, id, id + 1, w);
                    self.add(&mut g, id + 1, id, w);
                }
                if row + 1 < height {
                    let w = self.weight(profile);
                    self.add(&mut g, id, id + width, w);
                    self.add(&mut g, id + width, id, w);
                }
            }
        }
        g
    }

    /// Directed graph with `out_degree` random edges per node. Not
    /// necessarily connected.
    pub fn random_directed(&mut self, nodes: u32, out_degree: u32, profile: WeightProfile) -> Graph {
        let mut g = Graph::new(nodes as usize);
        for from in 0..nodes {
            for _ in 0..out_degree {
                let to = self.rng.gen_range(0..nodes);
                let w = self.weight(profile);
                self.add(&mut g, from, to, w);
            }
        }
        g
    }

    /// `count` distinct nodes drawn from `range`, ascending.
    pub fn pick_nodes(&mut self, range: std::ops::Range<u32>, count: usize) -> Vec<NodeId> {
        let len = range.len();
        let mut picked: Vec<NodeId> = sample(&mut self.rng, len, count.min(len))
            .into_iter()
            .map(|i| range.start + i as u32)
            .collect();
        picked.sort_unstable();
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn same_seed_same_graph() {
        let mut a = GraphGenerator::new(ChaCha8Rng::seed_from_u64(7));
        let mut b = GraphGenerator::new(ChaCha8Rng::seed_from_u64(7));
        let ga = a.ring_with_chords(20, 10, WeightProfile::Integer(9));
        let gb = b.ring_with_chords(20, 10, WeightProfile::Integer(9));
        assert_eq!(ga, gb);
    }

    #[test]
    fn grid_edge_count() {
        let mut gen = GraphGenerator::new(ChaCha8Rng::seed_from_u64(1));
        let g = gen.grid(3, 2, WeightProfile::Unit);
        // 2 horizontal per row, 3 vertical, each stored both ways
        assert_eq!(g.edge_count(), 2 * (2 * 2 + 3));
    }

    #[test]
    fn picked_nodes_are_distinct_and_in_range() {
        let mut gen = GraphGenerator::new(ChaCha8Rng::seed_from_u64(3));
        let picked = gen.pick_nodes(10..20, 5);
        assert_eq!(picked.len(), 5);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
        assert!(picked.iter().all(|&n| (10..20).contains(&n)));
    }
}
