// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ripple Spreading Engine

//! Many-to-many shortest paths by ripple spreading.
//!
//! Waves expand from every destination at once over the reversed graph at a
//! shared speed equal to the minimum edge weight. The first wave to reach a
//! node fixes its distance, so a single simulation answers the query for all
//! sources.
//!
//! ```
//! use ripple_engine::{solve, Graph};
//! use rust_decimal_macros::dec;
//!
//! let mut g = Graph::new(3);
//! g.add_edge(0, 1, dec!(2)).unwrap();
//! g.add_edge(1, 2, dec!(3)).unwrap();
//!
//! let solution = solve(&g, &[0], &[2]).unwrap();
//! assert_eq!(solution.paths[&0].path, vec![0, 1, 2]);
//! assert_eq!(solution.paths[&0].length, dec!(5));
//! ```

pub mod types;
pub mod error;
pub mod graph;
pub mod wave;
pub mod simulation;
pub mod dijkstra;
pub mod adapter;

pub use types::*;
pub use error::RippleError;
pub use graph::{Graph, NeighborIndex};
pub use simulation::{solve, RippleConfig, RippleSimulation};

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Browser-facing solver holding a graph built edge by edge or from JSON.
#[wasm_bindgen]
pub struct RippleSolver {
    graph: Graph,
}

#[wasm_bindgen]
impl RippleSolver {
    #[wasm_bindgen(constructor)]
    pub fn new(node_count: u32) -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        Self { graph: Graph::new(node_count as usize) }
    }

    pub fn add_edge(&mut self, from: u32, to: u32, weight: f64) -> Result<(), JsValue> {
        self.add_edge_core(from, to, weight).map_err(to_js_error)
    }

    /// Solve a JSON query (`{ graph, sources, destinations }`) in one call.
    pub fn solve_json(json: &str) -> Result<JsValue, JsValue> {
        let reports = Self::solve_json_core(json).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&reports).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn solve(&self, sources: Vec<u32>, destinations: Vec<u32>) -> Result<JsValue, JsValue> {
        let reports = self.solve_core(&sources, &destinations).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&reports).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn node_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    pub fn edge_count(&self) -> u32 {
        self.graph.edge_count() as u32
    }
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl RippleSolver {
    pub fn add_edge_core(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<(), RippleError> {
        let w = adapter::to_weight(from, to, weight)?;
        self.graph.add_edge(from, to, w)
    }

    pub fn solve_core(
        &self,
        sources: &[NodeId],
        destinations: &[NodeId],
    ) -> Result<Vec<adapter::PathReport>, RippleError> {
        let solution = solve(&self.graph, sources, destinations)?;
        Ok(adapter::to_reports(&solution))
    }

    pub fn solve_json_core(json: &str) -> Result<Vec<adapter::PathReport>, RippleError> {
        let query = adapter::QuerySpec::from_json(json)?;
        let solver = Self { graph: adapter::graph_from_adjacency(&query.graph)? };
        solver.solve_core(&query.sources, &query.destinations)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

fn to_js_error(err: RippleError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
