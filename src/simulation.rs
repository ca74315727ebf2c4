// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ripple Spreading Engine - Simulation Core

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::RippleError;
use crate::graph::{Graph, NeighborIndex};
use crate::types::*;
use crate::wave::{Proposal, Wave, WaveArena};

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Keep a `TickReport` for every tick in the final `Solution`.
    pub record_history: bool,
}

// ─── RippleSimulation struct ─────────────────────────────────────────────────

/// One ripple-spreading run over the reversed graph.
///
/// Waves start at the destinations and travel along reversed edges, so the
/// first wave to touch a source carries that source's shortest distance to
/// its nearest destination. The run owns all of its state; nothing is shared
/// between runs and the caller's graph is only read.
#[derive(Debug, Clone)]
pub struct RippleSimulation {
    neighbors: NeighborIndex,
    speed: Weight,
    sources: Vec<NodeId>,
    waves: WaveArena,
    /// Ascending by wave id.
    active: Vec<WaveId>,
    first_arrival: Vec<Option<WaveId>>,
    current_tick: u64,
    config: RippleConfig,
    history: Vec<TickReport>,
}

impl RippleSimulation {
    pub fn new(graph: &Graph, sources: &[NodeId], destinations: &[NodeId]) -> Result<Self, RippleError> {
        Self::with_config(graph, sources, destinations, RippleConfig::default())
    }

    pub fn with_config(
        graph: &Graph,
        sources: &[NodeId],
        destinations: &[NodeId],
        config: RippleConfig,
    ) -> Result<Self, RippleError> {
        for &node in sources.iter().chain(destinations) {
            graph.check_node(node)?;
        }

        let reversed = graph.reverse();
        let neighbors = NeighborIndex::build(&reversed);
        let speed = neighbors.propagation_speed()?;

        let mut sources = sources.to_vec();
        sources.sort_unstable();
        sources.dedup();

        let mut sim = Self {
            neighbors,
            speed,
            sources,
            waves: WaveArena::new(),
            active: Vec::new(),
            first_arrival: vec![None; graph.node_count()],
            current_tick: 0,
            config,
            history: Vec::new(),
        };

        // Destinations are their own first arrivals at distance zero.
        for &node in destinations {
            if sim.first_arrival[node as usize].is_some() {
                continue;
            }
            let id = sim.waves.spawn(node, Weight::ZERO, Weight::ZERO, None);
            sim.first_arrival[node as usize] = Some(id);
            sim.active.push(id);
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            sources = sim.sources.len(),
            destinations = sim.active.len(),
            speed = %sim.speed,
            "ripple simulation initialised"
        );
        Ok(sim)
    }

    // ─── Termination ─────────────────────────────────────────────────────────

    pub fn status(&self) -> RunStatus {
        if self.unresolved_sources().next().is_none() {
            RunStatus::Converged
        } else if self.active.is_empty() {
            RunStatus::Exhausted
        } else {
            RunStatus::Running
        }
    }

    /// Sources without a first-arrival record, ascending.
    pub fn unresolved_sources(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.sources
            .iter()
            .copied()
            .filter(|&s| self.first_arrival[s as usize].is_none())
    }

    // ─── Tick ────────────────────────────────────────────────────────────────

    /// Advance every active wave by one tick and commit the arrivals.
    ///
    /// Fails with [`RippleError::WeightOverflow`] when a radius or path length
    /// leaves the `Decimal` range; the run is left exactly as it was before
    /// the tick.
    pub fn tick_core(&mut self) -> Result<TickReport, RippleError> {
        // 1. Grow. Checked up front so an overflow leaves no wave half-advanced.
        let grown = self
            .active
            .iter()
            .filter_map(|&id| self.waves.get(id))
            .map(|wave| {
                wave.radius
                    .checked_add(self.speed)
                    .map(|radius| (wave.id, radius))
                    .ok_or(RippleError::WeightOverflow { node: wave.epicenter })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // 2. Collect crossings. Reads only state committed in earlier ticks,
        // so wave order here cannot affect the outcome.
        let mut incoming: BTreeMap<NodeId, Vec<Proposal>> = BTreeMap::new();
        let mut proposals = 0;
        for &(id, radius) in &grown {
            let Some(wave) = self.waves.get(id) else { continue };
            for &(node, edge) in self.neighbors.neighbors(wave.epicenter) {
                if self.first_arrival[node as usize].is_some() {
                    continue;
                }
                // `radius - edge < speed` is `radius < edge + speed` without
                // the overflowing add.
                if edge <= radius && radius - edge < self.speed {
                    let length = wave
                        .length
                        .checked_add(edge)
                        .ok_or(RippleError::WeightOverflow { node })?;
                    incoming.entry(node).or_default().push(Proposal {
                        parent: wave.id,
                        residual: radius - edge,
                        length,
                    });
                    proposals += 1;
                }
            }
        }

        self.current_tick += 1;
        for (id, radius) in grown {
            if let Some(wave) = self.waves.get_mut(id) {
                wave.radius = radius;
            }
        }

        // 3. One winner per node; the rest describe longer paths.
        let mut spawned = 0;
        for (node, candidates) in &incoming {
            let Some(winner) = Proposal::select(candidates) else { continue };
            let id = self.waves.spawn(*node, winner.residual, winner.length, Some(winner.parent));
            self.first_arrival[*node as usize] = Some(id);
            self.active.push(id);
            spawned += 1;
        }

        // 4. Retire waves with nothing left to discover.
        let before = self.active.len();
        let mut retired_ids = Vec::new();
        self.active.retain(|&id| {
            let live = self.waves.get(id).is_some_and(|wave| {
                self.neighbors
                    .neighbors(wave.epicenter)
                    .iter()
                    .any(|&(n, _)| self.first_arrival[n as usize].is_none())
            });
            if !live {
                retired_ids.push(id);
            }
            live
        });
        for id in retired_ids {
            if let Some(wave) = self.waves.get_mut(id) {
                wave.active = false;
            }
        }

        let report = TickReport {
            tick: self.current_tick,
            proposals,
            spawned,
            retired: before - self.active.len(),
            active_waves: self.active.len(),
            resolved_sources: self.sources.len() - self.unresolved_sources().count(),
        };
        trace!(
            tick = report.tick,
            proposals = report.proposals,
            spawned = report.spawned,
            retired = report.retired,
            active = report.active_waves,
            "tick"
        );
        if self.config.record_history {
            self.history.push(report.clone());
        }
        Ok(report)
    }

    // ─── Run ─────────────────────────────────────────────────────────────────

    /// Tick until every source is resolved.
    ///
    /// Any unreachable source aborts the whole run with
    /// [`RippleError::Infeasible`]; there is no partial success.
    pub fn run(mut self) -> Result<Solution, RippleError> {
        loop {
            match self.status() {
                RunStatus::Converged => break,
                RunStatus::Exhausted => {
                    let unresolved: Vec<NodeId> = self.unresolved_sources().collect();
                    warn!(
                        tick = self.current_tick,
                        unresolved = ?unresolved,
                        "active set exhausted before all sources were reached"
                    );
                    return Err(RippleError::Infeasible { unresolved });
                }
                RunStatus::Running => {
                    self.tick_core()?;
                }
            }
        }

        debug!(ticks = self.current_tick, waves = self.waves.len(), "ripple simulation converged");
        Ok(Solution {
            paths: self.results(),
            speed: self.speed,
            ticks: self.current_tick,
            waves: self.waves.len(),
            history: self.history,
        })
    }

    // ─── Path Reconstruction ─────────────────────────────────────────────────

    /// Paths for every source resolved so far, oriented source → destination.
    pub fn results(&self) -> BTreeMap<NodeId, PathResult> {
        self.sources
            .iter()
            .filter_map(|&source| {
                let id = self.first_arrival[source as usize]?;
                let wave = self.waves.get(id)?;
                // Lineage runs epicenter-first, which is already the
                // source-to-destination order in the original graph.
                Some((source, PathResult {
                    path: self.waves.lineage(id).collect(),
                    length: wave.length,
                }))
            })
            .collect()
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn speed(&self) -> Weight {
        self.speed
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn first_arrival(&self, node: NodeId) -> Option<WaveId> {
        self.first_arrival.get(node as usize).copied().flatten()
    }

    pub fn wave(&self, id: WaveId) -> Option<&Wave> {
        self.waves.get(id)
    }

    pub fn waves(&self) -> &WaveArena {
        &self.waves
    }

    pub fn active_waves(&self) -> &[WaveId] {
        &self.active
    }

    pub fn history(&self) -> &[TickReport] {
        &self.history
    }
}

/// Shortest path from each source to its nearest destination.
pub fn solve(graph: &Graph, sources: &[NodeId], destinations: &[NodeId]) -> Result<Solution, RippleError> {
    RippleSimulation::new(graph, sources, destinations)?.run()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn chain() -> Graph {
        // 0 -> 1 -> 2, weights 2 and 3
        let mut g = Graph::new(3);
        g.add_edge(0, 1, dec!(2)).unwrap();
        g.add_edge(1, 2, dec!(3)).unwrap();
        g
    }

    #[test]
    fn destinations_seed_waves_at_tick_zero() {
        let sim = RippleSimulation::new(&chain(), &[0], &[2]).unwrap();
        assert_eq!(sim.current_tick(), 0);
        assert_eq!(sim.speed(), dec!(2));
        assert_eq!(sim.active_waves(), &[WaveId(0)]);
        assert_eq!(sim.first_arrival(2), Some(WaveId(0)));
        assert_eq!(sim.first_arrival(0), None);
        assert_eq!(sim.status(), RunStatus::Running);
    }

    #[test]
    fn crossing_detected_in_half_open_window() {
        let mut sim = RippleSimulation::new(&chain(), &[0], &[2]).unwrap();
        // radius 2 < 3: nothing crosses yet
        let first = sim.tick_core().unwrap();
        assert_eq!(first.spawned, 0);
        // radius 4 in [3, 5): node 1 reached with residual 1
        let second = sim.tick_core().unwrap();
        assert_eq!(second.spawned, 1);
        let w = sim.wave(sim.first_arrival(1).unwrap()).unwrap();
        assert_eq!(w.radius, dec!(1));
        assert_eq!(w.length, dec!(3));
        assert_eq!(w.parent, Some(WaveId(0)));
    }

    #[test]
    fn exhausted_waves_are_retired_but_kept() {
        let mut sim = RippleSimulation::new(&chain(), &[0], &[2]).unwrap();
        sim.tick_core().unwrap();
        let report = sim.tick_core().unwrap();
        assert_eq!(report.retired, 1);
        assert_eq!(sim.active_waves(), &[WaveId(1)]);
        assert!(!sim.wave(WaveId(0)).unwrap().active);
    }

    #[test]
    fn run_resolves_chain() {
        let solution = solve(&chain(), &[0], &[2]).unwrap();
        let r = &solution.paths[&0];
        assert_eq!(r.path, vec![0, 1, 2]);
        assert_eq!(r.length, dec!(5));
        assert_eq!(solution.waves, 3);
    }

    #[test]
    fn source_that_is_destination_has_zero_length() {
        let solution = solve(&chain(), &[2], &[2]).unwrap();
        assert_eq!(solution.paths[&2].path, vec![2]);
        assert_eq!(solution.paths[&2].length, dec!(0));
        assert_eq!(solution.ticks, 0);
    }

    #[test]
    fn duplicate_destinations_seed_one_wave() {
        let sim = RippleSimulation::new(&chain(), &[0], &[2, 2, 1]).unwrap();
        assert_eq!(sim.waves().len(), 2);
    }

    #[test]
    fn edges_are_directed() {
        let err = solve(&chain(), &[2], &[0]).unwrap_err();
        assert!(matches!(err, RippleError::Infeasible { ref unresolved } if unresolved == &vec![2]));
    }

    #[test]
    fn empty_graph_fails_fast() {
        let err = RippleSimulation::new(&Graph::new(3), &[0], &[1]).unwrap_err();
        assert!(matches!(err, RippleError::EmptyGraph));
    }

    #[test]
    fn out_of_range_endpoints_rejected() {
        let err = RippleSimulation::new(&chain(), &[7], &[2]).unwrap_err();
        assert!(matches!(err, RippleError::NodeOutOfRange { node: 7, node_count: 3 }));
        let err = RippleSimulation::new(&chain(), &[0], &[3]).unwrap_err();
        assert!(matches!(err, RippleError::NodeOutOfRange { node: 3, .. }));
    }

    #[test]
    fn history_recorded_only_when_configured() {
        let config = RippleConfig { record_history: true };
        let solution = RippleSimulation::with_config(&chain(), &[0], &[2], config)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(solution.history.len() as u64, solution.ticks);
        assert_eq!(solution.history.last().unwrap().resolved_sources, 1);

        let quiet = solve(&chain(), &[0], &[2]).unwrap();
        assert!(quiet.history.is_empty());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: RippleConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.record_history);
        let config: RippleConfig = serde_json::from_str(r#"{"record_history":true}"#).unwrap();
        assert!(config.record_history);
    }

    fn huge(units: i128) -> Weight {
        // units * 10^28, close to Decimal::MAX
        Weight::from_i128_with_scale(units * 10i128.pow(28), 0)
    }

    #[test]
    fn radius_overflow_is_an_error_not_a_panic() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, huge(5)).unwrap();
        g.add_edge(1, 2, huge(6)).unwrap();

        let mut sim = RippleSimulation::new(&g, &[0], &[2]).unwrap();
        sim.tick_core().unwrap();
        let err = sim.tick_core().unwrap_err();
        assert!(matches!(err, RippleError::WeightOverflow { node: 2 }));
        // the failed tick committed nothing
        assert_eq!(sim.current_tick(), 1);
        assert_eq!(sim.wave(WaveId(0)).unwrap().radius, huge(5));

        assert!(matches!(solve(&g, &[0], &[2]), Err(RippleError::WeightOverflow { .. })));
    }

    #[test]
    fn path_length_overflow_is_an_error() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, huge(4)).unwrap();
        g.add_edge(1, 2, huge(4)).unwrap();
        let err = solve(&g, &[0], &[2]).unwrap_err();
        assert!(matches!(err, RippleError::WeightOverflow { node: 0 }));
    }

    #[test]
    fn single_huge_edge_still_resolves() {
        let mut g = Graph::new(2);
        g.add_edge(0, 1, huge(5)).unwrap();
        let solution = solve(&g, &[0], &[1]).unwrap();
        assert_eq!(solution.paths[&0].length, huge(5));
    }

    #[test]
    fn at_most_one_wave_per_node() {
        let mut g = Graph::new(5);
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 4), (0, 4), (1, 3)] {
            g.add_undirected_edge(a, b, dec!(1)).unwrap();
        }
        let mut sim = RippleSimulation::new(&g, &[0, 2], &[4, 4]).unwrap();
        while sim.status() == RunStatus::Running {
            sim.tick_core().unwrap();
        }
        assert!(sim.waves().len() <= g.node_count());
        let epicenters: std::collections::BTreeSet<NodeId> =
            sim.waves().iter().map(|w| w.epicenter).collect();
        assert_eq!(epicenters.len(), sim.waves().len());
    }

    #[test]
    fn empty_source_set_converges_immediately() {
        let solution = solve(&chain(), &[], &[2]).unwrap();
        assert!(solution.paths.is_empty());
        assert_eq!(solution.ticks, 0);
    }
}
