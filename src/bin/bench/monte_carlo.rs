// Monte Carlo Infrastructure — N seeded runs per scenario with aggregation
// Every ripple answer is cross-checked against one Dijkstra run per source

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ripple_engine::adapter::from_weight;
use ripple_engine::dijkstra::nearest_destination;
use ripple_engine::*;

use crate::generator::{GraphGenerator, Query};
use crate::report::*;
use crate::scenarios::{Expectation, Scenario};
use crate::time_series::TimeSeriesRecorder;

use std::time::Instant;

/// Count sources whose ripple answer disagrees with Dijkstra, and list the
/// sources Dijkstra cannot resolve at all.
fn cross_check(query: &Query, solution: Option<&Solution>) -> (u32, Vec<NodeId>) {
    let mut mismatches = 0;
    let mut unreachable = Vec::new();
    for &source in &query.sources {
        let Some((_, dist)) = nearest_destination(&query.graph, source, &query.destinations) else {
            unreachable.push(source);
            continue;
        };
        let Some(solution) = solution else { continue };
        let ok = solution.paths.get(&source).is_some_and(|r| {
            r.length == dist
                && r.source() == Some(source)
                && r.destination().is_some_and(|d| query.destinations.contains(&d))
                && query.graph.path_length(&r.path) == Some(r.length)
        });
        if !ok {
            mismatches += 1;
        }
    }
    unreachable.sort_unstable();
    unreachable.dedup();
    (mismatches, unreachable)
}

/// Run a single scenario iteration with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> BenchResult {
    let mut gen = GraphGenerator::new(ChaCha8Rng::seed_from_u64(seed));
    let query = (scenario.build)(&mut gen);

    let config = RippleConfig { record_history: time_series_dir.is_some() };
    let start = Instant::now();
    let outcome = RippleSimulation::with_config(&query.graph, &query.sources, &query.destinations, config)
        .and_then(RippleSimulation::run);
    let ripple_ms = start.elapsed().as_secs_f64() * 1000.0;

    let start = Instant::now();
    let (mismatches, unreachable) = cross_check(&query, outcome.as_ref().ok());
    let dijkstra_ms = start.elapsed().as_secs_f64() * 1000.0;

    if let (Ok(solution), Some(dir)) = (&outcome, time_series_dir) {
        let mut ts = TimeSeriesRecorder::new();
        ts.record_all(&solution.history, solution.speed);
        let path = dir.join(format!("{}-seed-{}.jsonl", scenario.name.to_lowercase(), seed));
        if let Err(e) = ts.write_jsonl(&path) {
            eprintln!("  Warning: failed to write time series: {}", e);
        }
    }

    let (solution, unresolved) = match &outcome {
        Ok(solution) => (Some(solution), Vec::new()),
        Err(RippleError::Infeasible { unresolved }) => (None, unresolved.clone()),
        Err(e) => {
            eprintln!("  Warning: {} seed {} failed: {}", scenario.name, seed, e);
            (None, Vec::new())
        }
    };

    let agrees_with_reference = match &outcome {
        Ok(_) => unreachable.is_empty() && mismatches == 0,
        Err(RippleError::Infeasible { .. }) => !unreachable.is_empty() && unresolved == unreachable,
        Err(_) => false,
    };
    let pass = agrees_with_reference
        && match scenario.expect {
            Expectation::Feasible => outcome.is_ok(),
            Expectation::Infeasible => outcome.is_err(),
            Expectation::MatchReference => true,
        };

    BenchResult {
        scenario: scenario.label.to_string(),
        name: scenario.name.to_string(),
        category: scenario.category.to_string(),
        seed,
        pass,
        nodes: query.graph.node_count(),
        edges: query.graph.edge_count(),
        sources: query.sources.len(),
        destinations: query.destinations.len(),
        ticks: solution.map(|s| s.ticks),
        waves: solution.map(|s| s.waves),
        speed: solution.map(|s| from_weight(s.speed)),
        unresolved,
        mismatches,
        ripple_ms,
        dijkstra_ms,
    }
}

/// Run N iterations of a scenario with seeds base_seed..base_seed+N.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> McReport {
    let runs: Vec<BenchResult> = (0..n_runs as u64)
        .map(|i| run_single(scenario, base_seed + i, time_series_dir))
        .collect();

    let collect = |f: fn(&BenchResult) -> Option<f64>| -> Vec<f64> {
        runs.iter().filter_map(f).collect()
    };
    let passed = runs.iter().filter(|r| r.pass).count();

    McReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs,
        pass_rate: if n_runs > 0 { passed as f64 / n_runs as f64 } else { 0.0 },
        ticks: Stats::from_samples(&collect(|r| r.ticks.map(|t| t as f64))),
        waves: Stats::from_samples(&collect(|r| r.waves.map(|w| w as f64))),
        ripple_ms: Stats::from_samples(&collect(|r| Some(r.ripple_ms))),
        dijkstra_ms: Stats::from_samples(&collect(|r| Some(r.dijkstra_ms))),
        total_mismatches: runs.iter().map(|r| r.mismatches).sum(),
        runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::scenarios;

    #[test]
    fn reference_scenario_passes() {
        let all = scenarios();
        let reference = all.iter().find(|s| s.name == "REFERENCE").unwrap();
        let result = run_single(reference, 0, None);
        assert!(result.pass);
        assert_eq!(result.ticks, Some(6));
        assert_eq!(result.mismatches, 0);
    }

    #[test]
    fn split_components_reports_unresolved() {
        let all = scenarios();
        let split = all.iter().find(|s| s.name == "SPLIT_COMPONENTS").unwrap();
        let result = run_single(split, 3, None);
        assert!(result.pass, "{result:?}");
        assert!(result.unresolved.iter().all(|&s| s >= 30));
        assert!(!result.unresolved.is_empty());
    }
}
