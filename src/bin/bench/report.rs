// Benchmark Report Types
// Structured output: per-run results, per-scenario aggregation, suite summary

use serde::Serialize;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let half_width = 1.96 * std_dev / (n as f64).sqrt(); // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - half_width,
            ci_upper: mean + half_width,
            min: samples.iter().copied().fold(f64::INFINITY, f64::min),
            max: samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub scenario: String,
    pub name: String,
    pub category: String,
    pub seed: u64,
    pub pass: bool,
    pub nodes: usize,
    pub edges: usize,
    pub sources: usize,
    pub destinations: usize,
    /// `None` when the run aborted as infeasible.
    pub ticks: Option<u64>,
    pub waves: Option<usize>,
    pub speed: Option<f64>,
    pub unresolved: Vec<u32>,
    /// Sources whose length or path disagreed with Dijkstra.
    pub mismatches: u32,
    pub ripple_ms: f64,
    pub dijkstra_ms: f64,
}

// ─── Monte Carlo Report (per scenario) ──────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct McReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub ticks: Stats,
    pub waves: Stats,
    pub ripple_ms: Stats,
    pub dijkstra_ms: Stats,
    pub total_mismatches: u32,
    pub runs: Vec<BenchResult>,
}

// ─── Suite Report ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub summary: Summary,
    pub scenarios: Vec<McReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_constant_samples() {
        let s = Stats::from_samples(&[4.0, 4.0, 4.0]);
        assert_eq!(s.mean, 4.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.min, 4.0);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.n, 3);
    }

    #[test]
    fn stats_of_empty_samples() {
        assert_eq!(Stats::from_samples(&[]).n, 0);
    }
}
