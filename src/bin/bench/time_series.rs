// Per-Tick JSONL Time Series Recorder
// One JSON line per simulated tick for independent analysis

use ripple_engine::adapter::from_weight;
use ripple_engine::{TickReport, Weight};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    /// Distance a seed wave has travelled by the end of this tick;
    /// infinite past the `Decimal` range.
    pub front_distance: f64,
    pub proposals: usize,
    pub spawned: usize,
    pub retired: usize,
    pub active_waves: usize,
    pub resolved_sources: usize,
}

impl TickSnapshot {
    pub fn from_report(report: &TickReport, speed: Weight) -> Self {
        Self {
            tick: report.tick,
            front_distance: speed
                .checked_mul(Weight::from(report.tick))
                .map_or(f64::INFINITY, from_weight),
            proposals: report.proposals,
            spawned: report.spawned,
            retired: report.retired,
            active_waves: report.active_waves,
            resolved_sources: report.resolved_sources,
        }
    }
}

/// Time series recorder that accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self { snapshots: Vec::new() }
    }

    pub fn record_all(&mut self, history: &[TickReport], speed: Weight) {
        self.snapshots
            .extend(history.iter().map(|r| TickSnapshot::from_report(r, speed)));
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot).map_err(std::io::Error::other)?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}
