// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ripple Spreading Engine - Type Definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Node identifier, dense in `[0, N)`.
pub type NodeId = u32;

/// Edge weight. Exact decimal arithmetic keeps `radius += speed` drift-free.
pub type Weight = Decimal;

// ─── Wave Identifier ─────────────────────────────────────────────────────────

/// Stable index of a wave in its run's arena. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WaveId(pub u32);

impl WaveId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for WaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// Shortest path from one source to its nearest destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    /// Source first, destination last.
    pub path: Vec<NodeId>,
    pub length: Weight,
}

impl PathResult {
    pub fn source(&self) -> Option<NodeId> {
        self.path.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.path.last().copied()
    }
}

/// Outcome of a converged run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub paths: BTreeMap<NodeId, PathResult>,
    pub speed: Weight,
    pub ticks: u64,
    pub waves: usize,
    /// Empty unless `RippleConfig::record_history` was set.
    pub history: Vec<TickReport>,
}

// ─── Tick Reporting ──────────────────────────────────────────────────────────

/// Summary of a single synchronous tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    /// Candidate proposals buffered this tick, winners and losers alike.
    pub proposals: usize,
    pub spawned: usize,
    pub retired: usize,
    /// Active waves left after retirement.
    pub active_waves: usize,
    pub resolved_sources: usize,
}

/// Result of the termination check run before each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Every source has a first-arrival record.
    Converged,
    /// Waves remain that can still reach unassigned nodes.
    Running,
    /// No active waves left but some source is unassigned.
    Exhausted,
}
