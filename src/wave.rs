// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Ripple Spreading Engine - Wave Arena

//! Waves and the append-only arena that owns them.
//!
//! A wave's path is not copied on every expansion. Each wave stores the id of
//! the wave that spawned it, so a path is the parent chain walked back to the
//! originating destination. Waves are never removed, which keeps every chain
//! valid for the whole run.

use std::cmp::Ordering;

use serde::Serialize;

use crate::types::{NodeId, WaveId, Weight};

/// One expanding ripple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wave {
    pub id: WaveId,
    pub epicenter: NodeId,
    pub radius: Weight,
    /// Distance from the originating destination to the epicenter.
    pub length: Weight,
    /// `None` for the waves seeded at destinations.
    pub parent: Option<WaveId>,
    pub active: bool,
}

/// A wave crossing into an unassigned node during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proposal {
    pub parent: WaveId,
    /// Radius left over after crossing the edge. Larger means earlier.
    pub residual: Weight,
    pub length: Weight,
}

impl Proposal {
    /// Ordering used to pick a winner: larger residual first, then lower
    /// proposing wave id. `Greater` means `self` wins.
    pub fn precedence(&self, other: &Proposal) -> Ordering {
        self.residual
            .cmp(&other.residual)
            .then_with(|| other.parent.cmp(&self.parent))
    }

    /// The winning proposal among `proposals`, independent of their order.
    pub fn select(proposals: &[Proposal]) -> Option<&Proposal> {
        proposals.iter().max_by(|a, b| a.precedence(b))
    }
}

/// Append-only wave storage indexed by `WaveId`.
#[derive(Debug, Clone, Default)]
pub struct WaveArena {
    waves: Vec<Wave>,
}

impl WaveArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Store a new active wave and return its id.
    ///
    /// A run spawns at most one wave per node and nodes are `u32`, so the
    /// arena never holds more than `u32::MAX + 1` waves and every id fits.
    pub fn spawn(
        &mut self,
        epicenter: NodeId,
        radius: Weight,
        length: Weight,
        parent: Option<WaveId>,
    ) -> WaveId {
        debug_assert!(u32::try_from(self.waves.len()).is_ok(), "wave id space exhausted");
        let id = WaveId(self.waves.len() as u32);
        self.waves.push(Wave { id, epicenter, radius, length, parent, active: true });
        id
    }

    pub fn get(&self, id: WaveId) -> Option<&Wave> {
        self.waves.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: WaveId) -> Option<&mut Wave> {
        self.waves.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wave> {
        self.waves.iter()
    }

    /// Epicenters from `id` back to its originating destination.
    pub fn lineage(&self, id: WaveId) -> Lineage<'_> {
        Lineage { arena: self, next: self.get(id) }
    }

    /// Destination-first path of the wave: the order in which the ripple
    /// travelled over the reversed graph.
    pub fn path(&self, id: WaveId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = self.lineage(id).collect();
        path.reverse();
        path
    }
}

/// Iterator over a wave's parent chain.
pub struct Lineage<'a> {
    arena: &'a WaveArena,
    next: Option<&'a Wave>,
}

impl<'a> Iterator for Lineage<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let wave = self.next?;
        self.next = wave.parent.and_then(|p| self.arena.get(p));
        Some(wave.epicenter)
    }
}
