// Per-manager roster and pick-type counters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::pick::{PickType, Position};

/// Count of drafted players per position for one manager.
///
/// Starts empty, grows by exactly one per successful pick and is never
/// decremented during a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    counts: HashMap<Position, u32>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pos: Position) -> u32 {
        self.counts.get(&pos).copied().unwrap_or(0)
    }

    /// Whether one more player at `pos` stays within the position cap.
    pub fn has_room(&self, pos: Position) -> bool {
        self.count(pos) < pos.roster_cap()
    }

    pub fn add(&mut self, pos: Position) {
        *self.counts.entry(pos).or_insert(0) += 1;
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

/// Count of drafted players per pick type for one manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickTypeCounts {
    counts: HashMap<PickType, u32>,
}

impl PickTypeCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pick_type: PickType) -> u32 {
        self.counts.get(&pick_type).copied().unwrap_or(0)
    }

    pub fn add(&mut self, pick_type: PickType) {
        *self.counts.entry(pick_type).or_insert(0) += 1;
    }
}

/// Per-year pick-type quotas from a manager profile. Types without an entry
/// have a quota of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickTypeQuotas {
    quotas: HashMap<PickType, u32>,
}

impl PickTypeQuotas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pick_type: PickType, quota: u32) -> Self {
        self.quotas.insert(pick_type, quota);
        self
    }

    pub fn get(&self, pick_type: PickType) -> u32 {
        self.quotas.get(&pick_type).copied().unwrap_or(0)
    }

    /// Whether the manager still owes picks of this type.
    pub fn is_unmet(&self, pick_type: PickType, counts: &PickTypeCounts) -> bool {
        counts.get(pick_type) < self.get(pick_type)
    }

    /// Whether the manager had already gone past the quota before this pick.
    pub fn is_exceeded(&self, pick_type: PickType, counts: &PickTypeCounts) -> bool {
        counts.get(pick_type) > self.get(pick_type)
    }
}
