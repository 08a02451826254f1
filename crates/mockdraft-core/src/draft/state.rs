// Draft state: drafted set, per-manager counters, recorded picks.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::pick::{PickOutcome, PickRecord, Player};
use super::roster::{PickTypeCounts, Roster};
use crate::error::DraftError;

/// The mutable counters for one manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerState {
    pub roster: Roster,
    pub type_counts: PickTypeCounts,
}

/// The complete mutable state of a draft run.
///
/// Owned by the caller. Decision functions read it; only [`DraftState::record`]
/// changes it, and every change for one pick happens together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftState {
    /// Ids of every player taken so far, across all managers.
    drafted: HashSet<String>,
    managers: HashMap<String, ManagerState>,
    /// All recorded picks in draft order. One per processed slot.
    picks: Vec<PickRecord>,
}

impl DraftState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drafted(&self, player_id: &str) -> bool {
        self.drafted.contains(player_id)
    }

    pub fn drafted(&self) -> &HashSet<String> {
        &self.drafted
    }

    /// Counters for a manager; a fresh zeroed state if they have not
    /// picked yet.
    pub fn manager(&self, name: &str) -> ManagerState {
        self.managers.get(name).cloned().unwrap_or_default()
    }

    pub fn picks(&self) -> &[PickRecord] {
        &self.picks
    }

    /// Index of the next draft-order slot to process.
    pub fn next_slot(&self) -> usize {
        self.picks.len()
    }

    /// Players the manager has taken so far, in pick order.
    pub fn players_for<'a>(&'a self, manager: &'a str) -> impl Iterator<Item = &'a Player> + 'a {
        self.picks
            .iter()
            .filter(move |r| r.manager == manager)
            .filter_map(PickRecord::player)
    }

    /// Undrafted players from `pool`, in pool order.
    pub fn available<'a>(&'a self, pool: &'a [Player]) -> impl Iterator<Item = &'a Player> + 'a {
        pool.iter().filter(move |p| !self.drafted.contains(&p.id))
    }

    /// Apply a finished pick: drafted set, roster, pick-type counts and the
    /// record itself. Either all of it is applied or, on error, none of it.
    pub fn record(&mut self, record: PickRecord) -> Result<(), DraftError> {
        if let PickOutcome::Drafted(player) = &record.outcome {
            if self.drafted.contains(&player.id) {
                return Err(DraftError::AlreadyDrafted {
                    player_id: player.id.clone(),
                });
            }
            self.drafted.insert(player.id.clone());
            let entry = self.managers.entry(record.manager.clone()).or_default();
            if let Some(pos) = player.position {
                entry.roster.add(pos);
            }
            entry.type_counts.add(player.pick_type);
        }
        self.picks.push(record);
        Ok(())
    }

    /// Rebuild the state by replaying saved picks from scratch. Picks must
    /// fill consecutive slots starting at #1 and must each still apply; on
    /// the first that does not, `self` is left unchanged.
    pub fn restore_from_picks(&mut self, picks: Vec<PickRecord>) -> Result<(), DraftError> {
        let mut restored = DraftState::new();
        for pick in picks {
            let expected = restored.picks.len() as u32 + 1;
            if pick.overall_pick != expected {
                return Err(DraftError::OutOfSequence {
                    expected,
                    found: pick.overall_pick,
                });
            }
            restored.record(pick)?;
        }
        *self = restored;
        Ok(())
    }
}
