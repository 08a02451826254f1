// Draft orchestrator: walks the draft order one slot at a time.
//
// Decisions are computed against a read-only view of `DraftState` and then
// applied with a single `DraftState::record` call, so stopping between any
// two picks leaves the state consistent.

use std::collections::HashSet;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::draft::pick::{PickOutcome, PickRecord, Player};
use crate::draft::state::DraftState;
use crate::engine::cascade::{select, PickContext, Selection};
use crate::engine::classify::{classify, ClassifyInput, EliteSet, NarrativeCategory};
use crate::engine::eligibility::{eligible_candidates, EligibilityContext};
use crate::engine::history::annotate;
use crate::engine::scoring::{profile_score, rank_by, sample_top};
use crate::error::DraftError;
use crate::narrative::{
    explain, manual_explanation, TemplateSource, TemplateTable, NO_ELIGIBLE_EXPLANATION,
    SKIPPED_EXPLANATION,
};
use crate::profile::{ManagerProfile, ProfileStore, DEFAULT_RTC_LOCK_ROUND};

/// One entry of the draft order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSlot {
    pub round: u32,
    /// 1-based index into the full order.
    pub overall_pick: u32,
    /// `None` for a compensatory or empty slot that is passed over.
    pub manager: Option<String>,
}

/// Per-run settings that are not part of any one manager's profile.
#[derive(Debug, Clone)]
pub struct DraftSettings {
    /// Year being drafted. History lookups only consider earlier years.
    pub year: i32,
    /// Year whose per-manager quotas apply.
    pub quota_year: i32,
    /// Consensus elite freshmen, by normalized name.
    pub elite: EliteSet,
    /// Consensus top prospects, by normalized name, best first.
    pub consensus_top: Vec<String>,
    /// How many opening round-one slots take from `consensus_top`.
    pub opening_picks: usize,
}

impl DraftSettings {
    pub fn new(year: i32) -> Self {
        DraftSettings {
            year,
            quota_year: year.saturating_sub(1),
            elite: EliteSet::default(),
            consensus_top: Vec::new(),
            opening_picks: 0,
        }
    }
}

/// Random source for a run: reproducible when seeded.
pub fn draft_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Everything that stays fixed for a draft run.
pub struct DraftSession<T = TemplateTable> {
    pool: Vec<Player>,
    profiles: ProfileStore,
    order: Vec<DraftSlot>,
    settings: DraftSettings,
    templates: T,
}

impl<T: TemplateSource> DraftSession<T> {
    pub fn new(
        pool: Vec<Player>,
        profiles: ProfileStore,
        order: Vec<DraftSlot>,
        settings: DraftSettings,
        templates: T,
    ) -> Self {
        DraftSession {
            pool,
            profiles,
            order,
            settings,
            templates,
        }
    }

    pub fn pool(&self) -> &[Player] {
        &self.pool
    }

    pub fn order(&self) -> &[DraftSlot] {
        &self.order
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn settings(&self) -> &DraftSettings {
        &self.settings
    }

    pub fn find_player(&self, player_id: &str) -> Option<&Player> {
        self.pool.iter().find(|p| p.id == player_id)
    }

    /// The slot the next pick fills, if any remain.
    pub fn current_slot(&self, state: &DraftState) -> Option<&DraftSlot> {
        self.order.get(state.next_slot())
    }

    pub fn is_complete(&self, state: &DraftState) -> bool {
        state.next_slot() >= self.order.len()
    }

    /// Decide the next slot without touching `state`.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        state: &DraftState,
        rng: &mut R,
    ) -> Result<PickRecord, DraftError> {
        let index = state.next_slot();
        let slot = self.order.get(index).ok_or(DraftError::DraftComplete)?;

        let Some(manager) = slot.manager.as_deref() else {
            return Ok(PickRecord {
                round: slot.round,
                overall_pick: slot.overall_pick,
                manager: String::new(),
                outcome: PickOutcome::Skipped,
                category: None,
                explanation: SKIPPED_EXPLANATION.to_string(),
            });
        };

        let profile = self.profiles.get_or_generic(manager);
        let manager_state = state.manager(manager);
        let eligibility = EligibilityContext {
            round: slot.round,
            roster: &manager_state.roster,
            profile: &profile,
        };
        let candidates = eligible_candidates(&self.pool, state.drafted(), &eligibility);

        if let Some(record) = self.consensus_opening(index, slot, &profile, &candidates, rng) {
            return Ok(record);
        }

        let quotas = profile.quotas_for(self.settings.quota_year);
        let ctx = PickContext {
            round: slot.round,
            profile: &profile,
            quotas: &quotas,
            counts: &manager_state.type_counts,
            roster: &manager_state.roster,
        };
        let decision = match select(&candidates, &ctx, rng) {
            Selection::Chosen(decision) => decision,
            Selection::NoEligible => {
                debug!(manager, round = slot.round, "no eligible players");
                return Ok(PickRecord {
                    round: slot.round,
                    overall_pick: slot.overall_pick,
                    manager: manager.to_string(),
                    outcome: PickOutcome::NoEligible,
                    category: None,
                    explanation: NO_ELIGIBLE_EXPLANATION.to_string(),
                });
            }
        };

        let category = classify(
            &ClassifyInput {
                player: decision.player,
                round: slot.round,
                profile_type: profile.profile_type(),
                outlier: decision.outlier,
                quota_exceeded: decision.quota_exceeded,
                rtc_lock_round: profile.rtc_lock_round,
            },
            &self.settings.elite,
        );
        Ok(self.engine_record(slot, &profile, decision.player, category, rng))
    }

    /// Round-one opening slots go to the best remaining consensus prospect,
    /// scored without market rank.
    fn consensus_opening<R: Rng + ?Sized>(
        &self,
        index: usize,
        slot: &DraftSlot,
        profile: &ManagerProfile,
        candidates: &[&Player],
        rng: &mut R,
    ) -> Option<PickRecord> {
        if slot.round != 1 || index >= self.settings.opening_picks {
            return None;
        }
        let top: HashSet<&str> = self.settings.consensus_top.iter().map(String::as_str).collect();
        let remaining: Vec<&Player> = candidates
            .iter()
            .copied()
            .filter(|p| top.contains(p.id.as_str()))
            .collect();
        let ranked = rank_by(&remaining, |p| profile_score(p, profile));
        let player = sample_top(&ranked, rng)?;

        let category = classify(
            &ClassifyInput {
                player,
                round: slot.round,
                profile_type: profile.profile_type(),
                outlier: false,
                quota_exceeded: false,
                rtc_lock_round: DEFAULT_RTC_LOCK_ROUND,
            },
            &self.settings.elite,
        );
        Some(self.engine_record(slot, profile, player, category, rng))
    }

    fn engine_record<R: Rng + ?Sized>(
        &self,
        slot: &DraftSlot,
        profile: &ManagerProfile,
        player: &Player,
        category: NarrativeCategory,
        rng: &mut R,
    ) -> PickRecord {
        let note = annotate(player, slot.round, self.settings.year, &profile.history);
        // Templates draw from their own generator, seeded by exactly one
        // draw from the pick stream, so the table in use never shifts later
        // picks.
        let mut narrative_rng = ChaCha8Rng::seed_from_u64(rng.next_u64());
        let explanation = explain(
            &self.templates,
            category,
            &profile.name,
            player,
            slot.round,
            note.as_ref(),
            &mut narrative_rng,
        );
        PickRecord {
            round: slot.round,
            overall_pick: slot.overall_pick,
            manager: profile.name.clone(),
            outcome: PickOutcome::Drafted(player.clone()),
            category: Some(category),
            explanation,
        }
    }

    /// Decide and apply the next slot.
    pub fn step<R: Rng + ?Sized>(
        &self,
        state: &mut DraftState,
        rng: &mut R,
    ) -> Result<PickRecord, DraftError> {
        let record = self.decide(state, rng)?;
        state.record(record.clone())?;
        info!(
            pick = record.overall_pick,
            round = record.round,
            manager = %record.manager,
            player = record.player_label(),
            "pick recorded"
        );
        Ok(record)
    }

    /// Fill the next slot with a player the manager chose. Any undrafted
    /// player in the pool is allowed.
    pub fn manual_pick(
        &self,
        state: &mut DraftState,
        player_id: &str,
    ) -> Result<PickRecord, DraftError> {
        let slot = self.current_slot(state).ok_or(DraftError::DraftComplete)?;
        let manager = slot.manager.as_deref().ok_or(DraftError::NoManager {
            overall_pick: slot.overall_pick,
        })?;
        let player = self
            .find_player(player_id)
            .ok_or_else(|| DraftError::UnknownPlayer {
                player_id: player_id.to_string(),
            })?;

        let record = PickRecord {
            round: slot.round,
            overall_pick: slot.overall_pick,
            manager: manager.to_string(),
            outcome: PickOutcome::Drafted(player.clone()),
            category: None,
            explanation: manual_explanation(manager, player),
        };
        state.record(record.clone())?;
        info!(pick = record.overall_pick, manager, player = %player.name, "manual pick recorded");
        Ok(record)
    }

    /// Simulate picks until the draft ends or the next slot belongs to
    /// `stop_at`. Returns the records made. On error, the picks made before
    /// it stay applied to `state` (see `DraftState::picks`).
    pub fn run_until<R: Rng + ?Sized>(
        &self,
        state: &mut DraftState,
        rng: &mut R,
        stop_at: Option<&str>,
    ) -> Result<Vec<PickRecord>, DraftError> {
        let mut made = Vec::new();
        while let Some(slot) = self.current_slot(state) {
            if stop_at.is_some() && slot.manager.as_deref() == stop_at {
                break;
            }
            made.push(self.step(state, rng)?);
        }
        Ok(made)
    }
}
