//! Manager profiles: weighting tables, quotas and the historical ledger.
//!
//! Profiles are built once by the loading layer and are read-only for the
//! length of a draft. Every lookup has a documented default so a sparse or
//! partially malformed profile still drafts, just generically.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::draft::pick::{PickType, Position, FIVE_STAR_RATING};
use crate::draft::roster::PickTypeQuotas;

/// Round used when a profile records no RTC lock. Effectively "never
/// releases" for any realistic draft length.
pub const DEFAULT_RTC_LOCK_ROUND: u32 = 99;

/// A pick-type weight strictly above this marks the profile as leaning on
/// that type.
pub const PROFILE_TYPE_THRESHOLD: f64 = 7.0;

/// Coarse behavioral classification derived from pick-type weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileType {
    HeavyFreshman,
    Upside,
    Rtc,
    Mixed,
}

/// One historical pick from a manager's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub player: String,
    /// Uppercased position label as recorded. Kept as text so non-skill
    /// positions in old drafts still compare and display.
    pub position: String,
    pub pick_type: Option<PickType>,
    pub stars: Option<f64>,
    pub rating: Option<f64>,
    pub adp: Option<f64>,
}

impl LedgerEntry {
    pub fn is_position(&self, pos: Position) -> bool {
        self.position == pos.display_str()
    }

    pub fn is_five_star_freshman(&self) -> bool {
        self.pick_type == Some(PickType::Freshman)
            && (self.stars.unwrap_or(0.0) >= 5.0 || self.rating.unwrap_or(0.0) >= FIVE_STAR_RATING)
    }
}

/// Year → round → pick. Ordered maps keep every walk deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftLedger {
    years: BTreeMap<i32, BTreeMap<u32, LedgerEntry>>,
}

impl DraftLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, year: i32, round: u32, entry: LedgerEntry) {
        self.years.entry(year).or_default().insert(round, entry);
    }

    /// Ledger years strictly before `current_year`, most recent first.
    pub fn years_before(&self, current_year: i32) -> Vec<i32> {
        self.years
            .keys()
            .rev()
            .copied()
            .filter(|&y| y < current_year)
            .collect()
    }

    pub fn pick_at(&self, year: i32, round: u32) -> Option<&LedgerEntry> {
        self.years.get(&year).and_then(|rounds| rounds.get(&round))
    }

    /// All picks for a year in round order.
    pub fn picks_in(&self, year: i32) -> impl Iterator<Item = (u32, &LedgerEntry)> {
        self.years
            .get(&year)
            .into_iter()
            .flat_map(|rounds| rounds.iter().map(|(r, e)| (*r, e)))
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Strongly typed manager profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerProfile {
    /// Normalized manager name.
    pub name: String,
    pub pick_type_weights: HashMap<PickType, f64>,
    pub position_weights: HashMap<Position, f64>,
    /// Keyed by normalized college.
    pub college_weights: HashMap<String, f64>,
    pub quotas_by_year: BTreeMap<i32, PickTypeQuotas>,
    pub rtc_lock_round: u32,
    /// The manager has a recorded habit of passing on elite freshmen.
    pub five_star_skipper: bool,
    pub history: DraftLedger,
}

impl ManagerProfile {
    /// An all-defaults profile: zero weights, zero quotas, no lock.
    pub fn generic(name: &str) -> Self {
        ManagerProfile {
            name: name.to_string(),
            rtc_lock_round: DEFAULT_RTC_LOCK_ROUND,
            ..Default::default()
        }
    }

    pub fn pick_type_weight(&self, pick_type: PickType) -> f64 {
        self.pick_type_weights.get(&pick_type).copied().unwrap_or(0.0)
    }

    pub fn position_weight(&self, pos: Position) -> f64 {
        self.position_weights.get(&pos).copied().unwrap_or(0.0)
    }

    pub fn college_weight(&self, norm_college: &str) -> f64 {
        self.college_weights.get(norm_college).copied().unwrap_or(0.0)
    }

    /// Quotas recorded for `year`, or all zero when the year is absent.
    pub fn quotas_for(&self, year: i32) -> PickTypeQuotas {
        self.quotas_by_year.get(&year).cloned().unwrap_or_default()
    }

    /// Derived profile type. Freshman is checked first, then Upside, then RTC.
    pub fn profile_type(&self) -> ProfileType {
        if self.pick_type_weight(PickType::Freshman) > PROFILE_TYPE_THRESHOLD {
            ProfileType::HeavyFreshman
        } else if self.pick_type_weight(PickType::Upside) > PROFILE_TYPE_THRESHOLD {
            ProfileType::Upside
        } else if self.pick_type_weight(PickType::ReadyToContribute) > PROFILE_TYPE_THRESHOLD {
            ProfileType::Rtc
        } else {
            ProfileType::Mixed
        }
    }
}

/// All manager profiles for a run, keyed by normalized manager name.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profiles: HashMap<String, ManagerProfile>,
}

impl ProfileStore {
    pub fn new(profiles: impl IntoIterator<Item = ManagerProfile>) -> Self {
        ProfileStore {
            profiles: profiles.into_iter().map(|p| (p.name.clone(), p)).collect(),
        }
    }

    pub fn get(&self, manager: &str) -> Option<&ManagerProfile> {
        self.profiles.get(manager)
    }

    /// The manager's profile, or a generic one when none was loaded.
    pub fn get_or_generic(&self, manager: &str) -> std::borrow::Cow<'_, ManagerProfile> {
        match self.profiles.get(manager) {
            Some(p) => std::borrow::Cow::Borrowed(p),
            None => std::borrow::Cow::Owned(ManagerProfile::generic(manager)),
        }
    }

    pub fn managers(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
