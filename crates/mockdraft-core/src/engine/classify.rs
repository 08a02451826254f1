// Pick classification into narrative categories.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::draft::pick::{PickType, Player};
use crate::profile::ProfileType;

/// Closed set of narrative categories. Exactly one applies to every engine
/// pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeCategory {
    Forced,
    RtcOutlier,
    FreshmanElite,
    FreshmanHeavy,
    FreshmanMixed,
    Upside,
    RtcProfile,
    Pragmatic,
}

impl NarrativeCategory {
    pub const ALL: [NarrativeCategory; 8] = [
        NarrativeCategory::Forced,
        NarrativeCategory::RtcOutlier,
        NarrativeCategory::FreshmanElite,
        NarrativeCategory::FreshmanHeavy,
        NarrativeCategory::FreshmanMixed,
        NarrativeCategory::Upside,
        NarrativeCategory::RtcProfile,
        NarrativeCategory::Pragmatic,
    ];

    /// Snake-case key, used for template overrides and persistence.
    pub fn key(&self) -> &'static str {
        match self {
            NarrativeCategory::Forced => "forced",
            NarrativeCategory::RtcOutlier => "rtc_outlier",
            NarrativeCategory::FreshmanElite => "freshman_elite",
            NarrativeCategory::FreshmanHeavy => "freshman_heavy",
            NarrativeCategory::FreshmanMixed => "freshman_mixed",
            NarrativeCategory::Upside => "upside",
            NarrativeCategory::RtcProfile => "rtc_profile",
            NarrativeCategory::Pragmatic => "pragmatic",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    fn matches(&self, input: &ClassifyInput<'_>, elite: &EliteSet) -> bool {
        let pick_type = input.player.pick_type;
        match self {
            NarrativeCategory::Forced => input.outlier || input.quota_exceeded,
            NarrativeCategory::RtcOutlier => {
                pick_type == PickType::ReadyToContribute && input.round < input.rtc_lock_round
            }
            NarrativeCategory::FreshmanElite => {
                pick_type == PickType::Freshman
                    && (elite.contains(&input.player.id) || input.player.stars_or_zero() >= 5.0)
            }
            NarrativeCategory::FreshmanHeavy => {
                pick_type == PickType::Freshman && input.profile_type == ProfileType::HeavyFreshman
            }
            NarrativeCategory::FreshmanMixed => pick_type == PickType::Freshman,
            NarrativeCategory::Upside => pick_type == PickType::Upside,
            NarrativeCategory::RtcProfile => pick_type == PickType::ReadyToContribute,
            NarrativeCategory::Pragmatic => true,
        }
    }
}

/// Category precedence: the first matching entry wins.
pub const CLASSIFICATION_ORDER: [NarrativeCategory; 8] = NarrativeCategory::ALL;

/// Normalized names of the consensus elite freshmen.
#[derive(Debug, Clone, Default)]
pub struct EliteSet {
    ids: HashSet<String>,
}

impl EliteSet {
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        EliteSet {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

/// Inputs to classification for one pick.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyInput<'a> {
    pub player: &'a Player,
    pub round: u32,
    pub profile_type: ProfileType,
    pub outlier: bool,
    pub quota_exceeded: bool,
    pub rtc_lock_round: u32,
}

/// Resolve the single narrative category for a pick.
pub fn classify(input: &ClassifyInput<'_>, elite: &EliteSet) -> NarrativeCategory {
    CLASSIFICATION_ORDER
        .into_iter()
        .find(|category| category.matches(input, elite))
        .unwrap_or(NarrativeCategory::Pragmatic)
}
