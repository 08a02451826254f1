// Player catalog types and individual pick records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::classify::NarrativeCategory;

/// ADP substituted for players without a market rank. Large enough that
/// unranked players sink to the bottom of any scored list.
pub const UNKNOWN_ADP: f64 = 1000.0;

/// Rating at or above which a freshman counts as five-star regardless of
/// the recorded star count.
pub const FIVE_STAR_RATING: f64 = 0.99;

/// Skill positions tracked on a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
    ];

    /// Parse a position abbreviation ("QB", "rb", " WR ") into a Position.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            _ => None,
        }
    }

    /// Return the display abbreviation for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
        }
    }

    /// Hard cap on how many players of this position one roster may hold.
    pub fn roster_cap(&self) -> u32 {
        match self {
            Position::TightEnd => 2,
            _ => 5,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// How a player is classified for quota purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PickType {
    Freshman,
    Upside,
    /// Ready to contribute: a proven, lower-variance player.
    #[serde(rename = "RTC", alias = "Ready to Contribute")]
    ReadyToContribute,
}

impl PickType {
    pub const ALL: [PickType; 3] = [PickType::Freshman, PickType::Upside, PickType::ReadyToContribute];

    /// Parse a pick type label. Accepts both "RTC" and the long
    /// "Ready to Contribute" spelling used by profile exports.
    pub fn from_str_type(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "FRESHMAN" => Some(PickType::Freshman),
            "UPSIDE" => Some(PickType::Upside),
            "RTC" | "READY TO CONTRIBUTE" => Some(PickType::ReadyToContribute),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            PickType::Freshman => "Freshman",
            PickType::Upside => "Upside",
            PickType::ReadyToContribute => "RTC",
        }
    }
}

impl fmt::Display for PickType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A draftable player. Immutable once the pool is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Normalized name; unique within a pool.
    pub id: String,
    /// Name as it appeared in the source data.
    pub name: String,
    /// `None` when the source row carried no usable position. Such players
    /// are never eligible for engine picks.
    pub position: Option<Position>,
    pub college: String,
    /// College after alias normalization; the key for college weights.
    pub norm_college: String,
    pub pick_type: PickType,
    pub stars: Option<f64>,
    pub rating: Option<f64>,
    pub adp: Option<f64>,
}

impl Player {
    pub fn stars_or_zero(&self) -> f64 {
        self.stars.unwrap_or(0.0)
    }

    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// ADP with unknown values pushed to [`UNKNOWN_ADP`].
    pub fn adp_or_penalty(&self) -> f64 {
        self.adp.unwrap_or(UNKNOWN_ADP)
    }

    /// A freshman with five stars or a near-perfect recruiting rating.
    pub fn is_five_star_freshman(&self) -> bool {
        self.pick_type == PickType::Freshman
            && (self.stars_or_zero() >= 5.0 || self.rating_or_zero() >= FIVE_STAR_RATING)
    }

    pub fn is_position(&self, pos: Position) -> bool {
        self.position == Some(pos)
    }
}

/// What happened at one slot of the draft order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PickOutcome {
    /// A player was taken, either by the engine or by the manager directly.
    Drafted(Player),
    /// The slot had no manager (compensatory/empty) and was passed over.
    Skipped,
    /// The engine found nobody the manager could legally take.
    NoEligible,
}

/// A single slot's result. Never mutated after it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRecord {
    pub round: u32,
    /// 1-based position in the full draft order.
    pub overall_pick: u32,
    /// Normalized manager name; empty for skipped slots.
    pub manager: String,
    pub outcome: PickOutcome,
    /// Narrative category for engine picks; `None` for manual, skipped and
    /// empty picks.
    #[serde(default)]
    pub category: Option<NarrativeCategory>,
    pub explanation: String,
}

impl PickRecord {
    pub fn player(&self) -> Option<&Player> {
        match &self.outcome {
            PickOutcome::Drafted(p) => Some(p),
            _ => None,
        }
    }

    /// Label shown on the board in place of a player name.
    pub fn player_label(&self) -> &str {
        match &self.outcome {
            PickOutcome::Drafted(p) => &p.name,
            PickOutcome::Skipped => "Pick Skipped",
            PickOutcome::NoEligible => "No eligible players left",
        }
    }
}
