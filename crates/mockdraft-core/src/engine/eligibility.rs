// Eligibility filter: which undrafted players a manager may take this round.

use std::collections::HashSet;

use crate::draft::pick::{Player, Position};
use crate::draft::roster::Roster;
use crate::profile::ManagerProfile;

/// A position weight below this leaves the manager open to saturation
/// suppression for that position.
pub const POSITION_BIAS_THRESHOLD: f64 = 3.5;

/// Saturation suppression only applies through this round.
pub const SATURATION_LAST_ROUND: u32 = 5;

/// Everything an eligibility rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityContext<'a> {
    pub round: u32,
    pub roster: &'a Roster,
    pub profile: &'a ManagerProfile,
}

/// A single legality rule. Rules are evaluated in [`ELIGIBILITY_RULES`]
/// order and a player must pass all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityRule {
    /// The player has a recognized skill position.
    KnownPosition,
    /// The roster still has room at the player's position.
    PositionCap,
    /// No tight ends in round 1.
    NoFirstRoundTightEnd,
    /// Soft, profile-sensitive exclusion of positions the manager already
    /// stacked early and does not favor.
    PositionSaturation,
}

pub const ELIGIBILITY_RULES: [EligibilityRule; 4] = [
    EligibilityRule::KnownPosition,
    EligibilityRule::PositionCap,
    EligibilityRule::NoFirstRoundTightEnd,
    EligibilityRule::PositionSaturation,
];

impl EligibilityRule {
    pub fn permits(&self, ctx: &EligibilityContext<'_>, player: &Player) -> bool {
        let Some(pos) = player.position else {
            return false;
        };
        match self {
            EligibilityRule::KnownPosition => true,
            EligibilityRule::PositionCap => ctx.roster.has_room(pos),
            EligibilityRule::NoFirstRoundTightEnd => !(ctx.round == 1 && pos == Position::TightEnd),
            EligibilityRule::PositionSaturation => {
                !is_position_saturated(pos, ctx.round, ctx.roster, ctx.profile)
            }
        }
    }
}

/// Number already drafted at which a position becomes a saturation
/// candidate. Tight ends are governed only by the hard cap.
fn saturation_count(pos: Position) -> Option<u32> {
    match pos {
        Position::Quarterback => Some(2),
        Position::WideReceiver | Position::RunningBack => Some(3),
        Position::TightEnd => None,
    }
}

/// Whether `pos` is suppressed for this manager this round.
pub fn is_position_saturated(
    pos: Position,
    round: u32,
    roster: &Roster,
    profile: &ManagerProfile,
) -> bool {
    let Some(limit) = saturation_count(pos) else {
        return false;
    };
    roster.count(pos) >= limit
        && round <= SATURATION_LAST_ROUND
        && profile.position_weight(pos) < POSITION_BIAS_THRESHOLD
}

/// The first rule that rejects `player`, if any.
pub fn first_rejection(ctx: &EligibilityContext<'_>, player: &Player) -> Option<EligibilityRule> {
    ELIGIBILITY_RULES
        .iter()
        .copied()
        .find(|rule| !rule.permits(ctx, player))
}

pub fn can_draft(ctx: &EligibilityContext<'_>, player: &Player) -> bool {
    first_rejection(ctx, player).is_none()
}

/// Reduce the pool to undrafted players that pass every rule, preserving
/// pool order.
pub fn eligible_candidates<'a>(
    pool: &'a [Player],
    drafted: &HashSet<String>,
    ctx: &EligibilityContext<'_>,
) -> Vec<&'a Player> {
    pool.iter()
        .filter(|p| !drafted.contains(&p.id))
        .filter(|p| can_draft(ctx, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::tests::player;
    use crate::draft::pick::PickType;

    fn ctx<'a>(round: u32, roster: &'a Roster, profile: &'a ManagerProfile) -> EligibilityContext<'a> {
        EligibilityContext { round, roster, profile }
    }

    #[test]
    fn tight_end_banned_in_round_one_only() {
        let roster = Roster::new();
        let profile = ManagerProfile::generic("M");
        let te = player("TE1", Position::TightEnd, PickType::Freshman);

        assert_eq!(
            first_rejection(&ctx(1, &roster, &profile), &te),
            Some(EligibilityRule::NoFirstRoundTightEnd)
        );
        assert!(can_draft(&ctx(2, &roster, &profile), &te));
    }

    #[test]
    fn position_cap_blocks_third_tight_end() {
        let mut roster = Roster::new();
        roster.add(Position::TightEnd);
        roster.add(Position::TightEnd);
        let profile = ManagerProfile::generic("M");
        let te = player("TE3", Position::TightEnd, PickType::Upside);

        assert_eq!(
            first_rejection(&ctx(9, &roster, &profile), &te),
            Some(EligibilityRule::PositionCap)
        );
    }

    #[test]
    fn missing_position_is_never_eligible() {
        let roster = Roster::new();
        let profile = ManagerProfile::generic("M");
        let mut p = player("X", Position::WideReceiver, PickType::ReadyToContribute);
        p.position = None;
        assert_eq!(
            first_rejection(&ctx(3, &roster, &profile), &p),
            Some(EligibilityRule::KnownPosition)
        );
    }

    #[test]
    fn saturation_applies_early_to_unfavored_positions() {
        let mut roster = Roster::new();
        roster.add(Position::Quarterback);
        roster.add(Position::Quarterback);
        let mut profile = ManagerProfile::generic("M");
        let qb = player("QB3", Position::Quarterback, PickType::ReadyToContribute);

        assert_eq!(
            first_rejection(&ctx(4, &roster, &profile), &qb),
            Some(EligibilityRule::PositionSaturation)
        );
        // Past round 5 the soft exclusion lifts.
        assert!(can_draft(&ctx(6, &roster, &profile), &qb));

        // A strong position bias also lifts it.
        profile.position_weights.insert(Position::Quarterback, 3.5);
        assert!(can_draft(&ctx(4, &roster, &profile), &qb));
    }

    #[test]
    fn saturation_thresholds_per_position() {
        let profile = ManagerProfile::generic("M");
        let mut roster = Roster::new();
        for _ in 0..2 {
            roster.add(Position::WideReceiver);
            roster.add(Position::RunningBack);
        }
        assert!(!is_position_saturated(Position::WideReceiver, 2, &roster, &profile));
        roster.add(Position::WideReceiver);
        assert!(is_position_saturated(Position::WideReceiver, 2, &roster, &profile));
        assert!(!is_position_saturated(Position::RunningBack, 2, &roster, &profile));

        roster.add(Position::TightEnd);
        assert!(!is_position_saturated(Position::TightEnd, 2, &roster, &profile));
    }

    #[test]
    fn eligible_candidates_skips_drafted_and_preserves_order() {
        let pool = vec![
            player("A", Position::WideReceiver, PickType::ReadyToContribute),
            player("B", Position::TightEnd, PickType::Freshman),
            player("C", Position::RunningBack, PickType::Upside),
        ];
        let drafted: HashSet<String> = ["A".to_string()].into_iter().collect();
        let roster = Roster::new();
        let profile = ManagerProfile::generic("M");

        let ids: Vec<&str> = eligible_candidates(&pool, &drafted, &ctx(1, &roster, &profile))
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["C"]);
    }
}
