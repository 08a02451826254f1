// Decision cascade: quota forcing, early-round lock, roster safeguards.
//
// Candidates are ranked once. Each rule narrows the ranked list to a subset;
// the first rule that applies and leaves at least one candidate makes the
// pick by sampling the top tier of that subset. Later rules never run.

use rand::Rng;
use tracing::debug;

use crate::draft::pick::{PickType, Player, Position};
use crate::draft::roster::{PickTypeCounts, PickTypeQuotas, Roster};
use crate::profile::ManagerProfile;

use super::scoring::{rank, sample_top, ScoredCandidate};

/// From this round on, a manager without a tight end is steered to one.
pub const TIGHT_END_SAFEGUARD_ROUND: u32 = 6;

/// Quota types forced before anything else, in this order.
const FORCED_QUOTA_TYPES: [PickType; 2] = [PickType::Freshman, PickType::Upside];

/// Snapshot of everything the cascade may consult for one pick.
#[derive(Debug, Clone, Copy)]
pub struct PickContext<'a> {
    pub round: u32,
    pub profile: &'a ManagerProfile,
    pub quotas: &'a PickTypeQuotas,
    pub counts: &'a PickTypeCounts,
    pub roster: &'a Roster,
}

impl PickContext<'_> {
    pub fn rtc_lock_round(&self) -> u32 {
        self.profile.rtc_lock_round
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeRule {
    /// Unmet Freshman, then Upside, quota restricts to that type.
    QuotaForcing,
    /// Before the RTC lock round, prefer Freshman/Upside, else RTC.
    EarlyRoundLock,
    /// Unmet RTC quota restricts to RTC.
    RtcQuota,
    /// Round 6+ with no tight end restricts to freshman tight ends.
    TightEndSafeguard,
    /// No restriction.
    Fallback,
}

pub const DECISION_CASCADE: [CascadeRule; 5] = [
    CascadeRule::QuotaForcing,
    CascadeRule::EarlyRoundLock,
    CascadeRule::RtcQuota,
    CascadeRule::TightEndSafeguard,
    CascadeRule::Fallback,
];

/// A narrowed candidate list and whether a pick from it is an outlier.
struct Restriction<'a> {
    candidates: Vec<ScoredCandidate<'a>>,
    outlier: bool,
}

fn only<'a, F>(ranked: &[ScoredCandidate<'a>], keep: F) -> Vec<ScoredCandidate<'a>>
where
    F: Fn(&Player) -> bool,
{
    ranked.iter().filter(|c| keep(c.player)).copied().collect()
}

impl CascadeRule {
    /// Apply this rule to the ranked candidates. Returns `None` when the
    /// precondition fails or every subset it tries is empty.
    fn restrict<'a>(
        &self,
        ctx: &PickContext<'_>,
        ranked: &[ScoredCandidate<'a>],
    ) -> Option<Restriction<'a>> {
        let pick = |candidates: Vec<ScoredCandidate<'a>>, outlier: bool| {
            (!candidates.is_empty()).then_some(Restriction { candidates, outlier })
        };

        match self {
            CascadeRule::QuotaForcing => FORCED_QUOTA_TYPES.iter().find_map(|&pick_type| {
                if !ctx.quotas.is_unmet(pick_type, ctx.counts) {
                    return None;
                }
                let of_type = only(ranked, |p| p.pick_type == pick_type);
                if of_type.is_empty() {
                    return None;
                }
                if pick_type == PickType::Freshman && !ctx.profile.five_star_skipper {
                    let elite = only(&of_type, Player::is_five_star_freshman);
                    if !elite.is_empty() {
                        return pick(elite, false);
                    }
                }
                pick(of_type, false)
            }),
            CascadeRule::EarlyRoundLock => {
                if ctx.round >= ctx.rtc_lock_round() {
                    return None;
                }
                let prospects = only(ranked, |p| {
                    matches!(p.pick_type, PickType::Freshman | PickType::Upside)
                });
                // The reach for a prospect is the outlier. Settling for RTC
                // inside the lock stays ordinary so it classifies as an
                // early RTC pick rather than a forced one.
                pick(prospects, true)
                    .or_else(|| pick(only(ranked, |p| p.pick_type == PickType::ReadyToContribute), false))
            }
            CascadeRule::RtcQuota => {
                if !ctx.quotas.is_unmet(PickType::ReadyToContribute, ctx.counts) {
                    return None;
                }
                pick(only(ranked, |p| p.pick_type == PickType::ReadyToContribute), false)
            }
            CascadeRule::TightEndSafeguard => {
                if ctx.round < TIGHT_END_SAFEGUARD_ROUND || ctx.roster.count(Position::TightEnd) > 0 {
                    return None;
                }
                pick(
                    only(ranked, |p| {
                        p.pick_type == PickType::Freshman && p.is_position(Position::TightEnd)
                    }),
                    true,
                )
            }
            CascadeRule::Fallback => pick(ranked.to_vec(), true),
        }
    }
}

/// The engine's choice for one pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision<'a> {
    pub player: &'a Player,
    pub rule: CascadeRule,
    /// The pick left the manager's normal quota-satisfying behavior.
    pub outlier: bool,
    /// The manager already held more of this pick type than the quota.
    pub quota_exceeded: bool,
}

impl Decision<'_> {
    /// Whether the pick classifies as forced.
    pub fn is_forced(&self) -> bool {
        self.outlier || self.quota_exceeded
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
    Chosen(Decision<'a>),
    NoEligible,
}

/// Run the cascade over already-eligible candidates. Pure apart from the
/// injected random source.
pub fn select<'a, R: Rng + ?Sized>(
    candidates: &[&'a Player],
    ctx: &PickContext<'_>,
    rng: &mut R,
) -> Selection<'a> {
    if candidates.is_empty() {
        return Selection::NoEligible;
    }
    let ranked = rank(candidates, ctx.profile);

    for rule in DECISION_CASCADE {
        let Some(restriction) = rule.restrict(ctx, &ranked) else {
            continue;
        };
        let Some(player) = sample_top(&restriction.candidates, rng) else {
            continue;
        };
        let quota_exceeded = ctx.quotas.is_exceeded(player.pick_type, ctx.counts);
        debug!(
            manager = %ctx.profile.name,
            round = ctx.round,
            ?rule,
            pool = restriction.candidates.len(),
            player = %player.id,
            "cascade decision"
        );
        return Selection::Chosen(Decision {
            player,
            rule,
            outlier: restriction.outlier,
            quota_exceeded,
        });
    }

    Selection::NoEligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::tests::player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Fixture {
        profile: ManagerProfile,
        quotas: PickTypeQuotas,
        counts: PickTypeCounts,
        roster: Roster,
    }

    impl Fixture {
        fn new(rtc_lock_round: u32) -> Self {
            let mut profile = ManagerProfile::generic("M");
            profile.rtc_lock_round = rtc_lock_round;
            Fixture {
                profile,
                quotas: PickTypeQuotas::new(),
                counts: PickTypeCounts::new(),
                roster: Roster::new(),
            }
        }

        fn ctx(&self, round: u32) -> PickContext<'_> {
            PickContext {
                round,
                profile: &self.profile,
                quotas: &self.quotas,
                counts: &self.counts,
                roster: &self.roster,
            }
        }
    }

    fn rated(id: &str, pos: Position, pick_type: PickType, rating: f64, adp: f64) -> Player {
        let mut p = player(id, pos, pick_type);
        p.rating = Some(rating);
        p.adp = Some(adp);
        p
    }

    fn chosen<'a>(selection: Selection<'a>) -> Decision<'a> {
        match selection {
            Selection::Chosen(d) => d,
            Selection::NoEligible => panic!("expected a pick"),
        }
    }

    #[test]
    fn empty_candidates_signal_no_eligible() {
        let fx = Fixture::new(1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(select(&[], &fx.ctx(1), &mut rng), Selection::NoEligible);
    }

    #[test]
    fn freshman_quota_prefers_five_star() {
        let mut fx = Fixture::new(1);
        fx.quotas = PickTypeQuotas::new().with(PickType::Freshman, 1);

        let mut star = rated("STAR", Position::RunningBack, PickType::Freshman, 0.90, 300.0);
        star.stars = Some(5.0);
        let pool = vec![
            rated("F1", Position::WideReceiver, PickType::Freshman, 0.95, 20.0),
            rated("F2", Position::WideReceiver, PickType::Freshman, 0.94, 21.0),
            star,
            rated("R1", Position::Quarterback, PickType::ReadyToContribute, 0.99, 1.0),
        ];
        let refs: Vec<&Player> = pool.iter().collect();

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let d = chosen(select(&refs, &fx.ctx(2), &mut rng));
            assert_eq!(d.player.id, "STAR");
            assert_eq!(d.rule, CascadeRule::QuotaForcing);
            assert!(!d.is_forced());
        }
    }

    #[test]
    fn five_star_skipper_draws_from_all_freshmen() {
        let mut fx = Fixture::new(1);
        fx.quotas = PickTypeQuotas::new().with(PickType::Freshman, 1);
        fx.profile.five_star_skipper = true;

        let mut star = rated("STAR", Position::RunningBack, PickType::Freshman, 0.90, 900.0);
        star.stars = Some(5.0);
        let mut pool: Vec<Player> = (0..5)
            .map(|i| rated(&format!("F{i}"), Position::WideReceiver, PickType::Freshman, 0.9, i as f64))
            .collect();
        pool.push(star);
        let refs: Vec<&Player> = pool.iter().collect();

        // STAR ranks sixth on ADP so it is never in the top tier.
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let d = chosen(select(&refs, &fx.ctx(2), &mut rng));
            assert_ne!(d.player.id, "STAR");
            assert_eq!(d.player.pick_type, PickType::Freshman);
        }
    }

    #[test]
    fn upside_quota_considered_after_freshman_met() {
        let mut fx = Fixture::new(1);
        fx.quotas = PickTypeQuotas::new()
            .with(PickType::Freshman, 1)
            .with(PickType::Upside, 1);
        fx.counts.add(PickType::Freshman);

        let pool = vec![
            rated("F", Position::WideReceiver, PickType::Freshman, 0.99, 1.0),
            rated("U", Position::WideReceiver, PickType::Upside, 0.10, 200.0),
        ];
        let refs: Vec<&Player> = pool.iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let d = chosen(select(&refs, &fx.ctx(4), &mut rng));
        assert_eq!(d.player.id, "U");
        assert_eq!(d.rule, CascadeRule::QuotaForcing);
    }

    #[test]
    fn unmet_freshman_quota_without_freshmen_falls_through() {
        let mut fx = Fixture::new(1);
        fx.quotas = PickTypeQuotas::new().with(PickType::Freshman, 2);
        let pool = vec![rated("R", Position::RunningBack, PickType::ReadyToContribute, 0.5, 40.0)];
        let refs: Vec<&Player> = pool.iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let d = chosen(select(&refs, &fx.ctx(2), &mut rng));
        assert_eq!(d.rule, CascadeRule::Fallback);
        assert!(d.outlier);
    }

    #[test]
    fn early_lock_prefers_prospects_over_better_rtc() {
        let fx = Fixture::new(4);
        let pool = vec![
            rated("R1", Position::Quarterback, PickType::ReadyToContribute, 0.99, 1.0),
            rated("R2", Position::Quarterback, PickType::ReadyToContribute, 0.99, 2.0),
            rated("U", Position::WideReceiver, PickType::Upside, 0.10, 150.0),
        ];
        let refs: Vec<&Player> = pool.iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let d = chosen(select(&refs, &fx.ctx(2), &mut rng));
        assert_eq!(d.player.id, "U");
        assert_eq!(d.rule, CascadeRule::EarlyRoundLock);
        assert!(d.outlier);
    }

    #[test]
    fn early_lock_settles_for_rtc_without_outlier_flag() {
        let fx = Fixture::new(3);
        let pool = vec![
            rated("R1", Position::Quarterback, PickType::ReadyToContribute, 0.8, 10.0),
            rated("R2", Position::WideReceiver, PickType::ReadyToContribute, 0.7, 12.0),
        ];
        let refs: Vec<&Player> = pool.iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let d = chosen(select(&refs, &fx.ctx(1), &mut rng));
        assert_eq!(d.player.pick_type, PickType::ReadyToContribute);
        assert_eq!(d.rule, CascadeRule::EarlyRoundLock);
        assert!(!d.is_forced());
    }

    #[test]
    fn rtc_quota_after_lock_releases() {
        let mut fx = Fixture::new(2);
        fx.quotas = PickTypeQuotas::new().with(PickType::ReadyToContribute, 3);
        let pool = vec![
            rated("F", Position::WideReceiver, PickType::Freshman, 0.99, 1.0),
            rated("R", Position::WideReceiver, PickType::ReadyToContribute, 0.2, 180.0),
        ];
        let refs: Vec<&Player> = pool.iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let d = chosen(select(&refs, &fx.ctx(2), &mut rng));
        assert_eq!(d.player.id, "R");
        assert_eq!(d.rule, CascadeRule::RtcQuota);
        assert!(!d.is_forced());
    }

    #[test]
    fn tight_end_safeguard_from_round_six() {
        let fx = Fixture::new(1);
        let pool = vec![
            rated("W1", Position::WideReceiver, PickType::Freshman, 0.99, 1.0),
            rated("W2", Position::WideReceiver, PickType::Freshman, 0.98, 2.0),
            rated("TE", Position::TightEnd, PickType::Freshman, 0.50, 200.0),
        ];
        let refs: Vec<&Player> = pool.iter().collect();

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let d = chosen(select(&refs, &fx.ctx(6), &mut rng));
        assert_eq!(d.player.id, "TE");
        assert_eq!(d.rule, CascadeRule::TightEndSafeguard);
        assert!(d.is_forced());

        // Round 5 is too early for the safeguard.
        let d = chosen(select(&refs, &fx.ctx(5), &mut rng));
        assert_eq!(d.rule, CascadeRule::Fallback);
    }

    #[test]
    fn tight_end_safeguard_skipped_when_roster_has_one() {
        let mut fx = Fixture::new(1);
        fx.roster.add(Position::TightEnd);
        let pool = vec![
            rated("W1", Position::WideReceiver, PickType::Freshman, 0.99, 1.0),
            rated("TE", Position::TightEnd, PickType::Freshman, 0.50, 200.0),
        ];
        let refs: Vec<&Player> = pool.iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let d = chosen(select(&refs, &fx.ctx(8), &mut rng));
        assert_eq!(d.rule, CascadeRule::Fallback);
    }

    #[test]
    fn quota_exceeded_flags_ordinary_branch() {
        let mut fx = Fixture::new(1);
        fx.quotas = PickTypeQuotas::new()
            .with(PickType::Freshman, 1)
            .with(PickType::ReadyToContribute, 3);
        fx.counts.add(PickType::Freshman);
        fx.counts.add(PickType::Freshman);

        let pool = vec![rated("R", Position::RunningBack, PickType::ReadyToContribute, 0.5, 50.0)];
        let refs: Vec<&Player> = pool.iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let d = chosen(select(&refs, &fx.ctx(3), &mut rng));
        assert_eq!(d.rule, CascadeRule::RtcQuota);
        assert!(!d.quota_exceeded);

        fx.counts.add(PickType::ReadyToContribute);
        fx.counts.add(PickType::ReadyToContribute);
        fx.counts.add(PickType::ReadyToContribute);
        fx.counts.add(PickType::ReadyToContribute);
        let d = chosen(select(&refs, &fx.ctx(3), &mut rng));
        assert_eq!(d.rule, CascadeRule::Fallback);
        assert!(d.quota_exceeded);
    }

    #[test]
    fn same_seed_same_pick() {
        let fx = Fixture::new(1);
        let pool: Vec<Player> = (0..10)
            .map(|i| rated(&format!("P{i}"), Position::WideReceiver, PickType::Upside, 0.5, i as f64))
            .collect();
        let refs: Vec<&Player> = pool.iter().collect();

        let a = chosen(select(&refs, &fx.ctx(3), &mut ChaCha8Rng::seed_from_u64(42)));
        let b = chosen(select(&refs, &fx.ctx(3), &mut ChaCha8Rng::seed_from_u64(42)));
        assert_eq!(a.player.id, b.player.id);
    }
}
