// Composite candidate scoring and top-tier sampling.

use rand::Rng;

use crate::draft::pick::Player;
use crate::profile::ManagerProfile;

pub const RATING_WEIGHT: f64 = 1.0;
pub const STARS_WEIGHT: f64 = 0.8;
pub const POSITION_WEIGHT: f64 = 0.08;
pub const COLLEGE_WEIGHT: f64 = 0.008;
pub const ADP_PENALTY: f64 = 0.03;

/// How many of the best-scored candidates are eligible for the final draw.
pub const TOP_TIER: usize = 5;

/// A candidate paired with its composite score.
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub player: &'a Player,
    pub score: f64,
}

/// Score ignoring market rank: talent plus the manager's position and
/// college leanings.
pub fn profile_score(player: &Player, profile: &ManagerProfile) -> f64 {
    let pos_bias = player.position.map(|p| profile.position_weight(p)).unwrap_or(0.0);
    player.rating_or_zero() * RATING_WEIGHT
        + player.stars_or_zero() * STARS_WEIGHT
        + pos_bias * POSITION_WEIGHT
        + profile.college_weight(&player.norm_college) * COLLEGE_WEIGHT
}

/// Full composite score. Higher is better; unknown ADP is penalized as a
/// very late pick.
pub fn score(player: &Player, profile: &ManagerProfile) -> f64 {
    profile_score(player, profile) - player.adp_or_penalty() * ADP_PENALTY
}

/// Score and sort candidates best-first with `score_fn`. The sort is stable,
/// so equal scores keep their input order and the ranking is reproducible.
pub fn rank_by<'a, F>(candidates: &[&'a Player], mut score_fn: F) -> Vec<ScoredCandidate<'a>>
where
    F: FnMut(&Player) -> f64,
{
    let mut scored: Vec<ScoredCandidate<'a>> = candidates
        .iter()
        .map(|&player| ScoredCandidate {
            player,
            score: score_fn(player),
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Rank candidates by the full composite score.
pub fn rank<'a>(candidates: &[&'a Player], profile: &ManagerProfile) -> Vec<ScoredCandidate<'a>> {
    rank_by(candidates, |p| score(p, profile))
}

/// Draw uniformly from the first [`TOP_TIER`] entries of an already ranked
/// list. Returns `None` only when the list is empty.
pub fn sample_top<'a, R: Rng + ?Sized>(
    ranked: &[ScoredCandidate<'a>],
    rng: &mut R,
) -> Option<&'a Player> {
    let tier = ranked.len().min(TOP_TIER);
    if tier == 0 {
        return None;
    }
    Some(ranked[rng.gen_range(0..tier)].player)
}
