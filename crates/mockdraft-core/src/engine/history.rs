// Historical-pattern lookup over a manager's draft ledger.
//
// Only early-round picks get an annotation. The lookups walk ledger years
// strictly before the draft year, most recent first.

use crate::draft::pick::{PickType, Player, Position};
use crate::profile::{DraftLedger, LedgerEntry};

/// Annotations are only produced through this round.
pub const ANNOTATED_ROUNDS: u32 = 3;

/// How many prior years a same-position streak may span.
pub const STREAK_WINDOW: usize = 3;

/// A prior pick referenced by an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorPick {
    pub year: i32,
    pub player: String,
}

/// What the ledger says about this pick, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryNote {
    /// Same position in this round for several straight ledger years.
    /// `priors` is most recent first.
    Streak {
        position: Position,
        round: u32,
        priors: Vec<PriorPick>,
    },
    /// Same position in this round last year only.
    SecondStraight {
        position: Position,
        round: u32,
        prior: PriorPick,
    },
    /// Returns to an older same-position pick after a different position
    /// last year.
    Reverting {
        position: Position,
        round: u32,
        prior: PriorPick,
        last_year: PriorPick,
        last_year_position: String,
    },
    /// Same position in this round, last seen in an older year.
    FirstSince {
        position: Position,
        round: u32,
        prior: PriorPick,
    },
    /// The most recent pick in this round was a different position.
    Contrast {
        position: Position,
        round: u32,
        prior: PriorPick,
        prior_position: String,
    },
    /// A freshman in this round, as in an earlier year.
    FreshmanRepeat { round: u32, prior: PriorPick },
    /// A five-star freshman, as the manager has taken before.
    FiveStarRepeat { prior: PriorPick },
    /// Nothing matched; first such pick since the oldest ledger year.
    FirstOnRecord {
        position: Position,
        round: u32,
        oldest_year: i32,
    },
}

fn ordinal(n: usize) -> String {
    match n {
        2 => "second".to_string(),
        3 => "third".to_string(),
        4 => "fourth".to_string(),
        5 => "fifth".to_string(),
        _ => format!("{n}th"),
    }
}

impl HistoryNote {
    /// Render the note as a sentence about `manager`.
    pub fn sentence(&self, manager: &str) -> String {
        match self {
            HistoryNote::Streak { position, round, priors } => {
                let following = priors
                    .iter()
                    .map(|p| format!("{} ({})", p.player, p.year))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "{manager} takes a {position} in Round {round} for the {} straight year, following {following}.",
                    ordinal(priors.len() + 1)
                )
            }
            HistoryNote::SecondStraight { position, round, prior } => format!(
                "{manager} takes a {position} in Round {round} for the second straight year ({} in {}).",
                prior.player, prior.year
            ),
            HistoryNote::Reverting {
                position,
                round,
                prior,
                last_year,
                last_year_position,
            } => format!(
                "{manager} takes a {position} in Round {round}, reverting to the {} selection of {}, after last year's {last_year_position} ({}) pick.",
                prior.year, prior.player, last_year.player
            ),
            HistoryNote::FirstSince { position, round, prior } => format!(
                "{manager} takes a {position} in Round {round}, the first time since {} ({}).",
                prior.year, prior.player
            ),
            HistoryNote::Contrast {
                position,
                round,
                prior,
                prior_position,
            } => format!(
                "{manager} takes a {position} in Round {round}, a change from {} when the pick was a {prior_position} ({}).",
                prior.year, prior.player
            ),
            HistoryNote::FreshmanRepeat { round, prior } => format!(
                "{manager} takes a Freshman in Round {round}, just as in {} ({}).",
                prior.year, prior.player
            ),
            HistoryNote::FiveStarRepeat { prior } => format!(
                "{manager} takes a 5-star Freshman, as in {} with {}.",
                prior.year, prior.player
            ),
            HistoryNote::FirstOnRecord {
                position,
                round,
                oldest_year,
            } => format!(
                "This is the first {position} in Round {round} for {manager} since {oldest_year}, or possibly ever."
            ),
        }
    }
}

/// Consecutive ledger years, most recent first, in which the manager took
/// `position` in `round`. Stops at the first miss or after the window.
fn position_streak(ledger: &DraftLedger, years: &[i32], round: u32, position: Position) -> Vec<PriorPick> {
    let mut streak = Vec::new();
    for &year in years {
        match ledger.pick_at(year, round) {
            Some(entry) if entry.is_position(position) => streak.push(PriorPick {
                year,
                player: entry.player.clone(),
            }),
            _ => break,
        }
        if streak.len() >= STREAK_WINDOW {
            break;
        }
    }
    streak
}

fn last_matching<'a, F>(
    ledger: &'a DraftLedger,
    years: &[i32],
    round: u32,
    keep: F,
) -> Option<(i32, &'a LedgerEntry)>
where
    F: Fn(&LedgerEntry) -> bool,
{
    years
        .iter()
        .find_map(|&year| ledger.pick_at(year, round).filter(|e| keep(e)).map(|e| (year, e)))
}

fn last_five_star_freshman(ledger: &DraftLedger, years: &[i32]) -> Option<PriorPick> {
    years.iter().find_map(|&year| {
        ledger
            .picks_in(year)
            .find(|(_, e)| e.is_five_star_freshman())
            .map(|(_, e)| PriorPick {
                year,
                player: e.player.clone(),
            })
    })
}

/// Look up the historical pattern for a pick at `round` of `position`.
pub fn round_reference(
    ledger: &DraftLedger,
    round: u32,
    current_year: i32,
    position: Position,
    pick_type: PickType,
    stars: Option<f64>,
) -> Option<HistoryNote> {
    let years = ledger.years_before(current_year);

    let streak = position_streak(ledger, &years, round, position);
    if streak.len() > 1 {
        return Some(HistoryNote::Streak {
            position,
            round,
            priors: streak,
        });
    }

    let last_any = last_matching(ledger, &years, round, |_| true);

    if let Some((year, entry)) = last_matching(ledger, &years, round, |e| e.is_position(position)) {
        let prior = PriorPick {
            year,
            player: entry.player.clone(),
        };
        if year == current_year.saturating_sub(1) {
            return Some(HistoryNote::SecondStraight { position, round, prior });
        }
        if let Some((any_year, any_entry)) = last_any {
            if any_year == current_year.saturating_sub(1) && any_year != year {
                return Some(HistoryNote::Reverting {
                    position,
                    round,
                    prior,
                    last_year: PriorPick {
                        year: any_year,
                        player: any_entry.player.clone(),
                    },
                    last_year_position: any_entry.position.clone(),
                });
            }
        }
        return Some(HistoryNote::FirstSince { position, round, prior });
    }

    if let Some((year, entry)) = last_any {
        if !entry.is_position(position) {
            return Some(HistoryNote::Contrast {
                position,
                round,
                prior: PriorPick {
                    year,
                    player: entry.player.clone(),
                },
                prior_position: entry.position.clone(),
            });
        }
    }

    if pick_type == PickType::Freshman {
        if let Some((year, entry)) =
            last_matching(ledger, &years, round, |e| e.pick_type == Some(PickType::Freshman))
        {
            return Some(HistoryNote::FreshmanRepeat {
                round,
                prior: PriorPick {
                    year,
                    player: entry.player.clone(),
                },
            });
        }
        if stars.unwrap_or(0.0) >= 5.0 {
            if let Some(prior) = last_five_star_freshman(ledger, &years) {
                return Some(HistoryNote::FiveStarRepeat { prior });
            }
        }
    }

    years.last().map(|&oldest_year| HistoryNote::FirstOnRecord {
        position,
        round,
        oldest_year,
    })
}

/// Annotation for a drafted player, or `None` outside the annotated rounds
/// or when the ledger has nothing before the draft year.
pub fn annotate(player: &Player, round: u32, current_year: i32, ledger: &DraftLedger) -> Option<HistoryNote> {
    if round > ANNOTATED_ROUNDS {
        return None;
    }
    let position = player.position?;
    round_reference(ledger, round, current_year, position, player.pick_type, player.stars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(player: &str, pos: &str, pick_type: Option<PickType>, stars: Option<f64>) -> LedgerEntry {
        LedgerEntry {
            player: player.into(),
            position: pos.into(),
            pick_type,
            stars,
            rating: None,
            adp: None,
        }
    }

    fn wr(player: &str) -> LedgerEntry {
        entry(player, "WR", None, None)
    }

    #[test]
    fn streak_over_consecutive_years() {
        let mut ledger = DraftLedger::new();
        ledger.insert(2024, 1, wr("A"));
        ledger.insert(2023, 1, wr("B"));
        ledger.insert(2022, 1, entry("C", "QB", None, None));

        let note = round_reference(&ledger, 1, 2025, Position::WideReceiver, PickType::ReadyToContribute, None);
        let Some(HistoryNote::Streak { priors, .. }) = &note else {
            panic!("expected streak, got {note:?}");
        };
        assert_eq!(priors.len(), 2);
        assert_eq!(priors[0].player, "A");
        let text = note.unwrap().sentence("MGR");
        assert!(text.contains("third straight year"), "{text}");
        assert!(text.contains("A (2024), B (2023)"), "{text}");
    }

    #[test]
    fn streak_capped_at_window() {
        let mut ledger = DraftLedger::new();
        for (i, year) in (2019..=2024).enumerate() {
            ledger.insert(year, 2, wr(&format!("P{i}")));
        }
        let note = round_reference(&ledger, 2, 2025, Position::WideReceiver, PickType::Upside, None);
        match note {
            Some(HistoryNote::Streak { priors, .. }) => assert_eq!(priors.len(), STREAK_WINDOW),
            other => panic!("expected streak, got {other:?}"),
        }
    }

    #[test]
    fn single_year_repeat_is_second_straight() {
        let mut ledger = DraftLedger::new();
        ledger.insert(2024, 1, wr("A"));
        ledger.insert(2023, 1, entry("B", "RB", None, None));
        let note = round_reference(&ledger, 1, 2025, Position::WideReceiver, PickType::Upside, None);
        assert!(matches!(note, Some(HistoryNote::SecondStraight { .. })), "{note:?}");
    }

    #[test]
    fn reverting_after_different_position_last_year() {
        let mut ledger = DraftLedger::new();
        ledger.insert(2024, 2, entry("LAST", "RB", None, None));
        ledger.insert(2022, 2, wr("OLD"));
        let note = round_reference(&ledger, 2, 2025, Position::WideReceiver, PickType::Upside, None);
        match &note {
            Some(HistoryNote::Reverting { prior, last_year, last_year_position, .. }) => {
                assert_eq!(prior.year, 2022);
                assert_eq!(last_year.player, "LAST");
                assert_eq!(last_year_position, "RB");
            }
            other => panic!("expected reverting, got {other:?}"),
        }
        assert!(note.unwrap().sentence("MGR").contains("reverting to the 2022 selection of OLD"));
    }

    #[test]
    fn first_since_when_gap_is_not_last_year() {
        let mut ledger = DraftLedger::new();
        ledger.insert(2024, 1, entry("X", "QB", None, None));
        ledger.insert(2023, 3, entry("Y", "RB", None, None));
        ledger.insert(2021, 3, wr("OLD"));
        let note = round_reference(&ledger, 3, 2025, Position::WideReceiver, PickType::Upside, None);
        match note {
            Some(HistoryNote::FirstSince { prior, .. }) => assert_eq!(prior.year, 2021),
            other => panic!("expected first-since, got {other:?}"),
        }
    }

    #[test]
    fn contrast_when_position_never_taken_in_round() {
        let mut ledger = DraftLedger::new();
        ledger.insert(2023, 1, entry("Q", "QB", None, None));
        let note = round_reference(&ledger, 1, 2025, Position::TightEnd, PickType::Freshman, Some(5.0));
        match &note {
            Some(HistoryNote::Contrast { prior, prior_position, .. }) => {
                assert_eq!(prior.player, "Q");
                assert_eq!(prior_position, "QB");
            }
            other => panic!("expected contrast, got {other:?}"),
        }
    }

    #[test]
    fn five_star_repeat_for_elite_freshman() {
        let mut ledger = DraftLedger::new();
        // Nothing in round 1, but a five-star freshman in a later round.
        ledger.insert(2023, 4, entry("STAR", "RB", Some(PickType::Freshman), Some(5.0)));
        ledger.insert(2024, 2, entry("MID", "WR", Some(PickType::Freshman), Some(4.0)));

        let note = round_reference(&ledger, 1, 2025, Position::RunningBack, PickType::Freshman, Some(5.0));
        assert_eq!(
            note,
            Some(HistoryNote::FiveStarRepeat {
                prior: PriorPick { year: 2023, player: "STAR".into() }
            })
        );

        // Without five stars the fallback applies instead.
        let note = round_reference(&ledger, 1, 2025, Position::RunningBack, PickType::Freshman, Some(4.0));
        assert_eq!(
            note,
            Some(HistoryNote::FirstOnRecord {
                position: Position::RunningBack,
                round: 1,
                oldest_year: 2023
            })
        );
    }

    #[test]
    fn empty_ledger_has_no_note() {
        let ledger = DraftLedger::new();
        assert!(round_reference(&ledger, 1, 2025, Position::Quarterback, PickType::Upside, None).is_none());
    }

    #[test]
    fn current_and_future_years_ignored() {
        let mut ledger = DraftLedger::new();
        ledger.insert(2025, 1, wr("NOW"));
        ledger.insert(2026, 1, wr("LATER"));
        assert!(round_reference(&ledger, 1, 2025, Position::WideReceiver, PickType::Upside, None).is_none());
    }

    #[test]
    fn annotate_skips_late_rounds() {
        let mut ledger = DraftLedger::new();
        ledger.insert(2024, 4, wr("A"));
        let p = crate::draft::pick::tests::player("P", Position::WideReceiver, PickType::Upside);
        assert!(annotate(&p, 4, 2025, &ledger).is_none());
        assert!(annotate(&p, 3, 2025, &ledger).is_some());
    }

    #[test]
    fn minimum_current_year_does_not_overflow() {
        let mut ledger = DraftLedger::new();
        ledger.insert(2024, 1, wr("A"));
        assert!(round_reference(&ledger, 1, i32::MIN, Position::WideReceiver, PickType::Upside, None).is_none());
    }
}
