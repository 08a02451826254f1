//! Category → narrative text.
//!
//! The engine only decides a [`NarrativeCategory`]; the wording lives behind
//! the [`TemplateSource`] trait so a caller can swap in its own table. The
//! built-in table is a small default set.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::draft::pick::Player;
use crate::engine::classify::NarrativeCategory;
use crate::engine::history::HistoryNote;

/// Text used when a source has no template for a category.
pub const PRAGMATIC_TEMPLATE: &str =
    "{manager} made a pragmatic pick with {player}, adapting to how the draft was unfolding.";

/// Explanation recorded for a slot with no manager.
pub const SKIPPED_EXPLANATION: &str = "Skipped pick (comp/empty in draft order).";

/// Explanation recorded when nobody was eligible.
pub const NO_ELIGIBLE_EXPLANATION: &str = "No eligible players";

/// Supplies candidate templates per category.
pub trait TemplateSource {
    fn templates(&self, category: NarrativeCategory) -> &[String];
}

/// Lookup table of templates keyed by category.
#[derive(Debug, Clone)]
pub struct TemplateTable {
    templates: HashMap<NarrativeCategory, Vec<String>>,
}

impl TemplateTable {
    pub fn empty() -> Self {
        TemplateTable {
            templates: HashMap::new(),
        }
    }

    /// Default wording for every category.
    pub fn builtin() -> Self {
        let mut table = TemplateTable::empty();
        let defaults: [(NarrativeCategory, &[&str]); 8] = [
            (
                NarrativeCategory::Forced,
                &[
                    "With their primary targets gone, {manager} settles for {player}, a fallback that fills a need but strays from the plan.",
                    "Plan A evaporated, so {manager} swings on {player}, a choice born of necessity.",
                    "Out of better options, {manager} pivots to {player}, hoping the stopgap overdelivers.",
                ],
            ),
            (
                NarrativeCategory::RtcOutlier,
                &[
                    "Defying convention, {manager} jumps on {player} in round {round}, well ahead of {adp_phrase}.",
                    "A surprise reach: {manager} takes proven production in {player} earlier than the profile suggests.",
                ],
            ),
            (
                NarrativeCategory::FreshmanElite,
                &[
                    "{manager} lands {player}, a {stars}-star freshman from {college} and one of the crown jewels of the class.",
                    "No hesitation from {manager}: {player} is a blue-chip {stars}-star talent at {college}.",
                ],
            ),
            (
                NarrativeCategory::FreshmanHeavy,
                &[
                    "True to form, {manager} leans on youth with {player}, a {stars}-star freshman from {college}.",
                    "{manager} keeps building through the freshman class, adding {player} at {adp_phrase}.",
                ],
            ),
            (
                NarrativeCategory::FreshmanMixed,
                &[
                    "Balancing veterans and prospects, {manager} adds {player}, a {stars}-star freshman from {college}.",
                    "{manager} mixes in youth with {player}, a {stars}-star newcomer worth a look in round {round}.",
                ],
            ),
            (
                NarrativeCategory::Upside,
                &[
                    "{manager} bets on the ceiling of {player} out of {college}.",
                    "A swing for upside: {manager} grabs {player}, a high-variance piece from {college}.",
                ],
            ),
            (
                NarrativeCategory::RtcProfile,
                &[
                    "{manager} opts for a proven contributor in {player} from {college} at {adp_phrase}.",
                    "Steady as ever, {manager} takes {player}, a ready-to-contribute piece for round {round}.",
                ],
            ),
            (NarrativeCategory::Pragmatic, &[PRAGMATIC_TEMPLATE]),
        ];
        for (category, texts) in defaults {
            table.set(category, texts.iter().map(|t| t.to_string()).collect());
        }
        table
    }

    /// Replace the templates for one category. An empty list clears it.
    pub fn set(&mut self, category: NarrativeCategory, templates: Vec<String>) {
        if templates.is_empty() {
            self.templates.remove(&category);
        } else {
            self.templates.insert(category, templates);
        }
    }
}

impl Default for TemplateTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateSource for TemplateTable {
    fn templates(&self, category: NarrativeCategory) -> &[String] {
        self.templates.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// "ADP 12.5" when known, otherwise a phrase about the round.
pub fn adp_phrase(adp: Option<f64>, round: u32) -> String {
    match adp {
        Some(adp) => format!("ADP {adp}"),
        None => format!("a round {round} selection"),
    }
}

fn format_stars(stars: Option<f64>) -> String {
    match stars {
        Some(s) if s.fract() == 0.0 => format!("{}", s as i64),
        Some(s) => format!("{s}"),
        None => "unrated".to_string(),
    }
}

/// Fill the placeholders in `template` for a pick.
pub fn render(template: &str, manager: &str, player: &Player, round: u32) -> String {
    template
        .replace("{manager}", manager)
        .replace("{player}", &player.name)
        .replace("{stars}", &format_stars(player.stars))
        .replace("{college}", &player.college)
        .replace("{adp_phrase}", &adp_phrase(player.adp, round))
        .replace("{round}", &round.to_string())
}

/// Build the full explanation for an engine pick: a template for the
/// category, then the historical note when there is one.
pub fn explain<S, R>(
    source: &S,
    category: NarrativeCategory,
    manager: &str,
    player: &Player,
    round: u32,
    note: Option<&HistoryNote>,
    rng: &mut R,
) -> String
where
    S: TemplateSource + ?Sized,
    R: Rng + ?Sized,
{
    let template = source
        .templates(category)
        .choose(rng)
        .map(String::as_str)
        .unwrap_or(PRAGMATIC_TEMPLATE);
    let mut text = render(template, manager, player, round);
    if let Some(note) = note {
        let trimmed = text.trim_end_matches('.').len();
        text.truncate(trimmed);
        text.push_str(". ");
        text.push_str(&note.sentence(manager));
    }
    text
}

/// Explanation for a pick the manager made directly.
pub fn manual_explanation(manager: &str, player: &Player) -> String {
    format!("{manager} selects {player} directly.", player = player.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::tests::player;
    use crate::draft::pick::{PickType, Position};
    use crate::engine::history::PriorPick;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn builtin_covers_every_category() {
        let table = TemplateTable::builtin();
        for category in NarrativeCategory::ALL {
            assert!(!table.templates(category).is_empty(), "{category:?} has no templates");
        }
    }

    #[test]
    fn render_fills_placeholders() {
        let mut p = player("JOHN DOE", Position::WideReceiver, PickType::Freshman);
        p.name = "John Doe".into();
        p.college = "Oregon".into();
        p.stars = Some(4.0);
        let text = render("{manager}: {player}, {stars}-star, {college}, {adp_phrase}, r{round}", "MGR", &p, 2);
        assert_eq!(text, "MGR: John Doe, 4-star, Oregon, a round 2 selection, r2");

        p.adp = Some(12.5);
        assert_eq!(render("{adp_phrase}", "MGR", &p, 2), "ADP 12.5");
    }

    #[test]
    fn explain_appends_history_note() {
        let mut table = TemplateTable::empty();
        table.set(NarrativeCategory::Upside, vec!["{manager} takes {player}.".into()]);
        let p = player("P", Position::RunningBack, PickType::Upside);
        let note = HistoryNote::FiveStarRepeat {
            prior: PriorPick { year: 2023, player: "OLD".into() },
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let text = explain(&table, NarrativeCategory::Upside, "MGR", &p, 1, Some(&note), &mut rng);
        assert_eq!(text, "MGR takes P. MGR takes a 5-star Freshman, as in 2023 with OLD.");

        let plain = explain(&table, NarrativeCategory::Upside, "MGR", &p, 1, None, &mut rng);
        assert_eq!(plain, "MGR takes P.");
    }

    #[test]
    fn missing_category_falls_back_to_pragmatic() {
        let table = TemplateTable::empty();
        let p = player("P", Position::RunningBack, PickType::Upside);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let text = explain(&table, NarrativeCategory::Forced, "MGR", &p, 1, None, &mut rng);
        assert!(text.starts_with("MGR made a pragmatic pick with P"));
    }
}
