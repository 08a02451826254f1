// Player pool construction from the ADP and freshman ranking CSVs.
//
// ADP rows are ready-to-contribute players; freshman rows are freshmen. A
// player present in both keeps the freshman row. RTC players from an upside
// college who go late (or unranked) are re-typed as Upside.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;

use mockdraft_core::draft::pick::{PickType, Player, Position};
use serde::Deserialize;
use tracing::warn;

use super::normalize::{college, Normalizer};
use super::{csv_reader, parse_number};
use crate::config::PoolConfig;

/// ADP used for the upside re-typing test when a player has none.
const UNRANKED_ADP: f64 = 9999.0;

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// ADP export row. Numeric columns are read as text and parsed leniently.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawAdpRow {
    Player: String,
    #[serde(default)]
    College: String,
    #[serde(default)]
    Position: String,
    #[serde(default)]
    ADP: Option<String>,
}

/// Freshman ranking export row.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawFreshmanRow {
    Name: String,
    #[serde(default)]
    School: String,
    #[serde(default)]
    Position: String,
    #[serde(default)]
    Stars: Option<String>,
    #[serde(default)]
    Rating: Option<String>,
    #[serde(default)]
    ADP: Option<String>,
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

fn make_player(
    normalizer: &Normalizer,
    name: &str,
    raw_college: &str,
    raw_position: &str,
    pick_type: PickType,
) -> Option<Player> {
    let id = normalizer.name(name);
    if id.is_empty() {
        warn!("skipping row with empty player name");
        return None;
    }
    let position = Position::from_str_pos(raw_position);
    if position.is_none() {
        warn!("player '{}' has unusable position '{}'", name.trim(), raw_position);
    }
    Some(Player {
        id,
        name: name.trim().to_string(),
        position,
        college: raw_college.trim().to_string(),
        norm_college: college(raw_college),
        pick_type,
        stars: None,
        rating: None,
        adp: None,
    })
}

/// Parse the ADP CSV. Every row becomes an RTC player.
pub fn load_adp_from_reader<R: Read>(rdr: R, normalizer: &Normalizer) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawAdpRow>() {
        match result {
            Ok(raw) => {
                let Some(mut player) = make_player(
                    normalizer,
                    &raw.Player,
                    &raw.College,
                    &raw.Position,
                    PickType::ReadyToContribute,
                ) else {
                    continue;
                };
                player.adp = parse_number(raw.ADP.as_deref());
                players.push(player);
            }
            Err(e) => {
                warn!("skipping malformed ADP row: {}", e);
            }
        }
    }
    Ok(players)
}

/// Parse the freshman ranking CSV. Every row becomes a Freshman.
pub fn load_freshman_from_reader<R: Read>(
    rdr: R,
    normalizer: &Normalizer,
) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawFreshmanRow>() {
        match result {
            Ok(raw) => {
                let Some(mut player) = make_player(
                    normalizer,
                    &raw.Name,
                    &raw.School,
                    &raw.Position,
                    PickType::Freshman,
                ) else {
                    continue;
                };
                player.stars = parse_number(raw.Stars.as_deref());
                player.rating = parse_number(raw.Rating.as_deref());
                player.adp = parse_number(raw.ADP.as_deref());
                players.push(player);
            }
            Err(e) => {
                warn!("skipping malformed freshman row: {}", e);
            }
        }
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Pool assembly
// ---------------------------------------------------------------------------

/// Merge both sources into one pool, sorted by id with one row per id.
pub fn build_pool(freshmen: Vec<Player>, adp: Vec<Player>, config: &PoolConfig) -> Vec<Player> {
    let mut by_id: BTreeMap<String, Player> = BTreeMap::new();
    for player in freshmen.into_iter().chain(adp) {
        match by_id.get(&player.id) {
            Some(existing) if existing.pick_type <= player.pick_type => {}
            _ => {
                by_id.insert(player.id.clone(), player);
            }
        }
    }

    let upside_colleges: HashSet<String> =
        config.upside_colleges.iter().map(|c| college(c)).collect();

    by_id
        .into_values()
        .map(|mut player| {
            if player.pick_type == PickType::ReadyToContribute
                && upside_colleges.contains(&player.norm_college)
                && player.adp.unwrap_or(UNRANKED_ADP) > config.upside_min_adp
            {
                player.pick_type = PickType::Upside;
            }
            player
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ADP_CSV: &str = "\
Player;College;Position;ADP
Jalen Smith;Alabama;WR;12.0
Marcus Lee Jr.;Akron;RB;30
Deep Sleeper;Georgia;TE;
Late Bloomer;Georgia;QB;80.5
Kicker Guy;Akron;K;50
;Akron;WR;3
Bryce Underwood;Michigan;QB;5
";

    const FRESHMAN_CSV: &str = "\
Name;School;Position;Stars;Rating
Bryce Underwood;Michigan;QB;5;0.9998
Tavien St. Clair;Ohio State;QB;4;0.97
Nobody;Nowhere;WR;n/a;
";

    fn config() -> PoolConfig {
        PoolConfig {
            upside_min_adp: 45.0,
            upside_colleges: vec!["Georgia".into(), "Alabama".into()],
        }
    }

    fn norm() -> Normalizer {
        Normalizer::new().unwrap()
    }

    #[test]
    fn adp_rows_are_rtc() {
        let players = load_adp_from_reader(ADP_CSV.as_bytes(), &norm()).unwrap();
        // The nameless row is dropped.
        assert_eq!(players.len(), 6);
        assert!(players.iter().all(|p| p.pick_type == PickType::ReadyToContribute));

        let lee = players.iter().find(|p| p.id == "MARCUS LEE").unwrap();
        assert_eq!(lee.name, "Marcus Lee Jr.");
        assert_eq!(lee.adp, Some(30.0));
        assert_eq!(lee.norm_college, "AKRON");

        let kicker = players.iter().find(|p| p.id == "KICKER GUY").unwrap();
        assert_eq!(kicker.position, None);
    }

    #[test]
    fn freshman_rows_parse_numbers() {
        let players = load_freshman_from_reader(FRESHMAN_CSV.as_bytes(), &norm()).unwrap();
        assert_eq!(players.len(), 3);
        let bryce = &players[0];
        assert_eq!(bryce.pick_type, PickType::Freshman);
        assert_eq!(bryce.stars, Some(5.0));
        assert_eq!(bryce.rating, Some(0.9998));
        assert_eq!(bryce.adp, None);
        assert_eq!(players[2].stars, None);
    }

    #[test]
    fn build_pool_dedups_and_retypes() {
        let n = norm();
        let adp = load_adp_from_reader(ADP_CSV.as_bytes(), &n).unwrap();
        let freshmen = load_freshman_from_reader(FRESHMAN_CSV.as_bytes(), &n).unwrap();
        let pool = build_pool(freshmen, adp, &config());

        let ids: Vec<&str> = pool.iter().map(|p| p.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.iter().filter(|id| **id == "BRYCE UNDERWOOD").count(), 1);

        let get = |id: &str| pool.iter().find(|p| p.id == id).unwrap();
        // Freshman row wins the dedup.
        assert_eq!(get("BRYCE UNDERWOOD").pick_type, PickType::Freshman);
        // Upside college but an early ADP stays RTC.
        assert_eq!(get("JALEN SMITH").pick_type, PickType::ReadyToContribute);
        // Unranked and late players from upside colleges become Upside.
        assert_eq!(get("DEEP SLEEPER").pick_type, PickType::Upside);
        assert_eq!(get("LATE BLOOMER").pick_type, PickType::Upside);
        // Other colleges are untouched.
        assert_eq!(get("MARCUS LEE").pick_type, PickType::ReadyToContribute);
    }
}
