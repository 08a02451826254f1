// Manager profile loading from the profiles JSON export.
//
// The export is loosely typed: numbers sometimes arrive as strings, maps may
// be missing, and pick-type labels vary. Everything is converted into the
// strongly typed `ManagerProfile` here, with missing pieces left at their
// zero defaults.

use std::collections::{BTreeMap, HashMap};

use mockdraft_core::draft::pick::{PickType, Position};
use mockdraft_core::draft::roster::PickTypeQuotas;
use mockdraft_core::profile::{DraftLedger, LedgerEntry, ManagerProfile, ProfileStore, DEFAULT_RTC_LOCK_ROUND};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::normalize::{college, Normalizer};

// ---------------------------------------------------------------------------
// Raw JSON serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct RawProfile {
    #[serde(default)]
    simulation_profile: RawSimulation,
    #[serde(default)]
    picktype_by_year: HashMap<String, HashMap<String, Value>>,
    #[serde(default)]
    rtc_with_5star_available: Vec<Value>,
    #[serde(default)]
    freshman_value_leaks: Vec<Value>,
    #[serde(default)]
    draft_history: HashMap<String, HashMap<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSimulation {
    #[serde(default)]
    pick_type_weights: HashMap<String, Value>,
    #[serde(default)]
    position_weights: HashMap<String, Value>,
    #[serde(default)]
    college_weights: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawHistoryPick {
    #[serde(rename = "Player", default)]
    player: String,
    #[serde(rename = "Position", default)]
    position: String,
    #[serde(rename = "PickType", default)]
    pick_type: Option<String>,
    #[serde(rename = "Stars", default)]
    stars: Value,
    #[serde(rename = "Rating", default)]
    rating: Value,
    #[serde(rename = "ADP", default)]
    adp: Value,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A JSON number, or a string holding one.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn count(value: &Value) -> u32 {
    number(value)
        .filter(|v| *v >= 0.0)
        .map(|v| v.trunc() as u32)
        .unwrap_or(0)
}

fn pick_type_weights(raw: &HashMap<String, Value>, manager: &str) -> HashMap<PickType, f64> {
    raw.iter()
        .filter_map(|(key, value)| match PickType::from_str_type(key) {
            Some(pt) => number(value).map(|w| (pt, w)),
            None => {
                warn!("profile '{}': ignoring pick type weight '{}'", manager, key);
                None
            }
        })
        .collect()
}

fn position_weights(raw: &HashMap<String, Value>) -> HashMap<Position, f64> {
    raw.iter()
        .filter_map(|(key, value)| Some((Position::from_str_pos(key)?, number(value)?)))
        .collect()
}

fn quotas(raw: &HashMap<String, HashMap<String, Value>>, manager: &str) -> BTreeMap<i32, PickTypeQuotas> {
    let mut by_year = BTreeMap::new();
    for (year, counts) in raw {
        let Ok(year) = year.trim().parse::<i32>() else {
            warn!("profile '{}': ignoring quota year '{}'", manager, year);
            continue;
        };
        let quotas = counts
            .iter()
            .filter_map(|(key, value)| Some((PickType::from_str_type(key)?, count(value))))
            .fold(PickTypeQuotas::new(), |q, (pt, n)| q.with(pt, n));
        by_year.insert(year, quotas);
    }
    by_year
}

fn ledger(raw: HashMap<String, HashMap<String, Value>>, manager: &str) -> DraftLedger {
    let mut ledger = DraftLedger::new();
    for (year, rounds) in raw {
        let Ok(year) = year.trim().parse::<i32>() else {
            continue;
        };
        for (round, pick) in rounds {
            let Some(round) = round.trim().parse::<f64>().ok().filter(|r| *r >= 1.0).map(|r| r as u32) else {
                continue;
            };
            let pick: RawHistoryPick = match serde_json::from_value(pick) {
                Ok(p) => p,
                Err(e) => {
                    warn!("profile '{}': skipping {} round {} history: {}", manager, year, round, e);
                    continue;
                }
            };
            ledger.insert(
                year,
                round,
                LedgerEntry {
                    player: pick.player.trim().to_string(),
                    position: pick.position.trim().to_uppercase(),
                    pick_type: pick.pick_type.as_deref().and_then(PickType::from_str_type),
                    stars: number(&pick.stars),
                    rating: number(&pick.rating),
                    adp: number(&pick.adp),
                },
            );
        }
    }
    ledger
}

fn convert(name: String, raw: RawProfile) -> ManagerProfile {
    let rtc_lock_round = raw
        .rtc_with_5star_available
        .first()
        .and_then(|entry| entry.get("round"))
        .and_then(number)
        .map(|r| r as u32)
        .unwrap_or(DEFAULT_RTC_LOCK_ROUND);

    ManagerProfile {
        pick_type_weights: pick_type_weights(&raw.simulation_profile.pick_type_weights, &name),
        position_weights: position_weights(&raw.simulation_profile.position_weights),
        college_weights: raw
            .simulation_profile
            .college_weights
            .iter()
            .filter_map(|(c, v)| Some((college(c), number(v)?)))
            .collect(),
        quotas_by_year: quotas(&raw.picktype_by_year, &name),
        rtc_lock_round,
        five_star_skipper: !raw.freshman_value_leaks.is_empty(),
        history: ledger(raw.draft_history, &name),
        name,
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Parse the profiles JSON: an object keyed by manager name. A manager whose
/// entry cannot be read at all gets no profile (and drafts generically).
pub fn load_profiles_from_str(
    text: &str,
    normalizer: &Normalizer,
) -> Result<ProfileStore, serde_json::Error> {
    let raw: HashMap<String, Value> = serde_json::from_str(text)?;
    let mut profiles = Vec::with_capacity(raw.len());
    for (manager, value) in raw {
        let name = normalizer.name(&manager);
        match serde_json::from_value::<RawProfile>(value) {
            Ok(raw) => profiles.push(convert(name, raw)),
            Err(e) => warn!("skipping profile for '{}': {}", manager, e),
        }
    }
    Ok(ProfileStore::new(profiles))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
