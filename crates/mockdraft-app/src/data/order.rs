// Draft order loading.

use std::io::Read;

use mockdraft_core::orchestrator::DraftSlot;
use serde::Deserialize;

use super::csv_reader;
use super::normalize::Normalizer;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("row {row}: {message}")]
    Row { row: usize, message: String },
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawOrderRow {
    Round: String,
    #[serde(default)]
    Manager: Option<String>,
}

fn parse_round(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    raw.parse::<u32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|r| r.fract() == 0.0 && *r >= 1.0 && *r <= f64::from(u32::MAX))
            .map(|r| r as u32)
    })
}

/// Parse a `Round;Manager` draft order. The overall pick number is the
/// 1-based row position. A blank or "NAN" manager marks a skipped slot.
///
/// Unlike the player CSVs, a bad row here is an error: dropping it would
/// shift every later pick number.
pub fn load_order_from_reader<R: Read>(
    rdr: R,
    normalizer: &Normalizer,
) -> Result<Vec<DraftSlot>, OrderError> {
    let mut reader = csv_reader(rdr);
    let mut slots = Vec::new();
    for (index, result) in reader.deserialize::<RawOrderRow>().enumerate() {
        let row = index + 1;
        let raw = result?;
        let round = parse_round(&raw.Round).filter(|r| *r > 0).ok_or_else(|| OrderError::Row {
            row,
            message: format!("invalid round '{}'", raw.Round),
        })?;
        let manager = raw
            .Manager
            .map(|m| normalizer.name(&m))
            .filter(|m| !m.is_empty() && m != "NAN");
        slots.push(DraftSlot {
            round,
            overall_pick: row as u32,
            manager,
        });
    }
    Ok(slots)
}
