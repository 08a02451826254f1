// Draft board output: CSV export and the plain-text board.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use mockdraft_core::draft::pick::PickRecord;
use serde::Serialize;

/// One exported board row. Column names match the board headings.
#[derive(Debug, Serialize)]
struct BoardRow<'a> {
    #[serde(rename = "Round")]
    round: u32,
    #[serde(rename = "Overall Pick")]
    overall_pick: u32,
    #[serde(rename = "Manager")]
    manager: &'a str,
    #[serde(rename = "Player")]
    player: &'a str,
    #[serde(rename = "Position")]
    position: &'a str,
    #[serde(rename = "College")]
    college: &'a str,
    #[serde(rename = "PickType")]
    pick_type: &'a str,
    #[serde(rename = "Stars")]
    stars: Option<f64>,
    #[serde(rename = "Rating")]
    rating: Option<f64>,
    #[serde(rename = "ADP")]
    adp: Option<f64>,
    #[serde(rename = "Explanation")]
    explanation: &'a str,
}

impl<'a> From<&'a PickRecord> for BoardRow<'a> {
    fn from(record: &'a PickRecord) -> Self {
        let player = record.player();
        BoardRow {
            round: record.round,
            overall_pick: record.overall_pick,
            manager: &record.manager,
            player: record.player_label(),
            position: player
                .and_then(|p| p.position)
                .map(|pos| pos.display_str())
                .unwrap_or(""),
            college: player.map(|p| p.college.as_str()).unwrap_or(""),
            pick_type: player.map(|p| p.pick_type.display_str()).unwrap_or(""),
            stars: player.and_then(|p| p.stars),
            rating: player.and_then(|p| p.rating),
            adp: player.and_then(|p| p.adp),
            explanation: &record.explanation,
        }
    }
}

/// Write the board as CSV, one row per recorded pick in pick order.
pub fn write_board<W: Write>(picks: &[PickRecord], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    if picks.is_empty() {
        // Header only, so an empty export is still a valid board file.
        wtr.write_record([
            "Round",
            "Overall Pick",
            "Manager",
            "Player",
            "Position",
            "College",
            "PickType",
            "Stars",
            "Rating",
            "ADP",
            "Explanation",
        ])?;
    }
    for record in picks {
        wtr.serialize(BoardRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export the board to a file at `path`.
pub fn export_board(picks: &[PickRecord], path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_board(picks, file).with_context(|| format!("failed to write board to {}", path.display()))
}

/// Plain-text board, newest pick first.
pub fn render_board(picks: &[PickRecord]) -> String {
    let mut out = String::new();
    for record in picks.iter().rev() {
        let detail = match record.player() {
            Some(p) => format!(
                " ({}, {}, {})",
                p.position.map(|pos| pos.display_str()).unwrap_or("?"),
                p.college,
                p.pick_type
            ),
            None => String::new(),
        };
        out.push_str(&format!(
            "R{:<2} #{:<4} {:<24} {}{}\n",
            record.round,
            record.overall_pick,
            record.manager,
            record.player_label(),
            detail
        ));
        if !record.explanation.is_empty() {
            out.push_str(&format!("           {}\n", record.explanation));
        }
    }
    out
}
