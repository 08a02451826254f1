// Command-line interface.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use clap::{Parser, Subcommand};
use mockdraft_core::draft::pick::PickRecord;

use crate::app::{auto_draft, AppState, AutoStop};
use crate::config::PACING_RANGE_MS;
use crate::data::normalize::Normalizer;
use crate::export::{export_board, render_board};

#[derive(Debug, Parser)]
#[command(name = "mockdraft")]
#[command(about = "Multi-manager mock draft simulator.")]
pub struct Cli {
    /// Project directory holding defaults/, config/ and the data files.
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Seed for reproducible picks (overrides the config seed).
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Simulate the next pick.
    Step,
    /// Simulate until the given manager is on the clock.
    Until {
        /// Manager name as it appears in the draft order.
        manager: String,
    },
    /// Auto-draft with a pause between picks. Stops at the user's slot or on Ctrl+C.
    Auto {
        /// Pause before each pick in milliseconds (100-2000).
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Make the current pick by hand.
    Pick {
        /// Player name; any undrafted player in the pool.
        player: String,
    },
    /// Print the board, newest pick first.
    Board,
    /// Write the board as CSV.
    Export {
        #[arg(default_value = "draft_results.csv")]
        path: PathBuf,
    },
    /// Discard the current draft and start over.
    Reset,
}

/// Run one command against the draft and return what to print.
pub async fn execute(
    app: &mut AppState,
    command: Command,
    normalizer: &Normalizer,
    default_delay_ms: u64,
) -> anyhow::Result<String> {
    let mut out = String::new();
    match command {
        Command::Step => {
            if app.is_complete() {
                bail!("the draft is already complete");
            }
            let record = app.step()?;
            push_records(&mut out, std::slice::from_ref(&record));
        }
        Command::Until { manager } => {
            let manager = normalizer.name(&manager);
            if !app
                .session
                .order()
                .iter()
                .any(|slot| slot.manager.as_deref() == Some(manager.as_str()))
            {
                bail!("manager '{}' has no slot in the draft order", manager);
            }
            let made = app.run_until(Some(&manager))?;
            push_records(&mut out, &made);
        }
        Command::Auto { delay_ms } => {
            let delay_ms = delay_ms.unwrap_or(default_delay_ms);
            if !PACING_RANGE_MS.contains(&delay_ms) {
                bail!(
                    "delay must be between {} and {} ms, got {}",
                    PACING_RANGE_MS.start(),
                    PACING_RANGE_MS.end(),
                    delay_ms
                );
            }
            let before = app.picks().len();
            let summary = auto_draft(
                app,
                Duration::from_millis(delay_ms),
                tokio::signal::ctrl_c(),
            )
            .await?;
            push_records(&mut out, &app.picks()[before..]);
            let reason = match summary.stop {
                AutoStop::UserSlot => "your pick",
                AutoStop::Complete => "draft complete",
                AutoStop::Interrupted => "interrupted",
            };
            out.push_str(&format!(
                "Auto-draft stopped after {} picks: {}\n",
                summary.picks_made, reason
            ));
        }
        Command::Pick { player } => {
            let record = app.manual_pick(&normalizer.name(&player))?;
            push_records(&mut out, std::slice::from_ref(&record));
        }
        Command::Board => {
            out.push_str(&render_board(app.picks()));
        }
        Command::Export { path } => {
            export_board(app.picks(), &path)?;
            out.push_str(&format!("Wrote {} picks to {}\n", app.picks().len(), path.display()));
        }
        Command::Reset => {
            app.reset()?;
            out.push_str(&format!("Started new draft {}\n", app.draft_id));
        }
    }

    match app.current_slot() {
        Some(slot) => out.push_str(&format!(
            "On the clock: round {}, pick {}, {}\n",
            slot.round,
            slot.overall_pick,
            slot.manager.as_deref().unwrap_or("(skipped slot)")
        )),
        None => out.push_str("Draft complete!\n"),
    }
    Ok(out)
}

fn push_records(out: &mut String, records: &[PickRecord]) {
    for record in records {
        out.push_str(&record_line(record));
    }
}

fn record_line(record: &PickRecord) -> String {
    let manager = if record.manager.is_empty() { "-" } else { &record.manager };
    let mut line = format!(
        "#{} (R{}) {}: {}\n",
        record.overall_pick,
        record.round,
        manager,
        record.player_label()
    );
    if !record.explanation.is_empty() {
        line.push_str(&format!("    {}\n", record.explanation));
    }
    line
}
