// Application state and the run modes that drive a draft.
//
// Every pick goes through `AppState`, which applies it to the in-memory
// `DraftState` and then persists it, so a restart can replay the database
// and resume at the next slot.

use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use mockdraft_core::draft::pick::PickRecord;
use mockdraft_core::draft::state::DraftState;
use mockdraft_core::narrative::TemplateTable;
use mockdraft_core::orchestrator::{draft_rng, DraftSession, DraftSlot};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::db::Database;

/// Why an auto-draft stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoStop {
    /// The next slot belongs to the user's manager.
    UserSlot,
    /// Every slot has been filled.
    Complete,
    /// The shutdown signal fired between two picks.
    Interrupted,
}

/// Summary of one auto-draft run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoSummary {
    pub picks_made: usize,
    pub stop: AutoStop,
}

/// Everything a running draft needs.
pub struct AppState {
    pub session: DraftSession<TemplateTable>,
    pub state: DraftState,
    pub db: Database,
    pub draft_id: String,
    /// Manager whose slots are left for manual picks.
    pub user_manager: Option<String>,
    rng: ChaCha8Rng,
}

impl AppState {
    /// Attach to the current draft in `db`, starting a new one if none is
    /// recorded.
    pub fn new(
        session: DraftSession<TemplateTable>,
        db: Database,
        user_manager: Option<String>,
        seed: Option<u64>,
    ) -> anyhow::Result<Self> {
        let draft_id = match db.get_draft_id()? {
            Some(id) => id,
            None => {
                let id = Database::generate_draft_id();
                db.set_draft_id(&id)?;
                info!("Started new draft {}", id);
                id
            }
        };
        Ok(AppState {
            session,
            state: DraftState::new(),
            db,
            draft_id,
            user_manager,
            rng: draft_rng(seed),
        })
    }

    pub fn picks(&self) -> &[PickRecord] {
        self.state.picks()
    }

    pub fn current_slot(&self) -> Option<&DraftSlot> {
        self.session.current_slot(&self.state)
    }

    pub fn is_complete(&self) -> bool {
        self.session.is_complete(&self.state)
    }

    /// True when the next slot is the user's.
    pub fn is_user_turn(&self) -> bool {
        match (&self.user_manager, self.current_slot()) {
            (Some(user), Some(slot)) => slot.manager.as_deref() == Some(user.as_str()),
            _ => false,
        }
    }

    fn persist(&self, record: &PickRecord) -> anyhow::Result<()> {
        self.db
            .record_pick(record, &self.draft_id)
            .with_context(|| format!("failed to persist pick #{}", record.overall_pick))
    }

    /// Simulate the next slot.
    pub fn step(&mut self) -> anyhow::Result<PickRecord> {
        let record = self.session.step(&mut self.state, &mut self.rng)?;
        self.persist(&record)?;
        Ok(record)
    }

    /// Simulate until `manager` is on the clock or the draft ends. Each
    /// pick is persisted as soon as it is made, so an error part way leaves
    /// the earlier picks stored.
    pub fn run_until(&mut self, manager: Option<&str>) -> anyhow::Result<Vec<PickRecord>> {
        let mut made = Vec::new();
        while let Some(slot) = self.current_slot() {
            if manager.is_some() && slot.manager.as_deref() == manager {
                break;
            }
            made.push(self.step()?);
        }
        Ok(made)
    }

    /// Fill the current slot with a chosen player.
    pub fn manual_pick(&mut self, player_id: &str) -> anyhow::Result<PickRecord> {
        let record = self.session.manual_pick(&mut self.state, player_id)?;
        self.persist(&record)?;
        Ok(record)
    }

    /// Throw away the current draft and start a fresh one under a new id.
    pub fn reset(&mut self) -> anyhow::Result<()> {
        self.db.clear_draft(&self.draft_id)?;
        self.draft_id = Database::generate_draft_id();
        self.db.set_draft_id(&self.draft_id)?;
        self.state = DraftState::new();
        info!("Draft reset, new draft id {}", self.draft_id);
        Ok(())
    }
}

/// Replay the stored picks of the current draft into `app.state`.
///
/// Returns `Ok(true)` if any picks were restored.
pub fn recover_from_db(app: &mut AppState) -> anyhow::Result<bool> {
    let picks = app.db.load_picks(&app.draft_id)?;
    if picks.is_empty() {
        info!("No picks stored for draft_id={}, starting fresh", app.draft_id);
        return Ok(false);
    }

    let pick_count = picks.len();
    info!(
        "Restoring {} picks from DB for draft_id={}",
        pick_count, app.draft_id
    );
    app.state.restore_from_picks(picks).with_context(|| {
        format!(
            "stored picks for draft_id={} cannot be replayed; reset the draft to start over",
            app.draft_id
        )
    })?;
    Ok(true)
}

/// Auto-draft with a pause before each pick. Stops at the user's slot, at
/// the end of the draft, or when `shutdown` resolves. A pick is never
/// interrupted part way; the signal is only observed during the pause.
pub async fn auto_draft<F>(
    app: &mut AppState,
    delay: Duration,
    shutdown: F,
) -> anyhow::Result<AutoSummary>
where
    F: Future,
{
    tokio::pin!(shutdown);
    let mut picks_made = 0;

    let stop = loop {
        if app.is_complete() {
            break AutoStop::Complete;
        }
        if app.is_user_turn() {
            break AutoStop::UserSlot;
        }

        tokio::select! {
            _ = &mut shutdown => {
                info!("Auto-draft interrupted after {} picks", picks_made);
                break AutoStop::Interrupted;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        app.step()?;
        picks_made += 1;
    };

    Ok(AutoSummary { picks_made, stop })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
