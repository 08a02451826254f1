// Errors from driving a draft.

use thiserror::Error;

/// Misuse of the orchestrator. The engine itself never fails: an empty
/// candidate set is recorded as a pick outcome, not an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("player not in pool: {player_id}")]
    UnknownPlayer { player_id: String },

    #[error("player already drafted: {player_id}")]
    AlreadyDrafted { player_id: String },

    #[error("pick #{overall_pick} has no manager")]
    NoManager { overall_pick: u32 },

    #[error("saved pick #{found} out of sequence, expected #{expected}")]
    OutOfSequence { expected: u32, found: u32 },

    #[error("draft is complete")]
    DraftComplete,
}
