//! Mock draft engine.
//!
//! Managers take turns picking from a shared player pool. For every slot the
//! engine filters what the manager may legally take, scores and samples a
//! player according to the manager's profile and quotas, and classifies the
//! pick into a narrative category with an optional note drawn from the
//! manager's draft history.
//!
//! [`orchestrator::DraftSession`] ties the pieces together over a
//! caller-owned [`draft::state::DraftState`].

pub mod draft;
pub mod engine;
pub mod error;
pub mod narrative;
pub mod orchestrator;
pub mod profile;

pub use draft::pick::{PickOutcome, PickRecord, PickType, Player, Position};
pub use draft::state::DraftState;
pub use engine::classify::NarrativeCategory;
pub use error::DraftError;
pub use orchestrator::{DraftSession, DraftSettings, DraftSlot};
