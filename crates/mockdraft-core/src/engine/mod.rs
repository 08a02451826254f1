// Pick-decision engine. Every function here is pure: it reads snapshots of
// draft state and returns a decision for the orchestrator to apply.

pub mod cascade;
pub mod classify;
pub mod eligibility;
pub mod history;
pub mod scoring;
