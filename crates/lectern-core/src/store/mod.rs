// ── Screen stores ──
//
// Per-screen state containers. Each store is created fresh when a screen
// opens and is dropped with it; nothing is cached across navigations.

pub mod alert;
mod resource_store;

pub use alert::{Alert, AlertKind};
pub use resource_store::{ListOutcome, ResourceStore, StoreState, SubmitOutcome};
