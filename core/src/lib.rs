//! Triage and dispatch-simulation core for the Rust FastLane platform.
//!
//! The modules mirror the staged emergency flow of the demo pages —
//! capability capture, symptom classification, dispatch countdown — while
//! keeping the classifier pure and the session state machine explicit.

pub mod capability;
pub mod dispatch;
pub mod geo;
pub mod handoff;
pub mod prelude;
pub mod telemetry;
pub mod triage;

pub use prelude::{Severity, TriageChannel, TriageError, TriageInput, TriageResult};
