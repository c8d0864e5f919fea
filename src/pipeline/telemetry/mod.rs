//! Step telemetry for a pipeline run.
//!
//! # INVARIANT
//! Telemetry is a read-only side-effect layer. The generator records into
//! it but never reads it back to decide what to do next.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::{Step, StepEvent, StepOutcome};
pub use metrics::{compute_summary, RunSummary};
pub use recorder::StepRecorder;
