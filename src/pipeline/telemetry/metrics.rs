use std::collections::VecDeque;
use std::time::Duration;

use super::event::{Step, StepEvent, StepOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps that completed, in the order they completed.
    pub completed: Vec<Step>,
    pub failed: Option<Step>,
    pub total_elapsed: Duration,
    pub slowest: Option<(Step, Duration)>,
}

impl RunSummary {
    pub fn succeeded(&self) -> bool {
        self.failed.is_none() && self.completed.len() == Step::ALL.len()
    }
}

pub fn compute_summary(events: &VecDeque<StepEvent>) -> RunSummary {
    let mut summary = RunSummary::default();

    for event in events {
        match event.outcome {
            StepOutcome::Started => continue,
            StepOutcome::Completed => summary.completed.push(event.step),
            StepOutcome::Failed => summary.failed = Some(event.step),
        }

        summary.total_elapsed += event.elapsed;
        let slower = summary
            .slowest
            .map_or(true, |(_, longest)| event.elapsed > longest);
        if slower {
            summary.slowest = Some((event.step, event.elapsed));
        }
    }

    summary
}
