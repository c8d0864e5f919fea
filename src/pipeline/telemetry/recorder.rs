use std::collections::VecDeque;
use std::time::Duration;

use super::event::{Step, StepEvent, StepOutcome};
use super::metrics::{compute_summary, RunSummary};

const MAX_EVENTS: usize = 256;

#[derive(Debug, Default)]
pub struct StepRecorder {
    buffer: VecDeque<StepEvent>,
}

impl StepRecorder {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(Step::ALL.len() * 2),
        }
    }

    pub fn record(&mut self, event: StepEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn started(&mut self, step: Step) {
        self.record(StepEvent { step, outcome: StepOutcome::Started, elapsed: Duration::ZERO });
    }

    pub fn finished(&mut self, step: Step, outcome: StepOutcome, elapsed: Duration) {
        self.record(StepEvent { step, outcome, elapsed });
    }

    pub fn events(&self) -> &VecDeque<StepEvent> {
        &self.buffer
    }

    pub fn snapshot(&self) -> RunSummary {
        compute_summary(&self.buffer)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
