use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Remote steps of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    CreateNotebook,
    UploadSource,
    GenerateAudio,
    WaitForAudio,
    DownloadAudio,
    DeleteNotebook,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::CreateNotebook,
        Step::UploadSource,
        Step::GenerateAudio,
        Step::WaitForAudio,
        Step::DownloadAudio,
        Step::DeleteNotebook,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::CreateNotebook => "create notebook",
            Step::UploadSource => "upload source",
            Step::GenerateAudio => "generate audio",
            Step::WaitForAudio => "wait for audio",
            Step::DownloadAudio => "download audio",
            Step::DeleteNotebook => "delete notebook",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    Started,
    Completed,
    Failed,
}

// Allowed: step, outcome, elapsed time.
// Forbidden: file contents, cookies, notebook titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    pub step: Step,
    pub outcome: StepOutcome,
    /// Zero for `Started`; time spent in the step otherwise.
    pub elapsed: Duration,
}
