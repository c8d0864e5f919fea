pub mod error;
pub mod generator;
pub mod telemetry;

pub use error::{ErrorKind, PipelineError};
pub use generator::{check_inputs, notebook_title, PodcastGenerator, NOTEBOOK_TITLE_PREFIX};
