pub mod config;
pub mod pipeline;
pub mod services;

// Re-export specific items for convenient access
pub use pipeline::{PipelineError, PodcastGenerator};
