pub mod config;
mod finalize;
mod generator;
mod types;

pub use config::{StarTrailConfig, ThresholdConfig};
pub use generator::{order_by_mtime, StarTrailGenerator};
pub use types::{FrameOutcome, NoOpReporter, PipelineStage, ProgressReporter, RunSummary};
