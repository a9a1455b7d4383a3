use std::path::PathBuf;
use std::time::Duration;

use crate::gate::ExclusionReason;

/// What happened to a frame handed to the generator.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Folded into the composite.
    Accepted,
    /// Rejected by a gate. Still counted and offered as placeholder.
    Excluded(ExclusionReason),
}

impl FrameOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Counters and timings of a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub accepted: usize,
    pub excluded: usize,
    /// Inputs that could not be decoded or did not match the composite shape.
    pub skipped: usize,
    pub timelapse_frames: usize,
    /// True when no frame was accepted and the darkest frame was written.
    pub used_placeholder: bool,
    /// Cumulative time spent in `process_frame`.
    pub processing_time: Duration,
    pub write_time: Duration,
}

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Processing,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processing => write!(f, "Processing frames"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Progress callbacks for a run.
///
/// All methods default to no-ops so implementors only override what they
/// display.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of frames in
    /// this stage, if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// `items_done` work items of the current stage have completed.
    fn advance(&self, _items_done: usize) {}

    fn finish_stage(&self) {}
}

/// Reporter that ignores everything.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
