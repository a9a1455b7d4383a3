use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use ndarray::{Array2, Array3};
use tracing::{debug, info, warn};

use crate::astro::Ephemeris;
use crate::error::{Result, StarTrailError};
use crate::frame::Frame;
use crate::gate::{AstronomicalGate, ExclusionReason, GateDecision, PhotometricGate};
use crate::io::format::ImageFileType;
use crate::io::image_io::load_frame;
use crate::mask::{adapt_mask, build_or_adapt, MaskSettings};
use crate::metadata::CameraMetadata;
use crate::stack::{Accumulator, Placeholder};
use crate::timelapse::{TimelapseEmitter, TimelapseFrame};

use super::config::StarTrailConfig;
use super::types::{FrameOutcome, NoOpReporter, PipelineStage, ProgressReporter, RunSummary};

/// Sequential star trail builder.
///
/// Frames are fed in capture order through [`process_frame`]; each one is
/// measured, offered as placeholder, run through the astronomical then the
/// photometric gate, and max-folded into the composite when both admit it.
///
/// [`process_frame`]: StarTrailGenerator::process_frame
pub struct StarTrailGenerator {
    pub(super) config: StarTrailConfig,
    pub(super) file_type: ImageFileType,
    mask_settings: MaskSettings,
    /// Adapted external mask, or the generated one once the first frame
    /// arrived.
    mask: Option<Array2<u8>>,
    astronomical: AstronomicalGate,
    photometric: PhotometricGate,
    pub(super) accumulator: Accumulator,
    pub(super) timelapse: Option<TimelapseEmitter>,
    pub(super) processing_time: Duration,
    pub(super) skipped: usize,
}

impl StarTrailGenerator {
    /// Build a generator for one run.
    ///
    /// `binning` scales the ROI settings down to the frame resolution. `mask`
    /// is an optional full-resolution brightness mask (non-zero = sampled),
    /// cropped and scaled here. Fails on an unsupported output format, a crop
    /// or scale the mask cannot take, or when the timelapse workspace cannot
    /// be created.
    pub fn new(config: StarTrailConfig, binning: u32, mask: Option<Array2<u8>>) -> Result<Self> {
        let file_type = config.file_type()?;
        let mask_settings = MaskSettings::from_config(&config, binning);
        let mask = mask
            .map(|mask| adapt_mask(mask, &mask_settings))
            .transpose()?;

        let timelapse = if config.timelapse {
            Some(TimelapseEmitter::new(
                config.image_folder.as_deref(),
                file_type,
                config.image_file_compression.clone(),
            )?)
        } else {
            None
        };

        info!(
            format = %file_type,
            timelapse = config.timelapse,
            latitude = config.location.latitude,
            longitude = config.location.longitude,
            "Star trail generator ready"
        );

        Ok(Self {
            astronomical: AstronomicalGate::new(config.location, config.thresholds),
            photometric: PhotometricGate::new(&config.thresholds),
            config,
            file_type,
            mask_settings,
            mask,
            accumulator: Accumulator::new(),
            timelapse,
            processing_time: Duration::ZERO,
            skipped: 0,
        })
    }

    /// Use another sun/moon source for the astronomical gate.
    pub fn with_ephemeris(mut self, ephemeris: Box<dyn Ephemeris>) -> Self {
        self.astronomical = self.astronomical.with_ephemeris(ephemeris);
        self
    }

    /// Run one decoded frame through the gates and the accumulator.
    ///
    /// A frame whose shape differs from the composite fails with
    /// [`StarTrailError::FrameDimensionMismatch`] and leaves every counter
    /// untouched; a mask whose size differs from the frame fails with
    /// [`StarTrailError::MaskDimensionMismatch`] and is kept as is.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<FrameOutcome> {
        let start = Instant::now();

        self.accumulator.prepare(frame)?;

        let mask = build_or_adapt(
            &mut self.mask,
            frame.height(),
            frame.width(),
            &self.mask_settings,
        )?;

        let photometry = PhotometricGate::measure(frame, mask)?;
        if self.accumulator.observe(frame, photometry.mean_brightness) {
            debug!(
                mean = photometry.mean_brightness,
                "New darkest frame kept as placeholder"
            );
        }

        let astro = self.astronomical.admit(frame.timestamp());
        if let GateDecision::Exclude(reason) = astro.decision {
            return Ok(self.exclude(frame, reason, start));
        }

        let photo = self.photometric.admit(&photometry);
        if let GateDecision::Exclude(reason) = photo.decision {
            return Ok(self.exclude(frame, reason, start));
        }

        self.accumulator.accept(frame)?;

        if let (Some(timelapse), Some(composite)) =
            (self.timelapse.as_mut(), self.accumulator.composite())
        {
            timelapse.emit(composite, frame.timestamp())?;
        }

        self.processing_time += start.elapsed();
        Ok(FrameOutcome::Accepted)
    }

    fn exclude(&mut self, frame: &Frame, reason: ExclusionReason, start: Instant) -> FrameOutcome {
        debug!(
            source = ?frame.metadata.source,
            timestamp = %frame.timestamp(),
            %reason,
            "Excluding frame"
        );
        self.accumulator.exclude();
        self.processing_time += start.elapsed();
        FrameOutcome::Excluded(reason)
    }

    /// Decode, process and finalize a whole run.
    pub fn generate(
        &mut self,
        output: &Path,
        files: &[PathBuf],
        camera: &CameraMetadata,
    ) -> Result<RunSummary> {
        self.generate_reported(output, files, camera, &NoOpReporter)
    }

    /// [`generate`](Self::generate) with progress callbacks.
    ///
    /// Empty files are ignored, the rest are processed in modification time
    /// order. Files that fail to decode or whose shape differs from the
    /// composite are logged and skipped.
    pub fn generate_reported(
        &mut self,
        output: &Path,
        files: &[PathBuf],
        camera: &CameraMetadata,
        reporter: &dyn ProgressReporter,
    ) -> Result<RunSummary> {
        let run_start = Instant::now();
        let ordered = order_by_mtime(files);
        info!(files = ordered.len(), "Generating star trail");

        reporter.begin_stage(PipelineStage::Processing, Some(ordered.len()));
        for (i, path) in ordered.iter().enumerate() {
            debug!(file = %path.display(), "Reading file");
            match load_frame(path) {
                Ok(frame) => match self.process_frame(&frame) {
                    Ok(_) => {}
                    Err(e @ StarTrailError::FrameDimensionMismatch { .. }) => {
                        warn!(file = %path.display(), error = %e, "Skipping frame");
                        self.skipped += 1;
                    }
                    Err(e) => return Err(e),
                },
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Unable to read file, skipping");
                    self.skipped += 1;
                }
            }
            reporter.advance(i + 1);
        }
        reporter.finish_stage();

        reporter.begin_stage(PipelineStage::Writing, None);
        let summary = self.finalize(output, camera)?;
        reporter.finish_stage();

        info!(
            elapsed_s = run_start.elapsed().as_secs_f64(),
            "Total star trail run"
        );
        Ok(summary)
    }

    pub fn config(&self) -> &StarTrailConfig {
        &self.config
    }

    pub fn file_type(&self) -> ImageFileType {
        self.file_type
    }

    pub fn accepted_count(&self) -> usize {
        self.accumulator.accepted_count()
    }

    pub fn excluded_count(&self) -> usize {
        self.accumulator.excluded_count()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// Current composite, allocated once the first frame was seen.
    pub fn composite(&self) -> Option<&Array3<u8>> {
        self.accumulator.composite()
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.accumulator.placeholder()
    }

    /// Mask in use. An external mask is available from construction, a
    /// generated one after the first frame.
    pub fn mask(&self) -> Option<&Array2<u8>> {
        self.mask.as_ref()
    }

    /// Snapshots written so far, in emission order.
    pub fn timelapse_frames(&self) -> &[TimelapseFrame] {
        self.timelapse
            .as_ref()
            .map(TimelapseEmitter::frames)
            .unwrap_or_default()
    }

    pub fn timelapse_frame_count(&self) -> usize {
        self.timelapse_frames().len()
    }

    /// Directory holding the timelapse snapshots, when emission is enabled.
    pub fn timelapse_workspace(&self) -> Option<&Path> {
        self.timelapse.as_ref().map(TimelapseEmitter::workspace)
    }

    pub fn processing_time(&self) -> Duration {
        self.processing_time
    }

    /// Release the timelapse workspace, reporting removal errors.
    ///
    /// Dropping the generator removes it as well, silently.
    pub fn close(self) -> Result<()> {
        match self.timelapse {
            Some(timelapse) => timelapse.close(),
            None => Ok(()),
        }
    }
}

/// Drop empty or unreadable files and sort the rest by modification time,
/// oldest first.
pub fn order_by_mtime(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut stamped: Vec<(SystemTime, PathBuf)> = files
        .iter()
        .filter_map(|path| {
            let meta = match fs::metadata(path) {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Unable to stat file, skipping");
                    return None;
                }
            };
            if meta.len() == 0 {
                debug!(file = %path.display(), "Skipping empty file");
                return None;
            }
            let modified = meta.modified().ok()?;
            Some((modified, path.clone()))
        })
        .collect();

    stamped.sort_by_key(|(modified, _)| *modified);
    stamped.into_iter().map(|(_, path)| path).collect()
}
