use std::fs;
use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{Result, StarTrailError};
use crate::io::image_io::encode_frame;
use crate::metadata::{CameraMetadata, ExifMetadata};

use super::generator::StarTrailGenerator;
use super::types::RunSummary;

impl StarTrailGenerator {
    /// Write the composite (or the placeholder when nothing was accepted) to
    /// `output` with camera metadata attached.
    ///
    /// Can be called at any point of the run and more than once.
    pub fn finalize(&self, output: &Path, camera: &CameraMetadata) -> Result<RunSummary> {
        warn!(
            elapsed_s = self.processing_time.as_secs_f64(),
            accepted = self.accepted_count(),
            "Star trail frames processed"
        );
        warn!(excluded = self.excluded_count(), "Frames excluded");

        let used_placeholder = self.accepted_count() == 0;
        if used_placeholder {
            warn!("Not enough frames to build a star trail, using placeholder image");
        }
        let image = self
            .accumulator
            .result()
            .ok_or(StarTrailError::EmptySequence)?;

        let write_start = Instant::now();
        let exif = ExifMetadata::from_camera(camera, Utc::now());
        let bytes = encode_frame(
            image,
            self.file_type,
            &self.config.image_file_compression,
            Some(exif.to_tiff_bytes()),
        )?;

        fs::write(output, bytes)?;
        set_output_permissions(output)?;

        let write_time = write_start.elapsed();
        info!(
            output = %output.display(),
            elapsed_s = write_time.as_secs_f64(),
            "Star trail written"
        );

        Ok(RunSummary {
            output: output.to_path_buf(),
            accepted: self.accepted_count(),
            excluded: self.excluded_count(),
            skipped: self.skipped,
            timelapse_frames: self.timelapse_frame_count(),
            used_placeholder,
            processing_time: self.processing_time,
            write_time,
        })
    }
}

#[cfg(unix)]
fn set_output_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    use crate::consts::OUTPUT_FILE_MODE;

    fs::set_permissions(path, fs::Permissions::from_mode(OUTPUT_FILE_MODE))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_output_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
