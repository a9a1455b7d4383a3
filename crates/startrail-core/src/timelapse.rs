//! Snapshots of the growing composite for timelapse assembly.
//!
//! Each accepted frame produces one file holding the composite as it stood
//! right after that frame was folded in. Files live in a per-run temporary
//! directory that is removed recursively when the emitter is dropped or
//! closed, so consumers must read them before the run is discarded.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ndarray::Array3;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::consts::TIMELAPSE_DIR_SUFFIX;
use crate::error::Result;
use crate::io::format::{FileCompression, ImageFileType};
use crate::io::image_io::{encode_frame, set_file_timestamp};

/// One persisted composite snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelapseFrame {
    pub path: PathBuf,
    /// Capture time of the source frame that produced this snapshot.
    pub timestamp: DateTime<Utc>,
}

pub struct TimelapseEmitter {
    workspace: TempDir,
    format: ImageFileType,
    compression: FileCompression,
    frames: Vec<TimelapseFrame>,
}

impl TimelapseEmitter {
    /// Create the workspace directory inside `base_dir`, or the system
    /// temporary directory when `None`.
    pub fn new(
        base_dir: Option<&Path>,
        format: ImageFileType,
        compression: FileCompression,
    ) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.suffix(TIMELAPSE_DIR_SUFFIX);
        let workspace = match base_dir {
            Some(dir) => builder.tempdir_in(dir)?,
            None => builder.tempdir()?,
        };
        info!(workspace = %workspace.path().display(), "Created timelapse workspace");

        Ok(Self {
            workspace,
            format,
            compression,
            frames: Vec::new(),
        })
    }

    /// Persist the composite, stamped with the source frame's time.
    pub fn emit(
        &mut self,
        composite: &Array3<u8>,
        timestamp: DateTime<Utc>,
    ) -> Result<&TimelapseFrame> {
        let name = format!(
            "{:05}_{}.{}",
            self.frames.len(),
            timestamp.format("%Y%m%d_%H%M%S"),
            self.format.extension()
        );
        let path = self.workspace.path().join(name);

        let bytes = encode_frame(composite, self.format, &self.compression, None)?;
        fs::write(&path, bytes)?;
        set_file_timestamp(&path, timestamp)?;
        debug!(path = %path.display(), "Wrote timelapse frame");

        self.frames.push(TimelapseFrame { path, timestamp });
        Ok(&self.frames[self.frames.len() - 1])
    }

    pub fn frames(&self) -> &[TimelapseFrame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn workspace(&self) -> &Path {
        self.workspace.path()
    }

    /// Remove the workspace now, reporting failures instead of ignoring them.
    pub fn close(self) -> Result<()> {
        self.workspace.close()?;
        Ok(())
    }
}
