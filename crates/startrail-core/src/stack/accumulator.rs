use ndarray::Array3;

use crate::error::{Result, StarTrailError};
use crate::frame::Frame;

use super::max::max_fold;

/// Darkest frame seen so far, kept as fallback output.
#[derive(Clone, Debug)]
pub struct Placeholder {
    pub frame: Frame,
    pub mean_brightness: f64,
}

/// Running maximum composite plus acceptance bookkeeping.
///
/// The composite is allocated as black on the first frame it sees and only
/// ever changes in [`Accumulator::accept`].
#[derive(Clone, Debug, Default)]
pub struct Accumulator {
    composite: Option<Array3<u8>>,
    accepted: usize,
    excluded: usize,
    placeholder: Option<Placeholder>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the composite for the frame's shape, or check that the frame
    /// has the shape of the existing composite.
    pub fn prepare(&mut self, frame: &Frame) -> Result<()> {
        match &self.composite {
            None => {
                self.composite = Some(Array3::zeros(frame.data.raw_dim()));
                Ok(())
            }
            Some(composite) if composite.dim() != frame.data.dim() => {
                Err(StarTrailError::FrameDimensionMismatch {
                    expected: composite.dim(),
                    found: frame.data.dim(),
                })
            }
            Some(_) => Ok(()),
        }
    }

    /// Fold an admitted frame into the composite.
    pub fn accept(&mut self, frame: &Frame) -> Result<()> {
        self.prepare(frame)?;
        if let Some(composite) = self.composite.as_mut() {
            max_fold(composite, &frame.data)?;
        }
        self.accepted += 1;
        Ok(())
    }

    /// Record a frame rejected by a gate.
    pub fn exclude(&mut self) {
        self.excluded += 1;
    }

    /// Offer a frame as placeholder. Returns true if it became the new one.
    pub fn observe(&mut self, frame: &Frame, mean_brightness: f64) -> bool {
        let darker = self
            .placeholder
            .as_ref()
            .is_none_or(|p| mean_brightness < p.mean_brightness);
        if darker {
            self.placeholder = Some(Placeholder {
                frame: frame.clone(),
                mean_brightness,
            });
        }
        darker
    }

    pub fn composite(&self) -> Option<&Array3<u8>> {
        self.composite.as_ref()
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.placeholder.as_ref()
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded
    }

    /// Image to write: the composite once anything was accepted, otherwise
    /// the placeholder.
    pub fn result(&self) -> Option<&Array3<u8>> {
        if self.accepted > 0 {
            self.composite.as_ref()
        } else {
            self.placeholder.as_ref().map(|p| &p.frame.data)
        }
    }
}
