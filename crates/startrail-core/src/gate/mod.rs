//! Pass/fail stages deciding whether a frame joins the composite.

pub mod astronomical;
pub mod photometric;

pub use astronomical::{AstronomicalGate, AstronomicalVerdict};
pub use photometric::{PhotometricGate, PhotometricVerdict, Photometry};

/// Outcome of a single gate.
#[derive(Clone, Debug, PartialEq)]
pub enum GateDecision {
    Allow,
    Exclude(ExclusionReason),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Why a frame was left out of the composite.
#[derive(Clone, Debug, PartialEq)]
pub enum ExclusionReason {
    /// Sun above the altitude threshold.
    SunAltitude { altitude: f64 },
    /// Moon-mode rule matched.
    MoonMode { altitude: f64, phase: f64 },
    /// General moon rule matched.
    Moon { altitude: f64, phase: f64 },
    /// Masked mean brightness above the limit.
    Brightness { mean: f64 },
    /// Too many saturated pixels.
    PixelCutoff { count: usize, cutoff: f64 },
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SunAltitude { altitude } => write!(f, "sun altitude {altitude:.1}°"),
            Self::MoonMode { altitude, phase } => {
                write!(f, "moon mode {altitude:.1}°/{phase:.1}%")
            }
            Self::Moon { altitude, phase } => {
                write!(f, "moon altitude/phase {altitude:.1}°/{phase:.1}%")
            }
            Self::Brightness { mean } => write!(f, "brightness {mean:.2}"),
            Self::PixelCutoff { count, cutoff } => {
                write!(f, "pixel cutoff {count} > {cutoff:.0}")
            }
        }
    }
}
