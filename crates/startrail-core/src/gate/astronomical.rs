use chrono::{DateTime, Utc};

use crate::astro::{BodyPosition, Ephemeris, LowPrecisionEphemeris, Observer};
use crate::pipeline::config::ThresholdConfig;

use super::{ExclusionReason, GateDecision};

/// Result of the sun/moon rules for one timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct AstronomicalVerdict {
    pub decision: GateDecision,
    pub sun_altitude: f64,
    /// Not computed when the sun rule already excluded the frame.
    pub moon: Option<BodyPosition>,
}

/// Sun altitude, moon-mode and moon rules, evaluated in that order.
pub struct AstronomicalGate {
    observer: Observer,
    thresholds: ThresholdConfig,
    ephemeris: Box<dyn Ephemeris>,
}

impl AstronomicalGate {
    pub fn new(observer: Observer, thresholds: ThresholdConfig) -> Self {
        Self {
            observer,
            thresholds,
            ephemeris: Box::new(LowPrecisionEphemeris),
        }
    }

    /// Replace the ephemeris source.
    pub fn with_ephemeris(mut self, ephemeris: Box<dyn Ephemeris>) -> Self {
        self.ephemeris = ephemeris;
        self
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn admit(&self, at: DateTime<Utc>) -> AstronomicalVerdict {
        let t = &self.thresholds;
        let sun = self.ephemeris.sun(&self.observer, at);

        if sun.altitude_deg > t.sun_alt_threshold {
            return AstronomicalVerdict {
                decision: GateDecision::Exclude(ExclusionReason::SunAltitude {
                    altitude: sun.altitude_deg,
                }),
                sun_altitude: sun.altitude_deg,
                moon: None,
            };
        }

        let moon = self.ephemeris.moon(&self.observer, at);
        let altitude = moon.altitude_deg;
        let phase = moon.phase_percent;

        let decision = if altitude > t.moonmode_alt && phase > t.moonmode_phase {
            GateDecision::Exclude(ExclusionReason::MoonMode { altitude, phase })
        } else if altitude > t.moon_alt_threshold && phase > t.moon_phase_threshold {
            GateDecision::Exclude(ExclusionReason::Moon { altitude, phase })
        } else {
            GateDecision::Allow
        };

        AstronomicalVerdict {
            decision,
            sun_altitude: sun.altitude_deg,
            moon: Some(moon),
        }
    }
}
