mod common;

use ndarray::Array2;

use startrail_core::astro::Observer;
use startrail_core::frame::Frame;
use startrail_core::gate::photometric::pixel_cutoff;
use startrail_core::gate::{AstronomicalGate, ExclusionReason, GateDecision, PhotometricGate};
use startrail_core::pipeline::{FrameOutcome, StarTrailGenerator, ThresholdConfig};

use common::{flat_mono, night_time, quiet_config, FixedEphemeris};

fn astro_gate(thresholds: ThresholdConfig, ephemeris: FixedEphemeris) -> AstronomicalGate {
    AstronomicalGate::new(Observer::new(33.0, -84.0), thresholds)
        .with_ephemeris(Box::new(ephemeris))
}

#[test]
fn test_sun_rule_short_circuits() {
    let thresholds = ThresholdConfig {
        moonmode_alt: 0.0,
        moonmode_phase: 0.0,
        ..Default::default()
    };
    let verdict = astro_gate(thresholds, FixedEphemeris::new(-10.0, 60.0, 99.0)).admit(night_time(0));

    assert_eq!(
        verdict.decision,
        GateDecision::Exclude(ExclusionReason::SunAltitude { altitude: -10.0 })
    );
    assert!(verdict.moon.is_none());
}

#[test]
fn test_sun_exactly_at_threshold_is_allowed() {
    let verdict = astro_gate(
        ThresholdConfig::default(),
        FixedEphemeris::new(-15.0, -20.0, 0.0),
    )
    .admit(night_time(0));
    assert!(verdict.decision.is_allowed());
}

#[test]
fn test_moon_rules_disabled_by_default() {
    let verdict = astro_gate(
        ThresholdConfig::default(),
        FixedEphemeris::new(-30.0, 89.9, 100.0),
    )
    .admit(night_time(0));
    assert!(verdict.decision.is_allowed());
    assert_eq!(verdict.moon.unwrap().phase_percent, 100.0);
}

#[test]
fn test_moonmode_checked_before_moon_rule() {
    let thresholds = ThresholdConfig {
        moonmode_alt: 10.0,
        moonmode_phase: 50.0,
        moon_alt_threshold: 0.0,
        moon_phase_threshold: 10.0,
        ..Default::default()
    };

    let both = astro_gate(thresholds, FixedEphemeris::new(-30.0, 40.0, 80.0)).admit(night_time(0));
    assert!(matches!(
        both.decision,
        GateDecision::Exclude(ExclusionReason::MoonMode { .. })
    ));

    let moon_only =
        astro_gate(thresholds, FixedEphemeris::new(-30.0, 5.0, 30.0)).admit(night_time(0));
    assert!(matches!(
        moon_only.decision,
        GateDecision::Exclude(ExclusionReason::Moon { .. })
    ));

    // Both comparisons are strict.
    let edge = astro_gate(thresholds, FixedEphemeris::new(-30.0, 0.0, 10.0)).admit(night_time(0));
    assert!(edge.decision.is_allowed());
}

#[test]
fn test_pixel_cutoff_scales_with_area() {
    assert_eq!(pixel_cutoff(1000, 1000, 1.0), 10_000.0);
    assert_eq!(pixel_cutoff(640, 480, 0.5), 1536.0);
}

#[test]
fn test_brightness_rule_short_circuits() {
    let gate = PhotometricGate::new(&ThresholdConfig::default());
    let mask = Array2::from_elem((10, 10), 255u8);
    let verdict = gate.evaluate(&flat_mono(10, 10, 200), &mask).unwrap();

    assert!(matches!(
        verdict.decision,
        GateDecision::Exclude(ExclusionReason::Brightness { .. })
    ));
    assert!(verdict.bright_pixel_count.is_none());
}

#[test]
fn test_brightness_limit_is_strict() {
    let gate = PhotometricGate::new(&ThresholdConfig::default());
    let mask = Array2::from_elem((10, 10), 255u8);
    assert!(gate
        .evaluate(&flat_mono(10, 10, 50), &mask)
        .unwrap()
        .decision
        .is_allowed());
    assert!(!gate
        .evaluate(&flat_mono(10, 10, 51), &mask)
        .unwrap()
        .decision
        .is_allowed());
}

#[test]
fn test_pixel_count_must_exceed_cutoff() {
    let gate = PhotometricGate::new(&ThresholdConfig::default());
    let mask = Array2::from_elem((100, 100), 255u8);

    // 1% of 10 000 pixels = 100 allowed.
    let mut data = Array2::from_elem((100, 100), 0u8);
    data.row_mut(0).fill(255);
    let at_cutoff = Frame::mono(data.clone(), night_time(0));
    let verdict = gate.evaluate(&at_cutoff, &mask).unwrap();
    assert!(verdict.decision.is_allowed());
    assert_eq!(verdict.bright_pixel_count, Some(100));

    data[[1, 0]] = 255;
    let over = Frame::mono(data, night_time(0));
    assert_eq!(
        gate.evaluate(&over, &mask).unwrap().decision,
        GateDecision::Exclude(ExclusionReason::PixelCutoff {
            count: 101,
            cutoff: 100.0
        })
    );
}

#[test]
fn test_masked_region_drives_brightness() {
    let gate = PhotometricGate::new(&ThresholdConfig::default());
    // Bright left half, dark right half; mask covers only the dark side.
    let mut data = Array2::from_elem((10, 10), 0u8);
    data.slice_mut(ndarray::s![.., ..5]).fill(180);
    let mut mask = Array2::zeros((10, 10));
    mask.slice_mut(ndarray::s![.., 5..]).fill(255u8);

    let photometry = PhotometricGate::measure(&Frame::mono(data, night_time(0)), &mask).unwrap();
    assert_eq!(photometry.mean_brightness, 0.0);
    // 180 stays under the bright-pixel threshold.
    assert!(gate.admit(&photometry).decision.is_allowed());
}

#[test]
fn test_generator_counts_sun_exclusion_once() {
    let mut generator = StarTrailGenerator::new(quiet_config(), 1, None)
        .unwrap()
        .with_ephemeris(Box::new(FixedEphemeris::daytime()));

    // Bright enough to fail the photometric rules too.
    let outcome = generator.process_frame(&flat_mono(12, 12, 250)).unwrap();
    assert!(matches!(
        outcome,
        FrameOutcome::Excluded(ExclusionReason::SunAltitude { .. })
    ));
    assert_eq!(generator.excluded_count(), 1);
    assert_eq!(generator.accepted_count(), 0);
    // Still considered for the placeholder.
    assert!(generator.placeholder().is_some());
}
