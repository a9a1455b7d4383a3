use std::path::Path;

use chrono::{DateTime, Utc};
use console::Style;
use startrail_core::astro::{BodyPosition, Observer};
use startrail_core::gate::{AstronomicalVerdict, GateDecision};
use startrail_core::pipeline::{RunSummary, StarTrailConfig};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    accepted: Style,
    rejected: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            accepted: Style::new().green(),
            rejected: Style::new().red(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

fn print_moon_rule(s: &Styles, label: &str, altitude: f64, phase: f64) {
    if altitude > 90.0 || phase >= 100.0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to(label),
            s.disabled.apply_to("disabled")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to(label),
            s.value.apply_to(format!("alt > {altitude:.1}\u{b0} and phase > {phase:.0}%"))
        );
    }
}

pub fn print_run_header(config: &StarTrailConfig, input_count: usize, output: &Path) {
    let s = Styles::new();
    let t = &config.thresholds;

    print_title(&s, "Star Trail");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Inputs"),
        s.value.apply_to(format!("{input_count} files"))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Location"),
        s.value.apply_to(format!(
            "{:.4}, {:.4}",
            config.location.latitude, config.location.longitude
        ))
    );
    if config.timelapse {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Timelapse"),
            s.accepted.apply_to("enabled")
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Timelapse"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Exclusion"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Sun"),
        s.value.apply_to(format!("alt > {:.1}\u{b0}", t.sun_alt_threshold))
    );
    print_moon_rule(&s, "Moon mode", t.moonmode_alt, t.moonmode_phase);
    print_moon_rule(&s, "Moon", t.moon_alt_threshold, t.moon_phase_threshold);
    println!(
        "    {:<12}{}",
        s.label.apply_to("Brightness"),
        s.value.apply_to(format!("> {:.1}", t.max_brightness))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Bright px"),
        s.value.apply_to(format!(
            "> {:.2}% above {}",
            t.pixel_cutoff_percent, t.mask_threshold
        ))
    );
    println!();
}

pub fn print_run_summary(summary: &RunSummary) {
    let s = Styles::new();

    print_title(&s, "Result");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Accepted"),
        s.accepted.apply_to(summary.accepted)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Excluded"),
        s.rejected.apply_to(summary.excluded)
    );
    if summary.skipped > 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Skipped"),
            s.disabled.apply_to(summary.skipped)
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Timelapse"),
        s.value.apply_to(format!("{} frames", summary.timelapse_frames))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Processing"),
        s.value
            .apply_to(format!("{:.2}s", summary.processing_time.as_secs_f64()))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Writing"),
        s.value.apply_to(format!("{:.2}s", summary.write_time.as_secs_f64()))
    );
    if summary.used_placeholder {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Note"),
            s.disabled.apply_to("no frame accepted, wrote darkest frame")
        );
    }
    println!();
    println!(
        "  Output saved to {}",
        s.path.apply_to(summary.output.display())
    );
}

pub fn print_sky_report(
    observer: &Observer,
    at: DateTime<Utc>,
    sun: &BodyPosition,
    moon: &BodyPosition,
    verdict: &AstronomicalVerdict,
) {
    let s = Styles::new();

    print_title(&s, "Sky");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Time"),
        s.value.apply_to(at.format("%Y-%m-%d %H:%M:%S UTC"))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Location"),
        s.value
            .apply_to(format!("{:.4}, {:.4}", observer.latitude, observer.longitude))
    );
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Sun alt"),
        s.value.apply_to(format!("{:.2}\u{b0}", sun.altitude_deg))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Moon alt"),
        s.value.apply_to(format!("{:.2}\u{b0}", moon.altitude_deg))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Moon phase"),
        s.value.apply_to(format!("{:.1}%", moon.phase_percent))
    );
    println!();

    match verdict.decision {
        GateDecision::Allow => println!(
            "  {:<14}{}",
            s.label.apply_to("Verdict"),
            s.accepted.apply_to("frames admitted")
        ),
        GateDecision::Exclude(ref reason) => println!(
            "  {:<14}{}",
            s.label.apply_to("Verdict"),
            s.rejected.apply_to(format!("excluded: {reason}"))
        ),
    }
}
