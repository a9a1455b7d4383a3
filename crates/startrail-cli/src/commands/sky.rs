use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use startrail_core::astro::{Ephemeris, LowPrecisionEphemeris};
use startrail_core::gate::AstronomicalGate;

use super::config::RunFile;
use crate::summary::print_sky_report;

#[derive(Args)]
pub struct SkyArgs {
    /// Run config file (TOML) providing location and thresholds
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Observer latitude, degrees north
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Observer longitude, degrees east
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Time to evaluate, RFC 3339 (default: now)
    #[arg(long)]
    pub time: Option<String>,
}

pub fn run(args: &SkyArgs) -> Result<()> {
    let run_file = RunFile::load_or_default(args.config.as_deref())?;
    let mut observer = run_file.config.location;
    if let Some(latitude) = args.latitude {
        observer.latitude = latitude;
    }
    if let Some(longitude) = args.longitude {
        observer.longitude = longitude;
    }

    let at = match args.time {
        Some(ref text) => DateTime::parse_from_rfc3339(text)
            .with_context(|| format!("Invalid time {text:?}, expected RFC 3339"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let gate = AstronomicalGate::new(observer, run_file.config.thresholds);
    let observer = gate.observer();
    let ephemeris = LowPrecisionEphemeris;
    let sun = ephemeris.sun(observer, at);
    let moon = ephemeris.moon(observer, at);
    let verdict = gate.admit(at);

    print_sky_report(observer, at, &sun, &moon, &verdict);
    Ok(())
}
