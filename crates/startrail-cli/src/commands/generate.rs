use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use startrail_core::io::image_io::load_mask;
use startrail_core::pipeline::{PipelineStage, ProgressReporter, StarTrailGenerator};
use tracing::debug;

use super::config::RunFile;
use crate::summary::{print_run_header, print_run_summary};

#[derive(Args)]
pub struct GenerateArgs {
    /// Input image files or directories of images
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Run config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file path [default: startrail.<IMAGE_FILE_TYPE>]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sensor binning of the input frames
    #[arg(long, default_value = "1")]
    pub bin: u32,

    /// Brightness mask image (non-zero pixels are sampled)
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Output format override (jpg, png, webp, tif)
    #[arg(long)]
    pub format: Option<String>,

    /// Observer latitude override, degrees north
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Observer longitude override, degrees east
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Do not write timelapse frames
    #[arg(long)]
    pub no_timelapse: bool,

    /// Copy the timelapse frames into this directory before cleanup
    #[arg(long)]
    pub timelapse_dir: Option<PathBuf>,
}

/// Drives an indicatif bar from pipeline progress callbacks.
struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:20} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.bar.set_message(stage.to_string());
        self.bar.set_length(total_items.unwrap_or(1) as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        if let Some(len) = self.bar.length() {
            self.bar.set_position(len);
        }
    }
}

pub fn run(args: &GenerateArgs) -> Result<()> {
    let mut run_file = RunFile::load_or_default(args.config.as_deref())?;
    let config = &mut run_file.config;
    if let Some(ref format) = args.format {
        config.image_file_type = format.clone();
    }
    if let Some(latitude) = args.latitude {
        config.location.latitude = latitude;
    }
    if let Some(longitude) = args.longitude {
        config.location.longitude = longitude;
    }
    if args.no_timelapse {
        config.timelapse = false;
    }
    if args.timelapse_dir.is_some() && !config.timelapse {
        bail!("--timelapse-dir needs timelapse output enabled");
    }

    let files = collect_inputs(&args.inputs)?;
    let mask = args
        .mask
        .as_deref()
        .map(|path| {
            load_mask(path).with_context(|| format!("Failed to load mask {}", path.display()))
        })
        .transpose()?;

    let file_type = config.file_type()?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("startrail.{}", file_type.extension())));

    print_run_header(&run_file.config, files.len(), &output);

    let mut generator = StarTrailGenerator::new(run_file.config.clone(), args.bin, mask)
        .context("Failed to set up star trail generator")?;

    let reporter = BarReporter::new()?;
    let summary = generator
        .generate_reported(&output, &files, &run_file.camera, &reporter)
        .with_context(|| format!("Failed to build star trail {}", output.display()))?;
    reporter.bar.finish_with_message("Done");

    if let Some(ref dir) = args.timelapse_dir {
        copy_timelapse(&generator, dir)?;
    }
    generator
        .close()
        .context("Failed to remove timelapse workspace")?;

    print_run_summary(&summary);
    Ok(())
}

/// Expand directories (one level) and keep plain files as given.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let entries = std::fs::read_dir(input)
                .with_context(|| format!("Failed to list {}", input.display()))?;
            for entry in entries {
                let path = entry?.path();
                if path.is_file() {
                    files.push(path);
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    debug!(count = files.len(), "Collected input files");
    Ok(files)
}

fn copy_timelapse(generator: &StarTrailGenerator, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    for frame in generator.timelapse_frames() {
        let Some(name) = frame.path.file_name() else {
            continue;
        };
        let target = dir.join(name);
        std::fs::copy(&frame.path, &target)
            .with_context(|| format!("Failed to copy {}", frame.path.display()))?;
    }
    println!(
        "Copied {} timelapse frames to {}",
        generator.timelapse_frame_count(),
        dir.display()
    );
    Ok(())
}
