use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use startrail_core::metadata::CameraMetadata;
use startrail_core::pipeline::StarTrailConfig;

/// Contents of a run file: the generator settings at the top level and the
/// camera description under `[CAMERA]`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunFile {
    #[serde(flatten)]
    pub config: StarTrailConfig,
    #[serde(rename = "CAMERA", default)]
    pub camera: CameraMetadata,
}

impl RunFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Invalid run config {}", path.display()))
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save the default run file as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let run_file = RunFile {
        camera: CameraMetadata {
            name: "All-sky camera".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let toml_str = toml::to_string_pretty(&run_file)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
