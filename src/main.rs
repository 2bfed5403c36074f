use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use galaxy::{GalaxyParams, Rgb, ViewerConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Interactive spiral galaxy generator.
#[derive(Parser, Debug)]
#[command(name = "galaxy")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON preset to start from. "Save preset" writes back to it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of points
    #[arg(long)]
    count: Option<u32>,

    /// Point size in world units
    #[arg(long)]
    size: Option<f32>,

    /// Galaxy radius
    #[arg(long)]
    radius: Option<f32>,

    /// Number of spiral arms
    #[arg(long)]
    branches: Option<u32>,

    /// Arm curvature; negative winds the other way
    #[arg(long, allow_hyphen_values = true)]
    spin: Option<f32>,

    /// Jitter exponent; higher keeps points tighter to the arms
    #[arg(long)]
    randomness_pow: Option<f32>,

    /// Center color as #rrggbb
    #[arg(long)]
    inside_color: Option<Rgb>,

    /// Rim color as #rrggbb
    #[arg(long)]
    outside_color: Option<Rgb>,

    /// Seed for a reproducible galaxy
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    /// Defaults, then the preset file, then flags, then clamped to panel bounds.
    fn params(&self) -> anyhow::Result<GalaxyParams> {
        let mut params = match &self.config {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "loading preset");
                GalaxyParams::load(path)
                    .with_context(|| format!("could not load preset {}", path.display()))?
            }
            Some(path) => {
                info!(path = %path.display(), "preset not found, starting from defaults");
                GalaxyParams::default()
            }
            None => GalaxyParams::default(),
        };

        if let Some(count) = self.count {
            params.count = count;
        }
        if let Some(size) = self.size {
            params.size = size;
        }
        if let Some(radius) = self.radius {
            params.radius = radius;
        }
        if let Some(branches) = self.branches {
            params.branches = branches;
        }
        if let Some(spin) = self.spin {
            params.spin = spin;
        }
        if let Some(pow) = self.randomness_pow {
            params.randomness_pow = pow;
        }
        if let Some(color) = self.inside_color {
            params.inside_color = color;
        }
        if let Some(color) = self.outside_color {
            params.outside_color = color;
        }

        params.clamp_to_bounds();
        Ok(params)
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,galaxy=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let cli = Cli::parse();
    let params = cli.params()?;
    info!(?params, seed = ?cli.seed, "starting galaxy viewer");

    galaxy::run(ViewerConfig {
        params,
        seed: cli.seed,
        preset_path: cli.config,
    })?;

    Ok(())
}
