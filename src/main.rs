use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use phasesim::batch::{self, load_image};
use phasesim::{Phase, PhaseTransform, Polarity, RegionDetector};

#[derive(Parser)]
#[command(name = "phasesim")]
#[command(about = "Simulate contrast phases and detect dominant regions in images")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a phase look and write the result as PNG
    Process {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Phase to simulate (arterial or venous)
        #[arg(short, long)]
        phase: String,

        /// Output PNG path
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,

        /// Save debug outputs to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,
    },

    /// Detect the largest high-contrast region and print JSON results
    Analyze {
        /// Input image files, analyzed concurrently
        #[arg(value_name = "IMAGE", required = true)]
        image_paths: Vec<PathBuf>,

        /// Minimum share of the image the region must cover
        #[arg(long, default_value_t = phasesim::detection::DEFAULT_MIN_AREA_RATIO)]
        min_area_ratio: f64,

        /// Which side of the threshold is the object (dark or bright)
        #[arg(long, default_value = "dark")]
        polarity: Polarity,

        /// Save debug outputs to directory (must be empty, single image only)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Process { image_path, phase, output, debug_out } => {
            run_process(&image_path, &phase, &output, debug_out)
        }
        Command::Analyze { image_paths, min_area_ratio, polarity, debug_out } => {
            let mut detector = RegionDetector::new()
                .with_min_area_ratio(min_area_ratio)
                .with_polarity(polarity);
            if let Some(dir) = debug_out {
                if image_paths.len() != 1 {
                    anyhow::bail!("--debug-out requires exactly one image");
                }
                detector = detector.with_debug(dir);
            }
            run_analyze(image_paths, detector).await
        }
    }
}

fn run_process(
    image_path: &Path,
    phase: &str,
    output: &Path,
    debug_out: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Validate before touching the image
    let phase: Phase = phase.parse()?;
    let img = load_image(image_path)?;

    let mut transform = PhaseTransform::new(phase);
    if let Some(dir) = debug_out {
        transform = transform.with_debug(dir);
    }

    let png = transform.apply_to_png(&img)?;
    std::fs::write(output, &png)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(phase = %phase, "Wrote {}", output.display());
    Ok(())
}

/// Print one JSON line per image, in argument order; fail if any image failed
async fn run_analyze(image_paths: Vec<PathBuf>, detector: RegionDetector) -> anyhow::Result<()> {
    let results = batch::analyze_paths(image_paths, &detector).await;

    for result in &results {
        println!("{}", batch::result_line(result));
    }

    let failures = results.iter().filter(|r| r.is_err()).count();
    if failures > 0 {
        anyhow::bail!("{} image(s) failed", failures);
    }
    Ok(())
}
