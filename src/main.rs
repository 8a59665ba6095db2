use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;
use tracing::Level;

use agroscan::screening::{build_screening_pipeline, rgb_from_dynamic};
use agroscan::{Check, FilterConfig, PlausibilityFilter, Verdict};

#[derive(Parser)]
#[command(name = "agroscan")]
#[command(about = "Check whether a photo looks like a plant before disease classification")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// JSON file overriding filter thresholds
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Save each step's mask to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Print all five ratios, not only the verdict
    #[arg(long)]
    report: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = match &args.config {
        Some(path) => FilterConfig::from_json_file(path)?,
        None => FilterConfig::default(),
    };

    tracing::debug!(path = %args.image_path.display(), "loading image");
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    let rgb = rgb_from_dynamic(&img)?;
    tracing::debug!(width = rgb.width(), height = rgb.height(), "image loaded");

    let mut pipeline = build_screening_pipeline(config.clone());
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let result = pipeline.run(rgb.clone())?;

    match result.verdict() {
        Verdict::Accept => println!("ACCEPT"),
        Verdict::Reject(rejection) => println!("REJECT: {}", rejection),
    }

    if args.report {
        let report = PlausibilityFilter::new(config).measure(&rgb)?;
        println!("\n=== Ratios ===");
        for check in Check::ORDER {
            println!("  {:<14} {:.4}", check.name(), report.ratio(check));
        }
    }

    Ok(())
}
