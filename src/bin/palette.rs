use anyhow::{Context, Result};
use clap::Parser;
use image_palette_wasm::{
    Color, DEFAULT_COLOR_COUNT, DEFAULT_SEED, PaletteExtractor, SAMPLE_SIZE, decode_upload,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Print the dominant colors of images as JSON, one line per input.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of colors to extract
    #[arg(short = 'k', long, default_value_t = DEFAULT_COLOR_COUNT)]
    n_colors: usize,

    /// Seed for k-means initialization
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Number of k-means runs; the best one is kept
    #[arg(long, default_value_t = 1)]
    runs: usize,

    /// Side of the square grid images are resampled to
    #[arg(long, default_value_t = SAMPLE_SIZE)]
    sample_size: u32,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    file: String,
    colors: &'a [Color],
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let extractor = PaletteExtractor::new()
        .seed(args.seed)
        .runs(args.runs)
        .sample_size(args.sample_size);

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let image = decode_upload(&bytes).with_context(|| format!("decoding {}", input.display()))?;
        let colors = extractor
            .extract(&image, args.n_colors)
            .with_context(|| format!("extracting colors from {}", input.display()))?;

        let report = Report {
            file: input.display().to_string(),
            colors: &colors,
        };
        let line = if args.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{line}");
    }

    Ok(())
}
