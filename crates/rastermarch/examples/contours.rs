//! Example: marching-squares contours over a synthetic radial gradient.
//!
//! Generates a grayscale image that darkens toward the center, runs the
//! parallel pipeline with sixteen flat-shaded tiles (one distinct gray per
//! cell configuration), and writes the stamped result as a PNG. The band of
//! intermediate shades around the dark disc is the extracted contour.
//!
//! Run from the workspace root:
//!   cargo run -p rastermarch --example contours -- --help
//!   cargo run -p rastermarch --example contours

use std::num::NonZeroUsize;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::RgbImage;
use rastermarch::{Image, PipelineConfig, Rgb8, TileSet, run};

#[derive(Parser, Debug)]
#[command(about = "Stamp contour tiles over a synthetic radial gradient")]
struct Args {
    /// Generated image width in pixels
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Generated image height in pixels
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// Worker thread count
    #[arg(long, default_value = "4")]
    threads: NonZeroUsize,

    /// Output PNG path
    #[arg(long, default_value = "contours_demo.png")]
    out: String,
}

/// Grayscale ramp from black at the center to white at the nearest edge.
fn radial_gradient(width: usize, height: usize) -> Result<Image<Rgb8>> {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let max_r = cx.min(cy);

    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let dx = col as f32 - cx;
            let dy = row as f32 - cy;
            let r = (dx * dx + dy * dy).sqrt() / max_r;
            data.push(Rgb8::splat((r.min(1.0) * 255.0) as u8));
        }
    }
    Image::from_vec(width, height, data).context("building gradient image")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let source = radial_gradient(args.width, args.height)?;
    let tiles = TileSet::flat_shades(8, 8);
    let cfg = PipelineConfig::default();

    println!(
        "stamping {}x{} gradient with {} workers (stride {}x{}, sigma {})",
        args.width, args.height, args.threads, cfg.step_x, cfg.step_y, cfg.sigma
    );

    let t0 = Instant::now();
    let stamped = run(source, &tiles, &cfg, args.threads)?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;
    println!("pipeline finished in {elapsed_ms:.2} ms");

    let mut raw = Vec::with_capacity(stamped.width() * stamped.height() * 3);
    for px in stamped.data() {
        raw.extend_from_slice(&[px.r, px.g, px.b]);
    }
    let out = RgbImage::from_raw(stamped.width() as u32, stamped.height() as u32, raw)
        .context("constructing RgbImage from raw bytes")?;
    out.save(&args.out)
        .with_context(|| format!("saving {}", args.out))?;

    println!("result written to {}", args.out);
    Ok(())
}
