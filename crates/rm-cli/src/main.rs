//! Command-line front end for the contour pipeline.
//!
//! Loads an image and a directory of sixteen contour tiles, runs the
//! parallel marching-squares pipeline, and writes the stamped result.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use image::RgbImage;
use log::info;
use rastermarch::{CONTOUR_CONFIG_COUNT, Image, PipelineConfig, Rgb8, TileSet, run};

/// Tile files are looked up as `<code>.<ext>` with these extensions, in
/// order.
const TILE_EXTENSIONS: [&str; 3] = ["ppm", "pnm", "png"];

#[derive(Parser, Debug)]
#[command(name = "rastermarch")]
#[command(about = "Extract marching-squares contours from an image")]
struct Cli {
    /// Input image path
    input: PathBuf,

    /// Output image path; the format is taken from the extension
    output: PathBuf,

    /// Worker thread count
    threads: NonZeroUsize,

    /// Directory holding the 16 contour tiles, named 0 through 15
    #[arg(long, default_value = "contours")]
    contours: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    };

    let source = load_image(&cli.input)?;
    info!(
        "loaded {}: {}x{}",
        cli.input.display(),
        source.width(),
        source.height()
    );

    let tiles = load_tiles(&cli.contours)?;
    let cfg = PipelineConfig::default();
    if cfg.needs_rescale(source.width(), source.height()) {
        info!(
            "source exceeds {}x{}, rescaling before sampling",
            cfg.max_width, cfg.max_height
        );
    }

    let stamped = run(source, &tiles, &cfg, cli.threads)?;
    save_image(&cli.output, &stamped)?;
    info!(
        "wrote {}: {}x{}",
        cli.output.display(),
        stamped.width(),
        stamped.height()
    );

    Ok(())
}

fn load_image(path: &Path) -> Result<Image<Rgb8>> {
    let rgb = image::open(path)
        .with_context(|| format!("opening image {}", path.display()))?
        .to_rgb8();
    let (w, h) = rgb.dimensions();
    let data = rgb
        .pixels()
        .map(|p| Rgb8::new(p.0[0], p.0[1], p.0[2]))
        .collect();

    Image::from_vec(w as usize, h as usize, data)
        .with_context(|| format!("constructing image from {}", path.display()))
}

fn load_tiles(dir: &Path) -> Result<TileSet> {
    let mut tiles = Vec::with_capacity(CONTOUR_CONFIG_COUNT);
    for code in 0..CONTOUR_CONFIG_COUNT {
        let path = TILE_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{code}.{ext}")))
            .find(|p| p.is_file());
        let Some(path) = path else {
            bail!("missing contour tile {} under {}", code, dir.display());
        };
        tiles.push(load_image(&path)?);
    }

    TileSet::new(tiles).context("assembling contour tile set")
}

fn save_image(path: &Path, img: &Image<Rgb8>) -> Result<()> {
    let mut raw = Vec::with_capacity(img.width() * img.height() * 3);
    for px in img.data() {
        raw.extend_from_slice(&[px.r, px.g, px.b]);
    }

    let rgb = RgbImage::from_raw(img.width() as u32, img.height() as u32, raw)
        .context("constructing RgbImage from raw bytes")?;
    rgb.save(path)
        .with_context(|| format!("saving image {}", path.display()))
}
