use core::fmt;
use std::num::NonZeroUsize;
use std::sync::Barrier;
use std::thread;

use rm_core::{Image, PartitionDescriptor, Rgb8};
use rm_march::{GridDims, TileSet};
use rm_resample::{CatmullRom, Resampler};

use crate::config::PipelineConfig;
use crate::shared::{SharedGrid, SharedImage};
use crate::worker::{self, Route, WorkerCtx};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The source image has a zero dimension.
    EmptySource,
    /// A sampling stride of zero would divide by zero everywhere.
    ZeroStride,
    /// Tile `code` is larger than one sampling stride and would bleed into
    /// a neighboring worker's band.
    TileExceedsStride { code: u8 },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySource => write!(f, "source image has no pixels"),
            Self::ZeroStride => write!(f, "sampling stride cannot be zero"),
            Self::TileExceedsStride { code } => {
                write!(f, "contour tile {code} exceeds the sampling stride")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// Runs the full contour pipeline with the default bicubic resampler.
///
/// Consumes the source; the returned image is the stamped canvas when the
/// source was rescaled, the stamped source otherwise.
pub fn run(
    source: Image<Rgb8>,
    tiles: &TileSet,
    cfg: &PipelineConfig,
    workers: NonZeroUsize,
) -> Result<Image<Rgb8>, PipelineError> {
    run_with_resampler(source, tiles, cfg, workers, &CatmullRom)
}

/// [`run`] with a caller-supplied resampler.
pub fn run_with_resampler<R: Resampler>(
    source: Image<Rgb8>,
    tiles: &TileSet,
    cfg: &PipelineConfig,
    workers: NonZeroUsize,
    resampler: &R,
) -> Result<Image<Rgb8>, PipelineError> {
    if source.width() == 0 || source.height() == 0 {
        return Err(PipelineError::EmptySource);
    }
    if cfg.step_x == 0 || cfg.step_y == 0 {
        return Err(PipelineError::ZeroStride);
    }
    for (code, tile) in tiles.tiles().iter().enumerate() {
        if tile.height() > cfg.step_x || tile.width() > cfg.step_y {
            return Err(PipelineError::TileExceedsStride { code: code as u8 });
        }
    }

    let rescale = cfg.needs_rescale(source.width(), source.height());
    let source = SharedImage::from_image(source);
    let canvas =
        rescale.then(|| SharedImage::new_fill(cfg.max_width, cfg.max_height, Rgb8::default()));

    let active = canvas.as_ref().unwrap_or(&source);
    let grid = SharedGrid::new(GridDims::for_image(
        active.width(),
        active.height(),
        cfg.step_x,
        cfg.step_y,
    ));

    let workers = workers.get();
    let barrier = Barrier::new(workers);
    thread::scope(|scope| {
        for id in 0..workers {
            let ctx = WorkerCtx {
                part: PartitionDescriptor::new(id, workers),
                route: match &canvas {
                    Some(canvas) => Route::Rescaled { canvas },
                    None => Route::Direct,
                },
                source: &source,
                grid: &grid,
                tiles,
                cfg,
                resampler,
                barrier: &barrier,
            };
            scope.spawn(move || worker::run(&ctx));
        }
    });

    Ok(match canvas {
        Some(canvas) => canvas.into_image(),
        None => source.into_image(),
    })
}
