//! Marching-squares semantics: threshold sampling grid, 4-bit cell
//! configuration codes, and contour tile stamping.
//!
//! The algorithm classifies each 2x2 neighborhood of a binary sampling grid
//! into one of 16 fixed configurations and stamps a matching pre-rendered
//! tile onto the image. Everything here is single-threaded; the parallel
//! row-band driver lives in `rm-pipeline`.

mod grid;
mod stamp;
mod tiles;

pub use grid::{GridDims, SamplingGrid, threshold_bit};
pub use stamp::{blit_tile, config_code, stamp_contours};
pub use tiles::{CONTOUR_CONFIG_COUNT, TileSet, TileSetError};
