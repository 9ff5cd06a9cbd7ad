//! Bicubic resampling for RGB rasters.
//!
//! ## Sampling coordinates
//! Sampling uses normalized coordinates: `u` in `[0, 1]` selects a row
//! (`u = 0` is the first row, `u = 1` the last), `v` selects a column.
//! Neighborhood lookups outside the image clamp to the nearest edge pixel.

mod bicubic;

pub use bicubic::{CatmullRom, Resampler};
