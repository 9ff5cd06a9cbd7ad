//! Foundational primitives for the rastermarch contour pipeline.
//!
//! ## Axis convention
//! Images are row-major over `(row, col)` with `row` in `[0, height)` and
//! `col` in `[0, width)`. Grid-row index `i` advances down image rows with
//! the vertical stride `step_x`; grid-column index `j` advances across image
//! columns with the horizontal stride `step_y`.
//!
//! ## Work partitioning
//! Every partitioned loop in the pipeline goes through
//! [`PartitionDescriptor::span`]. Using one formula everywhere guarantees
//! that the ranges of all workers tile the index space exactly, with no
//! gaps and no overlaps.

mod error;
mod image;
mod partition;
mod pixel;

pub use error::Error;
pub use image::{Image, ImageView};
pub use partition::PartitionDescriptor;
pub use pixel::Rgb8;
