//! Fixed-pool parallel driver for the contour pipeline.
//!
//! The pipeline runs three stages over a fixed pool of worker threads that
//! partition work by row ranges:
//!
//! 1. **Rescale** (only when the source exceeds the canvas limit): each
//!    worker fills its row band of the fixed-size canvas through the
//!    bicubic resampler, then all workers meet at a barrier.
//! 2. **Sampling**: each worker thresholds its band of the sampling grid
//!    from whichever image is active, plus its share of the bottom edge
//!    row under an independent column partition.
//! 3. **Stamping**: after a second rendezvous (stamping a cell row reads
//!    the grid row below it, which a neighboring worker wrote), each
//!    worker composites contour tiles into its pixel band of the active
//!    image.
//!
//! Workers never write outside the ranges handed to them by the shared
//! partition formula, so the only synchronization in the whole pipeline is
//! the barrier between stages.

mod config;
mod pipeline;
mod shared;
mod worker;

pub use config::PipelineConfig;
pub use pipeline::{PipelineError, run, run_with_resampler};
