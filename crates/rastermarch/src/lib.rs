//! Umbrella crate for the `rastermarch` workspace.
//!
//! Re-exports the raster primitives, the bicubic resampler, the
//! marching-squares building blocks, and the parallel pipeline driver.

pub use rm_core::*;
pub use rm_march::*;
pub use rm_pipeline::*;
pub use rm_resample::*;
