use core::fmt;

use rm_core::{Image, Rgb8};

/// Number of 2x2 corner configurations, and therefore of contour tiles.
pub const CONTOUR_CONFIG_COUNT: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileSetError {
    WrongCount { actual: usize },
}

impl fmt::Display for TileSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongCount { actual } => {
                write!(
                    f,
                    "expected {CONTOUR_CONFIG_COUNT} contour tiles, got {actual}"
                )
            }
        }
    }
}

impl std::error::Error for TileSetError {}

/// The 16 contour stamps, indexed directly by cell configuration code.
#[derive(Debug, Clone)]
pub struct TileSet {
    tiles: Vec<Image<Rgb8>>,
}

impl TileSet {
    /// Wraps exactly [`CONTOUR_CONFIG_COUNT`] tiles in code order.
    ///
    /// Tile dimensions are not validated here; the pipeline checks them
    /// against its sampling stride before stamping.
    pub fn new(tiles: Vec<Image<Rgb8>>) -> Result<Self, TileSetError> {
        if tiles.len() != CONTOUR_CONFIG_COUNT {
            return Err(TileSetError::WrongCount {
                actual: tiles.len(),
            });
        }
        Ok(Self { tiles })
    }

    pub fn tile(&self, code: u8) -> &Image<Rgb8> {
        &self.tiles[code as usize]
    }

    pub fn tiles(&self) -> &[Image<Rgb8>] {
        &self.tiles
    }

    /// Sixteen uniformly colored tiles, one distinct shade per code.
    ///
    /// Used by demos and tests where the stamped output must identify which
    /// configuration was chosen for each cell.
    pub fn flat_shades(width: usize, height: usize) -> Self {
        let tiles = (0..CONTOUR_CONFIG_COUNT)
            .map(|code| Image::new_fill(width, height, Rgb8::splat((code * 16) as u8)))
            .collect();
        Self { tiles }
    }

    /// Sixteen zero-sized tiles; stamping with them leaves the image
    /// untouched.
    pub fn empty() -> Self {
        let tiles = (0..CONTOUR_CONFIG_COUNT)
            .map(|_| Image::new_fill(0, 0, Rgb8::default()))
            .collect();
        Self { tiles }
    }
}
