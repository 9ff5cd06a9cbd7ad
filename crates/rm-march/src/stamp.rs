use rm_core::{Image, ImageView, Rgb8};

use crate::grid::SamplingGrid;
use crate::tiles::TileSet;

/// 4-bit cell configuration from the four corner bits, weighted
/// top-left 8, top-right 4, bottom-right 2, bottom-left 1.
pub fn config_code(tl: u8, tr: u8, br: u8, bl: u8) -> u8 {
    debug_assert!(tl <= 1 && tr <= 1 && br <= 1 && bl <= 1);
    8 * tl + 4 * tr + 2 * br + bl
}

/// Copies `tile` into `dst` with its top-left corner at `(row, col)`.
///
/// `dst` is a row-major pixel slice of width `dst_width`; `row` is relative
/// to the first row stored in `dst`, so callers holding only a row band pass
/// band-relative rows.
pub fn blit_tile(
    dst: &mut [Rgb8],
    dst_width: usize,
    row: usize,
    col: usize,
    tile: &ImageView<'_, Rgb8>,
) {
    for ti in 0..tile.height() {
        let start = (row + ti) * dst_width + col;
        dst[start..start + tile.width()].copy_from_slice(tile.row(ti));
    }
}

/// Stamps every cell of `grid` onto `img` in place (single-threaded
/// reference for the pipeline's partitioned stamping stage).
///
/// Stamping is a pure function of the grid and tile set: repeating it on an
/// unchanged grid rewrites the same pixels with the same values.
pub fn stamp_contours(
    img: &mut Image<Rgb8>,
    grid: &SamplingGrid,
    tiles: &TileSet,
    step_x: usize,
    step_y: usize,
) {
    let dims = grid.dims();
    let width = img.width();
    for i in 0..dims.p {
        for j in 0..dims.q {
            let code = config_code(
                grid.get(i, j),
                grid.get(i, j + 1),
                grid.get(i + 1, j + 1),
                grid.get(i + 1, j),
            );
            blit_tile(
                img.data_mut(),
                width,
                i * step_x,
                j * step_y,
                &tiles.tile(code).as_view(),
            );
        }
    }
}
