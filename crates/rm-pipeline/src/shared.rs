//! Buffers shared by reference across the worker pool.
//!
//! Workers mutate these buffers without locks. Soundness rests on the stage
//! discipline enforced by the pipeline:
//!
//! - during rescale, the canvas is written in disjoint row bands and the
//!   source is only read;
//! - during sampling, the active image is only read and the grid is written
//!   in disjoint cell ranges;
//! - during stamping, the active image is written in disjoint row bands and
//!   the grid is only read;
//! - barrier waits separate the stages, so a cell written in one stage and
//!   read in the next is ordered by happens-before.
//!
//! Every accessor that relies on this discipline is `unsafe` and states its
//! part of the contract.

use std::cell::UnsafeCell;
use std::ops::Range;

use rm_core::{Image, ImageView, Rgb8};
use rm_march::{GridDims, SamplingGrid};

/// Pixel buffer shared across the worker pool.
pub(crate) struct SharedImage {
    width: usize,
    height: usize,
    cells: Box<[UnsafeCell<Rgb8>]>,
}

// SAFETY: All access goes through the unsafe accessors below, whose callers
// guarantee that concurrent accesses never target the same pixel within a
// stage and that stage transitions are separated by a barrier.
unsafe impl Sync for SharedImage {}

impl SharedImage {
    pub(crate) fn from_image(img: Image<Rgb8>) -> Self {
        let width = img.width();
        let height = img.height();
        let cells = img
            .into_vec()
            .into_iter()
            .map(UnsafeCell::new)
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            width,
            height,
            cells,
        }
    }

    pub(crate) fn new_fill(width: usize, height: usize, value: Rgb8) -> Self {
        Self::from_image(Image::new_fill(width, height, value))
    }

    pub(crate) fn into_image(self) -> Image<Rgb8> {
        let data: Vec<Rgb8> = self.cells.into_vec().into_iter().map(UnsafeCell::into_inner).collect();
        Image::from_vec(self.width, self.height, data)
            .expect("cell count is fixed at construction")
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    /// Read-only view of the whole image.
    ///
    /// # Safety
    /// No worker may write any pixel for as long as the view is alive.
    pub(crate) unsafe fn view(&self) -> ImageView<'_, Rgb8> {
        // SAFETY: `UnsafeCell<Rgb8>` is layout-compatible with `Rgb8`, and
        // the caller guarantees no concurrent writes.
        let data = unsafe {
            std::slice::from_raw_parts(self.cells.as_ptr() as *const Rgb8, self.cells.len())
        };
        ImageView::from_slice(self.width, self.height, data)
            .expect("cell count is fixed at construction")
    }

    /// Mutable slice over the pixel rows `rows`.
    ///
    /// # Safety
    /// The caller must hold the only access to these rows: no other worker
    /// may read or write any pixel in `rows` while the slice is alive.
    pub(crate) unsafe fn rows_mut(&self, rows: Range<usize>) -> &mut [Rgb8] {
        assert!(rows.end <= self.height, "row band out of bounds");
        let band = &self.cells[rows.start * self.width..rows.end * self.width];
        // SAFETY: `UnsafeCell<Rgb8>` is layout-compatible with `Rgb8`; the
        // caller guarantees exclusive access to this range.
        unsafe { std::slice::from_raw_parts_mut(band.as_ptr() as *mut Rgb8, band.len()) }
    }
}

/// Sampling grid shared across the worker pool.
///
/// Interior rows are written under a row partition, the bottom edge row
/// under an independent column partition, and the corner by one designated
/// worker, so no two workers ever target the same cell.
pub(crate) struct SharedGrid {
    dims: GridDims,
    cells: Box<[UnsafeCell<u8>]>,
}

// SAFETY: see `SharedImage`; the same stage discipline applies.
unsafe impl Sync for SharedGrid {}

impl SharedGrid {
    pub(crate) fn new(dims: GridDims) -> Self {
        let cells = (0..dims.cell_count())
            .map(|_| UnsafeCell::new(0u8))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { dims, cells }
    }

    pub(crate) fn dims(&self) -> GridDims {
        self.dims
    }

    /// Mutable slice over interior grid rows `rows`, each `q + 1` cells
    /// wide (the column-edge cell included).
    ///
    /// # Safety
    /// Caller must hold the only access to these rows while the slice is
    /// alive; `rows.end <= p` keeps the bottom edge row out of reach.
    pub(crate) unsafe fn interior_rows_mut(&self, rows: Range<usize>) -> &mut [u8] {
        assert!(rows.end <= self.dims.p, "interior row band out of bounds");
        let cols = self.dims.cols();
        let band = &self.cells[rows.start * cols..rows.end * cols];
        // SAFETY: layout-compatible cast; exclusivity guaranteed by caller.
        unsafe { std::slice::from_raw_parts_mut(band.as_ptr() as *mut u8, band.len()) }
    }

    /// Mutable slice over cells `(p, cols)` of the bottom edge row.
    ///
    /// # Safety
    /// Caller must hold the only access to these cells while the slice is
    /// alive; `cols.end <= q` keeps the corner out of reach.
    pub(crate) unsafe fn last_row_mut(&self, cols: Range<usize>) -> &mut [u8] {
        assert!(cols.end <= self.dims.q, "edge column range out of bounds");
        let base = self.dims.index(self.dims.p, 0);
        let band = &self.cells[base + cols.start..base + cols.end];
        // SAFETY: layout-compatible cast; exclusivity guaranteed by caller.
        unsafe { std::slice::from_raw_parts_mut(band.as_ptr() as *mut u8, band.len()) }
    }

    /// The bottom-right corner cell `(p, q)`.
    ///
    /// # Safety
    /// Only one worker may take this reference per stage.
    pub(crate) unsafe fn corner_mut(&self) -> &mut u8 {
        let idx = self.dims.index(self.dims.p, self.dims.q);
        // SAFETY: exclusivity guaranteed by caller.
        unsafe { &mut *self.cells[idx].get() }
    }

    /// Read-only view of every cell.
    ///
    /// # Safety
    /// No worker may write any cell for as long as the slice is alive.
    pub(crate) unsafe fn cells(&self) -> &[u8] {
        // SAFETY: layout-compatible cast; the caller guarantees no
        // concurrent writes.
        unsafe { std::slice::from_raw_parts(self.cells.as_ptr() as *const u8, self.cells.len()) }
    }

    pub(crate) fn into_grid(self) -> SamplingGrid {
        let data: Vec<u8> = self.cells.into_vec().into_iter().map(UnsafeCell::into_inner).collect();
        SamplingGrid::from_cells(self.dims, data).expect("cell count is fixed at construction")
    }
}

#[cfg(test)]
mod tests {
    use rm_core::{Image, Rgb8};
    use rm_march::GridDims;

    use super::{SharedGrid, SharedImage};

    #[test]
    fn image_round_trips_through_the_shared_buffer() {
        let img = Image::from_vec(2, 2, vec![
            Rgb8::splat(1),
            Rgb8::splat(2),
            Rgb8::splat(3),
            Rgb8::splat(4),
        ])
        .expect("valid image");

        let shared = SharedImage::from_image(img.clone());
        assert_eq!(shared.width(), 2);
        assert_eq!(shared.height(), 2);
        assert_eq!(shared.into_image(), img);
    }

    #[test]
    fn row_band_writes_land_in_the_right_rows() {
        let shared = SharedImage::new_fill(3, 4, Rgb8::splat(0));
        // SAFETY: single-threaded test, no aliasing.
        let band = unsafe { shared.rows_mut(1..3) };
        for px in band.iter_mut() {
            *px = Rgb8::splat(7);
        }

        let img = shared.into_image();
        for row in 0..4 {
            let expected = if (1..3).contains(&row) { 7 } else { 0 };
            assert!(img.data()[row * 3..(row + 1) * 3]
                .iter()
                .all(|&px| px == Rgb8::splat(expected)));
        }
    }

    #[test]
    fn grid_regions_do_not_overlap() {
        let dims = GridDims { p: 2, q: 3 };
        let shared = SharedGrid::new(dims);
        // SAFETY: single-threaded test, regions taken one at a time.
        unsafe {
            for cell in shared.interior_rows_mut(0..2) {
                *cell = 1;
            }
            for cell in shared.last_row_mut(0..3) {
                *cell = 2;
            }
            *shared.corner_mut() = 3;
        }

        let grid = shared.into_grid();
        let mut expected = vec![1u8; 2 * 4];
        expected.extend_from_slice(&[2, 2, 2, 3]);
        assert_eq!(grid.cells(), expected.as_slice());
    }
}
