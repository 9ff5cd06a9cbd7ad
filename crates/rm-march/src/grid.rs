use rm_core::{Error, ImageView, Rgb8};

/// Interior extent of the sampling grid for an image.
///
/// `p` counts interior grid rows and `q` interior grid columns; the grid
/// itself stores `(p + 1) x (q + 1)` cells so every interior cell has a
/// neighbor below and to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub p: usize,
    pub q: usize,
}

impl GridDims {
    pub fn for_image(width: usize, height: usize, step_x: usize, step_y: usize) -> Self {
        assert!(step_x > 0 && step_y > 0, "sampling stride cannot be zero");
        Self {
            p: height / step_x,
            q: width / step_y,
        }
    }

    /// Stored rows, including the bottom edge row.
    pub fn rows(&self) -> usize {
        self.p + 1
    }

    /// Stored columns, including the right edge column.
    pub fn cols(&self) -> usize {
        self.q + 1
    }

    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.rows() && j < self.cols());
        i * self.cols() + j
    }
}

/// Binary occupancy rule: 1 when the mean channel intensity is at or below
/// `sigma`, 0 otherwise.
pub fn threshold_bit(px: Rgb8, sigma: u8) -> u8 {
    if px.mean_intensity() > sigma { 0 } else { 1 }
}

/// Owned binary sampling grid.
///
/// [`SamplingGrid::sample`] is the single-threaded reference sampler; the
/// parallel pipeline produces byte-identical cells from row-band partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingGrid {
    dims: GridDims,
    cells: Vec<u8>,
}

impl SamplingGrid {
    /// Thresholds the image at stride `(step_x, step_y)` into a
    /// `(p + 1) x (q + 1)` grid.
    ///
    /// Interior cell `(i, j)` is taken from pixel `(i * step_x, j * step_y)`.
    /// The last grid column is taken from the image's last physical column
    /// and the last grid row from its last physical row, so no cell ever
    /// needs an out-of-bounds neighbor. The bottom-right corner stays 0.
    pub fn sample(
        img: &ImageView<'_, Rgb8>,
        step_x: usize,
        step_y: usize,
        sigma: u8,
    ) -> Self {
        assert!(
            img.width() > 0 && img.height() > 0,
            "cannot sample an empty image"
        );

        let dims = GridDims::for_image(img.width(), img.height(), step_x, step_y);
        let mut cells = vec![0u8; dims.cell_count()];

        for i in 0..dims.p {
            for j in 0..dims.q {
                cells[dims.index(i, j)] =
                    threshold_bit(img.pixel(i * step_x, j * step_y), sigma);
            }
            cells[dims.index(i, dims.q)] =
                threshold_bit(img.pixel(i * step_x, img.width() - 1), sigma);
        }
        for j in 0..dims.q {
            cells[dims.index(dims.p, j)] =
                threshold_bit(img.pixel(img.height() - 1, j * step_y), sigma);
        }

        Self { dims, cells }
    }

    pub fn from_cells(dims: GridDims, cells: Vec<u8>) -> Result<Self, Error> {
        if cells.len() != dims.cell_count() {
            return Err(Error::SizeMismatch {
                expected: dims.cell_count(),
                actual: cells.len(),
            });
        }
        Ok(Self { dims, cells })
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.cells[self.dims.index(i, j)]
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}
