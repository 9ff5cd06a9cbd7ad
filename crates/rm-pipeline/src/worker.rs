use std::sync::Barrier;

use rm_core::PartitionDescriptor;
use rm_march::{TileSet, blit_tile, config_code, threshold_bit};
use rm_resample::Resampler;

use crate::config::PipelineConfig;
use crate::shared::{SharedGrid, SharedImage};

/// Which stage sequence a worker runs.
///
/// The rescale-or-not decision is taken once by the orchestrator; workers
/// never branch on image dimensions themselves.
#[derive(Clone, Copy)]
pub(crate) enum Route<'a> {
    /// The source fits the canvas limit; sample and stamp it directly.
    Direct,
    /// The source is oversized; fill the canvas first, then rendezvous.
    Rescaled { canvas: &'a SharedImage },
}

pub(crate) struct WorkerCtx<'a, R> {
    pub part: PartitionDescriptor,
    pub route: Route<'a>,
    pub source: &'a SharedImage,
    pub grid: &'a SharedGrid,
    pub tiles: &'a TileSet,
    pub cfg: &'a PipelineConfig,
    pub resampler: &'a R,
    pub barrier: &'a Barrier,
}

impl<'a, R> WorkerCtx<'a, R> {
    fn active(&self) -> &'a SharedImage {
        match self.route {
            Route::Direct => self.source,
            Route::Rescaled { canvas } => canvas,
        }
    }
}

/// One worker's whole life: rescale if needed, rendezvous, sample,
/// rendezvous, stamp, exit.
pub(crate) fn run<R: Resampler>(ctx: &WorkerCtx<'_, R>) {
    if let Route::Rescaled { canvas } = ctx.route {
        rescale_band(ctx.source, canvas, ctx.part, ctx.resampler);
        // Every canvas row must exist before any worker samples one.
        ctx.barrier.wait();
    }

    let active = ctx.active();
    sample_band(active, ctx.grid, ctx.part, ctx.cfg);
    // Stamping cell row i reads grid row i + 1, owned by a neighbor.
    ctx.barrier.wait();
    stamp_band(active, ctx.grid, ctx.tiles, ctx.part, ctx.cfg);
}

/// Fills this worker's row band of the canvas from the source through the
/// resampler.
pub(crate) fn rescale_band<R: Resampler>(
    source: &SharedImage,
    canvas: &SharedImage,
    part: PartitionDescriptor,
    resampler: &R,
) {
    let rows = part.span(canvas.height());
    if rows.is_empty() {
        return;
    }

    let width = canvas.width();
    // SAFETY: the source is only read during this stage, and canvas row
    // bands are disjoint across workers by the shared partition formula.
    let src = unsafe { source.view() };
    let band = unsafe { canvas.rows_mut(rows.clone()) };

    let du = 1.0 / (canvas.height() - 1).max(1) as f32;
    let dv = 1.0 / (width - 1).max(1) as f32;
    for (bi, i) in rows.enumerate() {
        let u = i as f32 * du;
        let row = &mut band[bi * width..(bi + 1) * width];
        for (j, px) in row.iter_mut().enumerate() {
            *px = resampler.sample(&src, u, j as f32 * dv);
        }
    }
}

/// Thresholds this worker's share of the sampling grid from the active
/// image.
///
/// The worker's row band covers interior cells and the column-edge cell of
/// each owned row. The bottom edge row is filled under an independent
/// partition over the grid columns, and the corner cell is pinned to zero
/// by the last worker.
pub(crate) fn sample_band(
    active: &SharedImage,
    grid: &SharedGrid,
    part: PartitionDescriptor,
    cfg: &PipelineConfig,
) {
    let dims = grid.dims();
    // SAFETY: the active image is not mutated during sampling; the grid
    // ranges taken below are disjoint across workers.
    let img = unsafe { active.view() };

    let rows = part.span(dims.p);
    if !rows.is_empty() {
        let stride = dims.cols();
        let band = unsafe { grid.interior_rows_mut(rows.clone()) };
        for (bi, i) in rows.enumerate() {
            let cells = &mut band[bi * stride..(bi + 1) * stride];
            for (j, cell) in cells[..dims.q].iter_mut().enumerate() {
                *cell = threshold_bit(img.pixel(i * cfg.step_x, j * cfg.step_y), cfg.sigma);
            }
            // No neighbor to the right of the last grid column; take the
            // last physical image column instead.
            cells[dims.q] =
                threshold_bit(img.pixel(i * cfg.step_x, img.width() - 1), cfg.sigma);
        }
    }

    let cols = part.span(dims.q);
    if !cols.is_empty() {
        let edge = unsafe { grid.last_row_mut(cols.clone()) };
        for (bj, j) in cols.enumerate() {
            edge[bj] =
                threshold_bit(img.pixel(img.height() - 1, j * cfg.step_y), cfg.sigma);
        }
    }

    if part.id + 1 == part.workers {
        // The corner has no configuration use and stays zero.
        // SAFETY: only this worker touches the corner cell.
        let corner = unsafe { grid.corner_mut() };
        *corner = 0;
    }
}

/// Composites contour tiles into this worker's pixel band of the active
/// image, one tile per owned grid cell.
pub(crate) fn stamp_band(
    active: &SharedImage,
    grid: &SharedGrid,
    tiles: &TileSet,
    part: PartitionDescriptor,
    cfg: &PipelineConfig,
) {
    let dims = grid.dims();
    let rows = part.span(dims.p);
    if rows.is_empty() {
        return;
    }

    let width = active.width();
    // SAFETY: grid writes finished at the barrier, so the grid is read-only
    // here. Pixel bands [rows.start * step_x, rows.end * step_x) are
    // disjoint across workers, and tiles never exceed one stride, so every
    // blit stays inside the band.
    let cells = unsafe { grid.cells() };
    let band = unsafe { active.rows_mut(rows.start * cfg.step_x..rows.end * cfg.step_x) };

    let at = |i: usize, j: usize| cells[dims.index(i, j)];
    for i in rows.clone() {
        for j in 0..dims.q {
            let code = config_code(at(i, j), at(i, j + 1), at(i + 1, j + 1), at(i + 1, j));
            blit_tile(
                band,
                width,
                (i - rows.start) * cfg.step_x,
                j * cfg.step_y,
                &tiles.tile(code).as_view(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rm_core::{Image, ImageView, PartitionDescriptor, Rgb8};
    use rm_march::{GridDims, SamplingGrid, TileSet};
    use rm_resample::Resampler;

    use super::{rescale_band, sample_band, stamp_band};
    use crate::config::PipelineConfig;
    use crate::shared::{SharedGrid, SharedImage};

    /// Logs the canvas row of every sample call and returns a fixed color.
    struct RecordingResampler {
        canvas_rows: usize,
        rows_seen: Mutex<Vec<usize>>,
    }

    impl RecordingResampler {
        fn new(canvas_rows: usize) -> Self {
            Self {
                canvas_rows,
                rows_seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Resampler for RecordingResampler {
        fn sample(&self, _src: &ImageView<'_, Rgb8>, u: f32, _v: f32) -> Rgb8 {
            let row = (u * (self.canvas_rows - 1) as f32).round() as usize;
            let mut rows = self.rows_seen.lock().expect("lock poisoned");
            if rows.last() != Some(&row) {
                rows.push(row);
            }
            Rgb8::splat(99)
        }
    }

    fn pattern_image(width: usize, height: usize) -> Image<Rgb8> {
        let mut data = Vec::with_capacity(width * height);
        for i in 0..(width * height) {
            data.push(Rgb8::splat((i * 37 % 256) as u8));
        }
        Image::from_vec(width, height, data).expect("valid image")
    }

    #[test]
    fn each_of_four_workers_rescales_512_contiguous_canvas_rows() {
        let source = SharedImage::from_image(pattern_image(4096, 2048));
        let canvas = SharedImage::new_fill(2048, 2048, Rgb8::default());

        for id in 0..4 {
            let resampler = RecordingResampler::new(2048);
            rescale_band(
                &source,
                &canvas,
                PartitionDescriptor::new(id, 4),
                &resampler,
            );

            let rows = resampler.rows_seen.into_inner().expect("lock poisoned");
            assert_eq!(rows, ((id * 512)..((id + 1) * 512)).collect::<Vec<_>>());
        }

        // 4 workers x 512 rows x 2048 columns fill every canvas pixel.
        let filled = canvas.into_image();
        assert!(filled.data().iter().all(|&px| px == Rgb8::splat(99)));
    }

    #[test]
    fn parallel_sampling_matches_the_reference_grid() {
        let img = pattern_image(67, 41);
        let cfg = PipelineConfig {
            step_x: 8,
            step_y: 8,
            sigma: 120,
            ..PipelineConfig::default()
        };
        let reference = SamplingGrid::sample(&img.as_view(), cfg.step_x, cfg.step_y, cfg.sigma);

        for workers in 1..=7 {
            let active = SharedImage::from_image(img.clone());
            let grid = SharedGrid::new(GridDims::for_image(
                img.width(),
                img.height(),
                cfg.step_x,
                cfg.step_y,
            ));
            for id in 0..workers {
                sample_band(&active, &grid, PartitionDescriptor::new(id, workers), &cfg);
            }
            assert_eq!(grid.into_grid(), reference, "workers = {workers}");
        }
    }

    #[test]
    fn partitioned_stamping_matches_the_reference_stamp() {
        let img = pattern_image(64, 48);
        let cfg = PipelineConfig {
            sigma: 120,
            ..PipelineConfig::default()
        };
        let tiles = TileSet::flat_shades(8, 8);
        let grid = SamplingGrid::sample(&img.as_view(), cfg.step_x, cfg.step_y, cfg.sigma);

        let mut reference = img.clone();
        rm_march::stamp_contours(&mut reference, &grid, &tiles, cfg.step_x, cfg.step_y);

        for workers in 1..=5 {
            let active = SharedImage::from_image(img.clone());
            let shared = SharedGrid::new(grid.dims());
            for id in 0..workers {
                sample_band(&active, &shared, PartitionDescriptor::new(id, workers), &cfg);
            }
            for id in 0..workers {
                stamp_band(
                    &active,
                    &shared,
                    &tiles,
                    PartitionDescriptor::new(id, workers),
                    &cfg,
                );
            }
            assert_eq!(active.into_image(), reference, "workers = {workers}");
        }
    }
}
