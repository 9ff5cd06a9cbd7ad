use rm_core::{ImageView, Rgb8};

/// Produces one interpolated pixel for normalized coordinates.
///
/// `u` selects a row and `v` a column, both in `[0, 1]`. Implementations
/// must be pure: no side effects, and safe to call concurrently from
/// multiple workers on the same read-only source.
pub trait Resampler: Sync {
    fn sample(&self, src: &ImageView<'_, Rgb8>, u: f32, v: f32) -> Rgb8;
}

/// Catmull-Rom bicubic interpolation over a clamped 4x4 neighborhood,
/// per channel, with the result clamped to `[0, 255]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatmullRom;

impl Resampler for CatmullRom {
    fn sample(&self, src: &ImageView<'_, Rgb8>, u: f32, v: f32) -> Rgb8 {
        assert!(
            src.width() > 0 && src.height() > 0,
            "cannot sample an empty image"
        );

        let row_f = u * (src.height() - 1) as f32;
        let col_f = v * (src.width() - 1) as f32;
        let row0 = row_f.floor() as isize;
        let col0 = col_f.floor() as isize;
        let ty = row_f - row0 as f32;
        let tx = col_f - col0 as f32;

        // Horizontal pass over the four neighbor rows, then a vertical pass
        // over the intermediate values.
        let mut rows = [[0.0f32; 3]; 4];
        for (k, out) in rows.iter_mut().enumerate() {
            let r = clamp_index(row0 - 1 + k as isize, src.height());
            let mut p = [[0.0f32; 4]; 3];
            for m in 0..4 {
                let c = clamp_index(col0 - 1 + m as isize, src.width());
                let px = src.pixel(r, c);
                p[0][m] = px.r as f32;
                p[1][m] = px.g as f32;
                p[2][m] = px.b as f32;
            }
            for (ch, samples) in p.iter().enumerate() {
                out[ch] = catmull_rom(samples[0], samples[1], samples[2], samples[3], tx);
            }
        }

        let mut out = [0u8; 3];
        for (ch, o) in out.iter_mut().enumerate() {
            let value = catmull_rom(rows[0][ch], rows[1][ch], rows[2][ch], rows[3][ch], ty);
            *o = value.round().clamp(0.0, 255.0) as u8;
        }
        Rgb8::new(out[0], out[1], out[2])
    }
}

fn clamp_index(i: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    i.clamp(0, len as isize - 1) as usize
}

fn catmull_rom(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    ((a * t + b) * t + c) * t + p1
}

#[cfg(test)]
mod tests {
    use rm_core::{Image, Rgb8};

    use super::{CatmullRom, Resampler, catmull_rom};

    #[test]
    fn kernel_interpolates_knots_exactly() {
        assert_eq!(catmull_rom(1.0, 5.0, 9.0, 13.0, 0.0), 5.0);
        assert_eq!(catmull_rom(1.0, 5.0, 9.0, 13.0, 1.0), 9.0);
    }

    #[test]
    fn kernel_reproduces_linear_data() {
        for t in [0.0f32, 0.25, 0.5, 0.75, 1.0] {
            let got = catmull_rom(0.0, 10.0, 20.0, 30.0, t);
            assert!((got - (10.0 + 10.0 * t)).abs() < 1e-4);
        }
    }

    #[test]
    fn flat_image_samples_flat() {
        let img = Image::new_fill(9, 7, Rgb8::new(10, 200, 42));
        let view = img.as_view();

        for (u, v) in [(0.0f32, 0.0f32), (0.37, 0.91), (1.0, 1.0), (0.5, 0.0)] {
            assert_eq!(CatmullRom.sample(&view, u, v), Rgb8::new(10, 200, 42));
        }
    }

    #[test]
    fn corners_hit_corner_pixels() {
        let mut data = vec![Rgb8::default(); 12];
        data[0] = Rgb8::splat(11);
        data[3] = Rgb8::splat(22);
        data[8] = Rgb8::splat(33);
        data[11] = Rgb8::splat(44);
        let img = Image::from_vec(4, 3, data).expect("valid image");
        let view = img.as_view();

        assert_eq!(CatmullRom.sample(&view, 0.0, 0.0), Rgb8::splat(11));
        assert_eq!(CatmullRom.sample(&view, 0.0, 1.0), Rgb8::splat(22));
        assert_eq!(CatmullRom.sample(&view, 1.0, 0.0), Rgb8::splat(33));
        assert_eq!(CatmullRom.sample(&view, 1.0, 1.0), Rgb8::splat(44));
    }

    #[test]
    fn interior_linear_ramp_is_reproduced() {
        // One column, rows 0..8 with values 0, 10, ..., 70. Halfway between
        // rows 3 and 4 every neighbor is a real sample, so the interpolant
        // must return the exact midpoint 35.
        let data: Vec<Rgb8> = (0..8).map(|i| Rgb8::splat(i * 10)).collect();
        let img = Image::from_vec(1, 8, data).expect("valid image");
        let view = img.as_view();

        let got = CatmullRom.sample(&view, 3.5 / 7.0, 0.0);
        assert_eq!(got, Rgb8::splat(35));
    }

    #[test]
    fn one_by_one_image_returns_its_pixel() {
        let img = Image::new_fill(1, 1, Rgb8::new(1, 2, 3));
        let view = img.as_view();
        assert_eq!(CatmullRom.sample(&view, 0.5, 0.5), Rgb8::new(1, 2, 3));
    }
}
