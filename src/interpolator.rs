use ndarray::{Array2, ArrayView2, s};

pub(crate) struct Interpolator;

impl Interpolator {
    #[inline]
    pub(crate) fn bilinear_interpolate(slice: &ArrayView2<f32>, y: f32, x: f32) -> f32 {
        let (height, width) = slice.dim();

        let y0 = y.floor() as usize;
        let x0 = x.floor() as usize;
        let y1 = (y0 + 1).min(height - 1);
        let x1 = (x0 + 1).min(width - 1);

        let dy = y - y0 as f32;
        let dx = x - x0 as f32;
        let one_minus_dx = 1.0 - dx;
        let one_minus_dy = 1.0 - dy;

        let v00 = slice[[y0, x0]];
        let v01 = slice[[y0, x1]];
        let v10 = slice[[y1, x0]];
        let v11 = slice[[y1, x1]];

        let v0 = v00.mul_add(one_minus_dx, v01 * dx);
        let v1 = v10.mul_add(one_minus_dx, v11 * dx);

        v0.mul_add(one_minus_dy, v1 * dy)
    }

    // Half-pixel centred mapping from a target index to a source coordinate.
    #[inline]
    fn source_coordinate(target: usize, target_len: usize, source_len: usize) -> f32 {
        let norm = (target as f32 + 0.5) / target_len as f32;
        (norm * source_len as f32 - 0.5).clamp(0.0, (source_len - 1) as f32)
    }

    /// Bilinear resampling of an intensity plane to `(height, width)`.
    pub(crate) fn resample_bilinear(
        plane: ArrayView2<'_, f32>,
        (height, width): (usize, usize),
    ) -> Array2<f32> {
        let (src_height, src_width) = plane.dim();
        if src_height == 0 || src_width == 0 {
            return Array2::zeros((height, width));
        }

        Array2::from_shape_fn((height, width), |(y, x)| {
            let src_y = Self::source_coordinate(y, height, src_height);
            let src_x = Self::source_coordinate(x, width, src_width);
            Self::bilinear_interpolate(&plane, src_y, src_x)
        })
    }

    /// Nearest-neighbour resampling; never invents values between labels.
    pub(crate) fn resample_nearest<T: Copy + Default>(
        plane: ArrayView2<'_, T>,
        (height, width): (usize, usize),
    ) -> Array2<T> {
        let (src_height, src_width) = plane.dim();
        if src_height == 0 || src_width == 0 {
            return Array2::from_elem((height, width), T::default());
        }

        Array2::from_shape_fn((height, width), |(y, x)| {
            let src_y = (y * src_height / height).min(src_height - 1);
            let src_x = (x * src_width / width).min(src_width - 1);
            plane[[src_y, src_x]]
        })
    }

    /// Copy the overlapping top-left region into a default-filled plane of
    /// `(height, width)`: pads when growing, crops when shrinking.
    pub(crate) fn pad_crop<T: Copy + Default>(
        plane: ArrayView2<'_, T>,
        (height, width): (usize, usize),
    ) -> Array2<T> {
        let (src_height, src_width) = plane.dim();
        let rows = src_height.min(height);
        let cols = src_width.min(width);

        let mut out = Array2::from_elem((height, width), T::default());
        out.slice_mut(s![..rows, ..cols])
            .assign(&plane.slice(s![..rows, ..cols]));
        out
    }
}
