use ndarray::{Array2, Array3, ArrayView2, Axis, s};

/// Intensity volume with axes (row, column, slice).
#[derive(Debug, Clone, Default)]
pub struct Volume {
    pub data: Array3<f32>,
}

/// Predicted class labels, same shape as the [`Volume`] it was inferred from.
///
/// 0 is background, 1 the anterior and 2 the posterior hippocampus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelVolume {
    pub data: Array3<u8>,
}

impl Volume {
    pub fn new(data: Array3<f32>) -> Self {
        Self { data }
    }

    /// Get the dimensions of the volume (rows, columns, slices)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn num_slices(&self) -> usize {
        self.data.dim().2
    }

    /// The 2D plane at `index` along the slice axis
    pub fn slice(&self, index: usize) -> Option<ArrayView2<'_, f32>> {
        (index < self.num_slices()).then(|| self.data.slice(s![.., .., index]))
    }
}

impl LabelVolume {
    pub fn new(data: Array3<u8>) -> Self {
        Self { data }
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn slice(&self, index: usize) -> Option<ArrayView2<'_, u8>> {
        (index < self.data.dim().2).then(|| self.data.slice(s![.., .., index]))
    }
}

/// Reverse both in-plane axes, then transpose.
///
/// Applied to a (rows, cols) plane this yields a (cols, rows) plane. The
/// operation is its own inverse, which is how the report recovers the
/// acquisition orientation from a stored slice.
pub fn rotate_transpose<T: Clone>(plane: ArrayView2<'_, T>) -> Array2<T> {
    let mut view = plane;
    view.invert_axis(Axis(0));
    view.invert_axis(Axis(1));
    view.reversed_axes().as_standard_layout().into_owned()
}

/// Scale a plane to 0..=255 by its own maximum.
///
/// A plane whose maximum is not positive (e.g. all zeros) maps to an
/// all-zero image instead of dividing by zero.
pub fn normalize_to_u8<T: Copy + Into<f32>>(plane: ArrayView2<'_, T>) -> Array2<u8> {
    let max = plane
        .iter()
        .map(|&v| -> f32 { v.into() })
        .fold(f32::NEG_INFINITY, f32::max);
    if !(max > 0.0) {
        return Array2::zeros(plane.dim());
    }
    plane.mapv(|v| {
        let v: f32 = v.into();
        ((v / max) * 255.0).clamp(0.0, 255.0) as u8
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn rotate_transpose_matches_reference_orientation() {
        let plane = array![[1, 2, 3], [4, 5, 6]];
        let rotated = rotate_transpose(plane.view());

        assert_eq!(rotated, array![[6, 3], [5, 2], [4, 1]]);
        assert_eq!(rotate_transpose(rotated.view()), plane);
    }

    #[test]
    fn normalizes_by_slice_maximum() {
        let plane = array![[0.0_f32, 50.0], [100.0, 200.0]];
        assert_eq!(normalize_to_u8(plane.view()), array![[0, 63], [127, 255]]);
    }

    #[test]
    fn all_zero_plane_normalizes_to_zero() {
        let plane = Array2::<u8>::zeros((3, 3));
        assert_eq!(normalize_to_u8(plane.view()), Array2::<u8>::zeros((3, 3)));
    }

    #[test]
    fn slice_out_of_range_is_none() {
        let volume = Volume::new(Array3::zeros((2, 2, 3)));
        assert!(volume.slice(2).is_some());
        assert!(volume.slice(3).is_none());
    }
}
