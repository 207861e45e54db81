use crate::enums::Label;
use crate::error::BoxError;

use ndarray::{Array2, ArrayView2};

/// A loaded segmentation network with a fixed input patch.
///
/// `infer` receives a plane of exactly [`patch_size`](Self::patch_size) and
/// must return a label plane of the same shape. How the network is built or
/// loaded is up to the implementor.
pub trait SegmentationModel {
    /// (height, width) of the model input
    fn patch_size(&self) -> (usize, usize);

    fn infer(&self, plane: ArrayView2<'_, f32>) -> Result<Array2<u8>, BoxError>;
}

impl<M: SegmentationModel + ?Sized> SegmentationModel for &M {
    fn patch_size(&self) -> (usize, usize) {
        (**self).patch_size()
    }

    fn infer(&self, plane: ArrayView2<'_, f32>) -> Result<Array2<u8>, BoxError> {
        (**self).infer(plane)
    }
}

impl<M: SegmentationModel + ?Sized> SegmentationModel for Box<M> {
    fn patch_size(&self) -> (usize, usize) {
        (**self).patch_size()
    }

    fn infer(&self, plane: ArrayView2<'_, f32>) -> Result<Array2<u8>, BoxError> {
        (**self).infer(plane)
    }
}

/// Reference backend that labels voxels by relative intensity.
///
/// Intensities are scaled by the plane maximum; values at or above
/// `posterior_threshold` become [`Label::Posterior`], values at or above
/// `anterior_threshold` become [`Label::Anterior`]. It is deterministic and
/// dependency free, which makes it useful for smoke runs and tests; it is not
/// a trained network.
#[derive(Debug, Clone)]
pub struct ThresholdModel {
    patch_size: (usize, usize),
    anterior_threshold: f32,
    posterior_threshold: f32,
}

impl ThresholdModel {
    pub fn new(patch_size: (usize, usize)) -> Self {
        Self {
            patch_size,
            anterior_threshold: 0.5,
            posterior_threshold: 0.8,
        }
    }

    pub fn with_thresholds(mut self, anterior: f32, posterior: f32) -> Self {
        self.anterior_threshold = anterior;
        self.posterior_threshold = posterior;
        self
    }
}

impl SegmentationModel for ThresholdModel {
    fn patch_size(&self) -> (usize, usize) {
        self.patch_size
    }

    fn infer(&self, plane: ArrayView2<'_, f32>) -> Result<Array2<u8>, BoxError> {
        if plane.dim() != self.patch_size {
            return Err(format!(
                "expected a {:?} patch, got {:?}",
                self.patch_size,
                plane.dim()
            )
            .into());
        }

        let max = plane.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if !(max > 0.0) {
            return Ok(Array2::from_elem(plane.dim(), Label::Background as u8));
        }

        Ok(plane.mapv(|v| {
            let relative = v / max;
            if relative >= self.posterior_threshold {
                Label::Posterior as u8
            } else if relative >= self.anterior_threshold {
                Label::Anterior as u8
            } else {
                Label::Background as u8
            }
        }))
    }
}
