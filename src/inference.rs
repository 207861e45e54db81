use crate::enums::ResizePolicy;
use crate::error::{HippoError, Result};
use crate::interpolator::Interpolator;
use crate::model::SegmentationModel;
use crate::volume::{LabelVolume, Volume};

use log::{debug, info};
use ndarray::{Array2, Array3, ArrayView2, s};

/// Runs a fixed-patch model over a volume of arbitrary in-plane size.
pub struct InferenceAdapter<M> {
    model: M,
    policy: ResizePolicy,
}

impl<M: SegmentationModel> InferenceAdapter<M> {
    pub fn new(model: M, policy: ResizePolicy) -> Self {
        Self { model, policy }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Segment every slice and stack the label planes in slice order.
    ///
    /// The output always has the shape of `volume`. Any model failure aborts
    /// the whole volume.
    pub fn infer_volume(&self, volume: &Volume) -> Result<LabelVolume> {
        let (height, width, depth) = volume.dim();
        let patch = self.model.patch_size();
        info!(
            "Running inference on {depth} slices of {height}x{width} with patch {}x{} ({:?})",
            patch.0, patch.1, self.policy
        );

        let mut labels = Array3::<u8>::zeros((height, width, depth));
        for index in 0..depth {
            let plane = volume.data.slice(s![.., .., index]);
            let predicted = self.infer_plane(plane, index)?;
            labels.slice_mut(s![.., .., index]).assign(&predicted);
            debug!("Segmented slice {index}");
        }

        Ok(LabelVolume::new(labels))
    }

    fn infer_plane(&self, plane: ArrayView2<'_, f32>, index: usize) -> Result<Array2<u8>> {
        let patch = self.model.patch_size();
        let original = plane.dim();

        let input = match self.policy {
            ResizePolicy::Resample => Interpolator::resample_bilinear(plane, patch),
            ResizePolicy::PadCrop => Interpolator::pad_crop(plane, patch),
        };

        let predicted = self
            .model
            .infer(input.view())
            .map_err(|source| HippoError::ModelInference {
                slice: index,
                source,
            })?;
        if predicted.dim() != patch {
            return Err(HippoError::ModelInference {
                slice: index,
                source: format!(
                    "model returned a {:?} plane for a {:?} patch",
                    predicted.dim(),
                    patch
                )
                .into(),
            });
        }

        Ok(match self.policy {
            ResizePolicy::Resample => Interpolator::resample_nearest(predicted.view(), original),
            ResizePolicy::PadCrop => Interpolator::pad_crop(predicted.view(), original),
        })
    }
}
