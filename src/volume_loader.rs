use crate::error::{HippoError, Result};
use crate::header::Header;
use crate::slice::SliceRecord;
use crate::volume::{Volume, rotate_transpose};

use log::debug;
use ndarray::{Array2, Array3, s};

pub struct VolumeLoader;

impl VolumeLoader {
    /// Assemble a volume from the slices of a single series.
    ///
    /// Slices are ordered by ascending Instance Number, each plane is rotated
    /// and transposed into the orientation the report expects, and the planes
    /// are stacked along the third axis. The header of the first slice in
    /// that order is returned alongside; the pixel buffers are consumed.
    ///
    /// # Errors
    ///
    /// Returns [`HippoError::EmptyInput`] for zero slices and
    /// [`HippoError::InconsistentDimensions`] if slice shapes differ.
    pub fn load_from_records(mut records: Vec<SliceRecord>) -> Result<(Volume, Header)> {
        if records.is_empty() {
            return Err(HippoError::EmptyInput);
        }

        records.sort_by_key(|record| record.header().instance_number);
        Self::validate_dimensions(&records)?;

        let mut records = records.into_iter();
        let (header, first) = records
            .next()
            .map(SliceRecord::into_parts)
            .ok_or(HippoError::EmptyInput)?;

        let mut images = vec![first];
        images.extend(records.map(|record| record.into_parts().1));

        let volume = Volume::new(Self::build_volume_array(&images));
        debug!(
            "Assembled volume {:?} from series {}",
            volume.dim(),
            header.series_instance_uid
        );
        Ok((volume, header))
    }

    fn validate_dimensions(records: &[SliceRecord]) -> Result<()> {
        let expected = records[0].dim();
        match records.iter().map(SliceRecord::dim).find(|dim| *dim != expected) {
            Some(found) => Err(HippoError::InconsistentDimensions { expected, found }),
            None => Ok(()),
        }
    }

    fn build_volume_array(images: &[Array2<f32>]) -> Array3<f32> {
        let (height, width) = images[0].dim();
        let depth = images.len();
        // Planes are transposed, so rows of the volume are source columns.
        let mut volume = Array3::<f32>::zeros((width, height, depth));

        for (i, image) in images.iter().enumerate() {
            volume
                .slice_mut(s![.., .., i])
                .assign(&rotate_transpose(image.view()));
        }

        volume
    }
}
