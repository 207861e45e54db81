use crate::error::{BoxError, HippoError, Result};
use crate::header::Header;

use dicom::object::{DefaultDicomObject, open_file};
use dicom::pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use ndarray::{Array2, ArrayView2, s};
use std::path::Path;

/// One decoded 2D slice together with its metadata header.
#[derive(Debug, Clone)]
pub struct SliceRecord {
    header: Header,
    pixels: Array2<f32>,
}

impl SliceRecord {
    pub fn new(header: Header, pixels: Array2<f32>) -> Self {
        Self { header, pixels }
    }

    /// Read and decode a single DICOM file.
    ///
    /// # Errors
    ///
    /// Returns [`HippoError::Parse`] if the file is not DICOM or its pixel
    /// data cannot be decoded.
    pub fn open(path: &Path) -> Result<Self> {
        let parse_error = |source: BoxError| HippoError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let dicom_object = open_file(path).map_err(|e| parse_error(Box::new(e)))?;
        let pixels = Self::decode_image(&dicom_object).map_err(parse_error)?;
        let header = Header::from_object(&dicom_object);
        Ok(Self { header, pixels })
    }

    // Raw stored values of the first frame and first sample; no modality LUT.
    fn decode_image(dicom_object: &DefaultDicomObject) -> std::result::Result<Array2<f32>, BoxError> {
        let pixel_data = dicom_object.decode_pixel_data()?;
        let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
        let frames = pixel_data.to_ndarray_with_options::<f32>(&options)?;
        Ok(frames.slice_move(s![0, .., .., 0]))
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn pixels(&self) -> ArrayView2<'_, f32> {
        self.pixels.view()
    }

    /// (rows, columns)
    pub fn dim(&self) -> (usize, usize) {
        self.pixels.dim()
    }

    pub fn into_parts(self) -> (Header, Array2<f32>) {
        (self.header, self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{slice_object, write_slice};
    use tempfile::TempDir;

    #[test]
    fn decodes_raw_pixel_values() {
        let dir = TempDir::new().unwrap();
        let pixels: Vec<u16> = (0..6).map(|v| v * 100).collect();
        let path = write_slice(
            dir.path(),
            "slice.dcm",
            slice_object("1.2.3", "HippoCrop", 4, 2, 3, &pixels),
        );

        let record = SliceRecord::open(&path).unwrap();

        assert_eq!(record.dim(), (2, 3));
        assert_eq!(record.pixels()[[0, 0]], 0.0);
        assert_eq!(record.pixels()[[1, 2]], 500.0);
        assert_eq!(record.header().instance_number, 4);
    }

    #[test]
    fn rejects_non_dicom_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not a dicom file").unwrap();

        let err = SliceRecord::open(&path).unwrap_err();

        assert!(matches!(err, HippoError::Parse { .. }));
    }
}
