/// How a slice is mapped onto the model's fixed patch and back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Bilinear resampling of intensities onto the patch, nearest-neighbour
    /// resampling of labels back to the slice.
    #[default]
    Resample,
    /// Zero-pad or crop at the far edges; the inverse crops or zero-pads.
    PadCrop,
}

/// Segmentation classes produced by the model
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Label {
    Background = 0,
    Anterior = 1,
    Posterior = 2,
}
