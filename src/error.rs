use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by opaque collaborators (model backends, decoders).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, HippoError>;

/// Errors that abort the current study attempt (or the whole run)
#[derive(Debug, Error)]
pub enum HippoError {
    /// A file in the study directory could not be read as a DICOM slice
    #[error("failed to parse slice file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// No study directory yielded a matching, unambiguous series
    #[error("no series described as \"{series_description}\" found under {root}")]
    NoSeriesFound {
        root: PathBuf,
        series_description: String,
    },

    #[error("cannot assemble a volume from zero slices")]
    EmptyInput,

    #[error("slice dimensions differ: expected {expected:?}, found {found:?}")]
    InconsistentDimensions {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// The segmentation model failed on a slice; the whole volume is discarded
    #[error("model inference failed on slice {slice}: {source}")]
    ModelInference {
        slice: usize,
        #[source]
        source: BoxError,
    },

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Non-fatal failures of the post-encode stage. Logged, never change the exit status.
#[derive(Debug, Error)]
pub enum PipelineWarning {
    #[error("transport of {path} failed: {reason}")]
    Transport { path: PathBuf, reason: String },

    #[error("could not remove study directory {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
