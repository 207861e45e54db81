//! # hippo-volume
//!
//! Hippocampal volume quantification for DICOM studies routed from a
//! clinical archive.
//!
//! The crate builds on the dicom-rs ecosystem. A run picks the newest study
//! directory that contains exactly one series carrying the expected Series
//! Description, assembles it into a volume, segments every slice with a
//! fixed-patch model, counts the voxels of the anterior and posterior
//! hippocampus and renders a report. The report is encoded as a DICOM
//! Secondary Capture image (RGB, burned-in annotation) that is ready to be
//! sent back to the archive.
//!
//! The stages are:
//!  - [`SeriesSelector`]: filters a study directory down to one series
//!  - [`VolumeLoader`]: orders slices by Instance Number and stacks them
//!  - [`InferenceAdapter`]: fits each slice to the model patch and back
//!  - [`VolumeStatistics`]: voxel counts per structure
//!  - [`ReportComposer`]: text and mask overlays on a 1000x1000 canvas
//!  - [`save_report_as_dicom`]: Secondary Capture encoding, written atomically
//!
//! Sending to the archive and removing the processed study are separate
//! collaborators ([`Transport`], [`Cleanup`]) run after encoding.
//!
//! # Examples
//!
//! ## Segmenting the newest study of a routing directory
//!
//! ```no_run
//! # use hippo_volume::{Pipeline, PipelineConfig, ReportComposer, ThresholdModel};
//! # use std::path::Path;
//! let pipeline = Pipeline::new(
//!     PipelineConfig::default(),
//!     ThresholdModel::new((64, 64)),
//!     ReportComposer::with_system_font(),
//! );
//! let outcome = pipeline
//!     .run(Path::new("routing"))
//!     .expect("should have found and analysed a study");
//! println!("{}", outcome.statistics);
//! ```

pub mod cli;
pub mod colormap;
pub mod encoder;
pub mod enums;
pub mod error;
pub mod header;
pub mod inference;
mod interpolator;
pub mod model;
pub mod pipeline;
pub mod quantifier;
pub mod report;
pub mod series_selector;
pub mod slice;
pub mod volume;
pub mod volume_loader;

#[cfg(test)]
mod test_support;

pub use encoder::{build_report_object, generate_uid, save_report_as_dicom};
pub use enums::{Label, ResizePolicy};
pub use error::{HippoError, PipelineWarning, Result};
pub use header::Header;
pub use inference::InferenceAdapter;
pub use model::{SegmentationModel, ThresholdModel};
pub use pipeline::{
    Analysis, Cleanup, DelayedRemoval, Pipeline, PipelineConfig, PipelineOutcome,
    StoreScuTransport, Transport, finish,
};
pub use quantifier::VolumeStatistics;
pub use report::{ReportComposer, ReportImage};
pub use series_selector::SeriesSelector;
pub use slice::SliceRecord;
pub use volume::{LabelVolume, Volume};
pub use volume_loader::VolumeLoader;
