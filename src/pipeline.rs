use crate::enums::ResizePolicy;
use crate::encoder::save_report_as_dicom;
use crate::error::{PipelineWarning, Result};
use crate::header::Header;
use crate::inference::InferenceAdapter;
use crate::model::SegmentationModel;
use crate::quantifier::VolumeStatistics;
use crate::report::{ReportComposer, ReportImage};
use crate::series_selector::{DEFAULT_SERIES_DESCRIPTION, SeriesSelector};
use crate::slice::SliceRecord;
use crate::volume::{LabelVolume, Volume};
use crate::volume_loader::VolumeLoader;

use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Exact series description of the series to segment
    pub series_description: String,
    /// Where the Secondary Capture report is written
    pub output_path: PathBuf,
    pub resize_policy: ResizePolicy,
    /// Optional raster copy of the report (format from the extension)
    pub preview_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            series_description: DEFAULT_SERIES_DESCRIPTION.to_string(),
            output_path: PathBuf::from("out/report.dcm"),
            resize_policy: ResizePolicy::default(),
            preview_path: None,
        }
    }
}

/// Everything computed for one series before anything is written.
#[derive(Debug)]
pub struct Analysis {
    pub header: Header,
    pub volume: Volume,
    pub labels: LabelVolume,
    pub statistics: VolumeStatistics,
    pub report: ReportImage,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub study_dir: PathBuf,
    pub output_path: PathBuf,
    /// SOP Instance UID of the first slice of the analysed series
    pub source_sop_instance_uid: String,
    pub label_shape: (usize, usize, usize),
    pub report_size: (u32, u32),
    pub statistics: VolumeStatistics,
}

pub struct Pipeline<M> {
    config: PipelineConfig,
    adapter: InferenceAdapter<M>,
    composer: ReportComposer,
}

impl<M: SegmentationModel> Pipeline<M> {
    pub fn new(config: PipelineConfig, model: M, composer: ReportComposer) -> Self {
        let adapter = InferenceAdapter::new(model, config.resize_policy);
        Self {
            config,
            adapter,
            composer,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load, segment, quantify and render one series. Touches no files.
    pub fn analyze(&self, records: Vec<SliceRecord>) -> Result<Analysis> {
        let (volume, header) = VolumeLoader::load_from_records(records)?;
        info!("Found series of {} axial slices", volume.num_slices());

        let labels = self.adapter.infer_volume(&volume)?;
        let statistics = VolumeStatistics::from_labels(&labels);
        info!("Predicted {statistics}");

        let report = self
            .composer
            .compose(&statistics, &header, &volume, &labels);

        Ok(Analysis {
            header,
            volume,
            labels,
            statistics,
            report,
        })
    }

    /// Find the newest usable study under `root`, analyse it and write the report.
    pub fn run(&self, root: &Path) -> Result<PipelineOutcome> {
        let (study_dir, records) =
            SeriesSelector::find_study(root, &self.config.series_description)?;

        let analysis = self.analyze(records)?;
        save_report_as_dicom(&analysis.header, &analysis.report, &self.config.output_path)?;
        if let Some(preview) = &self.config.preview_path {
            Self::save_preview(&analysis.report, preview);
        }

        Ok(PipelineOutcome {
            study_dir,
            output_path: self.config.output_path.clone(),
            source_sop_instance_uid: analysis.header.sop_instance_uid.clone(),
            label_shape: analysis.labels.dim(),
            report_size: (analysis.report.width(), analysis.report.height()),
            statistics: analysis.statistics,
        })
    }
}

impl<M> Pipeline<M> {
    // Best effort; the DICOM object is the deliverable.
    fn save_preview(report: &ReportImage, path: &Path) {
        let saved = report
            .to_rgb()
            .ok_or_else(|| "report bytes do not fill the raster".to_string())
            .and_then(|image| image.save(path).map_err(|e| e.to_string()));
        match saved {
            Ok(()) => info!("Saved report preview to {}", path.display()),
            Err(e) => warn!("Could not save report preview {}: {e}", path.display()),
        }
    }
}

/// Pushes a finished report to the archive.
pub trait Transport {
    fn send(&self, path: &Path) -> std::result::Result<(), PipelineWarning>;
}

/// Removes a processed study directory.
pub trait Cleanup {
    fn remove(&self, study_dir: &Path) -> std::result::Result<(), PipelineWarning>;
}

/// C-STORE through an external `storescu` executable.
#[derive(Debug, Clone)]
pub struct StoreScuTransport {
    pub program: PathBuf,
    pub host: String,
    pub port: u16,
    pub called_ae_title: String,
}

impl Default for StoreScuTransport {
    fn default() -> Self {
        Self {
            program: PathBuf::from("storescu"),
            host: "127.0.0.1".to_string(),
            port: 4242,
            called_ae_title: "HIPPOAI".to_string(),
        }
    }
}

impl StoreScuTransport {
    pub fn command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(&self.host)
            .arg(self.port.to_string())
            .arg("-v")
            .arg("-aec")
            .arg(&self.called_ae_title)
            .arg("+r")
            .arg("+sd")
            .arg(path);
        command
    }
}

impl Transport for StoreScuTransport {
    fn send(&self, path: &Path) -> std::result::Result<(), PipelineWarning> {
        let warning = |reason: String| PipelineWarning::Transport {
            path: path.to_path_buf(),
            reason,
        };
        let output = self
            .command(path)
            .output()
            .map_err(|e| warning(format!("could not run {}: {e}", self.program.display())))?;

        if output.status.success() {
            info!(
                "Sent {} to {}:{} ({})",
                path.display(),
                self.host,
                self.port,
                self.called_ae_title
            );
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(warning(format!("{}: {}", output.status, stderr.trim())))
        }
    }
}

/// Waits for the archive to settle, then deletes the study directory tree.
#[derive(Debug, Clone)]
pub struct DelayedRemoval {
    pub delay: Duration,
}

impl Default for DelayedRemoval {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
        }
    }
}

impl Cleanup for DelayedRemoval {
    fn remove(&self, study_dir: &Path) -> std::result::Result<(), PipelineWarning> {
        thread::sleep(self.delay);
        fs::remove_dir_all(study_dir).map_err(|source| PipelineWarning::Cleanup {
            path: study_dir.to_path_buf(),
            source,
        })?;
        info!("Removed {}", study_dir.display());
        Ok(())
    }
}

/// Post-encode stage: transport, then cleanup. Failures are logged and
/// returned as warnings; neither affects the outcome of the run.
///
/// Cleanup is skipped when the transport fails.
pub fn finish(
    outcome: &PipelineOutcome,
    transport: Option<&dyn Transport>,
    cleanup: Option<&dyn Cleanup>,
) -> Vec<PipelineWarning> {
    let mut warnings = Vec::new();

    if let Some(transport) = transport
        && let Err(warning) = transport.send(&outcome.output_path)
    {
        warn!("{warning}");
        warnings.push(warning);
        if cleanup.is_some() {
            warn!(
                "Keeping {} because the report was not sent",
                outcome.study_dir.display()
            );
        }
        return warnings;
    }

    if let Some(cleanup) = cleanup
        && let Err(warning) = cleanup.remove(&outcome.study_dir)
    {
        warn!("{warning}");
        warnings.push(warning);
    }

    warnings
}
