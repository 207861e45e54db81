use crate::error::{HippoError, Result};
use crate::slice::SliceRecord;

use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Series description the upstream cropping tool stamps on its output.
pub const DEFAULT_SERIES_DESCRIPTION: &str = "HippoCrop";

pub struct SeriesSelector;

impl SeriesSelector {
    /// Read every file of a study directory and keep the target series.
    ///
    /// Returns an empty list when nothing matches `series_description`
    /// exactly, and also when the matches span more than one Series Instance
    /// UID: an ambiguous study is never resolved by guessing.
    ///
    /// # Errors
    ///
    /// Returns [`HippoError::Parse`] on the first file that is not a readable
    /// DICOM slice; a partially read study is not used.
    pub fn select_series(directory: &Path, series_description: &str) -> Result<Vec<SliceRecord>> {
        let mut records = Vec::new();
        for path in Self::collect_files(directory)? {
            records.push(SliceRecord::open(&path)?);
        }
        let total = records.len();

        let selected: Vec<SliceRecord> = records
            .into_iter()
            .filter(|record| record.header().series_description == series_description)
            .collect();

        if selected.is_empty() {
            info!(
                "No series described as \"{}\" among {} files in {}",
                series_description,
                total,
                directory.display()
            );
            return Ok(Vec::new());
        }

        let series: BTreeSet<&str> = selected
            .iter()
            .map(|record| record.header().series_instance_uid.as_str())
            .collect();
        if series.len() != 1 {
            warn!(
                "Cannot decide which series to use in {}: {} series match \"{}\" ({:?})",
                directory.display(),
                series.len(),
                series_description,
                series
            );
            return Ok(Vec::new());
        }

        info!(
            "Selected {} of {} slices from {}",
            selected.len(),
            total,
            directory.display()
        );
        Ok(selected)
    }

    /// Try study directories under `root`, newest first, and return the first
    /// one holding a usable series.
    ///
    /// A directory that fails to parse is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`HippoError::NoSeriesFound`] once every directory is
    /// exhausted, and [`HippoError::Io`] if `root` cannot be listed.
    pub fn find_study(root: &Path, series_description: &str) -> Result<(PathBuf, Vec<SliceRecord>)> {
        for directory in Self::study_directories(root)? {
            info!("Trying directory {}", directory.display());
            match Self::select_series(&directory, series_description) {
                Ok(records) if !records.is_empty() => {
                    info!("Found valid series in {}", directory.display());
                    return Ok((directory, records));
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping {}: {}", directory.display(), e),
            }
        }

        Err(HippoError::NoSeriesFound {
            root: root.to_path_buf(),
            series_description: series_description.to_string(),
        })
    }

    /// Subdirectories of `root`, most recently modified first.
    pub fn study_directories(root: &Path) -> Result<Vec<PathBuf>> {
        let mut directories: Vec<(SystemTime, PathBuf)> = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if metadata.is_dir() {
                let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                directories.push((modified, entry.path()));
            }
        }

        directories.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(directories.into_iter().map(|(_, path)| path).collect())
    }

    fn collect_files(directory: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(directory)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            } else {
                debug!("Ignoring non-file entry {}", path.display());
            }
        }
        files.sort();
        Ok(files)
    }
}
