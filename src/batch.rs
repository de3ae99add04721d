use crate::{
    enums::Modality,
    segmentation::{SegmentationAligner, SegmentationError},
    series::SliceSeries,
    volume_assembler::{VolumeAssembler, VolumeAssemblerError},
};

use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Name of the subject subfolder holding segmentation masks
pub const SEGMENTATION_FOLDER: &str = "Seg";

/// Batch-level failures; these stop the whole run
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Invalid source root: {0}")]
    InvalidSourceRoot(PathBuf),

    #[error("Failed to create destination {path}: {source}")]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of one unit of work (one modality or one segmentation file)
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Assembly error: {0}")]
    Assembly(#[from] VolumeAssemblerError),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("Segmentation error: {0}")]
    Segmentation(#[from] SegmentationError),
}

/// Where to read subjects from and where to mirror the results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
}

impl BatchConfig {
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
        }
    }
}

/// A unit of work that did not produce output
#[derive(Debug)]
pub struct FailedUnit {
    pub subject: String,
    pub unit: String,
    pub error: ConversionError,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub subjects: usize,
    /// Volumes written, one per subject and modality
    pub volumes: Vec<PathBuf>,
    /// Realigned segmentation files written
    pub segmentations: Vec<PathBuf>,
    /// Slice files that could not be read
    pub skipped_slices: Vec<PathBuf>,
    /// (subject, modality) pairs with no folder or no usable slices
    pub skipped_modalities: Vec<(String, Modality)>,
    pub failures: Vec<FailedUnit>,
}

pub struct PatientBatchOrchestrator {
    config: BatchConfig,
}

impl PatientBatchOrchestrator {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Convert every subject under the source root
    ///
    /// Each modality and each segmentation file fails independently: the
    /// error is logged, recorded in the report and the run continues.
    ///
    /// # Errors
    ///
    /// Returns error if the source root cannot be listed or the destination
    /// root cannot be created
    pub fn run(&self) -> Result<BatchReport, BatchError> {
        let source_root = &self.config.source_root;
        if !source_root.is_dir() {
            return Err(BatchError::InvalidSourceRoot(source_root.clone()));
        }

        // Listed before the destination exists so a nested destination root
        // is never mistaken for a subject
        let mut subjects: Vec<_> = fs::read_dir(source_root)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        create_dir(&self.config.destination_root)?;
        let destination_root = fs::canonicalize(&self.config.destination_root)?;
        subjects.retain(|path| !fs::canonicalize(path).is_ok_and(|path| path == destination_root));
        subjects.sort();
        info!("Found {} subjects in {}", subjects.len(), source_root.display());

        let mut report = BatchReport::default();
        for subject_dir in subjects {
            self.process_subject(&subject_dir, &mut report)?;
            report.subjects += 1;
        }

        info!(
            "Wrote {} volumes and {} segmentations for {} subjects ({} failures)",
            report.volumes.len(),
            report.segmentations.len(),
            report.subjects,
            report.failures.len()
        );
        Ok(report)
    }

    fn process_subject(&self, subject_dir: &Path, report: &mut BatchReport) -> Result<(), BatchError> {
        let subject = subject_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let destination = self.config.destination_root.join(&subject);
        create_dir(&destination)?;
        info!("Processing subject {}", subject);

        for modality in Modality::ALL {
            let source = subject_dir.join(modality.folder_name());
            if !source.is_dir() {
                debug!("No {} folder for subject {}", modality, subject);
                report.skipped_modalities.push((subject.clone(), modality));
                continue;
            }

            match Self::convert_modality(&source, &destination, modality, report) {
                Ok(Some(path)) => report.volumes.push(path),
                Ok(None) => report.skipped_modalities.push((subject.clone(), modality)),
                Err(e) => {
                    error!("Failed to convert {} for subject {}: {}", modality, subject, e);
                    report.failures.push(FailedUnit {
                        subject: subject.clone(),
                        unit: modality.to_string(),
                        error: e,
                    });
                }
            }
        }

        let segmentation_source = subject_dir.join(SEGMENTATION_FOLDER);
        if segmentation_source.is_dir() {
            Self::process_segmentations(&subject, &segmentation_source, &destination, report);
        }
        Ok(())
    }

    /// Returns the written volume, or `None` when the folder held no slices
    fn convert_modality(
        source: &Path,
        destination: &Path,
        modality: Modality,
        report: &mut BatchReport,
    ) -> Result<Option<PathBuf>, ConversionError> {
        let series = SliceSeries::load_from_directory(source)?;
        report.skipped_slices.extend_from_slice(series.skipped());
        if series.is_empty() {
            warn!("No usable slices in {}", source.display());
            return Ok(None);
        }

        let volume = VolumeAssembler::assemble(&series, modality)?;
        let output = destination.join(modality.output_file_name());
        volume.save(&output)?;
        info!(
            "Wrote {} ({} slices) to {}",
            modality,
            series.len(),
            output.display()
        );
        Ok(Some(output))
    }

    fn process_segmentations(
        subject: &str,
        source: &Path,
        destination: &Path,
        report: &mut BatchReport,
    ) {
        let copied = destination.join(SEGMENTATION_FOLDER);
        if let Err(e) = copy_dir_all(source, &copied) {
            error!("Failed to copy {}: {}", source.display(), e);
            report.failures.push(FailedUnit {
                subject: subject.to_string(),
                unit: SEGMENTATION_FOLDER.to_string(),
                error: e.into(),
            });
            return;
        }

        let mut masks: Vec<_> = match fs::read_dir(&copied) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && SegmentationAligner::is_segmentation_file(path))
                .collect(),
            Err(e) => {
                error!("Failed to list {}: {}", copied.display(), e);
                return;
            }
        };
        masks.sort();

        for mask in masks {
            let result = SegmentationAligner::processed_path(&mask)
                .and_then(|output| SegmentationAligner::align_file(&mask, &output).map(|_| output));
            match result {
                Ok(output) => {
                    info!("Wrote {}", output.display());
                    report.segmentations.push(output);
                }
                Err(e) => {
                    error!("Failed to align {}: {}", mask.display(), e);
                    report.failures.push(FailedUnit {
                        subject: subject.to_string(),
                        unit: mask.display().to_string(),
                        error: e.into(),
                    });
                }
            }
        }
    }
}

fn create_dir(path: &Path) -> Result<(), BatchError> {
    fs::create_dir_all(path).map_err(|source| BatchError::CreateDestination {
        path: path.to_path_buf(),
        source,
    })
}

/// Recursively copy `source` into `destination`, overwriting existing files
fn copy_dir_all(source: &Path, destination: &Path) -> io::Result<()> {
    fs::create_dir_all(destination)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
