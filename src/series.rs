use crate::slice::SliceRecord;

use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Orientation cosines further apart than this are reported as inconsistent
const ORIENTATION_TOLERANCE: f64 = 1e-4;

/// Slices of one modality of one subject, ordered by Slice Location
#[derive(Debug, Default)]
pub struct SliceSeries {
    slices: Vec<SliceRecord>,
    skipped: Vec<PathBuf>,
}

impl SliceSeries {
    /// Read every regular file in `path` as a slice
    ///
    /// Files are visited in file-name order. Files that cannot be read as a
    /// slice are logged and skipped, so the series may be partial or empty.
    ///
    /// # Errors
    ///
    /// Returns error only if the directory itself cannot be listed
    pub fn load_from_directory(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut paths: Vec<_> = fs::read_dir(path.as_ref())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut slices = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();
        for path in paths {
            match SliceRecord::read_file(&path) {
                Ok(slice) => slices.push(slice),
                Err(e) => {
                    warn!("Skipping unreadable slice {}: {}", path.display(), e);
                    skipped.push(path);
                }
            }
        }

        let mut series = Self::from_records(slices);
        series.skipped = skipped;
        debug!(
            "Loaded {} slices from {} ({} skipped)",
            series.len(),
            path.as_ref().display(),
            series.skipped.len()
        );
        Ok(series)
    }

    /// Order records by ascending Slice Location
    ///
    /// Ties keep the order the records were given in.
    pub fn from_records(mut slices: Vec<SliceRecord>) -> Self {
        slices.sort_by(|a, b| a.slice_location.total_cmp(&b.slice_location));
        let series = Self {
            slices,
            skipped: Vec::new(),
        };
        series.validate();
        series
    }

    /// Warn about conditions the volume is assembled despite
    fn validate(&self) {
        for pair in self.slices.windows(2) {
            if pair[0].slice_location == pair[1].slice_location {
                warn!(
                    "Duplicate slice location {} in series",
                    pair[0].slice_location
                );
            }
        }

        let Some(reference) = self.first().and_then(|first| first.orientation.as_ref()) else {
            return;
        };
        let deviating = self.slices[1..]
            .iter()
            .filter(|slice| match &slice.orientation {
                Some(orientation) => {
                    orientation.len() != reference.len()
                        || orientation
                            .iter()
                            .zip(reference)
                            .any(|(a, b)| (a - b).abs() > ORIENTATION_TOLERANCE)
                }
                None => true,
            })
            .count();
        if deviating > 0 {
            warn!(
                "{} slices deviate from the first slice's orientation, which alone defines the affine",
                deviating
            );
        }
    }

    pub fn slices(&self) -> &[SliceRecord] {
        &self.slices
    }

    /// The slice anchoring the series geometry
    pub fn first(&self) -> Option<&SliceRecord> {
        self.slices.first()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Files that were discarded while loading
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }
}
