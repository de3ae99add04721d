//! # DICOM-NIfTI volume library
//!
//! This crate assembles per-patient DICOM slice series into single NIfTI
//! volumes, one per imaging modality, and realigns existing segmentation
//! masks to the same pixel convention.
//!
//! It builds on the dicom-rs ecosystem for reading slices and on nifti-rs for
//! writing volumes. Slices of one series are read from a directory, stripped
//! of identifying metadata, ordered by Slice Location and stacked along the
//! third axis. The voxel-to-patient affine is derived from the first slice's
//! orientation and position, with in-plane spacing and slice thickness taken
//! from a fixed per-modality table:
//!
//! | Modality | row/col spacing | slice thickness |
//! |----------|-----------------|-----------------|
//! | CT       | 1.172, 1.172    | 5.0             |
//! | PET      | 4.0, 4.0        | 4.0             |
//!
//! DICOM slices are assumed to have the following attributes:
//!  - Axial acquisition without gantry tilt
//!  - No multiframe (always the first frame is used)
//!  - A single series (Series Instance UID) per directory
//!
//! Stored pixel values are used as is; rescale slope and intercept are not
//! applied. Unsigned samples are reinterpreted as signed 16-bit.
//!
//! # Examples
//!
//! ## Assembling one series
//!
//! ```no_run
//! # use dicom_nifti_volume::{Modality, SliceSeries, VolumeAssembler};
//! let series = SliceSeries::load_from_directory("P1/CT")
//!     .expect("should have listed the directory");
//! let volume = VolumeAssembler::assemble(&series, Modality::CT)
//!     .expect("should have assembled the series");
//! volume.save("CT.nii.gz").expect("should have written the volume");
//! ```
//!
//! ## Converting a tree of subjects
//!
//! ```no_run
//! # use dicom_nifti_volume::{BatchConfig, PatientBatchOrchestrator};
//! let config = BatchConfig::new("dicom", "nifti");
//! let report = PatientBatchOrchestrator::new(config)
//!     .run()
//!     .expect("should have read the source root");
//! println!("{} volumes written", report.volumes.len());
//! ```

pub mod affine;
pub mod batch;
pub mod enums;
pub mod reorient;
pub mod sanitizer;
pub mod segmentation;
pub mod series;
pub mod slice;
pub mod volume;
pub mod volume_assembler;

pub use affine::{AffineBuilder, AffineTransform, GeometryError, SpacingProfile};
pub use batch::{BatchConfig, BatchError, BatchReport, ConversionError, PatientBatchOrchestrator};
pub use enums::Modality;
pub use sanitizer::MetadataSanitizer;
pub use segmentation::{SegmentationAligner, SegmentationError};
pub use series::SliceSeries;
pub use slice::{SliceError, SliceRecord};
pub use volume::Volume;
pub use volume_assembler::{VolumeAssembler, VolumeAssemblerError};
