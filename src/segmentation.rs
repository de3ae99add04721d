use crate::reorient::segmentation_convention;

use ndarray::{Array3, ArrayView3, Ix3, s};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiObject, NiftiType, ReaderOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Prefix of the realigned file written next to each segmentation
pub const PROCESSED_PREFIX: &str = "processed_";

#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("Expected a 3D volume, found {0} dimensions")]
    NotVolumetric(usize),

    #[error("Unsupported data type: {0:?}")]
    UnsupportedDataType(NiftiType),

    #[error("Invalid segmentation path: {0}")]
    InvalidPath(PathBuf),
}

pub struct SegmentationAligner;

impl SegmentationAligner {
    /// Whether `path` names a NIfTI file, compressed or not
    pub fn is_segmentation_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(".nii") || name.ends_with(".nii.gz"))
    }

    /// Sibling of `path` carrying the processed prefix
    pub fn processed_path(path: &Path) -> Result<PathBuf, SegmentationError> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| SegmentationError::InvalidPath(path.to_path_buf()))?;
        Ok(path.with_file_name(format!("{PROCESSED_PREFIX}{name}")))
    }

    /// Reorient every plane along the third axis
    ///
    /// A volume of shape (x, y, z) becomes (y, x, z).
    pub fn align_array<T: Clone>(data: ArrayView3<'_, T>) -> Array3<T> {
        let (x, y, z) = data.dim();
        let planes: Vec<_> = (0..z)
            .map(|k| segmentation_convention(data.slice_move(s![.., .., k])))
            .collect();
        Array3::from_shape_fn((y, x, z), |(i, j, k)| planes[k][[i, j]].clone())
    }

    /// Realign the mask at `input` and write it to `output`
    ///
    /// The output header is the input header with only the voxel grid
    /// updated: sform, qform and pixdim are copied unchanged, so the mask
    /// keeps the spatial transform of whatever produced it. Voxels are
    /// written in the input's data type.
    pub fn align_file(input: &Path, output: &Path) -> Result<(), SegmentationError> {
        let object = ReaderOptions::new().read_file(input)?;
        let mut header = object.header().clone();
        let data_type = header.data_type()?;

        let data = object.into_volume().into_ndarray::<f64>()?;
        let ndim = data.ndim();
        let data = data
            .into_dimensionality::<Ix3>()
            .map_err(|_| SegmentationError::NotVolumetric(ndim))?;
        let aligned = Self::align_array(data.view());
        debug!(
            "Aligned {} from {:?} to {:?}",
            input.display(),
            data.dim(),
            aligned.dim()
        );

        // Values were scaled on read
        header.scl_slope = 1.0;
        header.scl_inter = 0.0;
        let writer = WriterOptions::new(output).reference_header(&header);
        match data_type {
            NiftiType::Uint8 => writer.write_nifti(&aligned.mapv(|v| v.round() as u8))?,
            NiftiType::Int8 => writer.write_nifti(&aligned.mapv(|v| v.round() as i8))?,
            NiftiType::Uint16 => writer.write_nifti(&aligned.mapv(|v| v.round() as u16))?,
            NiftiType::Int16 => writer.write_nifti(&aligned.mapv(|v| v.round() as i16))?,
            NiftiType::Uint32 => writer.write_nifti(&aligned.mapv(|v| v.round() as u32))?,
            NiftiType::Int32 => writer.write_nifti(&aligned.mapv(|v| v.round() as i32))?,
            NiftiType::Float32 => writer.write_nifti(&aligned.mapv(|v| v as f32))?,
            NiftiType::Float64 => writer.write_nifti(&aligned)?,
            other => return Err(SegmentationError::UnsupportedDataType(other)),
        }
        Ok(())
    }
}
