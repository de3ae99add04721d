use crate::affine::AffineTransform;

use ndarray::Array3;
use nifti::NiftiHeader;
use nifti::writer::WriterOptions;
use std::path::Path;

/// NIfTI `xyzt_units` code for millimetres
const NIFTI_UNITS_MM: u8 = 2;

/// A reconstructed image: voxel data indexed `(i, j, k)` plus its affine
#[derive(Debug, Clone)]
pub struct Volume {
    pub data: Array3<i16>,
    pub affine: AffineTransform,
}

impl Volume {
    pub fn new(data: Array3<i16>, affine: AffineTransform) -> Self {
        Self { data, affine }
    }

    /// Get the dimensions of the volume (columns, rows, slices)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<i16> {
        &self.data
    }

    pub fn affine(&self) -> &AffineTransform {
        &self.affine
    }

    /// Header carrying the affine as sform and the voxel size as pixdim
    ///
    /// The sform is marked as aligned to another image; the qform fitted
    /// alongside it is left with an unknown code.
    pub fn nifti_header(&self) -> NiftiHeader {
        let mut header = NiftiHeader::default();
        header.set_affine(&self.affine.matrix);
        let voxel_size = self.affine.voxel_size().cast::<f32>();
        header.pixdim[1..4].copy_from_slice(voxel_size.as_slice());
        header.xyzt_units = NIFTI_UNITS_MM;
        header
    }

    /// Write the volume as NIfTI-1, gzip compressed when the path ends in `.gz`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), nifti::NiftiError> {
        let header = self.nifti_header();
        WriterOptions::new(path.as_ref())
            .reference_header(&header)
            .write_nifti(&self.data)
    }
}
