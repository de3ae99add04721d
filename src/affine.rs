use crate::slice::SliceRecord;

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use nifti::NiftiHeader;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Missing {0} on reference slice")]
    MissingField(&'static str),

    #[error("Expected {expected} values for {name}, found {found}")]
    InvalidLength {
        name: &'static str,
        expected: usize,
        found: usize,
    },
}

/// In-plane spacing and slice thickness asserted for a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingProfile {
    pub row_spacing: f64,
    pub col_spacing: f64,
    pub slice_thickness: f64,
}

impl SpacingProfile {
    pub const fn new(row_spacing: f64, col_spacing: f64, slice_thickness: f64) -> Self {
        Self {
            row_spacing,
            col_spacing,
            slice_thickness,
        }
    }
}

/// 4x4 voxel-to-patient transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub matrix: Matrix4<f64>,
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Build from three direction columns and a translation
    pub fn from_columns(
        column_i: Vector3<f64>,
        column_j: Vector3<f64>,
        column_k: Vector3<f64>,
        translation: Vector3<f64>,
    ) -> Self {
        let mut matrix = Matrix4::identity();
        matrix
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&Matrix3::from_columns(&[column_i, column_j, column_k]));
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Self { matrix }
    }

    /// Read the transform a NIfTI header resolves to (sform, then qform)
    pub fn from_header(header: &NiftiHeader) -> Self {
        Self {
            matrix: header.affine::<f64>(),
        }
    }

    pub fn column(&self, index: usize) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, index).into_owned()
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.column(3)
    }

    /// Length of each direction column, i.e. the voxel size along i, j and k
    pub fn voxel_size(&self) -> Vector3<f64> {
        Vector3::from_fn(|axis, _| self.column(axis).norm())
    }

    /// Map a voxel index to patient coordinates
    pub fn apply(&self, index: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(index)
    }
}

pub struct AffineBuilder;

impl AffineBuilder {
    /// Derive the voxel-to-patient transform anchored on `first`
    ///
    /// Only the first slice's orientation and position are consulted. The
    /// through-plane direction is the cross product of the in-plane cosines,
    /// scaled by the profile's slice thickness; distances between slices are
    /// never measured.
    pub fn build(
        first: &SliceRecord,
        profile: &SpacingProfile,
    ) -> Result<AffineTransform, GeometryError> {
        let orientation: [f64; 6] = resolve(first.orientation.as_deref(), "ImageOrientationPatient")?;
        let position: [f64; 3] = resolve(first.position.as_deref(), "ImagePositionPatient")?;

        let row_cosine = Vector3::new(orientation[0], orientation[1], orientation[2]);
        let col_cosine = Vector3::new(orientation[3], orientation[4], orientation[5]);
        let normal = row_cosine.cross(&col_cosine);

        Ok(AffineTransform::from_columns(
            row_cosine * profile.row_spacing,
            col_cosine * profile.col_spacing,
            normal * profile.slice_thickness,
            Vector3::from(position),
        ))
    }
}

fn resolve<const N: usize>(
    values: Option<&[f64]>,
    name: &'static str,
) -> Result<[f64; N], GeometryError> {
    let values = values.ok_or(GeometryError::MissingField(name))?;
    values
        .try_into()
        .map_err(|_| GeometryError::InvalidLength {
            name,
            expected: N,
            found: values.len(),
        })
}
