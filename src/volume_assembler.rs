use crate::{
    affine::{AffineBuilder, GeometryError, SpacingProfile},
    enums::Modality,
    reorient::volume_convention,
    series::SliceSeries,
    volume::Volume,
};

use ndarray::{Array3, s};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VolumeAssemblerError {
    #[error("Series has no slices")]
    EmptySeries,

    #[error("Inconsistent image dimensions: slice {index} is {found:?}, expected {expected:?}")]
    InconsistentDimensions {
        index: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

pub struct VolumeAssembler;

impl VolumeAssembler {
    /// Assemble a volume using the fixed spacing of `modality`
    ///
    /// # Errors
    ///
    /// Returns error if the series is empty, a slice's size differs from the
    /// first slice or the first slice lacks orientation or position
    pub fn assemble(
        series: &SliceSeries,
        modality: Modality,
    ) -> Result<Volume, VolumeAssemblerError> {
        Self::assemble_with_profile(series, &modality.spacing_profile())
    }

    /// Assemble a volume with an explicit spacing profile
    ///
    /// Every slice is rotated 90° counterclockwise and mirrored horizontally
    /// before it is stored at its index along the third axis, giving a volume
    /// of shape (columns, rows, slices). The affine still describes the
    /// slices in their acquired orientation; the pair is a fixed convention
    /// expected by the downstream viewer and must stay as is.
    pub fn assemble_with_profile(
        series: &SliceSeries,
        profile: &SpacingProfile,
    ) -> Result<Volume, VolumeAssemblerError> {
        let first = series.first().ok_or(VolumeAssemblerError::EmptySeries)?;
        Self::validate_dimensions(series)?;
        let affine = AffineBuilder::build(first, profile)?;

        let (rows, columns) = first.pixels.dim();
        let mut data = Array3::<i16>::zeros((columns, rows, series.len()));
        for (k, slice) in series.slices().iter().enumerate() {
            data.slice_mut(s![.., .., k])
                .assign(&volume_convention(slice.pixels.view()));
        }

        Ok(Volume::new(data, affine))
    }

    fn validate_dimensions(series: &SliceSeries) -> Result<(), VolumeAssemblerError> {
        let slices = series.slices();
        let expected = slices[0].pixels.dim();
        match slices
            .iter()
            .enumerate()
            .find(|(_, slice)| slice.pixels.dim() != expected)
        {
            Some((index, slice)) => Err(VolumeAssemblerError::InconsistentDimensions {
                index,
                expected,
                found: slice.pixels.dim(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{VolumeAssembler, VolumeAssemblerError};
    use crate::affine::{AffineTransform, GeometryError, SpacingProfile};
    use crate::enums::Modality;
    use crate::series::SliceSeries;
    use crate::slice::SliceRecord;
    use dicom::object::InMemDicomObject;
    use nalgebra::Vector3;
    use ndarray::{Array2, array, s};

    fn axial(slice_location: f64, pixels: Array2<i16>) -> SliceRecord {
        SliceRecord::new(
            InMemDicomObject::new_empty(),
            Some(vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
            Some(vec![0.0, 0.0, slice_location]),
            slice_location,
            pixels,
        )
    }

    #[test]
    fn test_synthetic_diagonal_affine() {
        let series = SliceSeries::from_records(
            (0..5)
                .map(|k| axial(k as f64 * 3.0, Array2::from_elem((4, 4), k as i16)))
                .collect(),
        );
        let volume =
            VolumeAssembler::assemble_with_profile(&series, &SpacingProfile::new(2.0, 2.0, 3.0))
                .unwrap();

        let mut expected = AffineTransform::identity();
        expected.matrix[(0, 0)] = 2.0;
        expected.matrix[(1, 1)] = 2.0;
        expected.matrix[(2, 2)] = 3.0;
        assert_eq!(volume.affine, expected);
        assert_eq!(volume.dim(), (4, 4, 5));
        for k in 0..5 {
            assert!(volume.data.slice(s![.., .., k]).iter().all(|&v| v == k as i16));
        }
    }

    #[test]
    fn test_slices_reoriented_and_ordered() {
        let series = SliceSeries::from_records(vec![
            axial(5.0, array![[7, 8, 9], [10, 11, 12]]),
            axial(-5.0, array![[1, 2, 3], [4, 5, 6]]),
        ]);
        let volume = VolumeAssembler::assemble(&series, Modality::CT).unwrap();

        assert_eq!(volume.dim(), (3, 2, 2));
        assert_eq!(volume.data.slice(s![.., .., 0]), array![[6, 3], [5, 2], [4, 1]]);
        assert_eq!(volume.data.slice(s![.., .., 1]), array![[12, 9], [11, 8], [10, 7]]);
        assert_eq!(volume.affine.translation(), Vector3::new(0.0, 0.0, -5.0));
        assert_eq!(volume.affine.column(2), Vector3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_empty_series() {
        let series = SliceSeries::from_records(Vec::new());
        let result = VolumeAssembler::assemble(&series, Modality::PET);
        assert!(matches!(result, Err(VolumeAssemblerError::EmptySeries)));
    }

    #[test]
    fn test_inconsistent_dimensions() {
        let series = SliceSeries::from_records(vec![
            axial(0.0, Array2::zeros((4, 4))),
            axial(1.0, Array2::zeros((4, 3))),
        ]);
        let result = VolumeAssembler::assemble(&series, Modality::CT);
        assert!(matches!(
            result,
            Err(VolumeAssemblerError::InconsistentDimensions {
                index: 1,
                expected: (4, 4),
                found: (4, 3),
            })
        ));
    }

    #[test]
    fn test_missing_geometry() {
        let mut slice = axial(0.0, Array2::zeros((2, 2)));
        slice.position = None;
        let series = SliceSeries::from_records(vec![slice]);
        let result = VolumeAssembler::assemble(&series, Modality::CT);
        assert!(matches!(
            result,
            Err(VolumeAssemblerError::Geometry(GeometryError::MissingField(
                "ImagePositionPatient"
            )))
        ));
    }
}
