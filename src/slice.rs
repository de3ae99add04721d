use crate::sanitizer::MetadataSanitizer;

use dicom::core::value::ConvertValueError;
use dicom::object::{FileDicomObject, InMemDicomObject, open_file};
use dicom::pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use dicom_dictionary_std::tags;
use ndarray::{Array2, s};
use std::path::Path;
use thiserror::Error;

/// Reasons a file cannot be used as a slice
#[derive(Debug, Error)]
pub enum SliceError {
    #[error("DICOM error: {0}")]
    Read(#[from] dicom::object::ReadError),

    #[error("Pixel data error: {0}")]
    PixelData(#[from] dicom::pixeldata::Error),

    #[error("No pixel frames found")]
    NoFrames,

    #[error("Missing property: {0}")]
    MissingProperty(&'static str),

    #[error("Unable to convert {name}: {source}")]
    ConvertValue {
        name: &'static str,
        #[source]
        source: ConvertValueError,
    },
}

/// One 2D cross-section with the metadata needed to place it in a volume
#[derive(Debug, Clone)]
pub struct SliceRecord {
    /// Descriptive data set of the slice, sanitized on read
    pub header: InMemDicomObject,
    /// Image Orientation (Patient) as read, resolved by the affine builder
    pub orientation: Option<Vec<f64>>,
    /// Image Position (Patient) as read, resolved by the affine builder
    pub position: Option<Vec<f64>>,
    pub slice_location: f64,
    /// Stored pixel values with shape (rows, columns)
    pub pixels: Array2<i16>,
}

impl SliceRecord {
    pub fn new(
        header: InMemDicomObject,
        orientation: Option<Vec<f64>>,
        position: Option<Vec<f64>>,
        slice_location: f64,
        pixels: Array2<i16>,
    ) -> Self {
        Self {
            header,
            orientation,
            position,
            slice_location,
            pixels,
        }
    }

    /// Read and sanitize a slice from a DICOM file
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self, SliceError> {
        let mut dicom_object = open_file(path.as_ref())?;
        MetadataSanitizer::sanitize(&mut dicom_object);
        Self::from_dicom(dicom_object)
    }

    /// Build a slice from an already opened DICOM object
    ///
    /// A missing Slice Location or undecodable pixel data makes the object
    /// unusable. Missing geometry does not: that is only an error once the
    /// slice is asked to anchor a volume.
    pub fn from_dicom(dicom_object: FileDicomObject<InMemDicomObject>) -> Result<Self, SliceError> {
        let slice_location = dicom_object
            .get(tags::SLICE_LOCATION)
            .ok_or(SliceError::MissingProperty("SliceLocation"))?
            .to_float64()
            .map_err(|source| SliceError::ConvertValue {
                name: "SliceLocation",
                source,
            })?;

        let orientation = dicom_object
            .get(tags::IMAGE_ORIENTATION_PATIENT)
            .and_then(|element| element.to_multi_float64().ok());
        let position = dicom_object
            .get(tags::IMAGE_POSITION_PATIENT)
            .and_then(|element| element.to_multi_float64().ok());

        let pixels = Self::decode_pixels(&dicom_object)?;

        Ok(Self::new(
            dicom_object.into_inner(),
            orientation,
            position,
            slice_location,
            pixels,
        ))
    }

    fn decode_pixels(
        dicom_object: &FileDicomObject<InMemDicomObject>,
    ) -> Result<Array2<i16>, SliceError> {
        let unsigned = dicom_object
            .get(tags::PIXEL_REPRESENTATION)
            .and_then(|element| element.to_int::<u16>().ok())
            == Some(0);
        let pixel_data = dicom_object.decode_pixel_data()?;
        // Stored values are kept verbatim, without rescale slope/intercept
        let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
        let frames = if unsigned {
            pixel_data
                .to_ndarray_with_options::<u16>(&options)?
                .mapv(|value| value as i16)
        } else {
            pixel_data.to_ndarray_with_options::<i16>(&options)?
        };
        if frames.dim().0 == 0 {
            return Err(SliceError::NoFrames);
        }
        Ok(frames.slice_move(s![0, .., .., 0]))
    }

    pub fn rows(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn columns(&self) -> usize {
        self.pixels.ncols()
    }
}
