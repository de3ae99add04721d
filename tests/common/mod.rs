use dicom::core::{DataElement, PrimitiveValue, VR, dicom_value};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::{tags, uids};
use ndarray::Array2;
use std::path::Path;

/// Write an axial CT slice with identifying fields filled in
pub fn write_slice(path: &Path, slice_location: f64, pixels: &Array2<i16>) {
    let pixel_bytes: Vec<u8> = pixels.iter().flat_map(|v| v.to_le_bytes()).collect();
    write_pixels(path, slice_location, pixels.dim(), pixel_bytes, 1);
}

/// Write an axial slice stored as unsigned 16-bit samples
pub fn write_unsigned_slice(path: &Path, slice_location: f64, pixels: &Array2<u16>) {
    let pixel_bytes: Vec<u8> = pixels.iter().flat_map(|v| v.to_le_bytes()).collect();
    write_pixels(path, slice_location, pixels.dim(), pixel_bytes, 0);
}

fn write_pixels(
    path: &Path,
    slice_location: f64,
    (rows, columns): (usize, usize),
    pixel_bytes: Vec<u8>,
    pixel_representation: u16,
) {
    let location = slice_location.to_string();
    // one instance per location, bit pattern keeps signed locations apart
    let instance_uid = format!("1.2.826.0.1.3680043.2.1125.{}", slice_location.to_bits());

    let object = InMemDicomObject::from_element_iter([
        DataElement::new(tags::SOP_CLASS_UID, VR::UI, PrimitiveValue::from(uids::CT_IMAGE_STORAGE)),
        DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from(instance_uid.as_str())),
        DataElement::new(tags::MODALITY, VR::CS, PrimitiveValue::from("CT")),
        DataElement::new(tags::PATIENT_NAME, VR::PN, PrimitiveValue::from("Doe^John")),
        DataElement::new(tags::PATIENT_ID, VR::LO, PrimitiveValue::from("P1")),
        DataElement::new(tags::PATIENT_BIRTH_DATE, VR::DA, PrimitiveValue::from("19700101")),
        DataElement::new(tags::INSTITUTION_NAME, VR::LO, PrimitiveValue::from("General Hospital")),
        DataElement::new(
            tags::IMAGE_POSITION_PATIENT,
            VR::DS,
            dicom_value!(Strs, ["-250", "-250", location.as_str()]),
        ),
        DataElement::new(
            tags::IMAGE_ORIENTATION_PATIENT,
            VR::DS,
            dicom_value!(Strs, ["1", "0", "0", "0", "1", "0"]),
        ),
        DataElement::new(tags::SLICE_LOCATION, VR::DS, PrimitiveValue::from(location.as_str())),
        DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)),
        DataElement::new(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, PrimitiveValue::from("MONOCHROME2")),
        DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(rows as u16)),
        DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(columns as u16)),
        DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)),
        DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16)),
        DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16)),
        DataElement::new(
            tags::PIXEL_REPRESENTATION,
            VR::US,
            PrimitiveValue::from(pixel_representation),
        ),
        DataElement::new(tags::PIXEL_DATA, VR::OW, PrimitiveValue::from(pixel_bytes)),
    ]);

    object
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::CT_IMAGE_STORAGE)
                .media_storage_sop_instance_uid(instance_uid),
        )
        .expect("build file meta")
        .write_to_file(path)
        .expect("write DICOM slice");
}

/// Slice whose every pixel holds `value`, with a marker in the top-left corner
pub fn marked_slice(rows: usize, columns: usize, value: i16) -> Array2<i16> {
    let mut pixels = Array2::from_elem((rows, columns), value);
    pixels[[0, 0]] = -value;
    pixels
}

/// Unsigned slice whose every pixel holds `value`, with a bright top-left marker
pub fn marked_unsigned_slice(rows: usize, columns: usize, value: u16) -> Array2<u16> {
    let mut pixels = Array2::from_elem((rows, columns), value);
    pixels[[0, 0]] = 40000;
    pixels
}
