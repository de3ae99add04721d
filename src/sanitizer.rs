use dicom::core::{DataElement, PrimitiveValue, Tag};
use dicom::object::InMemDicomObject;
use dicom_dictionary_std::tags;

/// Descriptive fields that identify the patient, institution or operator
pub const IDENTIFYING_TAGS: [Tag; 10] = [
    tags::ACCESSION_NUMBER,
    tags::PATIENT_ID,
    tags::PATIENT_NAME,
    tags::PATIENT_BIRTH_DATE,
    tags::PATIENT_AGE,
    tags::PATIENT_SEX,
    tags::INSTITUTION_NAME,
    tags::INSTITUTION_ADDRESS,
    tags::INSTITUTIONAL_DEPARTMENT_NAME,
    tags::OPERATORS_NAME,
];

pub struct MetadataSanitizer;

impl MetadataSanitizer {
    /// Blank every identifying field present on the object
    ///
    /// Absent fields are left absent and geometry is never touched. The
    /// element keeps its VR and only its value is emptied, so applying this
    /// twice gives the same object as applying it once.
    ///
    /// Returns the number of fields that were blanked.
    pub fn sanitize(object: &mut InMemDicomObject) -> usize {
        let mut blanked = 0;
        for tag in IDENTIFYING_TAGS {
            let Some(vr) = object.get(tag).map(|element| element.vr()) else {
                continue;
            };
            object.put(DataElement::new(tag, vr, PrimitiveValue::Empty));
            blanked += 1;
        }
        blanked
    }
}
