use crate::affine::SpacingProfile;

/// Imaging modalities with a fixed folder name and spacing convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    CT,
    PET,
}

impl Modality {
    /// Modalities in the order they are converted for each subject
    pub const ALL: [Modality; 2] = [Modality::CT, Modality::PET];

    /// Spacing override applied to every series of this modality.
    ///
    /// The values are asserted, never read from the slices: through-plane
    /// spacing in the source metadata is not trusted for these modalities.
    pub fn spacing_profile(&self) -> SpacingProfile {
        match self {
            Modality::CT => SpacingProfile::new(1.172, 1.172, 5.0),
            Modality::PET => SpacingProfile::new(4.0, 4.0, 4.0),
        }
    }

    /// Name of the subject subfolder holding this modality's slices
    pub fn folder_name(&self) -> &'static str {
        match self {
            Modality::CT => "CT",
            Modality::PET => "pet",
        }
    }

    /// File name of the assembled volume inside the subject's output folder
    pub fn output_file_name(&self) -> String {
        format!("{}.nii.gz", self.folder_name())
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Modality::CT => "CT",
            Modality::PET => "PET",
        };
        write!(f, "{name}")
    }
}
