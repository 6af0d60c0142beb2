use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::meta::MetaInfo;

/// Whether spectra hold centroided peaks or raw profile data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpectrumType {
    /// Not recorded
    #[default]
    Unknown,
    /// Centroided peaks
    Peaks,
    /// Profile data
    RawData,
}

/// Processing applied to the spectra of an experiment
///
/// Named processing operations live in [`ProcessingMethod::meta`] keyed as
/// `name#type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMethod {
    /// Whether isotope peaks were removed
    pub deisotoping: bool,
    /// Whether charge states were deconvoluted
    pub charge_deconvolution: bool,
    /// Centroided or profile data
    pub spectrum_type: SpectrumType,
    /// Processing operations and comments
    pub meta: MetaInfo,
}

/// Software that processed the data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Software {
    /// Software name
    pub name: String,
    /// Software version
    pub version: String,
    /// Kind of software (acquisition, conversion, processing, ...)
    pub software_type: String,
    /// When processing completed
    pub completion_time: Option<NaiveDateTime>,
}

/// The file an experiment was derived from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    /// File name or URI
    pub name: String,
    /// File type (e.g. "RAWData", "processedData")
    pub file_type: String,
    /// SHA-1 checksum of the source file
    pub sha1: Option<String>,
}

/// Person responsible for the acquisition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPerson {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Home page or other contact URI
    pub uri: String,
}

impl ContactPerson {
    /// Full name as "first last"
    pub fn name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            _ => self.last_name.clone(),
        }
    }
}
