//! FHIR dosage payloads: data model and extraction into dosage groups.

mod extract;
mod model;

pub use extract::{extract_dosages, extract_timings, ExtractError};
pub use model::{CodeableConcept, DoseAndRate, Dosage, Quantity, Timing, TimingRepeat};

use serde::{Deserialize, Serialize};

/// Ordered list of dosages rendered together into one string.
pub type DosageGroup = Vec<Dosage>;

/// FHIR release a request targets. Each release owns its own resolver cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FhirVersion {
    R4,
    R5,
}

impl FhirVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            FhirVersion::R4 => "r4",
            FhirVersion::R5 => "r5",
        }
    }
}

/// How dosages are grouped before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    /// All dosages rendered into a single string
    #[default]
    Summary,
    /// One string per dosage
    Detailed,
}
