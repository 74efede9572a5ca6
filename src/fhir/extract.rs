//! Validation and extraction of raw JSON payloads into dosage groups.

use crate::fhir::{Dosage, DosageGroup, OutputFormat, Timing};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Missing '{field}' array")]
    MissingArray { field: &'static str },

    #[error("Invalid {field}[{index}]: {source}")]
    InvalidItem {
        field: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a `dosages` array into groups.
///
/// `SUMMARY` merges every dosage into one group; `DETAILED` makes one group
/// per dosage.
pub fn extract_dosages(
    payload: Option<&Value>,
    format: OutputFormat,
) -> Result<Vec<DosageGroup>, ExtractError> {
    let dosages: Vec<Dosage> = parse_items(payload, "dosages")?;
    Ok(group(dosages, format))
}

/// Parse a `timings` array into groups, wrapping each timing into a dosage.
pub fn extract_timings(
    payload: Option<&Value>,
    format: OutputFormat,
) -> Result<Vec<DosageGroup>, ExtractError> {
    let timings: Vec<Timing> = parse_items(payload, "timings")?;
    let dosages = timings.into_iter().map(Dosage::from_timing).collect();
    Ok(group(dosages, format))
}

fn parse_items<T: serde::de::DeserializeOwned>(
    payload: Option<&Value>,
    field: &'static str,
) -> Result<Vec<T>, ExtractError> {
    let Some(Value::Array(items)) = payload else {
        return Err(ExtractError::MissingArray { field });
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::deserialize(item).map_err(|source| ExtractError::InvalidItem {
                field,
                index,
                source,
            })
        })
        .collect()
}

fn group(dosages: Vec<Dosage>, format: OutputFormat) -> Vec<DosageGroup> {
    match format {
        OutputFormat::Summary => vec![dosages],
        OutputFormat::Detailed => dosages.into_iter().map(|d| vec![d]).collect(),
    }
}
