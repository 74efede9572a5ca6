//! Converter contract: resolvers that render dosage groups into text, and the
//! factory that builds them for a `(locale, params)` pair.
//!
//! The orchestration layer only sees the [`Resolver`] and
//! [`ConverterFactory`] traits. [`BuiltinConverter`] is the implementation
//! wired into the service.

mod builtin;

pub use builtin::{BuiltinConverter, BuiltinResolver, MAX_SEPARATOR_LEN};

use crate::fhir::Dosage;
use crate::i18n::Locale;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Element of a dosage that can be displayed, in the order requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayOrder {
    Text,
    PatientInstruction,
    DoseQuantity,
    #[serde(rename = "FREQUENCY_FREQUENCYMAX_PERIOD_PERIODMAX")]
    FrequencyPeriod,
    OffsetWhen,
    DayOfWeek,
    TimeOfDay,
    BoundsDuration,
    #[serde(rename = "COUNT_COUNTMAX")]
    Count,
    Code,
    AsNeeded,
}

impl DisplayOrder {
    /// Default display order when a request does not choose one.
    pub fn defaults() -> Vec<DisplayOrder> {
        vec![
            DisplayOrder::Text,
            DisplayOrder::PatientInstruction,
            DisplayOrder::DoseQuantity,
            DisplayOrder::FrequencyPeriod,
            DisplayOrder::OffsetWhen,
            DisplayOrder::DayOfWeek,
            DisplayOrder::TimeOfDay,
            DisplayOrder::BoundsDuration,
            DisplayOrder::Count,
            DisplayOrder::Code,
            DisplayOrder::AsNeeded,
        ]
    }
}

/// Default separator between displayed elements.
pub const DEFAULT_SEPARATOR: &str = " - ";

/// Formatting parameters that decide resolver identity.
///
/// Compared by value; the order of `display_orders` is significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamsKey {
    pub display_orders: Vec<DisplayOrder>,
    pub separator: String,
}

impl Default for ParamsKey {
    fn default() -> Self {
        Self {
            display_orders: DisplayOrder::defaults(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

/// Anything from which a [`ParamsKey`] can be derived.
///
/// Request parameters carry fields (locales, output format) that must not
/// influence which resolver is used; implementors only expose the subset
/// that does.
pub trait KeyedParams {
    fn params_key(&self) -> ParamsKey;
}

impl KeyedParams for ParamsKey {
    fn params_key(&self) -> ParamsKey {
        self.clone()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConverterError {
    #[error("Unsupported locale: '{locale}'")]
    UnsupportedLocale { locale: String },

    #[error("Invalid parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("Unable to render dosage: {detail}")]
    Unrenderable { detail: String },
}

impl ConverterError {
    /// Whether the caller's input, rather than the converter, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ConverterError::UnsupportedLocale { .. } | ConverterError::InvalidParams { .. }
        )
    }
}

/// Renderer bound to one locale and one set of formatting parameters.
///
/// Resolvers are immutable once built and shared across concurrent requests.
#[async_trait]
pub trait Resolver: Send + Sync {
    fn locale(&self) -> &Locale;

    /// Render an ordered group of dosages into one string.
    async fn render(&self, group: &[Dosage]) -> Result<String, ConverterError>;
}

/// Builds resolvers. Used by the resolver cache on a miss.
pub trait ConverterFactory: Send + Sync {
    fn create(
        &self,
        locale: &Locale,
        params: &ParamsKey,
    ) -> Result<Arc<dyn Resolver>, ConverterError>;
}

/// Resolvers for the locales of one request.
pub type ResolverSet = HashMap<Locale, Arc<dyn Resolver>>;
