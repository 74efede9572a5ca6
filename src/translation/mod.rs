//! Translation orchestration.
//!
//! Fans dosage groups out across locales, captures each `(group, locale)`
//! outcome independently, and folds the outcomes into a response envelope.
//!
//! # Architecture
//!
//! - `orchestrator`: concurrent dispatch into resolvers, one isolated unit per pair
//! - `partition`: splits one group's outcomes into translations and problems
//! - `assemble`: builds the envelope in input group order

mod assemble;
mod orchestrator;
mod partition;

pub use assemble::assemble;
pub use orchestrator::{translate, Translator};
pub use partition::partition;

use crate::i18n::Locale;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Result of rendering one group for one locale.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    Success { language: String, text: String },
    Failure { locale: Locale, problem: Problem },
}

impl TranslationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TranslationOutcome::Success { .. })
    }
}

/// Translations of one group, keyed by primary language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizedResult {
    pub translations: BTreeMap<String, String>,
}

impl LocalizedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a translation, returning the one it replaced.
    pub fn insert(&mut self, language: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.translations.insert(language.into(), text.into())
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProblemKind {
    /// The resolver returned an error
    RenderFailed,
    /// The resolver did not answer within the render timeout
    Timeout,
    /// No resolver was supplied for the locale
    MissingResolver,
    /// The resolver panicked
    Panicked,
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProblemKind::RenderFailed => "render failed",
            ProblemKind::Timeout => "timeout",
            ProblemKind::MissingResolver => "missing resolver",
            ProblemKind::Panicked => "panicked",
        };
        f.write_str(name)
    }
}

/// A recoverable failure for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub kind: ProblemKind,
    pub detail: String,
    pub locale: Locale,
}

impl Problem {
    pub fn new(kind: ProblemKind, detail: impl Into<String>, locale: Locale) -> Self {
        Self {
            kind,
            detail: detail.into(),
            locale,
        }
    }
}

/// One [`LocalizedResult`] per input group, in input order, plus every
/// problem collected along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope {
    pub items: Vec<LocalizedResult>,
    pub issues: Vec<Problem>,
}

impl ResponseEnvelope {
    pub fn is_fully_successful(&self) -> bool {
        self.issues.is_empty()
    }
}
