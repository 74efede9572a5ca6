//! Internationalization (i18n) module.
//!
//! Everything language-related lives here: locale parsing, the registry of
//! languages the built-in converter can render, their rendering fragments,
//! and validation of rendered text.
//!
//! # Architecture
//!
//! - `language`: `Locale` tag type, de-duplication and `Accept-Language` parsing
//! - `registry`: single source of truth for supported languages
//! - `strings`: localized rendering fragments per language
//! - `validator`: sanity checks on rendered text
//!
//! # Example
//!
//! ```rust,ignore
//! use dosage_text_service::i18n::{Locale, LanguageRegistry};
//!
//! let locale = Locale::parse("fr-BE")?;
//! let config = LanguageRegistry::get().for_locale(&locale);
//! ```

mod language;
mod registry;
mod strings;
mod validator;

pub use language::{dedup_locales, parse_accept_language, Locale};
pub use registry::{default_preload_locales, LanguageConfig, LanguageRegistry};
pub use strings::{LanguageStrings, UnitNames};
pub use validator::{TextValidator, ValidationReport};
