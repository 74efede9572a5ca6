//! Language registry: single source of truth for the languages the built-in
//! converter can render.
//!
//! The registry is a process-wide singleton initialised once through
//! `OnceLock` and immutable afterwards.

use crate::i18n::strings::{DUTCH_STRINGS, ENGLISH_STRINGS, FRENCH_STRINGS, GERMAN_STRINGS};
use crate::i18n::{LanguageStrings, Locale};
use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "fr", "nl")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Dutch")
    pub name: &'static str,

    /// Native name of the language (e.g., "Français", "Nederlands")
    pub native_name: &'static str,

    /// Whether resolvers may be built for this language
    pub enabled: bool,

    /// Rendering fragments
    pub strings: &'static LanguageStrings,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its ISO 639-1 code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages
            .iter()
            .find(|lang| lang.code.eq_ignore_ascii_case(code))
    }

    /// Get the enabled configuration matching a locale's primary language.
    ///
    /// Regional variants share their language's configuration, so `fr-BE`
    /// and `fr-FR` resolve to the same entry.
    pub fn for_locale(&self, locale: &Locale) -> Option<&LanguageConfig> {
        self.get_by_code(locale.primary_language())
            .filter(|lang| lang.enabled)
    }

    /// Get all enabled languages.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Check if a language code is supported and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| lang.enabled)
            .unwrap_or(false)
    }
}

/// Locales whose resolvers are built eagerly at startup.
pub fn default_preload_locales() -> Vec<Locale> {
    ["en", "fr", "de", "nl"]
        .iter()
        .filter_map(|code| Locale::parse(code).ok())
        .collect()
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            enabled: true,
            strings: &ENGLISH_STRINGS,
        },
        LanguageConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            enabled: true,
            strings: &FRENCH_STRINGS,
        },
        LanguageConfig {
            code: "nl",
            name: "Dutch",
            native_name: "Nederlands",
            enabled: true,
            strings: &DUTCH_STRINGS,
        },
        LanguageConfig {
            code: "de",
            name: "German",
            native_name: "Deutsch",
            enabled: true,
            strings: &GERMAN_STRINGS,
        },
    ]
}
