//! Locale type: validated, normalized language tag.
//!
//! A `Locale` drives both the rendering language of a resolver and its cache
//! identity. Only the primary language subtag is used as the key of the
//! translation output maps.

use anyhow::{bail, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| {
        Regex::new(r"^([A-Za-z]{2,3})(?:[-_]([A-Za-z]{4}))?(?:[-_]([A-Za-z]{2}|[0-9]{3}))?$")
            .expect("locale tag regex is valid")
    })
}

/// A validated language tag (`language[-Script][-REGION]`).
///
/// Equality and hashing use the normalized form, so `EN_us` and `en-US`
/// are the same locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl Locale {
    /// Parse a language tag such as `en`, `fr-BE` or `zh-Hant-TW`.
    ///
    /// # Returns
    /// * `Ok(Locale)` with normalized casing
    /// * `Err` if the tag is empty or not a supported tag shape
    pub fn parse(tag: &str) -> Result<Locale> {
        let tag = tag.trim();
        if tag.is_empty() {
            bail!("Empty locale tag");
        }

        let Some(captures) = tag_regex().captures(tag) else {
            bail!("Invalid locale tag: '{}'", tag);
        };

        let language = captures[1].to_ascii_lowercase();
        let script = captures.get(2).map(|m| {
            let raw = m.as_str();
            let mut normalized = raw[..1].to_ascii_uppercase();
            normalized.push_str(&raw[1..].to_ascii_lowercase());
            normalized
        });
        let region = captures.get(3).map(|m| m.as_str().to_ascii_uppercase());

        Ok(Locale {
            language,
            script,
            region,
        })
    }

    /// English, the fallback locale when a request names none.
    pub fn english() -> Locale {
        Locale {
            language: "en".to_string(),
            script: None,
            region: None,
        }
    }

    /// Primary language subtag (e.g. "en" for `en-US`).
    pub fn primary_language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(script) = &self.script {
            write!(f, "-{}", script)?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{}", region)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Locale {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Locale::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}

/// Remove repeated locales, keeping the first occurrence of each.
pub fn dedup_locales(locales: &[Locale]) -> Vec<Locale> {
    let mut seen: HashSet<&Locale> = HashSet::with_capacity(locales.len());
    locales
        .iter()
        .filter(|locale| seen.insert(*locale))
        .cloned()
        .collect()
}

/// Parse an `Accept-Language` header into locales.
///
/// Quality weights are ignored and order is preserved. Entries that are
/// not valid tags (including `*`) are skipped. A missing or blank header, or
/// one with no usable entry, yields English.
pub fn parse_accept_language(header: Option<&str>) -> Vec<Locale> {
    let Some(header) = header.filter(|h| !h.trim().is_empty()) else {
        return vec![Locale::english()];
    };

    let parsed: Vec<Locale> = header
        .split(',')
        .filter_map(|entry| entry.split(';').next())
        .filter_map(|tag| Locale::parse(tag).ok())
        .collect();

    let locales = dedup_locales(&parsed);
    if locales.is_empty() {
        vec![Locale::english()]
    } else {
        locales
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== parse Tests ====================

    #[test]
    fn test_parse_language_only() {
        let locale = Locale::parse("fr").expect("Should parse");
        assert_eq!(locale.primary_language(), "fr");
        assert_eq!(locale.region(), None);
        assert_eq!(locale.to_string(), "fr");
    }

    #[test]
    fn test_parse_normalizes_case() {
        let locale = Locale::parse("EN_us").expect("Should parse");
        assert_eq!(locale.to_string(), "en-US");
        assert_eq!(locale, Locale::parse("en-US").unwrap());
    }

    #[test]
    fn test_parse_with_script_and_region() {
        let locale = Locale::parse("zh-hant-tw").expect("Should parse");
        assert_eq!(locale.to_string(), "zh-Hant-TW");
        assert_eq!(locale.primary_language(), "zh");
    }

    #[test]
    fn test_parse_numeric_region() {
        let locale = Locale::parse("es-419").expect("Should parse");
        assert_eq!(locale.region(), Some("419"));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("   ").is_err());
        assert!(Locale::parse("english").is_err());
        assert!(Locale::parse("en-").is_err());
        assert!(Locale::parse("*").is_err());
    }

    #[test]
    fn test_parse_error_message() {
        let err = Locale::parse("not a tag").unwrap_err();
        assert!(err.to_string().contains("Invalid locale tag"));
    }

    #[test]
    fn test_english_constant() {
        assert_eq!(Locale::english(), Locale::parse("en").unwrap());
    }

    // ==================== serde Tests ====================

    #[test]
    fn test_deserialize_from_string() {
        let locales: Vec<Locale> = serde_json::from_str(r#"["en", "nl-be"]"#).unwrap();
        assert_eq!(locales[1].to_string(), "nl-BE");
    }

    #[test]
    fn test_deserialize_rejects_invalid_tag() {
        let result: Result<Vec<Locale>, _> = serde_json::from_str(r#"["en", "??"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_as_tag() {
        let json = serde_json::to_string(&Locale::parse("de-at").unwrap()).unwrap();
        assert_eq!(json, r#""de-AT""#);
    }

    // ==================== dedup Tests ====================

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let input: Vec<Locale> = ["fr", "en", "FR", "nl", "en"]
            .iter()
            .map(|t| Locale::parse(t).unwrap())
            .collect();
        let distinct = dedup_locales(&input);
        let tags: Vec<String> = distinct.iter().map(|l| l.to_string()).collect();
        assert_eq!(tags, vec!["fr", "en", "nl"]);
    }

    #[test]
    fn test_dedup_long_repetitive_list() {
        let pool: Vec<Locale> = ["de", "nl-BE", "en", "fr-FR"]
            .iter()
            .map(|t| Locale::parse(t).unwrap())
            .collect();
        let input: Vec<Locale> = pool.iter().cycle().take(20_000).cloned().collect();

        assert_eq!(dedup_locales(&input), pool);
    }

    // ==================== Accept-Language Tests ====================

    #[test]
    fn test_accept_language_missing_header() {
        assert_eq!(parse_accept_language(None), vec![Locale::english()]);
        assert_eq!(parse_accept_language(Some("  ")), vec![Locale::english()]);
    }

    #[test]
    fn test_accept_language_ignores_weights() {
        let locales = parse_accept_language(Some("fr-BE,fr;q=0.9, nl;q=0.8"));
        let tags: Vec<String> = locales.iter().map(|l| l.to_string()).collect();
        assert_eq!(tags, vec!["fr-BE", "fr", "nl"]);
    }

    #[test]
    fn test_accept_language_dedups_and_skips_wildcard() {
        let locales = parse_accept_language(Some("de, *;q=0.5, de"));
        assert_eq!(locales, vec![Locale::parse("de").unwrap()]);
    }

    #[test]
    fn test_accept_language_only_garbage_falls_back() {
        assert_eq!(parse_accept_language(Some("*")), vec![Locale::english()]);
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_parse_display_roundtrip_is_stable(
            lang in "[a-zA-Z]{2,3}",
            region in proptest::option::of("[a-zA-Z]{2}"),
        ) {
            let tag = match &region {
                Some(r) => format!("{}-{}", lang, r),
                None => lang.clone(),
            };
            let locale = Locale::parse(&tag).unwrap();
            let reparsed = Locale::parse(&locale.to_string()).unwrap();
            prop_assert_eq!(&locale, &reparsed);
            prop_assert_eq!(locale.primary_language(), lang.to_ascii_lowercase());
        }

        #[test]
        fn prop_dedup_has_no_duplicates(tags in proptest::collection::vec("(en|fr|nl|de)(-(BE|FR|US))?", 0..12)) {
            let locales: Vec<Locale> = tags.iter().map(|t| Locale::parse(t).unwrap()).collect();
            let distinct = dedup_locales(&locales);
            for (i, a) in distinct.iter().enumerate() {
                prop_assert!(!distinct[i + 1..].contains(a));
            }
            for locale in &locales {
                prop_assert!(distinct.contains(locale));
            }
        }
    }
}
