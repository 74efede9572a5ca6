//! Rendered text validation.
//!
//! Checks the output of a resolver before it is handed back: unresolved
//! template placeholders are errors, cosmetic defects are warnings.

use regex::Regex;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Defects that make the text unusable
    pub errors: Vec<String>,

    /// Non-critical findings
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Validator for rendered dosage text.
pub struct TextValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_RUN_REGEX: OnceLock<Regex> = OnceLock::new();

impl TextValidator {
    /// Validate a rendered string.
    ///
    /// # Arguments
    /// * `rendered` - Text produced by a resolver
    /// * `separator` - Separator configured for the resolver
    pub fn validate(rendered: &str, separator: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        let placeholders = Self::extract_placeholders(rendered);
        if !placeholders.is_empty() {
            report
                .errors
                .push(format!("Unresolved placeholders: {:?}", placeholders));
        }

        if rendered.trim().is_empty() {
            report.warnings.push("Rendered text is empty".to_string());
        } else if rendered != rendered.trim() {
            report
                .warnings
                .push("Rendered text has leading or trailing whitespace".to_string());
        }

        let whitespace = WHITESPACE_RUN_REGEX
            .get_or_init(|| Regex::new(r"\S\s{2,}\S").expect("whitespace regex is valid"));
        if !separator.contains("  ") && whitespace.is_match(rendered) {
            report
                .warnings
                .push("Rendered text contains repeated whitespace".to_string());
        }

        let trimmed = separator.trim();
        if !trimmed.is_empty() && rendered.contains(&format!("{}{}", separator, separator)) {
            report
                .warnings
                .push(format!("Rendered text repeats separator '{}'", separator));
        }

        report
    }

    /// Extract template placeholders such as `{frequency}` left in the text
    fn extract_placeholders(text: &str) -> Vec<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| {
            Regex::new(
                r"\{(frequency|period|unit|low|high|offset|when|duration|count|days|times)\}",
            )
            .expect("placeholder regex is valid")
        });

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
