//! Wire types of the HTTP API.

use crate::api::error::ProblemType;
use crate::cache::CacheReport;
use crate::converter::{DisplayOrder, KeyedParams, ParamsKey, DEFAULT_SEPARATOR};
use crate::fhir::OutputFormat;
use crate::i18n::{parse_accept_language, LanguageRegistry, Locale};
use crate::translation::{LocalizedResult, Problem, ResponseEnvelope};
use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rendering parameters of a request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamsDto {
    /// Requested locales; `Accept-Language` is used when absent
    pub locales: Option<Vec<Locale>>,
    pub display_orders: Vec<DisplayOrder>,
    pub display_separator: String,
    pub output_format: OutputFormat,
}

impl Default for ParamsDto {
    fn default() -> Self {
        Self {
            locales: None,
            display_orders: DisplayOrder::defaults(),
            display_separator: DEFAULT_SEPARATOR.to_string(),
            output_format: OutputFormat::default(),
        }
    }
}

impl ParamsDto {
    /// Locales to render: explicit ones first, then the `Accept-Language`
    /// header, then English.
    ///
    /// Explicit locales are taken as given, so an unsupported one fails the
    /// request. Header locales without a registered language are skipped.
    pub fn resolve_locales(&self, headers: &HeaderMap) -> Vec<Locale> {
        if let Some(locales) = &self.locales {
            return locales.clone();
        }

        let registry = LanguageRegistry::get();
        let supported: Vec<Locale> = parse_accept_language(
            headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|value| value.to_str().ok()),
        )
        .into_iter()
        .filter(|locale| registry.for_locale(locale).is_some())
        .collect();

        if supported.is_empty() {
            vec![Locale::english()]
        } else {
            supported
        }
    }
}

impl KeyedParams for ParamsDto {
    fn params_key(&self) -> ParamsKey {
        ParamsKey {
            display_orders: self.display_orders.clone(),
            separator: self.display_separator.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DosageRequestDto {
    #[serde(default)]
    pub dosages: Option<Value>,
    #[serde(default)]
    pub params: ParamsDto,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimingRequestDto {
    #[serde(default)]
    pub timings: Option<Value>,
    #[serde(default)]
    pub params: ParamsDto,
}

/// A per-locale failure, as a problem detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueDto {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
    pub locale: String,
}

impl From<Problem> for IssueDto {
    fn from(problem: Problem) -> Self {
        let kind = ProblemType::InternalServerError;
        Self {
            problem_type: kind.urn(),
            title: kind.title(),
            status: kind.status().as_u16(),
            detail: problem.detail,
            locale: problem.locale.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DosageResponseDto {
    pub items: Vec<LocalizedResult>,
    pub issues: Vec<IssueDto>,
}

impl From<ResponseEnvelope> for DosageResponseDto {
    fn from(envelope: ResponseEnvelope) -> Self {
        Self {
            items: envelope.items,
            issues: envelope.issues.into_iter().map(IssueDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
pub struct CachesDto {
    pub r4: CacheReport,
    pub r5: CacheReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponseDto {
    pub status: HealthStatus,
    pub caches: CachesDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::ProblemKind;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn locale(tag: &str) -> Locale {
        Locale::parse(tag).unwrap()
    }

    // ==================== ParamsDto Tests ====================

    #[test]
    fn test_params_defaults() {
        let params: ParamsDto = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params, ParamsDto::default());
        assert_eq!(params.params_key(), ParamsKey::default());
    }

    #[test]
    fn test_params_parse_camel_case() {
        let params: ParamsDto = serde_json::from_value(json!({
            "locales": ["fr-BE", "nl"],
            "displayOrders": ["BOUNDS_DURATION", "TEXT"],
            "displaySeparator": " | ",
            "outputFormat": "DETAILED"
        }))
        .unwrap();

        assert_eq!(params.locales, Some(vec![locale("fr-BE"), locale("nl")]));
        assert_eq!(
            params.display_orders,
            vec![DisplayOrder::BoundsDuration, DisplayOrder::Text]
        );
        assert_eq!(params.display_separator, " | ");
        assert_eq!(params.output_format, OutputFormat::Detailed);
    }

    #[test]
    fn test_params_reject_invalid_locale() {
        let result = serde_json::from_value::<ParamsDto>(json!({ "locales": ["not a locale"] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_params_key_ignores_locales_and_format() {
        let a = ParamsDto {
            locales: Some(vec![locale("en")]),
            ..ParamsDto::default()
        };
        let b = ParamsDto {
            locales: Some(vec![locale("de")]),
            output_format: OutputFormat::Detailed,
            ..ParamsDto::default()
        };
        assert_eq!(a.params_key(), b.params_key());
    }

    #[test]
    fn test_resolve_locales_prefers_explicit() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("de"));
        let params = ParamsDto {
            locales: Some(vec![locale("fr")]),
            ..ParamsDto::default()
        };
        assert_eq!(params.resolve_locales(&headers), vec![locale("fr")]);
    }

    #[test]
    fn test_resolve_locales_falls_back_to_header_then_english() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("nl-BE,fr;q=0.8"),
        );
        let params = ParamsDto::default();
        assert_eq!(
            params.resolve_locales(&headers),
            vec![locale("nl-BE"), locale("fr")]
        );
        assert_eq!(params.resolve_locales(&HeaderMap::new()), vec![Locale::english()]);
    }

    #[test]
    fn test_resolve_locales_skips_unsupported_header_languages() {
        let params = ParamsDto::default();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("ja,fr-BE;q=0.9,en;q=0.8"),
        );
        assert_eq!(
            params.resolve_locales(&headers),
            vec![locale("fr-BE"), locale("en")]
        );

        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("ja,zh"));
        assert_eq!(params.resolve_locales(&headers), vec![Locale::english()]);
    }

    #[test]
    fn test_resolve_locales_keeps_unsupported_explicit_locale() {
        let params = ParamsDto {
            locales: Some(vec![locale("ja")]),
            ..ParamsDto::default()
        };
        assert_eq!(params.resolve_locales(&HeaderMap::new()), vec![locale("ja")]);
    }

    // ==================== Response Tests ====================

    #[test]
    fn test_response_serialization() {
        let mut item = LocalizedResult::new();
        item.insert("en", "2 times every day");
        let envelope = ResponseEnvelope {
            items: vec![item],
            issues: vec![Problem::new(ProblemKind::RenderFailed, "broken", locale("de"))],
        };

        let json = serde_json::to_value(DosageResponseDto::from(envelope)).unwrap();
        assert_eq!(json["items"][0]["translations"]["en"], "2 times every day");
        assert_eq!(json["issues"][0]["type"], "urn:problem-type:belgif:internalServerError");
        assert_eq!(json["issues"][0]["title"], "Internal Server Error");
        assert_eq!(json["issues"][0]["status"], 500);
        assert_eq!(json["issues"][0]["detail"], "broken");
        assert_eq!(json["issues"][0]["locale"], "de");
    }

    #[test]
    fn test_health_status_wire_name() {
        assert_eq!(serde_json::to_string(&HealthStatus::Up).unwrap(), r#""UP""#);
        assert_eq!(serde_json::to_string(&HealthStatus::Down).unwrap(), r#""DOWN""#);
    }
}
