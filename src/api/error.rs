//! Request-level errors rendered as Belgif problem details
//! (`application/problem+json`).

use crate::converter::ConverterError;
use crate::fhir::ExtractError;
use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

pub const PROBLEM_JSON: &str = "application/problem+json";

const SCHEMA_VIOLATION: &str = "urn:problem-type:belgif:input-validation:schemaViolation";
const INVALID_INPUT: &str = "urn:problem-type:belgif:input-validation:invalidInput";

/// Problem types used by this service. All but `MethodNotAllowed` are
/// Belgif types; that one falls back to `about:blank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemType {
    BadRequest,
    ResourceNotFound,
    MethodNotAllowed,
    InternalServerError,
    ServiceUnavailable,
}

impl ProblemType {
    fn belgif_name(&self) -> Option<&'static str> {
        match self {
            ProblemType::BadRequest => Some("badRequest"),
            ProblemType::ResourceNotFound => Some("resourceNotFound"),
            ProblemType::MethodNotAllowed => None,
            ProblemType::InternalServerError => Some("internalServerError"),
            ProblemType::ServiceUnavailable => Some("serviceUnavailable"),
        }
    }

    pub fn urn(&self) -> String {
        match self.belgif_name() {
            Some(name) => format!("urn:problem-type:belgif:{}", name),
            None => "about:blank".to_string(),
        }
    }

    pub fn href(&self) -> Option<String> {
        self.belgif_name().map(|name| {
            format!(
                "https://www.belgif.be/specification/rest/api-guide/problems/{}.html",
                name
            )
        })
    }

    pub fn title(&self) -> &'static str {
        match self {
            ProblemType::BadRequest => "Bad Request",
            ProblemType::ResourceNotFound => "Resource Not Found",
            ProblemType::MethodNotAllowed => "Method Not Allowed",
            ProblemType::InternalServerError => "Internal Server Error",
            ProblemType::ServiceUnavailable => "Service Unavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProblemType::BadRequest => StatusCode::BAD_REQUEST,
            ProblemType::ResourceNotFound => StatusCode::NOT_FOUND,
            ProblemType::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProblemType::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ProblemType::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Where an invalid input was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputLocation {
    Body,
    Header,
    Path,
    Query,
}

/// One invalid input of a bad request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputIssue {
    #[serde(rename = "type")]
    pub issue_type: &'static str,

    pub title: &'static str,

    pub detail: String,

    #[serde(rename = "in")]
    pub location: InputLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl InputIssue {
    /// The body does not match the expected shape.
    pub fn schema_violation(detail: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            issue_type: SCHEMA_VIOLATION,
            title: "Input isn't valid with respect to schema",
            detail: detail.into(),
            location: InputLocation::Body,
            name: name.map(str::to_string),
        }
    }

    /// Well-formed input carrying an unsupported value.
    pub fn invalid_input(detail: impl Into<String>, name: &str) -> Self {
        Self {
            issue_type: INVALID_INPUT,
            title: "Invalid input",
            detail: detail.into(),
            location: InputLocation::Body,
            name: Some(name.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{detail}")]
    BadRequest {
        detail: String,
        issues: Vec<InputIssue>,
    },

    #[error("{detail}")]
    NotFound { detail: String },

    #[error("{detail}")]
    MethodNotAllowed { detail: String },

    #[error("{detail}")]
    Internal { detail: String },

    #[error("{detail}")]
    ServiceUnavailable { detail: String },
}

impl ApiError {
    pub fn problem_type(&self) -> ProblemType {
        match self {
            ApiError::BadRequest { .. } => ProblemType::BadRequest,
            ApiError::NotFound { .. } => ProblemType::ResourceNotFound,
            ApiError::MethodNotAllowed { .. } => ProblemType::MethodNotAllowed,
            ApiError::Internal { .. } => ProblemType::InternalServerError,
            ApiError::ServiceUnavailable { .. } => ProblemType::ServiceUnavailable,
        }
    }

    fn bad_request(issue: InputIssue) -> Self {
        ApiError::BadRequest {
            detail: issue.detail.clone(),
            issues: vec![issue],
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(InputIssue::schema_violation(rejection.body_text(), None))
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        let name = match &err {
            ExtractError::MissingArray { field } => field.to_string(),
            ExtractError::InvalidItem { field, index, .. } => format!("{}[{}]", field, index),
        };
        ApiError::bad_request(InputIssue::schema_violation(err.to_string(), Some(&name)))
    }
}

impl From<ConverterError> for ApiError {
    fn from(err: ConverterError) -> Self {
        if !err.is_client_error() {
            return ApiError::Internal {
                detail: err.to_string(),
            };
        }
        let name = match &err {
            ConverterError::UnsupportedLocale { .. } => "params.locales",
            _ => "params",
        };
        ApiError::bad_request(InputIssue::invalid_input(err.to_string(), name))
    }
}

/// Rewrite the bodiless error responses produced by the router itself
/// (wrong method or request timeout) as problem details.
/// Responses that already carry a body pass through untouched.
pub async fn problem_responses(response: Response) -> Response {
    if response.headers().contains_key(header::CONTENT_TYPE) {
        return response;
    }
    let error = match response.status() {
        StatusCode::METHOD_NOT_ALLOWED => ApiError::MethodNotAllowed {
            detail: "The resource does not support this method".to_string(),
        },
        StatusCode::REQUEST_TIMEOUT => ApiError::ServiceUnavailable {
            detail: "The request did not complete in time".to_string(),
        },
        _ => return response,
    };

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut problem = error.into_response();
    if let Some(allow) = allow {
        problem.headers_mut().insert(header::ALLOW, allow);
    }
    problem
}

/// Problem detail body.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemDetail {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub instance: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<InputIssue>,
}

impl ProblemDetail {
    pub fn new(problem_type: ProblemType, detail: impl Into<String>) -> Self {
        Self {
            problem_type: problem_type.urn(),
            title: problem_type.title(),
            status: problem_type.status().as_u16(),
            detail: detail.into(),
            href: problem_type.href(),
            instance: format!("urn:uuid:{}", Uuid::new_v4()),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            issues: Vec::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problem_type = self.problem_type();
        let status = problem_type.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        let mut problem = ProblemDetail::new(problem_type, self.to_string());
        if let ApiError::BadRequest { issues, .. } = self {
            problem.issues = issues;
        }

        let mut response = (status, axum::Json(problem)).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
