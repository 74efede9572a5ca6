//! HTTP surface: routes, shared state and middleware.

pub mod dto;
pub mod error;
mod handlers;
pub mod trace;

use crate::cache::ResolverCache;
use crate::converter::{ConverterFactory, ParamsKey};
use crate::fhir::FhirVersion;
use crate::i18n::Locale;
use crate::translation::Translator;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// State shared by every handler. Each FHIR release owns its own cache.
#[derive(Clone)]
pub struct AppState {
    pub r4_cache: Arc<ResolverCache>,
    pub r5_cache: Arc<ResolverCache>,
    pub factory: Arc<dyn ConverterFactory>,
    pub translator: Translator,
    pub request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(factory: Arc<dyn ConverterFactory>) -> Self {
        Self {
            r4_cache: Arc::new(ResolverCache::new(FhirVersion::R4.as_str())),
            r5_cache: Arc::new(ResolverCache::new(FhirVersion::R5.as_str())),
            factory,
            translator: Translator::default(),
            request_timeout: None,
        }
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn cache(&self, version: FhirVersion) -> &ResolverCache {
        match version {
            FhirVersion::R4 => &self.r4_cache,
            FhirVersion::R5 => &self.r5_cache,
        }
    }

    /// Build default-params resolvers for `locales` in both caches.
    ///
    /// # Returns
    /// Total number of resolvers available afterwards
    pub fn preload(&self, locales: &[Locale]) -> usize {
        let params = ParamsKey::default();
        [FhirVersion::R4, FhirVersion::R5]
            .into_iter()
            .map(|version| {
                self.cache(version)
                    .preload(locales, &params, self.factory.as_ref())
            })
            .sum()
    }
}

/// Creates the service router.
pub fn router(state: AppState) -> Router {
    let router = Router::new()
        .route("/r4/dosage/asHumanReadableText", post(handlers::r4_dosage))
        .route("/r5/dosage/asHumanReadableText", post(handlers::r5_dosage))
        .route("/r4/timing/asHumanReadableText", post(handlers::r4_timing))
        .route("/r5/timing/asHumanReadableText", post(handlers::r5_timing))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found);

    let router = match state.request_timeout {
        Some(timeout) => router.layer(TimeoutLayer::new(timeout)),
        None => router,
    };

    router
        .layer(middleware::map_response(error::problem_responses))
        .layer(middleware::from_fn(trace::trace_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
