use crate::converter::{Resolver, ResolverSet};
use crate::fhir::{Dosage, DosageGroup};
use crate::i18n::{dedup_locales, Locale};
use crate::translation::{
    assemble, partition, LocalizedResult, Problem, ProblemKind, ResponseEnvelope,
    TranslationOutcome,
};
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Dispatches every `(group, locale)` pair concurrently and gathers the
/// outcomes.
///
/// A unit of work never affects its siblings: errors, timeouts and panics
/// are each turned into a [`Problem`] for that locale only. Dropping the
/// future returned by [`Translator::translate`] abandons every unit still in
/// flight.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    render_timeout: Option<Duration>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound each resolver call; a slower call becomes a `Timeout` problem.
    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = Some(timeout);
        self
    }

    pub fn render_timeout(&self) -> Option<Duration> {
        self.render_timeout
    }

    /// Render every group into every distinct locale.
    ///
    /// # Arguments
    /// * `groups` - Dosage groups, rendered independently
    /// * `locales` - Requested locales; duplicates are dispatched once
    /// * `resolvers` - Resolver per locale; a missing entry is a problem, not a panic
    ///
    /// # Returns
    /// One `LocalizedResult` per group in input order, plus all problems
    pub async fn translate(
        &self,
        groups: &[DosageGroup],
        locales: &[Locale],
        resolvers: &ResolverSet,
    ) -> ResponseEnvelope {
        let locales = dedup_locales(locales);
        debug!(
            "Translating {} group(s) into {} locale(s)",
            groups.len(),
            locales.len()
        );

        let per_group = join_all(
            groups
                .iter()
                .map(|group| self.translate_group(group, &locales, resolvers)),
        )
        .await;

        let envelope = assemble(per_group);
        if !envelope.issues.is_empty() {
            warn!(
                "{} of {} translation(s) failed",
                envelope.issues.len(),
                groups.len() * locales.len()
            );
        }
        envelope
    }

    async fn translate_group(
        &self,
        group: &[Dosage],
        locales: &[Locale],
        resolvers: &ResolverSet,
    ) -> (LocalizedResult, Vec<Problem>) {
        let outcomes = join_all(
            locales
                .iter()
                .map(|locale| self.translate_unit(group, locale, resolvers.get(locale).cloned())),
        )
        .await;
        partition(outcomes)
    }

    async fn translate_unit(
        &self,
        group: &[Dosage],
        locale: &Locale,
        resolver: Option<Arc<dyn Resolver>>,
    ) -> TranslationOutcome {
        let Some(resolver) = resolver else {
            return failure(
                locale,
                ProblemKind::MissingResolver,
                format!("No resolver available for locale '{}'", locale),
            );
        };

        let render = AssertUnwindSafe(resolver.render(group)).catch_unwind();
        let result = match self.render_timeout {
            Some(limit) => match tokio::time::timeout(limit, render).await {
                Ok(result) => result,
                Err(_) => {
                    return failure(
                        locale,
                        ProblemKind::Timeout,
                        format!("Rendering timed out after {} ms", limit.as_millis()),
                    )
                }
            },
            None => render.await,
        };

        match result {
            Ok(Ok(text)) => TranslationOutcome::Success {
                language: locale.primary_language().to_string(),
                text,
            },
            Ok(Err(e)) => failure(locale, ProblemKind::RenderFailed, e.to_string()),
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                warn!("Resolver for {} panicked: {}", locale, detail);
                failure(locale, ProblemKind::Panicked, detail)
            }
        }
    }
}

/// Render with a default [`Translator`] (no per-call timeout).
pub async fn translate(
    groups: &[DosageGroup],
    locales: &[Locale],
    resolvers: &ResolverSet,
) -> ResponseEnvelope {
    Translator::default()
        .translate(groups, locales, resolvers)
        .await
}

fn failure(locale: &Locale, kind: ProblemKind, detail: String) -> TranslationOutcome {
    debug!("Translation into {} failed ({}): {}", locale, kind, detail);
    TranslationOutcome::Failure {
        locale: locale.clone(),
        problem: Problem::new(kind, detail, locale.clone()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("Resolver panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("Resolver panicked: {}", message)
    } else {
        "Resolver panicked".to_string()
    }
}
