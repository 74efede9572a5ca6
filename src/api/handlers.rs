use crate::api::dto::{
    CachesDto, DosageRequestDto, DosageResponseDto, HealthResponseDto, HealthStatus, ParamsDto,
    TimingRequestDto,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::fhir::{extract_dosages, extract_timings, DosageGroup, FhirVersion};
use crate::i18n::LanguageRegistry;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Json;
use tracing::info;

type JsonPayload<T> = Result<Json<T>, JsonRejection>;

pub async fn r4_dosage(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: JsonPayload<DosageRequestDto>,
) -> ApiResult<Json<DosageResponseDto>> {
    dosage_as_text(&state, FhirVersion::R4, &headers, payload).await
}

pub async fn r5_dosage(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: JsonPayload<DosageRequestDto>,
) -> ApiResult<Json<DosageResponseDto>> {
    dosage_as_text(&state, FhirVersion::R5, &headers, payload).await
}

pub async fn r4_timing(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: JsonPayload<TimingRequestDto>,
) -> ApiResult<Json<DosageResponseDto>> {
    timing_as_text(&state, FhirVersion::R4, &headers, payload).await
}

pub async fn r5_timing(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: JsonPayload<TimingRequestDto>,
) -> ApiResult<Json<DosageResponseDto>> {
    timing_as_text(&state, FhirVersion::R5, &headers, payload).await
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponseDto>) {
    let status = if LanguageRegistry::get().list_enabled().is_empty() {
        HealthStatus::Down
    } else {
        HealthStatus::Up
    };
    let code = match status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };

    let body = HealthResponseDto {
        status,
        caches: CachesDto {
            r4: state.cache(FhirVersion::R4).report(),
            r5: state.cache(FhirVersion::R5).report(),
        },
    };
    (code, Json(body))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound {
        detail: format!("No resource exists at {}", uri.path()),
    }
}

async fn dosage_as_text(
    state: &AppState,
    version: FhirVersion,
    headers: &HeaderMap,
    payload: JsonPayload<DosageRequestDto>,
) -> ApiResult<Json<DosageResponseDto>> {
    let Json(request) = payload?;
    let groups = extract_dosages(request.dosages.as_ref(), request.params.output_format)?;
    render(state, version, headers, &groups, &request.params).await
}

async fn timing_as_text(
    state: &AppState,
    version: FhirVersion,
    headers: &HeaderMap,
    payload: JsonPayload<TimingRequestDto>,
) -> ApiResult<Json<DosageResponseDto>> {
    let Json(request) = payload?;
    let groups = extract_timings(request.timings.as_ref(), request.params.output_format)?;
    render(state, version, headers, &groups, &request.params).await
}

async fn render(
    state: &AppState,
    version: FhirVersion,
    headers: &HeaderMap,
    groups: &[DosageGroup],
    params: &ParamsDto,
) -> ApiResult<Json<DosageResponseDto>> {
    let locales = params.resolve_locales(headers);
    let resolvers = state
        .cache(version)
        .resolvers_for_locales(&locales, params, state.factory.as_ref())?;

    let envelope = state.translator.translate(groups, &locales, &resolvers).await;
    info!(
        "[{}] Rendered {} group(s) in {} locale(s), {} issue(s)",
        version.as_str(),
        envelope.items.len(),
        resolvers.len(),
        envelope.issues.len()
    );

    Ok(Json(envelope.into()))
}
