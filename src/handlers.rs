use crate::config::Config;
use crate::decoder_client::{DecodeOutcome, VinDecodeClient};
use crate::defects;
use crate::errors::AppError;
use crate::models::*;
use crate::resolver;
use crate::valuation;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// Holds only immutable configuration and the shared decode client;
/// every request allocates its own identity/condition/result state, so
/// concurrent valuations never contend.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, including the pricing policy.
    pub config: Config,
    /// Client for the external decode service (optional; without it the
    /// resolver relies on overrides and the internal pattern table).
    pub decode_client: Option<VinDecodeClient>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "autovalue-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/valuations
///
/// Runs the full valuation pipeline: identity resolution, defect lookup,
/// pricing, estimate band and trade-in offer. Total for every input except
/// an unresolved identity combined with `include_advisories`, which maps
/// to 422.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The valuation request body.
///
/// # Returns
///
/// * `Result<Json<ValuationResponse>, AppError>` - The valuation result or an error.
pub async fn create_valuation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValuationRequest>,
) -> Result<Json<ValuationResponse>, AppError> {
    tracing::info!(
        "POST /valuations - vin: {:?}, mileage: {} km",
        request.vin,
        request.condition.mileage_km
    );

    let response = valuation::run_valuation(
        state.decode_client.as_ref(),
        &state.config.pricing,
        &request,
    )
    .await?;

    tracing::info!(
        "Valuation {} complete: mean {:.0}, offer {:.0}",
        response.request_id,
        response.estimate.mean,
        response.offer.amount
    );

    Ok(Json(response))
}

/// GET /api/v1/identity/resolve
///
/// Runs identity resolution only (no pricing), for UI pre-fill and
/// debugging of the source-precedence policy.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `params` - Query parameters: `vin` and/or manual override fields.
///
/// # Returns
///
/// * `Result<Json<VehicleIdentity>, AppError>` - The canonical identity or an error.
pub async fn resolve_identity(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQueryParams>,
) -> Result<Json<VehicleIdentity>, AppError> {
    tracing::info!("GET /identity/resolve - params: {:?}", params);

    let overrides = ManualOverride {
        year: params.year,
        make: params.make.clone(),
        model: params.model.clone(),
        trim: params.trim.clone(),
    };

    // Validate at least one identity source is provided
    if params.vin.as_deref().map_or(true, |v| v.trim().is_empty()) && overrides.is_empty() {
        return Err(AppError::BadRequest(
            "At least one identity source required (vin or manual fields)".to_string(),
        ));
    }

    let decoded = match (&state.decode_client, params.vin.as_deref()) {
        (Some(client), Some(vin)) if crate::patterns::is_plausible_vin(vin.trim()) => {
            match client.decode_vin(&vin.trim().to_uppercase()).await {
                DecodeOutcome::Decoded(record) => Some(record),
                DecodeOutcome::Unavailable(reason) => {
                    tracing::warn!("Decode unavailable for resolve endpoint: {}", reason);
                    None
                }
            }
        }
        _ => None,
    };

    let identity = resolver::resolve_identity(
        &overrides,
        decoded.as_ref(),
        params.vin.as_deref(),
        state.config.pricing.reference_year,
    );

    Ok(Json(identity))
}

/// GET /api/v1/defects
///
/// Direct knowledge-base lookup by make/model/year. Returns the matching
/// advisories in declaration order plus the generic fallback text the
/// caller should render when the list is empty.
///
/// # Arguments
///
/// * `params` - Query parameters: `make`, `model`, `year` (all required).
///
/// # Returns
///
/// * `Result<Json<serde_json::Value>, AppError>` - Advisories or an error.
pub async fn lookup_defects(
    Query(params): Query<DefectQueryParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!(
        "GET /defects - {} {} {}",
        params.year,
        params.make,
        params.model
    );

    if params.make.trim().is_empty() || params.model.trim().is_empty() {
        return Err(AppError::BadRequest(
            "make and model are required".to_string(),
        ));
    }

    let identity = VehicleIdentity {
        year: params.year,
        make: params.make.clone(),
        model: params.model.clone(),
        trim: String::new(),
        body_class: None,
        engine: None,
        resolved: true,
    };

    let advisories = defects::lookup(&identity);

    Ok(Json(json!({
        "make": params.make,
        "model": params.model,
        "year": params.year,
        "advisories": advisories,
        "advisory_fallback": ADVISORY_FALLBACK_TEXT,
    })))
}
