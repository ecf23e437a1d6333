//! HTTP handlers for the REST API.
//!
//! Handlers validate input, delegate to the service layer and map results to
//! DTOs.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{DealResponse, DealsQuery, HealthResponse, PeakTimeResponse};
use super::error::AppError;
use super::state::AppState;
use crate::models::TimeOfDay;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Always 200; the `database` field reports repository reachability.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

/// GET /v1/deals?timeOfDay=3:00pm
///
/// Deals available at the given time of day.
pub async fn get_deals(
    State(state): State<AppState>,
    Query(query): Query<DealsQuery>,
) -> HandlerResult<Vec<DealResponse>> {
    let raw = query
        .time_of_day
        .ok_or(AppError::MissingParameter("timeOfDay"))?;
    if raw.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "The 'timeOfDay' parameter cannot be an empty string.".to_string(),
        ));
    }
    let time = TimeOfDay::parse(&raw)?;

    let deals = services::active_deals_at(state.repository.as_ref(), time).await?;
    Ok(Json(deals.into_iter().map(DealResponse::from).collect()))
}

/// GET /v1/peak-time
///
/// 200 with the peak window, or 204 when no deal contributes.
pub async fn get_peak_time(State(state): State<AppState>) -> Result<Response, AppError> {
    let window =
        services::calculate_peak_time_window(state.repository.as_ref(), state.slot_grid).await?;

    Ok(match window {
        Some(w) => Json(PeakTimeResponse::from(&w)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
