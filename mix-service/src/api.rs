//! HTTP surface for the generation-mix analytics.
//!
//! - `GET /mix/three-day-averages`
//! - `GET /mix/optimal-charging-window?windowHours=N` (N in 1..=6)

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use mix_client::domain::{DailyMix, OptimalChargingWindow};
use serde::{Deserialize, Serialize};

use crate::analytics::{MixError, MixService, WindowHours};

pub fn router(service: MixService) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/mix/three-day-averages", get(three_day_averages))
        .route("/mix/optimal-charging-window", get(optimal_charging_window))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    #[serde(rename = "windowHours")]
    pub window_hours: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(&'static str),
    Unavailable(String),
}

impl From<MixError> for ApiError {
    fn from(e: MixError) -> Self {
        match e {
            MixError::WindowOutOfRange(_) => Self::BadRequest("Window must be between 1 and 6 hours.".to_string()),
            MixError::DataUnavailable(_) => Self::Unavailable(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

async fn three_day_averages(State(service): State<MixService>) -> Result<Json<Vec<DailyMix>>, ApiError> {
    metrics::counter!("mix_requests_total", "endpoint" => "three_day_averages").increment(1);

    let days = service.three_day_averages().await.map_err(|e| {
        tracing::error!(error = %e, "three-day averages failed");
        ApiError::from(e)
    })?;
    Ok(Json(days))
}

async fn optimal_charging_window(
    State(service): State<MixService>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<OptimalChargingWindow>, ApiError> {
    metrics::counter!("mix_requests_total", "endpoint" => "optimal_charging_window").increment(1);

    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    // Rejected here so an invalid request never reaches the upstream.
    let hours = WindowHours::try_from(query.window_hours)?;

    match service.optimal_charging_window(i64::from(hours.get())).await {
        Ok(Some(window)) => Ok(Json(window)),
        Ok(None) => Err(ApiError::NotFound("No suitable window found.")),
        Err(e) => {
            tracing::error!(error = %e, window_hours = hours.get(), "charging window search failed");
            Err(e.into())
        }
    }
}
