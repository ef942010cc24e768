//! Prediction endpoint.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, Result};
use crate::types::PredictionResult;
use crate::AppState;

/// Query parameters for the predict endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PredictQuery {
    /// Asset name or symbol, e.g. `Bitcoin` or `BTC`.
    pub asset: Option<String>,
    /// Target date `YYYY-MM-DD`; today when absent.
    pub date: Option<String>,
}

/// Create the prediction router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict", get(predict))
        .route("/api/predict", get(predict))
}

/// Predict the signal for an asset on a date.
pub async fn predict(
    State(state): State<AppState>,
    Query(query): Query<PredictQuery>,
) -> Result<Json<PredictionResult>> {
    let asset = query
        .asset
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'asset' query parameter".to_string()))?;

    let result = state.predictor.predict(&asset, query.date.as_deref()).await?;

    info!(
        "Prediction for {} on {} (requested {}): {} at {:.4} vs {:.4}",
        result.asset,
        result.date,
        result.requested_date,
        result.signal.label(),
        result.prediction,
        result.current_price
    );

    Ok(Json(result))
}
