//! Supported asset listing.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// An asset with a bound model.
#[derive(Debug, Serialize)]
pub struct AssetInfo {
    pub name: &'static str,
    pub symbol: &'static str,
    pub ticker: &'static str,
    pub model: String,
}

/// Create the assets router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/assets", get(list_assets))
}

/// List assets that can be predicted.
pub async fn list_assets(State(state): State<AppState>) -> Json<Vec<AssetInfo>> {
    let assets = state
        .predictor
        .scorers()
        .assets()
        .into_iter()
        .map(|binding| AssetInfo {
            name: binding.asset.name,
            symbol: binding.asset.symbol,
            ticker: binding.asset.ticker,
            model: binding.scorer.kind().to_string(),
        })
        .collect();

    Json(assets)
}
