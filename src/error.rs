use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

/// Who is at fault for a failed prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input or data that cannot support the request.
    Caller,
    /// Price provider or model failure.
    Upstream,
}

/// Prediction pipeline errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Asset not supported: {0}")]
    UnsupportedAsset(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("No price data available for {0}")]
    NoPriceData(String),

    #[error("Insufficient price history: need {required} bars, got {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("No feature rows available after processing")]
    EmptyFeatureTable,

    #[error("No data available on or before {0}")]
    NoDataBeforeDate(NaiveDate),

    #[error("Scoring failed: {0}")]
    ScoringFailure(String),

    #[error("Price provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Malformed price data: {0}")]
    MalformedPriceData(String),
}

impl PredictionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            PredictionError::UnsupportedAsset(_)
            | PredictionError::InvalidDate(_)
            | PredictionError::NoPriceData(_)
            | PredictionError::InsufficientHistory { .. }
            | PredictionError::EmptyFeatureTable
            | PredictionError::NoDataBeforeDate(_) => ErrorClass::Caller,
            PredictionError::ScoringFailure(_)
            | PredictionError::ProviderUnavailable(_)
            | PredictionError::MalformedPriceData(_) => ErrorClass::Upstream,
        }
    }
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) | AppError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Prediction(e) => match e.class() {
                ErrorClass::Caller => StatusCode::BAD_REQUEST,
                ErrorClass::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::BadRequest(msg) | AppError::Internal(msg) => msg.clone(),
            AppError::Prediction(e) => e.to_string(),
            AppError::Anyhow(e) => e.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
