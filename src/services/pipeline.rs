//! End-to-end prediction for one asset and date.

use crate::error::PredictionError;
use crate::services::features::FeatureBuilder;
use crate::services::scorer::ScorerRegistry;
use crate::services::{resolver, signal};
use crate::sources::PriceProvider;
use crate::types::{Asset, GraphData, ModelOutput, PredictionResult, PriceSeries, ResolvedSelection};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Request date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tunables for the prediction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Calendar days of history requested before the target date.
    pub lookback_days: i64,
    /// Upper bound on one price fetch.
    pub fetch_timeout: Duration,
    /// Number of bars returned for charting.
    pub history_window: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            lookback_days: 500,
            fetch_timeout: Duration::from_secs(15),
            history_window: 90,
        }
    }
}

/// Parse a `YYYY-MM-DD` request date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, PredictionError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| PredictionError::InvalidDate(raw.to_string()))
}

/// Prediction pipeline: fetch, featurize, resolve, score, assemble.
#[derive(Clone)]
pub struct PredictionService {
    provider: Arc<dyn PriceProvider>,
    scorers: Arc<ScorerRegistry>,
    builder: Arc<FeatureBuilder>,
    settings: PipelineSettings,
}

impl PredictionService {
    pub fn new(
        provider: Arc<dyn PriceProvider>,
        scorers: Arc<ScorerRegistry>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            provider,
            scorers,
            builder: Arc::new(FeatureBuilder::new()),
            settings,
        }
    }

    pub fn scorers(&self) -> &ScorerRegistry {
        &self.scorers
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Predict for `asset` on `date` (`YYYY-MM-DD`), defaulting to today (UTC).
    pub async fn predict(
        &self,
        asset: &str,
        date: Option<&str>,
    ) -> Result<PredictionResult, PredictionError> {
        // Unknown assets fail before the date is even looked at.
        if self.scorers.get(asset).is_none() {
            return Err(PredictionError::UnsupportedAsset(asset.to_string()));
        }

        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => parse_date(raw)?,
            None => Utc::now().date_naive(),
        };

        self.predict_on(asset, date).await
    }

    /// Predict for `asset` as of `date`, using only data dated on or before it.
    pub async fn predict_on(
        &self,
        asset: &str,
        date: NaiveDate,
    ) -> Result<PredictionResult, PredictionError> {
        let binding = self
            .scorers
            .get(asset)
            .ok_or_else(|| PredictionError::UnsupportedAsset(asset.to_string()))?;

        let series = self.fetch_history(binding.asset, date).await?;
        if series.is_empty() {
            return Err(PredictionError::NoPriceData(binding.asset.ticker.to_string()));
        }

        let table = self.builder.build(&series)?;
        let selection = resolver::resolve(&table, date)?;

        let features = selection.row.values();
        let output = binding.scorer.predict(features).map_err(|e| {
            warn!("{} model failed on {}: {:#}", binding.asset.name, selection.effective_date, e);
            PredictionError::ScoringFailure(e.to_string())
        })?;

        if !output.value.is_finite() {
            return Err(PredictionError::ScoringFailure(format!(
                "{} model returned a non-finite prediction",
                binding.asset.name
            )));
        }

        Ok(self.assemble(binding.asset, &selection, &output, &series))
    }

    async fn fetch_history(
        &self,
        asset: &Asset,
        date: NaiveDate,
    ) -> Result<PriceSeries, PredictionError> {
        // Dates near chrono's range limits have no representable window.
        let start = ChronoDuration::try_days(self.settings.lookback_days)
            .and_then(|lookback| date.checked_sub_signed(lookback))
            .ok_or_else(|| PredictionError::InvalidDate(date.to_string()))?;
        debug!(
            "Fetching {} history {}..={} from {}",
            asset.ticker,
            start,
            date,
            self.provider.source()
        );

        let fetched = tokio::time::timeout(
            self.settings.fetch_timeout,
            self.provider.fetch(asset, start, date),
        )
        .await;

        match fetched {
            Ok(Ok(series)) => {
                debug!("Fetched {} bars for {}", series.len(), asset.ticker);
                Ok(series)
            }
            Ok(Err(e)) => {
                warn!("Price fetch for {} failed: {}", asset.ticker, e);
                Err(e)
            }
            Err(_) => {
                warn!("Price fetch for {} timed out", asset.ticker);
                Err(PredictionError::ProviderUnavailable(format!(
                    "fetch for {} timed out after {:?}",
                    asset.ticker, self.settings.fetch_timeout
                )))
            }
        }
    }

    fn assemble(
        &self,
        asset: &Asset,
        selection: &ResolvedSelection,
        output: &ModelOutput,
        series: &PriceSeries,
    ) -> PredictionResult {
        let current_price = selection.row.close();
        let history = series.trailing(selection.effective_date, self.settings.history_window);

        PredictionResult {
            asset: asset.name.to_string(),
            requested_date: selection.requested_date,
            date: selection.effective_date,
            prediction: output.value,
            current_price,
            signal: signal::generate(output, current_price),
            confidence: output.confidence,
            features: selection.row.snapshot(),
            graph_data: GraphData {
                dates: history.iter().map(|b| b.date).collect(),
                prices: history.iter().map(|b| b.close).collect(),
                asset: asset.name.to_string(),
            },
        }
    }
}
