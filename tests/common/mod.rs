//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use augur::error::PredictionError;
use augur::services::{PipelineSettings, PredictionService, Scorer, ScorerRegistry};
use augur::sources::PriceProvider;
use augur::types::{Asset, FeatureName, FeatureVector, ModelOutput, PriceBar, PriceSeries, PriceSource};
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, Weekday};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `count` consecutive daily bars from `start`, closing at 100, 101, 102, ...
pub fn rising_bars(start: NaiveDate, count: usize) -> Vec<PriceBar> {
    (0..count)
        .map(|i| PriceBar::flat(start + ChronoDuration::days(i as i64), 100.0 + i as f64))
        .collect()
}

/// `count` weekday-only bars from `start`, closing at 100, 101, 102, ...
pub fn weekday_bars(start: NaiveDate, count: usize) -> Vec<PriceBar> {
    start
        .iter_days()
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(count)
        .enumerate()
        .map(|(i, d)| PriceBar::flat(d, 100.0 + i as f64))
        .collect()
}

#[derive(Clone, Copy)]
pub enum StubBehavior {
    /// Return the bars inside the requested range.
    InRange,
    /// Return every bar, ignoring the requested range.
    Everything,
    /// Fail with a provider error.
    Fail,
    /// Sleep before answering.
    Slow(Duration),
}

/// In-memory provider that counts fetches.
pub struct StubProvider {
    bars: Vec<PriceBar>,
    behavior: StubBehavior,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(bars: Vec<PriceBar>, behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            bars,
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceProvider for StubProvider {
    fn source(&self) -> PriceSource {
        PriceSource::Yahoo
    }

    async fn fetch(
        &self,
        asset: &Asset,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let bars = match self.behavior {
            StubBehavior::InRange => self
                .bars
                .iter()
                .filter(|b| (start..=end).contains(&b.date))
                .copied()
                .collect(),
            StubBehavior::Everything => self.bars.clone(),
            StubBehavior::Fail => {
                return Err(PredictionError::ProviderUnavailable("stub is down".into()))
            }
            StubBehavior::Slow(delay) => {
                tokio::time::sleep(delay).await;
                self.bars.clone()
            }
        };

        PriceSeries::new(asset.ticker, bars)
    }
}

/// Predicts `close * factor`.
pub struct CloseMultiple(pub f64);

impl Scorer for CloseMultiple {
    fn kind(&self) -> &str {
        "close_multiple"
    }

    fn predict(&self, features: &FeatureVector) -> anyhow::Result<ModelOutput> {
        Ok(ModelOutput::regression(
            features[FeatureName::Close.index()] * self.0,
        ))
    }
}

/// Always fails.
pub struct BrokenScorer;

impl Scorer for BrokenScorer {
    fn kind(&self) -> &str {
        "broken"
    }

    fn predict(&self, _features: &FeatureVector) -> anyhow::Result<ModelOutput> {
        anyhow::bail!("weights corrupted")
    }
}

/// Registry binding Bitcoin to `scorer`.
pub fn bitcoin_registry(scorer: Arc<dyn Scorer>) -> Arc<ScorerRegistry> {
    let bitcoin = Asset::lookup("Bitcoin").unwrap();
    Arc::new(ScorerRegistry::from_bindings([(bitcoin, scorer)]))
}

pub fn service(
    provider: Arc<StubProvider>,
    scorer: Arc<dyn Scorer>,
    settings: PipelineSettings,
) -> PredictionService {
    PredictionService::new(provider, bitcoin_registry(scorer), settings)
}
