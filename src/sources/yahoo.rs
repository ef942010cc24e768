//! Yahoo Finance chart API provider.
//!
//! Daily OHLCV for crypto pairs such as `BTC-USD`. The unofficial chart
//! endpoint takes `period1`/`period2` unix bounds.

use super::{day_start_ts, ts_to_date, PriceProvider};
use crate::error::PredictionError;
use crate::types::{Asset, PriceBar, PriceSeries, PriceSource};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const YAHOO_API_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

impl YahooError {
    /// Yahoo reports ranges before listing, and delisted symbols, as errors.
    fn is_no_data(&self) -> bool {
        self.description.starts_with("Data doesn't exist")
            || self.description.starts_with("No data found")
    }
}

fn unavailable(msg: impl std::fmt::Display) -> PredictionError {
    PredictionError::ProviderUnavailable(format!("Yahoo: {}", msg))
}

/// Yahoo Finance daily history provider.
pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    /// Create a provider against `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn parse(
        ticker: &str,
        data: YahooChartResponse,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, PredictionError> {
        if let Some(error) = data.chart.error {
            if error.is_no_data() {
                debug!("Yahoo has no data for {}: {}", ticker, error.description);
                return PriceSeries::new(ticker, Vec::new());
            }
            return Err(unavailable(format!("{} - {}", error.code, error.description)));
        }

        let Some(result) = data.chart.result.and_then(|r| r.into_iter().next()) else {
            return PriceSeries::new(ticker, Vec::new());
        };

        // No timestamps means no trading data in the range.
        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

        let opens = quote.open.unwrap_or_default();
        let highs = quote.high.unwrap_or_default();
        let lows = quote.low.unwrap_or_default();
        let closes = quote.close.unwrap_or_default();
        let volumes = quote.volume.unwrap_or_default();

        let field = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let Some(close) = field(&closes, i).filter(|c| *c > 0.0) else {
                continue;
            };
            let Some(date) = ts_to_date(ts).filter(|d| (start..=end).contains(d)) else {
                continue;
            };

            bars.push(PriceBar {
                date,
                open: field(&opens, i).unwrap_or(close),
                high: field(&highs, i).unwrap_or(close),
                low: field(&lows, i).unwrap_or(close),
                close,
                volume: field(&volumes, i).unwrap_or(0.0),
            });
        }

        PriceSeries::from_unordered(ticker, bars)
    }
}

#[async_trait]
impl PriceProvider for YahooProvider {
    fn source(&self) -> PriceSource {
        PriceSource::Yahoo
    }

    async fn fetch(
        &self,
        asset: &Asset,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, PredictionError> {
        let period1 = day_start_ts(start);
        // period2 is exclusive; include the whole end day.
        let period2 = day_start_ts(end) + 86_400;
        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&includePrePost=false",
            self.base_url, asset.ticker, period1, period2
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| unavailable(format!("read failed: {}", e)))?;

        // Error statuses still carry a chart body naming the cause.
        let data: YahooChartResponse = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(_) if !status.is_success() => {
                return Err(unavailable(format!("API error: {}", status)));
            }
            Err(e) => return Err(unavailable(format!("parse error: {}", e))),
        };

        if !status.is_success() && data.chart.error.is_none() {
            return Err(unavailable(format!("API error: {}", status)));
        }

        Self::parse(asset.ticker, data, start, end)
    }
}
