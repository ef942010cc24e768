//! CryptoCompare daily history provider.

use super::{day_start_ts, ts_to_date, PriceProvider};
use crate::error::PredictionError;
use crate::types::{Asset, PriceBar, PriceSeries, PriceSource};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const CRYPTOCOMPARE_API_URL: &str = "https://min-api.cryptocompare.com";

/// Largest `limit` histoday accepts.
const MAX_LIMIT: i64 = 2000;

/// CryptoCompare histoday response
#[derive(Debug, Deserialize)]
struct CryptoCompareResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Data")]
    data: Option<CryptoCompareData>,
}

#[derive(Debug, Deserialize)]
struct CryptoCompareData {
    #[serde(rename = "Data", default)]
    data: Vec<CryptoCompareOhlc>,
}

#[derive(Debug, Deserialize)]
struct CryptoCompareOhlc {
    time: i64,
    high: f64,
    low: f64,
    open: f64,
    close: f64,
    #[serde(rename = "volumefrom")]
    volume_from: f64,
}

fn unavailable(msg: impl std::fmt::Display) -> PredictionError {
    PredictionError::ProviderUnavailable(format!("CryptoCompare: {}", msg))
}

/// CryptoCompare REST client for daily candles.
pub struct CryptoCompareProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CryptoCompareProvider {
    /// Create a provider against `base_url` with a per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn parse(
        symbol: &str,
        resp: CryptoCompareResponse,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, PredictionError> {
        if resp.response != "Success" {
            return Err(unavailable(format!("API returned error: {}", resp.message)));
        }

        let candles = resp.data.map(|d| d.data).unwrap_or_default();

        // Days before the listing date are padded with zero candles.
        let bars = candles
            .into_iter()
            .filter(|ohlc| ohlc.close > 0.0)
            .filter_map(|ohlc| {
                let date = ts_to_date(ohlc.time).filter(|d| (start..=end).contains(d))?;
                Some(PriceBar {
                    date,
                    open: ohlc.open,
                    high: ohlc.high,
                    low: ohlc.low,
                    close: ohlc.close,
                    volume: ohlc.volume_from,
                })
            })
            .collect();

        PriceSeries::from_unordered(symbol, bars)
    }
}

#[async_trait]
impl PriceProvider for CryptoCompareProvider {
    fn source(&self) -> PriceSource {
        PriceSource::CryptoCompare
    }

    async fn fetch(
        &self,
        asset: &Asset,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, PredictionError> {
        let limit = (end - start).num_days().clamp(1, MAX_LIMIT);
        let url = format!(
            "{}/data/v2/histoday?fsym={}&tsym=USD&limit={}&toTs={}",
            self.base_url,
            asset.symbol,
            limit,
            day_start_ts(end)
        );

        debug!("Fetching CryptoCompare histoday: {} days for {}", limit, asset.symbol);

        let mut request = self.client.get(&url);
        if let Some(ref key) = self.api_key {
            request = request.header("authorization", format!("Apikey {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| unavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("API error: {}", response.status())));
        }

        let resp: CryptoCompareResponse = response
            .json()
            .await
            .map_err(|e| unavailable(format!("failed to parse response: {}", e)))?;

        Self::parse(asset.symbol, resp, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candle(time: i64, close: f64) -> serde_json::Value {
        json!({
            "time": time, "high": close, "low": close, "open": close, "close": close,
            "volumefrom": 5.0, "volumeto": 5.0 * close
        })
    }

    fn parse(body: serde_json::Value) -> Result<PriceSeries, PredictionError> {
        let resp: CryptoCompareResponse = serde_json::from_value(body).unwrap();
        CryptoCompareProvider::parse("BTC", resp, date(2024, 1, 1), date(2024, 1, 31))
    }

    #[test]
    fn test_parse_success() {
        let body = json!({
            "Response": "Success",
            "Message": "",
            "Data": {"Data": [candle(1703980800, 0.0), candle(1704067200, 10.0), candle(1704153600, 11.0)]}
        });
        let series = parse(body).unwrap();
        assert_eq!(series.closes(), vec![10.0, 11.0]);
        assert_eq!(series.first_date(), Some(date(2024, 1, 1)));
        assert_eq!(series.bars()[0].volume, 5.0);
        assert_eq!(series.symbol(), "BTC");
    }

    #[test]
    fn test_parse_error_response() {
        let body = json!({
            "Response": "Error",
            "Message": "rate limit exceeded",
            "Data": {}
        });
        let err = parse(body).unwrap_err();
        assert!(matches!(err, PredictionError::ProviderUnavailable(_)));
        assert!(err.to_string().contains("rate limit exceeded"));
    }

    #[test]
    fn test_parse_missing_data_is_empty() {
        let body = json!({"Response": "Success"});
        assert!(parse(body).unwrap().is_empty());
    }
}
