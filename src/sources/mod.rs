//! Historical daily price providers.

pub mod cryptocompare;
pub mod yahoo;

pub use cryptocompare::CryptoCompareProvider;
pub use yahoo::YahooProvider;

use crate::config::Config;
use crate::error::PredictionError;
use crate::types::{Asset, PriceSeries, PriceSource};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use std::sync::Arc;

/// Source of daily OHLCV history.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Which upstream this provider reads from.
    fn source(&self) -> PriceSource;

    /// Fetch daily bars for `asset` dated within `[start, end]`.
    ///
    /// An empty series means the upstream had no data for the range. Transport,
    /// HTTP and decoding failures are `ProviderUnavailable`.
    async fn fetch(
        &self,
        asset: &Asset,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, PredictionError>;
}

/// Build the provider selected by `config.price_source`.
pub fn build_provider(config: &Config) -> reqwest::Result<Arc<dyn PriceProvider>> {
    let timeout = config.fetch_timeout();
    let provider: Arc<dyn PriceProvider> = match config.price_source {
        PriceSource::Yahoo => Arc::new(YahooProvider::new(&config.yahoo_url, timeout)?),
        PriceSource::CryptoCompare => Arc::new(CryptoCompareProvider::new(
            &config.cryptocompare_url,
            config.cryptocompare_api_key.clone(),
            timeout,
        )?),
    };
    Ok(provider)
}

/// Unix seconds at midnight UTC of `date`.
pub(crate) fn day_start_ts(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// UTC calendar date of a unix timestamp in seconds.
pub(crate) fn ts_to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_start_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let ts = day_start_ts(date);
        assert_eq!(ts, 1_709_164_800);
        assert_eq!(ts_to_date(ts), Some(date));
        assert_eq!(ts_to_date(ts + 86_399), Some(date));
    }

    #[test]
    fn test_build_provider_follows_config() {
        let mut config = Config::default();
        assert_eq!(build_provider(&config).unwrap().source(), PriceSource::Yahoo);

        config.price_source = PriceSource::CryptoCompare;
        assert_eq!(
            build_provider(&config).unwrap().source(),
            PriceSource::CryptoCompare
        );
    }
}
