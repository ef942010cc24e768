use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::services::{PipelineSettings, MIN_HISTORY};
use crate::types::PriceSource;
use tracing::warn;

/// Shortest lookback that still yields a complete feature row after gaps.
pub const MIN_LOOKBACK_DAYS: i64 = MIN_HISTORY as i64 * 3 / 2;

/// Longest accepted lookback (about a century).
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Directory holding per-asset model files.
    pub models_dir: PathBuf,
    /// Historical price source.
    pub price_source: PriceSource,
    /// Yahoo Finance base URL.
    pub yahoo_url: String,
    /// CryptoCompare base URL.
    pub cryptocompare_url: String,
    /// CryptoCompare API key (optional, raises rate limits).
    pub cryptocompare_api_key: Option<String>,
    /// Timeout for one price fetch (seconds).
    pub fetch_timeout_secs: u64,
    /// Calendar days of history fetched before the requested date.
    pub lookback_days: i64,
    /// Bars returned in the chart series.
    pub history_window: usize,
    /// Allowed CORS origins (empty = any).
    pub cors_origins: Vec<String>,
}

fn lookback_days(requested: Option<i64>) -> i64 {
    match requested {
        None => 500,
        Some(days) if days < MIN_LOOKBACK_DAYS => {
            warn!(
                "LOOKBACK_DAYS={} cannot cover {} bars of history, using {}",
                days, MIN_HISTORY, MIN_LOOKBACK_DAYS
            );
            MIN_LOOKBACK_DAYS
        }
        Some(days) if days > MAX_LOOKBACK_DAYS => {
            warn!("LOOKBACK_DAYS={} is too large, using {}", days, MAX_LOOKBACK_DAYS);
            MAX_LOOKBACK_DAYS
        }
        Some(days) => days,
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Format: "http://localhost:3000,http://example.com"
        let cors_origins = lookup("CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&lookup, "PORT").unwrap_or(5000),
            models_dir: lookup("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("models")),
            price_source: lookup("PRICE_SOURCE")
                .and_then(|s| PriceSource::from_str(&s))
                .unwrap_or(PriceSource::Yahoo),
            yahoo_url: lookup("YAHOO_URL")
                .unwrap_or_else(|| crate::sources::yahoo::YAHOO_API_URL.to_string()),
            cryptocompare_url: lookup("CRYPTOCOMPARE_URL").unwrap_or_else(|| {
                crate::sources::cryptocompare::CRYPTOCOMPARE_API_URL.to_string()
            }),
            cryptocompare_api_key: lookup("CRYPTOCOMPARE_API_KEY").filter(|k| !k.is_empty()),
            fetch_timeout_secs: parse_var(&lookup, "FETCH_TIMEOUT_SECS")
                .filter(|s: &u64| *s > 0)
                .unwrap_or(15),
            lookback_days: lookback_days(parse_var(&lookup, "LOOKBACK_DAYS")),
            history_window: parse_var(&lookup, "HISTORY_WINDOW").unwrap_or(90),
            cors_origins,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Pipeline tunables derived from this configuration.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            lookback_days: self.lookback_days,
            fetch_timeout: self.fetch_timeout(),
            history_window: self.history_window,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
