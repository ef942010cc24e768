use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PredictionError;

/// Historical price source identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Yahoo,
    CryptoCompare,
}

impl PriceSource {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "yahoo" | "yfinance" => Some(Self::Yahoo),
            "cryptocompare" | "cc" => Some(Self::CryptoCompare),
            _ => None,
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceSource::Yahoo => write!(f, "yahoo"),
            PriceSource::CryptoCompare => write!(f, "cryptocompare"),
        }
    }
}

/// Daily OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Bar with every price field set to `close` and zero volume.
    pub fn flat(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    fn is_valid(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Date-ordered daily price history for one symbol.
///
/// Dates are strictly increasing. Gaps (weekends, exchange outages) are allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, rejecting out-of-order or duplicate dates and
    /// negative or non-finite values.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, PredictionError> {
        let symbol = symbol.into();

        if let Some(bad) = bars.iter().find(|b| !b.is_valid()) {
            return Err(PredictionError::MalformedPriceData(format!(
                "{}: invalid values on {}",
                symbol, bad.date
            )));
        }

        if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(PredictionError::MalformedPriceData(format!(
                "{}: dates not strictly increasing at {} -> {}",
                symbol, pair[0].date, pair[1].date
            )));
        }

        Ok(Self { symbol, bars })
    }

    /// Sort by date and keep the last bar seen for each date before building.
    ///
    /// Provider payloads are not guaranteed to be ordered or unique.
    pub fn from_unordered(
        symbol: impl Into<String>,
        mut bars: Vec<PriceBar>,
    ) -> Result<Self, PredictionError> {
        // Stable sort keeps arrival order within a date, so the last one wins below.
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self::new(symbol, deduped)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Up to `count` most recent bars dated on or before `date`, oldest first.
    pub fn trailing(&self, date: NaiveDate, count: usize) -> &[PriceBar] {
        let end = self.bars.partition_point(|b| b.date <= date);
        let start = end.saturating_sub(count);
        &self.bars[start..end]
    }
}
