//! Feature table construction.
//!
//! Runs the indicator set over a price series and keeps only the dates where
//! every feature column is defined.

use crate::error::PredictionError;
use crate::services::indicators::{DailyReturn, Indicator, Macd, Rsi, Series, Sma, Volatility};
use crate::types::{FeatureName, FeatureRow, FeatureTable, FeatureVector, PriceSeries, FEATURE_COUNT};
use tracing::debug;

/// Bars needed before the longest rolling window (MA100) is defined.
pub const MIN_HISTORY: usize = 100;

/// Candidate row before the completeness filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateRow {
    pub date: chrono::NaiveDate,
    pub values: [Option<f64>; FEATURE_COUNT],
}

fn column<I: Indicator + 'static>(name: FeatureName, indicator: I) -> (FeatureName, Box<dyn Indicator>) {
    (name, Box::new(indicator))
}

/// Builds feature tables from price series.
pub struct FeatureBuilder {
    /// Derived columns; `Close` is taken from the series directly.
    columns: Vec<(FeatureName, Box<dyn Indicator>)>,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureBuilder {
    pub fn new() -> Self {
        Self {
            columns: vec![
                column(FeatureName::Ma10, Sma::new(10)),
                column(FeatureName::Ma50, Sma::new(50)),
                column(FeatureName::Ma100, Sma::new(100)),
                column(FeatureName::DailyReturn, DailyReturn),
                column(FeatureName::Volatility10, Volatility::new(10)),
                column(FeatureName::Rsi14, Rsi::new(14)),
                column(FeatureName::Macd, Macd::default()),
            ],
        }
    }

    /// Minimum series length for at least one complete row.
    pub fn required_history(&self) -> usize {
        self.columns
            .iter()
            .map(|(_, indicator)| indicator.warmup() + 1)
            .max()
            .unwrap_or(1)
    }

    /// Build the feature table for `series`.
    ///
    /// Fails with `InsufficientHistory` when the series is shorter than
    /// [`MIN_HISTORY`]. The result holds only complete, finite rows.
    pub fn build(&self, series: &PriceSeries) -> Result<FeatureTable, PredictionError> {
        if series.len() < MIN_HISTORY {
            return Err(PredictionError::InsufficientHistory {
                required: MIN_HISTORY,
                available: series.len(),
            });
        }

        let candidates = self.candidates(series);
        let total = candidates.len();
        let table = complete_rows(candidates);

        debug!(
            "Built feature table for {}: {} of {} rows complete",
            series.symbol(),
            table.len(),
            total
        );

        Ok(table)
    }

    /// Every date of `series` with its (possibly undefined) feature values.
    pub fn candidates(&self, series: &PriceSeries) -> Vec<CandidateRow> {
        let closes = series.closes();
        let computed: Vec<(FeatureName, Series)> = self
            .columns
            .iter()
            .map(|(name, indicator)| (*name, indicator.compute(&closes)))
            .collect();

        series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let mut values = [None; FEATURE_COUNT];
                values[FeatureName::Close.index()] = Some(bar.close);
                for (name, column) in &computed {
                    values[name.index()] = column[i];
                }
                CandidateRow {
                    date: bar.date,
                    values,
                }
            })
            .collect()
    }
}

/// Drop every candidate with an undefined or non-finite value.
pub fn complete_rows(candidates: Vec<CandidateRow>) -> FeatureTable {
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let mut values: FeatureVector = [0.0; FEATURE_COUNT];
            for (slot, value) in values.iter_mut().zip(candidate.values) {
                *slot = value?;
            }
            FeatureRow::new(candidate.date, values)
        })
        .collect()
}
