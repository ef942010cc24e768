//! Simple Moving Average (SMA) indicator.

use super::{defined, rolling, Indicator, Series};

/// Rolling arithmetic mean over full windows of `window` values.
pub fn rolling_mean(values: &[f64], window: usize) -> Series {
    rolling(&defined(values), window, mean)
}

pub(crate) fn mean(window: &[f64]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

/// SMA (Simple Moving Average) indicator.
///
/// Calculates the average close over the trailing `period` days.
pub struct Sma {
    period: usize,
    id: String,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            id: format!("ma{}", period),
            name: format!("SMA ({})", period),
        }
    }
}

impl Indicator for Sma {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, closes: &[f64]) -> Series {
        rolling_mean(closes, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::leading_undefined;

    #[test]
    fn test_sma_id_and_name() {
        let sma = Sma::new(10);
        assert_eq!(sma.id(), "ma10");
        assert_eq!(sma.name(), "SMA (10)");
        assert_eq!(sma.warmup(), 9);
    }

    #[test]
    fn test_rolling_mean_values() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_rolling_mean_window_one_is_identity() {
        let out = rolling_mean(&[4.0, 5.0], 1);
        assert_eq!(out, vec![Some(4.0), Some(5.0)]);
    }

    #[test]
    fn test_sma_length_and_warmup() {
        let closes: Vec<f64> = (0..150).map(|i| 100.0 + i as f64).collect();
        for period in [10, 50, 100] {
            let sma = Sma::new(period);
            let out = sma.compute(&closes);
            assert_eq!(out.len(), closes.len());
            assert_eq!(leading_undefined(&out), sma.warmup());
        }
    }

    #[test]
    fn test_sma_of_linear_series() {
        let closes: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let out = Sma::new(10).compute(&closes);
        // Mean of 0..=9 is 4.5, each later window shifts by one.
        assert_eq!(out[9], Some(4.5));
        assert_eq!(out[19], Some(14.5));
    }
}
