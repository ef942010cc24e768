//! Rolling volatility (standard deviation of closes).

use super::sma::mean;
use super::{defined, rolling, Indicator, Series};

/// Rolling sample standard deviation (n - 1 denominator) over full windows.
///
/// Windows shorter than two values have no sample deviation and stay undefined.
pub fn rolling_std(values: &[f64], window: usize) -> Series {
    if window < 2 {
        return vec![None; values.len()];
    }
    rolling(&defined(values), window, sample_std)
}

fn sample_std(window: &[f64]) -> Option<f64> {
    let avg = mean(window)?;
    let sum_sq: f64 = window.iter().map(|v| (v - avg).powi(2)).sum();
    Some((sum_sq / (window.len() - 1) as f64).sqrt())
}

/// Close-price volatility over the trailing `period` days.
pub struct Volatility {
    period: usize,
    id: String,
    name: String,
}

impl Default for Volatility {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Volatility {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            id: format!("volatility{}", period),
            name: format!("Volatility ({})", period),
        }
    }
}

impl Indicator for Volatility {
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
        rolling_std(closes, self.period)
    }
}
