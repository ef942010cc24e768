//! Relative Strength Index (RSI) indicator.

use super::sma::mean;
use super::{rolling, Indicator, Series};

/// RSI from simple rolling means of gains and losses over `window` deltas.
///
/// RSI = 100 - 100 / (1 + RS), RS = mean gain / mean loss. A window with no
/// losses yields exactly 100. The first delta is undefined, so the first
/// `window` positions are undefined.
pub fn rsi(closes: &[f64], window: usize) -> Series {
    let deltas: Series = std::iter::once(None)
        .chain(closes.windows(2).map(|w| Some(w[1] - w[0])))
        .take(closes.len())
        .collect();

    let gains: Series = deltas.iter().map(|d| d.map(|d| d.max(0.0))).collect();
    let losses: Series = deltas.iter().map(|d| d.map(|d| (-d).max(0.0))).collect();

    let avg_gain = rolling(&gains, window, mean);
    let avg_loss = rolling(&losses, window, mean);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| {
            let (gain, loss) = (gain?, loss?);
            if loss == 0.0 {
                return Some(100.0);
            }
            let rs = gain / loss;
            Some(100.0 - (100.0 / (1.0 + rs)))
        })
        .collect()
}

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
pub struct Rsi {
    period: usize,
    id: String,
    name: String,
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            id: format!("rsi{}", period),
            name: format!("RSI ({})", period),
        }
    }
}

impl Indicator for Rsi {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Series {
        rsi(closes, self.period)
    }
}
