//! Technical indicator implementations.
//!
//! Every indicator maps a close-price sequence to a [`Series`] of the same
//! length. Positions without enough history are `None`, never zero.

pub mod ema;
pub mod macd;
pub mod returns;
pub mod rsi;
pub mod sma;
pub mod volatility;

pub use ema::{ema, Ema};
pub use macd::{macd, Macd, MacdLines};
pub use returns::{daily_return, DailyReturn};
pub use rsi::{rsi, Rsi};
pub use sma::{rolling_mean, Sma};
pub use volatility::{rolling_std, Volatility};

/// Indicator output aligned to its input; `None` marks undefined positions.
pub type Series = Vec<Option<f64>>;

/// Trait for implementing technical indicators over close prices.
pub trait Indicator: Send + Sync {
    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Number of leading positions left undefined.
    fn warmup(&self) -> usize;

    /// Calculate the indicator for every position of `closes`.
    fn compute(&self, closes: &[f64]) -> Series;
}

/// Apply `stat` over every full trailing window of `values`.
///
/// A window is undefined if it is incomplete or contains an undefined value.
pub(crate) fn rolling<F>(values: &[Option<f64>], window: usize, stat: F) -> Series
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }

    let mut buf = Vec::with_capacity(window);
    for end in window - 1..values.len() {
        buf.clear();
        buf.extend(values[end + 1 - window..=end].iter().map_while(|v| *v));
        if buf.len() == window {
            out[end] = stat(&buf);
        }
    }
    out
}

/// Lift a fully defined sequence into a [`Series`].
pub(crate) fn defined(values: &[f64]) -> Series {
    values.iter().copied().map(Some).collect()
}

/// Number of leading `None` values.
pub fn leading_undefined(series: &[Option<f64>]) -> usize {
    series.iter().take_while(|v| v.is_none()).count()
}
