//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::ema_values;
use super::{Indicator, Series};

/// MACD, signal and histogram lines aligned to the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// MACD line = EMA(fast) - EMA(slow); signal = EMA(MACD, signal_span).
///
/// All EMAs are seeded by their first value, so every line is defined from
/// the first position on.
pub fn macd(closes: &[f64], fast_span: usize, slow_span: usize, signal_span: usize) -> MacdLines {
    let fast = ema_values(closes, fast_span);
    let slow = ema_values(closes, slow_span);

    let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal_line = ema_values(&macd_line, signal_span);

    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some(m - s))
        .collect();

    MacdLines {
        macd: macd_line.into_iter().map(Some).collect(),
        signal: signal_line.into_iter().map(Some).collect(),
        histogram,
    }
}

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
///
/// As a feature column it contributes the MACD line.
pub struct Macd {
    fast_span: usize,
    slow_span: usize,
    signal_span: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_span: 12,
            slow_span: 26,
            signal_span: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_span: usize, slow_span: usize, signal_span: usize) -> Self {
        Self {
            fast_span,
            slow_span,
            signal_span,
        }
    }

    /// All three MACD lines.
    pub fn lines(&self, closes: &[f64]) -> MacdLines {
        macd(closes, self.fast_span, self.slow_span, self.signal_span)
    }
}

impl Indicator for Macd {
    fn id(&self) -> &str {
        "macd"
    }

    fn name(&self) -> &str {
        "MACD"
    }

    fn warmup(&self) -> usize {
        0
    }

    fn compute(&self, closes: &[f64]) -> Series {
        self.lines(closes).macd
    }
}
