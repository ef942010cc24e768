//! Exponential Moving Average (EMA) indicator.

use super::{Indicator, Series};

/// EMA with smoothing factor `2 / (span + 1)`, seeded by the first value.
///
/// `ema[0] = x[0]`, `ema[i] = a * x[i] + (1 - a) * ema[i - 1]`, evaluated in
/// that order so rounding matches the usual `adjust=False` EMA. Defined at
/// every position; there is no simple-average warm-up.
pub fn ema(values: &[f64], span: usize) -> Series {
    ema_values(values, span).into_iter().map(Some).collect()
}

/// Same recurrence as [`ema`], unwrapped.
pub(crate) fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());

    let mut iter = values.iter();
    let Some(&first) = iter.next() else {
        return out;
    };

    let mut prev = first;
    out.push(prev);
    for &value in iter {
        prev = (1.0 - alpha) * prev + alpha * value;
        out.push(prev);
    }
    out
}

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices.
pub struct Ema {
    span: usize,
    id: String,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self {
            span,
            id: format!("ema{}", span),
            name: format!("EMA ({})", span),
        }
    }
}

impl Indicator for Ema {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        0
    }

    fn compute(&self, closes: &[f64]) -> Series {
        ema(closes, self.span)
    }
}
