//! Day-over-day percent change.

use super::{Indicator, Series};

/// Fractional change of each close versus the previous one.
///
/// The first position has no prior close and is undefined, as is any
/// position whose prior close is zero.
pub fn daily_return(closes: &[f64]) -> Series {
    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(closes.windows(2).map(|w| {
        let (prev, curr) = (w[0], w[1]);
        (prev != 0.0).then(|| (curr - prev) / prev)
    }));
    out
}

/// Daily return indicator.
#[derive(Default)]
pub struct DailyReturn;

impl Indicator for DailyReturn {
    fn id(&self) -> &str {
        "daily_return"
    }

    fn name(&self) -> &str {
        "Daily Return"
    }

    fn warmup(&self) -> usize {
        1
    }

    fn compute(&self, closes: &[f64]) -> Series {
        daily_return(closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_return_values() {
        let out = daily_return(&[100.0, 110.0, 99.0]);
        assert_eq!(out[0], None);
        assert!((out[1].unwrap() - 0.10).abs() < 1e-12);
        assert!((out[2].unwrap() + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_daily_return_zero_prior_is_undefined() {
        let out = daily_return(&[0.0, 5.0, 10.0]);
        assert_eq!(out, vec![None, None, Some(1.0)]);
    }

    #[test]
    fn test_daily_return_edges() {
        assert!(daily_return(&[]).is_empty());
        assert_eq!(daily_return(&[42.0]), vec![None]);
        assert_eq!(DailyReturn.warmup(), 1);
    }
}
