//! Trading signal from a model output.

use crate::types::{ModelOutput, TradeSignal};

/// Decide the signal for a model output at `current_price`.
///
/// A classifier's own label wins. Otherwise Buy only when the prediction is
/// strictly above the current price; equality is a Sell.
pub fn generate(output: &ModelOutput, current_price: f64) -> TradeSignal {
    if let Some(label) = output.label {
        return label;
    }
    if output.value > current_price {
        TradeSignal::Buy
    } else {
        TradeSignal::Sell
    }
}
