use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FeatureRow, FeatureSnapshot};

/// Trading signal emitted for a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSignal {
    Buy,
    Sell,
    Hold,
}

impl TradeSignal {
    /// Get display label for this signal.
    pub fn label(&self) -> &'static str {
        match self {
            TradeSignal::Buy => "Buy",
            TradeSignal::Sell => "Sell",
            TradeSignal::Hold => "Hold",
        }
    }
}

/// Raw output of a scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutput {
    /// Point prediction (next close for regressors, probability for classifiers).
    pub value: f64,
    /// Class label when the model is a classifier.
    pub label: Option<TradeSignal>,
    /// Probability of the chosen class, in [0, 1].
    pub confidence: Option<f64>,
}

impl ModelOutput {
    /// Output of a regression model.
    pub fn regression(value: f64) -> Self {
        Self {
            value,
            label: None,
            confidence: None,
        }
    }

    /// Output of a classifier that chose `label`.
    pub fn classification(value: f64, label: TradeSignal, confidence: f64) -> Self {
        Self {
            value,
            label: Some(label),
            confidence: Some(confidence),
        }
    }
}

/// Feature row chosen for a requested date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSelection {
    pub requested_date: NaiveDate,
    pub effective_date: NaiveDate,
    pub row: FeatureRow,
}

impl ResolvedSelection {
    /// Whether the requested date had no row of its own.
    pub fn is_fallback(&self) -> bool {
        self.requested_date != self.effective_date
    }
}

/// Chart series returned alongside a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphData {
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<f64>,
    pub asset: String,
}

/// Prediction response record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub asset: String,
    pub requested_date: NaiveDate,
    /// Effective date whose features were scored.
    pub date: NaiveDate,
    pub prediction: f64,
    pub current_price: f64,
    pub signal: TradeSignal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub features: FeatureSnapshot,
    #[serde(rename = "graphData")]
    pub graph_data: GraphData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_serialization() {
        assert_eq!(serde_json::to_string(&TradeSignal::Buy).unwrap(), "\"Buy\"");
        assert_eq!(serde_json::to_string(&TradeSignal::Sell).unwrap(), "\"Sell\"");
        assert_eq!(serde_json::to_string(&TradeSignal::Hold).unwrap(), "\"Hold\"");
    }

    #[test]
    fn test_signal_label() {
        assert_eq!(TradeSignal::Buy.label(), "Buy");
        assert_eq!(TradeSignal::Hold.label(), "Hold");
    }

    #[test]
    fn test_model_output_constructors() {
        let reg = ModelOutput::regression(101.5);
        assert_eq!(reg.value, 101.5);
        assert!(reg.label.is_none());
        assert!(reg.confidence.is_none());

        let cls = ModelOutput::classification(0.8, TradeSignal::Buy, 0.8);
        assert_eq!(cls.label, Some(TradeSignal::Buy));
        assert_eq!(cls.confidence, Some(0.8));
    }
}
