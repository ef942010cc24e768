//! Per-asset prediction models.
//!
//! A scorer turns an ordered feature vector into a [`ModelOutput`]. Models are
//! loaded once at startup into an immutable [`ScorerRegistry`].

use crate::types::{Asset, FeatureVector, ModelOutput, TradeSignal, FEATURE_COUNT, SUPPORTED_ASSETS};
use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Trait for prediction models bound to an asset.
pub trait Scorer: Send + Sync {
    /// Model kind, for diagnostics.
    fn kind(&self) -> &str;

    /// Score one feature vector in `FeatureName::ALL` order.
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<ModelOutput>;
}

fn dot(coefficients: &[f64], features: &FeatureVector) -> f64 {
    coefficients.iter().zip(features).map(|(w, x)| w * x).sum()
}

fn check_coefficients(coefficients: &[f64]) -> anyhow::Result<()> {
    if coefficients.len() != FEATURE_COUNT {
        bail!(
            "expected {} coefficients, got {}",
            FEATURE_COUNT,
            coefficients.len()
        );
    }
    if coefficients.iter().any(|c| !c.is_finite()) {
        bail!("coefficients must be finite");
    }
    Ok(())
}

/// Linear regression predicting the next close.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl Scorer for LinearModel {
    fn kind(&self) -> &str {
        "linear"
    }

    fn predict(&self, features: &FeatureVector) -> anyhow::Result<ModelOutput> {
        Ok(ModelOutput::regression(
            self.intercept + dot(&self.coefficients, features),
        ))
    }
}

/// Logistic classifier giving the probability that price rises.
///
/// Probabilities within `hold_band` of 0.5 are labelled Hold.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub hold_band: f64,
}

impl LogisticModel {
    fn label(&self, p_up: f64) -> TradeSignal {
        if p_up > 0.5 + self.hold_band {
            TradeSignal::Buy
        } else if self.hold_band > 0.0 && p_up >= 0.5 - self.hold_band {
            TradeSignal::Hold
        } else {
            TradeSignal::Sell
        }
    }
}

impl Scorer for LogisticModel {
    fn kind(&self) -> &str {
        "logistic"
    }

    fn predict(&self, features: &FeatureVector) -> anyhow::Result<ModelOutput> {
        let z = self.intercept + dot(&self.coefficients, features);
        let p_up = 1.0 / (1.0 + (-z).exp());
        let confidence = p_up.max(1.0 - p_up);
        Ok(ModelOutput::classification(p_up, self.label(p_up), confidence))
    }
}

/// On-disk model description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Linear(LinearModel),
    Logistic(LogisticModel),
}

impl ModelSpec {
    /// Parse and validate a model file's contents.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let spec: ModelSpec = serde_json::from_str(json).context("invalid model file")?;
        match &spec {
            ModelSpec::Linear(m) => check_coefficients(&m.coefficients)?,
            ModelSpec::Logistic(m) => {
                check_coefficients(&m.coefficients)?;
                if !(0.0..0.5).contains(&m.hold_band) {
                    bail!("hold_band must be in [0, 0.5), got {}", m.hold_band);
                }
            }
        }
        Ok(spec)
    }

    pub fn into_scorer(self) -> Arc<dyn Scorer> {
        match self {
            ModelSpec::Linear(m) => Arc::new(m),
            ModelSpec::Logistic(m) => Arc::new(m),
        }
    }
}

/// A scorer bound to its asset.
#[derive(Clone)]
pub struct ModelBinding {
    pub asset: &'static Asset,
    pub scorer: Arc<dyn Scorer>,
}

/// Immutable asset -> scorer map, built once at startup.
#[derive(Clone, Default)]
pub struct ScorerRegistry {
    bindings: HashMap<&'static str, ModelBinding>,
}

impl ScorerRegistry {
    /// Build a registry from explicit bindings. Later bindings for the same
    /// asset replace earlier ones.
    pub fn from_bindings<I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (&'static Asset, Arc<dyn Scorer>)>,
    {
        let bindings = bindings
            .into_iter()
            .map(|(asset, scorer)| (asset.name, ModelBinding { asset, scorer }))
            .collect();
        Self { bindings }
    }

    /// Load `<symbol>.json` for every supported asset from `dir`.
    ///
    /// Missing files leave the asset unbound; unreadable or invalid files are
    /// errors.
    pub fn load_dir(dir: &Path) -> anyhow::Result<Self> {
        let mut bindings = Vec::new();

        for asset in SUPPORTED_ASSETS {
            let path = dir.join(asset.model_file());
            if !path.exists() {
                warn!("No model for {} at {}, asset disabled", asset.name, path.display());
                continue;
            }

            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let spec = ModelSpec::from_json(&json)
                .with_context(|| format!("failed to load model {}", path.display()))?;
            let scorer = spec.into_scorer();

            info!("Loaded {} model for {}", scorer.kind(), asset.name);
            bindings.push((asset, scorer));
        }

        Ok(Self::from_bindings(bindings))
    }

    /// Binding for an asset name or symbol, ignoring case.
    pub fn get(&self, asset: &str) -> Option<&ModelBinding> {
        let asset = Asset::lookup(asset)?;
        self.bindings.get(asset.name)
    }

    /// Bound assets in catalog order.
    pub fn assets(&self) -> Vec<&ModelBinding> {
        SUPPORTED_ASSETS
            .iter()
            .filter_map(|a| self.bindings.get(a.name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
