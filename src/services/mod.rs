//! Prediction pipeline services.
//!
//! Indicators feed the feature builder; the resolver picks the row for the
//! requested date; scorers and the signal generator turn it into a result.

pub mod features;
pub mod indicators;
pub mod pipeline;
pub mod resolver;
pub mod scorer;
pub mod signal;

pub use features::{FeatureBuilder, MIN_HISTORY};
pub use pipeline::{parse_date, PipelineSettings, PredictionService};
pub use resolver::resolve;
pub use scorer::{LinearModel, LogisticModel, ModelBinding, ModelSpec, Scorer, ScorerRegistry};
