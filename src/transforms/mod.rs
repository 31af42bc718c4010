//! Analytics transforms.
//!
//! Each transform is a stateless unit of work: it takes its whole input by
//! value, returns a fresh output, and keeps nothing between calls. All
//! transforms implement the `Transform` trait.

pub mod feature_extractor;
pub mod match_simulator;
pub mod similarity_retriever;

use thiserror::Error;

use crate::models::Diagnostics;

pub use feature_extractor::{extract, FeatureExtractor};
pub use match_simulator::{base_probability, simulate, simulate_with_rng, MatchSimulator};
pub use similarity_retriever::{retrieve, SimilarityRetriever};

/// Structural errors that abort a whole call.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Output wrapper carrying record-level diagnostics.
#[derive(Debug, Clone)]
pub struct TransformOutput<T> {
    pub data: T,
    pub diagnostics: Diagnostics,
}

impl<T> TransformOutput<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// Core trait for all transforms.
pub trait Transform {
    type Input;
    type Output;

    /// Transform identifier for logging.
    fn name(&self) -> &'static str;

    /// Run the transform on one input.
    fn execute(&self, input: Self::Input) -> Result<TransformOutput<Self::Output>, TransformError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Metric, SkipReason};

    #[test]
    fn test_transform_output() {
        let mut diag = Diagnostics::default();
        diag.skip(1, Metric::TempoScore, SkipReason::ZeroRounds);

        let output = TransformOutput::new("data").with_diagnostics(diag);

        assert_eq!(output.data, "data");
        assert_eq!(output.diagnostics.skipped.len(), 1);
    }

    #[test]
    fn test_transform_error_display() {
        let err = TransformError::InvalidInput("num_simulations must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "Invalid input: num_simulations must be greater than 0"
        );
    }
}
