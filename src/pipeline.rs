//! JSON-in/JSON-out entry points.
//!
//! Every operation takes the raw request body, decodes it, runs the matching
//! transform and returns the response document. Structural problems (bad
//! JSON, a non-object body, a top-level key of the wrong type) fail the whole
//! call with a `TransformError`; callers render it with [`error_envelope`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::{AppConfig, ConfigError};
use crate::models::{Diagnostics, FeatureVector, MatchRecord, VectorMode};
use crate::transforms::similarity_retriever::SimilarityRetrieverInput;
use crate::transforms::{
    FeatureExtractor, MatchSimulator, SimilarityRetriever, Transform, TransformError,
};

/// Feature extraction request.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureRequest {
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

/// Similar-match retrieval request.
#[derive(Debug, Clone, Deserialize)]
pub struct SimilarityRequest {
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub top_k: Option<usize>,

    /// Replaces the default corpus for this call.
    #[serde(default)]
    pub corpus: Option<Vec<MatchRecord>>,
}

/// Simulation request: a feature vector plus an optional sample count.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationRequest {
    #[serde(flatten)]
    pub features: FeatureVector,

    #[serde(default)]
    pub num_simulations: Option<usize>,
}

/// Settings shared by every call. Immutable once built.
#[derive(Debug, Clone)]
pub struct Pipeline {
    corpus: Arc<Vec<MatchRecord>>,
    top_k: usize,
    vector_mode: VectorMode,
    num_simulations: usize,
    seed: Option<u64>,
    include_diagnostics: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&AppConfig::default(), crate::config::default_corpus())
    }
}

impl Pipeline {
    pub fn new(config: &AppConfig, corpus: Vec<MatchRecord>) -> Self {
        Self {
            corpus: Arc::new(corpus),
            top_k: config.retrieval.top_k,
            vector_mode: config.retrieval.vector_mode,
            num_simulations: config.simulation.num_simulations,
            seed: config.simulation.seed,
            include_diagnostics: config.include_diagnostics,
        }
    }

    /// Build from configuration, loading the configured corpus.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config, config.retrieval.load_corpus()?))
    }

    pub fn with_diagnostics(mut self, include: bool) -> Self {
        self.include_diagnostics = include;
        self
    }

    pub fn with_num_simulations(mut self, num_simulations: usize) -> Self {
        self.num_simulations = num_simulations;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn corpus(&self) -> &[MatchRecord] {
        &self.corpus
    }

    /// `{"matches": [...]}` → flat feature object.
    pub fn features(&self, body: &str) -> Result<Value, TransformError> {
        let request: FeatureRequest = decode(body)?;
        let (features, diagnostics) = self.extract(request.matches)?;

        let mut response = serde_json::to_value(features)?;
        self.attach_diagnostics(&mut response, diagnostics)?;
        Ok(response)
    }

    /// `{"query": ..., "top_k": ...}` → `{"similar_matches": [...]}`.
    pub fn similar(&self, body: &str) -> Result<Value, TransformError> {
        let request: SimilarityRequest = decode(body)?;
        let corpus = match request.corpus {
            Some(corpus) => corpus,
            None => self.corpus.as_ref().clone(),
        };

        let retriever = SimilarityRetriever::new(self.vector_mode);
        let output = retriever.execute(SimilarityRetrieverInput {
            query: request.query,
            corpus,
            top_k: request.top_k.unwrap_or(self.top_k),
        })?;
        debug!(
            transform = retriever.name(),
            results = output.data.len(),
            "Retrieved similar matches"
        );

        Ok(json!({ "similar_matches": output.data }))
    }

    /// Feature object → `{"predicted_win_probability": ...}`.
    pub fn simulate(&self, body: &str) -> Result<Value, TransformError> {
        let request: SimulationRequest = decode(body)?;
        let simulator = self.simulator(request.num_simulations);
        let output = simulator.execute(request.features)?;
        debug!(
            transform = simulator.name(),
            num_simulations = simulator.num_simulations(),
            "Simulated match"
        );

        Ok(serde_json::to_value(output.data)?)
    }

    /// `{"matches": [...]}` → features and win probability in one document.
    pub fn predict(&self, body: &str) -> Result<Value, TransformError> {
        let request: FeatureRequest = decode(body)?;
        let (features, diagnostics) = self.extract(request.matches)?;
        let simulation = self.simulator(None).execute(features)?.data;

        let mut response = json!({
            "features": features,
            "predicted_win_probability": simulation.predicted_win_probability,
        });
        self.attach_diagnostics(&mut response, diagnostics)?;
        Ok(response)
    }

    fn extract(
        &self,
        matches: Vec<MatchRecord>,
    ) -> Result<(FeatureVector, Diagnostics), TransformError> {
        let extractor = FeatureExtractor::new();
        let count = matches.len();
        let output = extractor.execute(matches)?;
        debug!(
            transform = extractor.name(),
            matches = count,
            skipped = output.diagnostics.skipped.len(),
            "Extracted features"
        );
        Ok((output.data, output.diagnostics))
    }

    fn simulator(&self, num_simulations: Option<usize>) -> MatchSimulator {
        MatchSimulator::new(num_simulations.unwrap_or(self.num_simulations)).with_seed(self.seed)
    }

    fn attach_diagnostics(
        &self,
        response: &mut Value,
        diagnostics: Diagnostics,
    ) -> Result<(), TransformError> {
        if !self.include_diagnostics {
            return Ok(());
        }
        if let Value::Object(map) = response {
            map.insert("diagnostics".to_string(), serde_json::to_value(diagnostics)?);
        }
        Ok(())
    }
}

/// Decode a request body that must be a JSON object.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, TransformError> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(TransformError::InvalidInput(
            "request body must be a JSON object".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// `{"error": message}` document for a failed call.
pub fn error_envelope(err: &TransformError) -> Value {
    json!({ "error": err.to_string() })
}
