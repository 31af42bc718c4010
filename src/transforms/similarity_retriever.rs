//! Similarity Retriever.
//!
//! Ranks a corpus of historical matches by bag-of-words cosine similarity to a
//! free-text query. The corpus is always passed in; the retriever owns none.

use std::cmp::Ordering;

use super::{Transform, TransformError, TransformOutput};
use crate::calculate::{align_vocabulary, bag_of_words, cosine_similarity, round_to};
use crate::models::{MatchRecord, SimilarityResult, VectorMode};

/// Decimal places kept on reported similarities.
const SIMILARITY_DECIMALS: i32 = 3;

/// Keys written by the retriever onto each result.
const RESULT_KEYS: [&str; 2] = ["similarity", "rank"];

/// Rank `corpus` against `query` and keep the best `top_k` (positional mode).
pub fn retrieve(query: &str, corpus: &[MatchRecord], top_k: usize) -> Vec<SimilarityResult> {
    retrieve_with_mode(query, corpus, top_k, VectorMode::Positional)
}

/// Rank `corpus` against `query` using the given vector comparison.
pub fn retrieve_with_mode(
    query: &str,
    corpus: &[MatchRecord],
    top_k: usize,
    mode: VectorMode,
) -> Vec<SimilarityResult> {
    let query_bag = bag_of_words(query);

    let mut scored: Vec<(f64, &MatchRecord)> = corpus
        .iter()
        .map(|record| {
            let candidate = bag_of_words(&record.search_text());
            (similarity(&query_bag, &candidate, mode), record)
        })
        .collect();

    // Stable: equal scores keep corpus order
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    scored
        .into_iter()
        .take(top_k)
        .enumerate()
        .map(|(i, (sim, record))| {
            let mut record = record.clone();
            for key in RESULT_KEYS {
                record.extra.remove(key);
            }
            SimilarityResult {
                record,
                similarity: round_to(sim, SIMILARITY_DECIMALS),
                rank: i + 1,
            }
        })
        .collect()
}

fn similarity(query: &[(String, f64)], candidate: &[(String, f64)], mode: VectorMode) -> f64 {
    match mode {
        VectorMode::Positional => {
            let q: Vec<f64> = query.iter().map(|(_, c)| *c).collect();
            let c: Vec<f64> = candidate.iter().map(|(_, c)| *c).collect();
            cosine_similarity(&q, &c)
        }
        VectorMode::SharedVocabulary => {
            let (q, c) = align_vocabulary(query, candidate);
            cosine_similarity(&q, &c)
        }
    }
}

/// Input for the Similarity Retriever transform.
#[derive(Debug, Clone)]
pub struct SimilarityRetrieverInput {
    pub query: String,
    pub corpus: Vec<MatchRecord>,
    pub top_k: usize,
}

/// Similarity Retriever transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityRetriever {
    mode: VectorMode,
}

impl SimilarityRetriever {
    pub fn new(mode: VectorMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> VectorMode {
        self.mode
    }
}

impl Transform for SimilarityRetriever {
    type Input = SimilarityRetrieverInput;
    type Output = Vec<SimilarityResult>;

    fn name(&self) -> &'static str {
        "similarity_retriever"
    }

    fn execute(&self, input: Self::Input) -> Result<TransformOutput<Self::Output>, TransformError> {
        Ok(TransformOutput::new(retrieve_with_mode(
            &input.query,
            &input.corpus,
            input.top_k,
            self.mode,
        )))
    }
}
