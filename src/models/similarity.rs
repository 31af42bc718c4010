//! Similarity retrieval results.

use serde::{Deserialize, Serialize};

use super::MatchRecord;

/// How bag-of-words vectors are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VectorMode {
    /// Counts are compared index by index in first-occurrence order,
    /// regardless of which token each index holds.
    #[default]
    Positional,
    /// Counts are aligned on the union of both token sets.
    SharedVocabulary,
}

impl std::fmt::Display for VectorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorMode::Positional => write!(f, "positional"),
            VectorMode::SharedVocabulary => write!(f, "shared_vocabulary"),
        }
    }
}

/// A retrieved match with its score and position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    #[serde(flatten)]
    pub record: MatchRecord,

    /// Cosine similarity, rounded to 3 decimals.
    pub similarity: f64,

    /// 1-based position after sorting.
    pub rank: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchResult;
    use serde_json::json;

    #[test]
    fn test_similarity_result_is_flat() {
        let result = SimilarityResult {
            record: MatchRecord::new("C9", MatchResult::Win, "13-5", "T1"),
            similarity: 1.0,
            rank: 1,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "teamName": "C9",
                "opponent": "T1",
                "result": "win",
                "score": "13-5",
                "similarity": 1.0,
                "rank": 1
            })
        );
    }

    #[test]
    fn test_vector_mode_serialization() {
        let json = serde_json::to_string(&VectorMode::SharedVocabulary).unwrap();
        assert_eq!(json, "\"shared_vocabulary\"");

        let mode: VectorMode = serde_json::from_str("\"positional\"").unwrap();
        assert_eq!(mode, VectorMode::Positional);
    }
}
