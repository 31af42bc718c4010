//! Side-channel report of records skipped during feature extraction.

use serde::{Deserialize, Serialize};

/// Metric that skipped a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TempoScore,
    ComebackProbability,
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::TempoScore => write!(f, "tempo_score"),
            Metric::ComebackProbability => write!(f, "comeback_probability"),
        }
    }
}

/// Why a record was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Score text did not match "A-B" / "A - B".
    UnparsableScore { score: String },
    /// Score parsed but no rounds were played.
    ZeroRounds,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnparsableScore { score } => write!(f, "unparsable score {:?}", score),
            SkipReason::ZeroRounds => write!(f, "zero rounds played"),
        }
    }
}

/// One skipped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position of the record in the input list.
    pub index: usize,
    pub metric: Metric,
    pub reason: SkipReason,
}

/// Records skipped by any metric, in the order they were encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub skipped: Vec<SkippedRecord>,
}

impl Diagnostics {
    pub fn skip(&mut self, index: usize, metric: Metric, reason: SkipReason) {
        self.skipped.push(SkippedRecord {
            index,
            metric,
            reason,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Number of records skipped by the given metric.
    pub fn count_for(&self, metric: Metric) -> usize {
        self.skipped.iter().filter(|s| s.metric == metric).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_diagnostics_counts() {
        let mut diag = Diagnostics::default();
        assert!(diag.is_empty());

        diag.skip(0, Metric::TempoScore, SkipReason::ZeroRounds);
        diag.skip(
            2,
            Metric::ComebackProbability,
            SkipReason::UnparsableScore {
                score: "abc".to_string(),
            },
        );
        diag.skip(
            2,
            Metric::TempoScore,
            SkipReason::UnparsableScore {
                score: "abc".to_string(),
            },
        );

        assert!(!diag.is_empty());
        assert_eq!(diag.count_for(Metric::TempoScore), 2);
        assert_eq!(diag.count_for(Metric::ComebackProbability), 1);
    }

    #[test]
    fn test_skipped_record_serialization() {
        let record = SkippedRecord {
            index: 3,
            metric: Metric::ComebackProbability,
            reason: SkipReason::UnparsableScore {
                score: "13-".to_string(),
            },
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "index": 3,
                "metric": "comeback_probability",
                "reason": { "kind": "unparsable_score", "score": "13-" }
            })
        );
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(format!("{}", SkipReason::ZeroRounds), "zero rounds played");
        assert_eq!(format!("{}", Metric::TempoScore), "tempo_score");
    }
}
