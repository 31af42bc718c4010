//! Engineered team features.

use serde::{Deserialize, Serialize};

/// Neutral value for rate-like features when there is no data.
pub const NEUTRAL_RATE: f64 = 0.5;

/// Neutral value for the win-rate trend when there is no data.
pub const NEUTRAL_TREND: f64 = 0.0;

/// Fixed-shape feature vector derived from a team's match history.
///
/// Fields are computed independently; a field holding its neutral default
/// may mean either "no data" or a computed neutral value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Recent form against overall form, in [-1, 1].
    #[serde(default = "neutral_trend", alias = "winRateTrend")]
    pub win_rate_trend: f64,

    /// Short matches score high, in [0, 1].
    #[serde(default = "neutral_rate", alias = "tempoScore")]
    pub tempo_score: f64,

    /// Share of decisive wins among close losses and decisive wins, in [0, 1].
    #[serde(default = "neutral_rate", alias = "comebackProbability")]
    pub comeback_probability: f64,

    /// Fraction of matches won, in [0, 1].
    #[serde(default = "neutral_rate", alias = "winRate")]
    pub win_rate: f64,
}

fn neutral_rate() -> f64 {
    NEUTRAL_RATE
}

fn neutral_trend() -> f64 {
    NEUTRAL_TREND
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            win_rate_trend: NEUTRAL_TREND,
            tempo_score: NEUTRAL_RATE,
            comeback_probability: NEUTRAL_RATE,
            win_rate: NEUTRAL_RATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_feature_vector_wire_names() {
        let features = FeatureVector {
            win_rate_trend: 0.25,
            tempo_score: 0.4,
            comeback_probability: 1.0,
            win_rate: 0.75,
        };

        let value = serde_json::to_value(features).unwrap();
        assert_eq!(
            value,
            json!({
                "win_rate_trend": 0.25,
                "tempo_score": 0.4,
                "comeback_probability": 1.0,
                "win_rate": 0.75
            })
        );
    }

    #[test]
    fn test_feature_vector_missing_fields_default() {
        let features: FeatureVector = serde_json::from_value(json!({ "win_rate": 0.8 })).unwrap();

        assert_eq!(features.win_rate, 0.8);
        assert_eq!(features.tempo_score, 0.5);
        assert_eq!(features.comeback_probability, 0.5);
        assert_eq!(features.win_rate_trend, 0.0);
    }

    #[test]
    fn test_feature_vector_camel_case_alias() {
        let features: FeatureVector =
            serde_json::from_value(json!({ "winRate": 0.9, "tempoScore": 0.1, "extra": true }))
                .unwrap();

        assert_eq!(features.win_rate, 0.9);
        assert_eq!(features.tempo_score, 0.1);
    }

    #[test]
    fn test_feature_vector_default_is_neutral() {
        let features = FeatureVector::default();
        assert_eq!(features.win_rate, NEUTRAL_RATE);
        assert_eq!(features.win_rate_trend, NEUTRAL_TREND);
    }
}
