//! Feature Extractor.
//!
//! Derives a `FeatureVector` from an ordered match history. Malformed
//! records are skipped per metric and reported in the diagnostics; they never
//! abort the extraction.

use super::{Transform, TransformError, TransformOutput};
use crate::calculate::{calculate_win_rate, clip, mean, trailing_mean};
use crate::models::{
    Diagnostics, FeatureVector, MatchRecord, Metric, Score, SkipReason, NEUTRAL_RATE,
    NEUTRAL_TREND,
};

/// Window of the rolling win-rate used for the trend.
pub const TREND_WINDOW: usize = 3;

/// Round count at which a match is considered maximally slow.
pub const TEMPO_ROUND_CAP: f64 = 30.0;

/// A loss by at most this many rounds counts as a near loss.
pub const CLOSE_LOSS_MARGIN: u32 = 2;

/// A win by at least this many rounds counts as decisive.
pub const DECISIVE_WIN_MARGIN: u32 = 4;

/// Score assumed for records that carry none.
const MISSING_SCORE: &str = "0 - 0";

/// Extract all features from `matches`.
pub fn extract(matches: &[MatchRecord]) -> TransformOutput<FeatureVector> {
    let mut diagnostics = Diagnostics::default();

    let features = FeatureVector {
        win_rate_trend: win_rate_trend(matches),
        tempo_score: tempo_score(matches, &mut diagnostics),
        comeback_probability: comeback_probability(matches, &mut diagnostics),
        win_rate: win_rate(matches),
    };

    TransformOutput::new(features).with_diagnostics(diagnostics)
}

/// Fraction of matches won; neutral for an empty history.
pub fn win_rate(matches: &[MatchRecord]) -> f64 {
    let wins = matches.iter().filter(|m| m.result.is_win()).count();
    calculate_win_rate(wins, matches.len(), NEUTRAL_RATE)
}

/// Rolling win rate at the last match minus the overall win rate.
pub fn win_rate_trend(matches: &[MatchRecord]) -> f64 {
    if matches.len() < 2 {
        return NEUTRAL_TREND;
    }

    let indicators: Vec<f64> = matches
        .iter()
        .map(|m| if m.result.is_win() { 1.0 } else { 0.0 })
        .collect();

    match (trailing_mean(&indicators, TREND_WINDOW), mean(&indicators)) {
        (Some(recent), Some(overall)) => clip(recent - overall, -1.0, 1.0),
        _ => NEUTRAL_TREND,
    }
}

/// Mean of `1 - rounds / 30` over matches with a usable score.
pub fn tempo_score(matches: &[MatchRecord], diagnostics: &mut Diagnostics) -> f64 {
    let mut tempos = Vec::with_capacity(matches.len());

    for (index, record) in matches.iter().enumerate() {
        let Some(score) = parse_score(record, index, Metric::TempoScore, diagnostics) else {
            continue;
        };

        let total = score.total_rounds();
        if total == 0 {
            diagnostics.skip(index, Metric::TempoScore, SkipReason::ZeroRounds);
            continue;
        }

        tempos.push(1.0 - total as f64 / TEMPO_ROUND_CAP);
    }

    clip(mean(&tempos).unwrap_or(NEUTRAL_RATE), 0.0, 1.0)
}

/// Decisive wins as a share of near losses plus decisive wins.
pub fn comeback_probability(matches: &[MatchRecord], diagnostics: &mut Diagnostics) -> f64 {
    let mut qualifying = 0usize;
    let mut comebacks = 0usize;

    for (index, record) in matches.iter().enumerate() {
        let Some(score) = parse_score(record, index, Metric::ComebackProbability, diagnostics)
        else {
            continue;
        };

        let margin = score.margin();
        if record.result.is_loss() && margin <= CLOSE_LOSS_MARGIN {
            qualifying += 1;
        } else if record.result.is_win() && margin >= DECISIVE_WIN_MARGIN {
            qualifying += 1;
            comebacks += 1;
        }
    }

    calculate_win_rate(comebacks, qualifying, NEUTRAL_RATE)
}

fn parse_score(
    record: &MatchRecord,
    index: usize,
    metric: Metric,
    diagnostics: &mut Diagnostics,
) -> Option<Score> {
    let raw = record.score.as_deref().unwrap_or(MISSING_SCORE);
    let score = Score::parse(raw);
    if score.is_none() {
        diagnostics.skip(
            index,
            metric,
            SkipReason::UnparsableScore {
                score: raw.to_string(),
            },
        );
    }
    score
}

/// Feature Extractor transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for FeatureExtractor {
    type Input = Vec<MatchRecord>;
    type Output = FeatureVector;

    fn name(&self) -> &'static str {
        "feature_extractor"
    }

    fn execute(&self, input: Self::Input) -> Result<TransformOutput<Self::Output>, TransformError> {
        Ok(extract(&input))
    }
}
