use match_insight::config::{default_corpus, AppConfig};
use match_insight::pipeline::Pipeline;
use match_insight::transforms::{base_probability, extract, retrieve, MatchSimulator};
use match_insight::{MatchRecord, MatchResult};
use serde_json::json;

fn history() -> Vec<MatchRecord> {
    vec![
        MatchRecord::new("C9", MatchResult::Loss, "9-13", "FNC"),
        MatchRecord::new("C9", MatchResult::Win, "13-5", "T1"),
        MatchRecord::new("C9", MatchResult::Loss, "11-13", "G2"),
        MatchRecord::new("C9", MatchResult::Win, "13-3", "NAVI"),
        MatchRecord::new("C9", MatchResult::Win, "13-8", "LOUD"),
    ]
}

#[test]
fn extract_then_simulate() {
    let features = extract(&history()).data;

    assert_eq!(features.win_rate, 0.6);
    // Last three: loss, win, win -> 2/3 against 3/5 overall
    assert!((features.win_rate_trend - (2.0 / 3.0 - 0.6)).abs() < 1e-12);
    // Near losses: 11-13; decisive wins: 13-5, 13-3, 13-8
    assert_eq!(features.comeback_probability, 0.75);
    assert!((0.0..=1.0).contains(&features.tempo_score));

    let base = base_probability(&features);
    let result = MatchSimulator::new(5000)
        .with_seed(Some(2024))
        .run(&features)
        .unwrap();
    assert!((result.predicted_win_probability - base).abs() <= 0.05);
}

#[test]
fn retrieve_then_extract() {
    let similar = retrieve("C9 win NAVI", &default_corpus(), 2);
    let records: Vec<MatchRecord> = similar.into_iter().map(|r| r.record).collect();

    let features = extract(&records).data;
    assert_eq!(features.win_rate, 0.5);
}

#[test]
fn json_round_trip_through_pipeline() {
    let pipeline = Pipeline::new(&AppConfig::default(), default_corpus()).with_seed(Some(9));

    let body = json!({ "matches": history() }).to_string();
    let features = pipeline.features(&body).unwrap();
    let simulated = pipeline.simulate(&features.to_string()).unwrap();
    let predicted = pipeline.predict(&body).unwrap();

    // Same seed, same features, same sample count
    assert_eq!(
        simulated["predicted_win_probability"],
        predicted["predicted_win_probability"]
    );
}

#[test]
fn retrieve_more_than_corpus() {
    let results = retrieve("anything", &default_corpus(), 50);
    assert_eq!(results.len(), 3);
    assert_eq!(
        results.iter().map(|r| r.rank).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}
