//! Numeric building blocks shared by the transforms.
//!
//! - Rates, means and rolling means over win indicators
//! - Clipping and decimal rounding
//! - Bag-of-words vectors and cosine similarity

use std::collections::HashMap;

/// Calculate win rate from a win count and a match count.
/// Returns `default` when there are no matches.
pub fn calculate_win_rate(wins: usize, total: usize, default: f64) -> f64 {
    if total == 0 {
        default
    } else {
        wins as f64 / total as f64
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Mean of the last `window` values (fewer if the slice is shorter).
/// This is the value of a minimum-period-1 rolling mean at the final position.
pub fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    let start = values.len().saturating_sub(window.max(1));
    mean(&values[start..])
}

/// Clamp `value` into `[lo, hi]`.
pub fn clip(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Bag-of-words counts for `text`: lower-cased, whitespace-split, one entry
/// per distinct token in first-occurrence order.
pub fn bag_of_words(text: &str) -> Vec<(String, f64)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, f64)> = Vec::new();

    for token in text.to_lowercase().split_whitespace() {
        match index.get(token) {
            Some(&i) => counts[i].1 += 1.0,
            None => {
                index.insert(token.to_string(), counts.len());
                counts.push((token.to_string(), 1.0));
            }
        }
    }

    counts
}

/// Cosine similarity between two count vectors compared index by index.
/// Extra entries of the longer vector are ignored in the dot product but
/// still count towards its norm. Zero if either norm is zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a * norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}

/// Align two bags of words on the union of their tokens and return the
/// dense count vectors, in first-occurrence order across `a` then `b`.
pub fn align_vocabulary(a: &[(String, f64)], b: &[(String, f64)]) -> (Vec<f64>, Vec<f64>) {
    let mut vocab: HashMap<&str, usize> = HashMap::new();
    for (token, _) in a.iter().chain(b.iter()) {
        let next = vocab.len();
        vocab.entry(token.as_str()).or_insert(next);
    }

    let dense = |bag: &[(String, f64)]| {
        let mut v = vec![0.0; vocab.len()];
        for (token, count) in bag {
            v[vocab[token.as_str()]] = *count;
        }
        v
    };

    (dense(a), dense(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_win_rate() {
        assert!((calculate_win_rate(5, 6, 0.5) - 0.833).abs() < 0.01);
        assert_eq!(calculate_win_rate(0, 0, 0.5), 0.5);
        assert_eq!(calculate_win_rate(3, 6, 0.5), 0.5);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 0.0, 1.0, 0.0]), Some(0.5));
    }

    #[test]
    fn test_trailing_mean_window() {
        let wins = [1.0, 1.0, 0.0, 0.0, 1.0];
        let last = trailing_mean(&wins, 3).unwrap();
        assert!((last - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_trailing_mean_short_sequence() {
        assert_eq!(trailing_mean(&[1.0, 0.0], 3), Some(0.5));
        assert_eq!(trailing_mean(&[], 3), None);
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clip(-0.2, 0.0, 1.0), 0.0);
        assert_eq!(clip(0.3, -1.0, 1.0), 0.3);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(0.9999, 3), 1.0);
        assert_eq!(round_to(2.0 / 3.0, 3), 0.667);
    }

    #[test]
    fn test_bag_of_words_first_occurrence_order() {
        let bag = bag_of_words("C9 win  c9 T1\twin c9");
        assert_eq!(
            bag,
            vec![
                ("c9".to_string(), 3.0),
                ("win".to_string(), 2.0),
                ("t1".to_string(), 1.0),
            ]
        );
    }

    #[test]
    fn test_bag_of_words_empty() {
        assert!(bag_of_words("   ").is_empty());
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((sim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_zero_norm() {
        assert_eq!(cosine_similarity(&[], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_uneven_lengths() {
        // dot = 1, norms = 1 and sqrt(2)
        let sim = cosine_similarity(&[1.0], &[1.0, 1.0]);
        assert!((sim - 1.0 / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_align_vocabulary() {
        let a = bag_of_words("c9 win t1");
        let b = bag_of_words("g2 win");
        let (va, vb) = align_vocabulary(&a, &b);

        assert_eq!(va, vec![1.0, 1.0, 1.0, 0.0]);
        assert_eq!(vb, vec![0.0, 1.0, 0.0, 1.0]);
    }
}
