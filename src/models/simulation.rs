//! Win-probability simulation results.

use serde::{Deserialize, Serialize};

/// Output of the match simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Fraction of simulated matches won, rounded to 3 decimals.
    pub predicted_win_probability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_result_serialization() {
        let result = SimulationResult {
            predicted_win_probability: 0.512,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"predicted_win_probability":0.512}"#);
    }
}
