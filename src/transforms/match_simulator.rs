//! Match Simulator.
//!
//! Turns a feature vector into a win probability: a deterministic base
//! probability from weighted feature deviations, estimated by uniform sampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Transform, TransformError, TransformOutput};
use crate::calculate::{clip, round_to};
use crate::models::{FeatureVector, SimulationResult, NEUTRAL_RATE};

/// Default number of samples per simulation.
pub const DEFAULT_SIMULATIONS: usize = 1000;

const WIN_RATE_WEIGHT: f64 = 0.4;
const TEMPO_WEIGHT: f64 = 0.1;
const COMEBACK_WEIGHT: f64 = 0.1;

/// Bounds of the base probability.
pub const MIN_BASE_PROBABILITY: f64 = 0.1;
pub const MAX_BASE_PROBABILITY: f64 = 0.9;

const PROBABILITY_DECIMALS: i32 = 3;

/// Deterministic win probability implied by the features.
pub fn base_probability(features: &FeatureVector) -> f64 {
    let base = NEUTRAL_RATE
        + (features.win_rate - NEUTRAL_RATE) * WIN_RATE_WEIGHT
        + (features.tempo_score - NEUTRAL_RATE) * TEMPO_WEIGHT
        + (features.comeback_probability - NEUTRAL_RATE) * COMEBACK_WEIGHT;
    clip(base, MIN_BASE_PROBABILITY, MAX_BASE_PROBABILITY)
}

/// Estimate the win probability by drawing `num_simulations` samples from `rng`.
pub fn simulate_with_rng<R: Rng + ?Sized>(
    features: &FeatureVector,
    num_simulations: usize,
    rng: &mut R,
) -> Result<SimulationResult, TransformError> {
    if num_simulations == 0 {
        return Err(TransformError::InvalidInput(
            "num_simulations must be greater than 0".to_string(),
        ));
    }

    let base = base_probability(features);
    let wins = (0..num_simulations)
        .filter(|_| rng.gen::<f64>() < base)
        .count();

    Ok(SimulationResult {
        predicted_win_probability: round_to(
            wins as f64 / num_simulations as f64,
            PROBABILITY_DECIMALS,
        ),
    })
}

/// Estimate the win probability with the thread-local generator.
pub fn simulate(
    features: &FeatureVector,
    num_simulations: usize,
) -> Result<SimulationResult, TransformError> {
    simulate_with_rng(features, num_simulations, &mut rand::thread_rng())
}

/// Match Simulator transform.
///
/// Every call draws from its own generator: a `StdRng` seeded from `seed`
/// when one is set, the thread-local generator otherwise.
#[derive(Debug, Clone, Copy)]
pub struct MatchSimulator {
    num_simulations: usize,
    seed: Option<u64>,
}

impl Default for MatchSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATIONS)
    }
}

impl MatchSimulator {
    pub fn new(num_simulations: usize) -> Self {
        Self {
            num_simulations,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn num_simulations(&self) -> usize {
        self.num_simulations
    }

    pub fn run(&self, features: &FeatureVector) -> Result<SimulationResult, TransformError> {
        match self.seed {
            Some(seed) => {
                simulate_with_rng(features, self.num_simulations, &mut StdRng::seed_from_u64(seed))
            }
            None => simulate(features, self.num_simulations),
        }
    }
}

impl Transform for MatchSimulator {
    type Input = FeatureVector;
    type Output = SimulationResult;

    fn name(&self) -> &'static str {
        "match_simulator"
    }

    fn execute(&self, input: Self::Input) -> Result<TransformOutput<Self::Output>, TransformError> {
        self.run(&input).map(TransformOutput::new)
    }
}
