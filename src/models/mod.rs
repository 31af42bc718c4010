//! Core data models.

mod diagnostics;
mod features;
mod match_record;
mod score;
mod similarity;
mod simulation;

pub use diagnostics::*;
pub use features::*;
pub use match_record::*;
pub use score::*;
pub use similarity::*;
pub use simulation::*;
