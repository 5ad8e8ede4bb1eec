//! Derivative-free search over the heuristic's parameter space.

mod hill_climb;
mod straight;

use serde::Serialize;

use crate::error::Result;
use crate::types::{HeuristicVariant, ParameterPoint};

pub use hill_climb::hill_climb;
pub use straight::{ray_samples, straight_search};

/// The function the search minimizes.
pub trait Objective {
    /// Total elapsed seconds of the benchmark suite built at POINT.
    fn measure(&mut self, point: ParameterPoint, variant: HeuristicVariant) -> Result<f64>;
}

impl<F> Objective for F
where
    F: FnMut(ParameterPoint, HeuristicVariant) -> Result<f64>,
{
    fn measure(&mut self, point: ParameterPoint, variant: HeuristicVariant) -> Result<f64> {
        self(point, variant)
    }
}

/// A point together with its measured score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Scored {
    pub point: ParameterPoint,
    pub score: f64,
}

/// Result of one search stage.
#[derive(Clone, Debug, Serialize)]
pub struct SearchOutcome {
    pub point: ParameterPoint,
    pub score: f64,
    /// Number of times the objective was evaluated.
    pub evaluations: usize,
    pub iterations: usize,
    /// Every point the search moved to, starting with its initial point.
    pub trace: Vec<Scored>,
}
