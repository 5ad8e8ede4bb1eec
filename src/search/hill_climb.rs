use log::{debug, info};

use super::{Objective, Scored, SearchOutcome};
use crate::config::{ClimbStrategy, HillClimb};
use crate::error::Result;
use crate::types::{Dimension, HeuristicVariant, ParameterPoint};

/// Step multipliers tried along each axis by the simple strategy.
const SIMPLE_CANDIDATES: [f64; 4] = [-1.0, -0.5, 0.5, 1.0];

fn accelerated_candidates(acceleration: f64) -> [f64; 5] {
    [-acceleration, -1.0 / acceleration, 0.0, 1.0 / acceleration, acceleration]
}

/// Coordinate-wise local search from START. Only moves on an improvement of
/// at least `epsilon`, and stops once a full sweep over both axes makes none.
pub fn hill_climb(
    objective: &mut dyn Objective,
    start: ParameterPoint,
    variant: HeuristicVariant,
    config: &HillClimb,
) -> Result<SearchOutcome> {
    info!("Starting hill climb of {} heuristic from {}", variant, start);

    let climb = Climb::new(objective, start, variant, config)?;
    let outcome = match config.strategy {
        ClimbStrategy::Simple => climb.simple()?,
        ClimbStrategy::Accelerated => climb.accelerated(config.acceleration)?,
    };

    info!("Hill climb found best: {:.3} at {}", outcome.score, outcome.point);
    return Ok(outcome);
}

struct Climb<'a> {
    objective: &'a mut dyn Objective,
    variant: HeuristicVariant,
    epsilon: f64,
    initial_steps: [f64; 2],
    step_sizes: [f64; 2],

    // Always the measured score of the current point
    current: Scored,

    evaluations: usize,
    iterations: usize,
    trace: Vec<Scored>,
}

impl<'a> Climb<'a> {
    fn new(
        objective: &'a mut dyn Objective,
        start: ParameterPoint,
        variant: HeuristicVariant,
        config: &HillClimb,
    ) -> Result<Self> {
        let score = objective.measure(start, variant)?;
        let current = Scored { point: start, score };
        info!("Baseline: {:.3} at {}", score, start);

        return Ok(Self {
            objective,
            variant,
            epsilon: config.epsilon,
            initial_steps: config.step_sizes,
            step_sizes: config.step_sizes,
            current,
            evaluations: 1,
            iterations: 0,
            trace: vec![current],
        });
    }

    /// Measure the current point displaced along DIM by FACTOR steps.
    fn trial(&mut self, dim: Dimension, factor: f64) -> Result<Scored> {
        let point = self
            .current
            .point
            .displaced(dim, self.step_sizes[dim.index()] * factor);
        let score = self.objective.measure(point, self.variant)?;
        self.evaluations += 1;
        debug!("Trial: {:.3} at {}", score, point);
        return Ok(Scored { point, score });
    }

    fn move_to(&mut self, next: Scored) {
        info!(
            "Move from {} to {} ({:.3} -> {:.3})",
            self.current.point, next.point, self.current.score, next.score
        );
        self.current = next;
        self.trace.push(next);
    }

    /// Try every candidate on both axes from the same point, then jump to
    /// the single best trial. Only moves on an improvement of at least
    /// `epsilon`, so the result is a fixed point of another simple climb.
    fn simple(mut self) -> Result<SearchOutcome> {
        loop {
            self.iterations += 1;

            let mut best: Option<Scored> = None;
            for dim in Dimension::ALL {
                for factor in SIMPLE_CANDIDATES {
                    let trial = self.trial(dim, factor)?;
                    if best.map_or(true, |b| trial.score < b.score) {
                        best = Some(trial);
                    }
                }
            }

            match best {
                Some(best) if self.current.score - best.score >= self.epsilon => {
                    self.move_to(best);
                }
                _ => return Ok(self.finish()),
            }
        }
    }

    /// Improve one axis at a time, in place. A winning candidate also
    /// rescales that axis' step, so steps grow while moves keep succeeding.
    /// Once a sweep makes no move, the point is swept again with the initial
    /// steps and only returned if that sweep cannot improve it either, so the
    /// result is a fixed point of another accelerated climb.
    fn accelerated(mut self, acceleration: f64) -> Result<SearchOutcome> {
        let candidates = accelerated_candidates(acceleration);

        loop {
            self.iterations += 1;
            if self.accelerated_sweep(&candidates)? {
                continue;
            }
            if self.step_sizes == self.initial_steps {
                return Ok(self.finish());
            }
            debug!("Checking {} with the initial step sizes", self.current.point);
            self.step_sizes = self.initial_steps;
        }
    }

    /// One coordinate-wise sweep. Returns whether any axis moved.
    fn accelerated_sweep(&mut self, candidates: &[f64]) -> Result<bool> {
        let mut moved = false;

        for dim in Dimension::ALL {
            let mut best: Option<(f64, Scored)> = None;
            for &factor in candidates {
                // The zero candidate is the current point, already measured
                let trial = if factor == 0.0 {
                    self.current
                } else {
                    self.trial(dim, factor)?
                };
                if best.map_or(true, |(_, b)| trial.score < b.score) {
                    best = Some((factor, trial));
                }
            }

            match best {
                Some((factor, trial))
                    if factor != 0.0 && self.current.score - trial.score >= self.epsilon =>
                {
                    self.move_to(trial);
                    self.step_sizes[dim.index()] *= factor;
                    moved = true;
                }
                _ => {}
            }
        }

        return Ok(moved);
    }

    fn finish(self) -> SearchOutcome {
        SearchOutcome {
            point: self.current.point,
            score: self.current.score,
            evaluations: self.evaluations,
            iterations: self.iterations,
            trace: self.trace,
        }
    }
}
