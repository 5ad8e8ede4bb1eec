use log::{debug, info};

use super::{Objective, Scored, SearchOutcome};
use crate::config::Straight;
use crate::error::Result;
use crate::types::{HeuristicVariant, ParameterPoint};

/// Points sampled along the ray `multiplier = -2 * offset`, excluding the
/// origin. The coarse sweep continues past the last fine sample.
pub fn ray_samples(config: &Straight) -> Vec<ParameterPoint> {
    let samples = config.samples as i64;
    let mut points: Vec<ParameterPoint> = (1..=samples)
        .map(|i| ParameterPoint::on_ray(config.step.saturating_mul(i)))
        .collect();

    if let Some(coarse) = config.coarse_step {
        let end = config.step.saturating_mul(samples);
        points.extend((1..=config.coarse_samples as i64).map(|i| {
            ParameterPoint::on_ray(end.saturating_add(coarse.saturating_mul(i)))
        }));
    }

    return points;
}

/// Sweep the ray for a starting point for the hill climber. The origin is
/// always a candidate, and on a tie the earlier sample wins.
pub fn straight_search(
    objective: &mut dyn Objective,
    variant: HeuristicVariant,
    config: &Straight,
) -> Result<SearchOutcome> {
    info!("Starting straight search of {} heuristic", variant);

    let origin = ParameterPoint::ORIGIN;
    let mut best = Scored { point: origin, score: objective.measure(origin, variant)? };
    let mut trace = vec![best];
    let mut evaluations = 1;

    for point in ray_samples(config) {
        let score = objective.measure(point, variant)?;
        evaluations += 1;
        debug!("Straight search: {:.3} at {}", score, point);

        if score < best.score {
            best = Scored { point, score };
            trace.push(best);
        }
    }

    info!("Straight search best: {:.3} at {}", best.score, best.point);
    return Ok(SearchOutcome {
        point: best.point,
        score: best.score,
        evaluations,
        iterations: 1,
        trace,
    });
}
