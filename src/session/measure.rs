use std::collections::HashMap;

use log::{debug, info};

use super::profile::ProfiledBenchmark;
use crate::config::Measure;
use crate::error::Result;
use crate::interface::{BuildPipeline, Executor};
use crate::search::Objective;
use crate::types::{HeuristicVariant, ParameterPoint};

// =============================================================================
// Cache
// =============================================================================

/// Memoized objective values. Only valid while the toolchain & profiles are
/// unchanged, so it is cleared before each variant's search.
#[derive(Debug, Default)]
pub struct MeasureCache {
    scores: HashMap<(HeuristicVariant, i64, i64), f64>,
    hits: usize,
}

impl MeasureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, variant: HeuristicVariant, point: ParameterPoint) -> Option<f64> {
        let score = self.scores.get(&(variant, point.offset, point.multiplier)).copied();
        if score.is_some() {
            self.hits += 1;
        }
        return score;
    }

    pub fn insert(&mut self, variant: HeuristicVariant, point: ParameterPoint, score: f64) {
        self.scores.insert((variant, point.offset, point.multiplier), score);
    }

    pub fn clear(&mut self) {
        self.scores.clear();
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
}

// =============================================================================
// Measurement
// =============================================================================

/// The objective: rebuild every benchmark at a point & sum its timed runs.
pub struct Measurement<'a> {
    benchmarks: &'a [ProfiledBenchmark],
    pipeline: &'a mut dyn BuildPipeline,
    executor: &'a mut dyn Executor,
    repetitions: usize,
    cache: Option<MeasureCache>,
    builds: usize,
}

impl<'a> Measurement<'a> {
    pub fn new(
        benchmarks: &'a [ProfiledBenchmark],
        pipeline: &'a mut dyn BuildPipeline,
        executor: &'a mut dyn Executor,
        config: &Measure,
    ) -> Self {
        let cache = if config.memoize { Some(MeasureCache::new()) } else { None };
        return Self {
            benchmarks,
            pipeline,
            executor,
            repetitions: config.repetitions,
            cache,
            builds: 0,
        };
    }

    /// Forget every memoized score.
    pub fn clear_cache(&mut self) {
        if let Some(cache) = &mut self.cache {
            debug!("Clearing {} cached measurements", cache.len());
            cache.clear();
        }
    }

    pub fn cache(&self) -> Option<&MeasureCache> {
        self.cache.as_ref()
    }

    /// Number of points that were actually rebuilt & timed.
    pub fn builds(&self) -> usize {
        self.builds
    }

    /// Time every benchmark built with the stock inliner.
    pub fn measure_reference(&mut self) -> Result<f64> {
        info!("Measuring reference builds");
        let mut total = 0.0;
        for profiled in self.benchmarks {
            let binary = self.pipeline.build_reference(&profiled.bench)?;
            let args = profiled.bench.runtime_args();
            for _ in 0..self.repetitions {
                total += self.executor.run_and_time(&binary, &args)?;
            }
        }
        info!("Reference result: {:.3}", total);
        return Ok(total);
    }
}

impl Objective for Measurement<'_> {
    fn measure(&mut self, point: ParameterPoint, variant: HeuristicVariant) -> Result<f64> {
        if let Some(score) = self.cache.as_mut().and_then(|c| c.get(variant, point)) {
            debug!("Cached {} heuristic at {}: {:.3}", variant, point, score);
            return Ok(score);
        }

        info!("Measuring {} heuristic at {}", variant, point);
        let mut total = 0.0;
        for profiled in self.benchmarks {
            let binary = self.pipeline.build_with_heuristic(
                &profiled.bench,
                point,
                variant,
                &profiled.profile,
            )?;

            // Repeat to even out noise in the wall clock
            let args = profiled.bench.runtime_args();
            for _ in 0..self.repetitions {
                total += self.executor.run_and_time(&binary, &args)?;
            }
        }
        self.builds += 1;
        info!("Result: {:.3}", total);

        if let Some(cache) = &mut self.cache {
            cache.insert(variant, point, total);
        }
        return Ok(total);
    }
}
