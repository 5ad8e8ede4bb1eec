//! One complete tuning session: profile once, then search each variant.

pub mod measure;
pub mod profile;
pub mod report;

use log::info;

use crate::config::Config;
use crate::error::Result;
use crate::interface::{BuildPipeline, Executor};
use crate::search::{hill_climb, straight_search};

pub use measure::{MeasureCache, Measurement};
pub use profile::{generate_profiles, ProfiledBenchmark};
pub use report::{SessionReport, VariantResult};

/// Profile every benchmark, then run the straight-line search & hill
/// climbing for each configured variant in order. Any failure aborts the
/// whole session without a report.
pub fn run_session(
    config: &Config,
    pipeline: &mut dyn BuildPipeline,
    executor: &mut dyn Executor,
) -> Result<SessionReport> {
    let profiled = generate_profiles(&config.benchmarks, &config.toolchain, pipeline, executor)?;
    let mut measurement = Measurement::new(&profiled, pipeline, executor, &config.measure);

    let reference_time = match config.measure.reference {
        true => Some(measurement.measure_reference()?),
        false => None,
    };

    let mut report = SessionReport::new(reference_time);
    for &variant in &config.variants {
        // Scores from another variant (or stale builds) must not leak in
        measurement.clear_cache();

        let seed = straight_search(&mut measurement, variant, &config.straight)?;
        let best = hill_climb(&mut measurement, seed.point, variant, &config.hill_climb)?;
        info!("---------- end search over {} heuristic ----------", variant);

        report.push(VariantResult { variant, seed, best });
    }

    info!("Session finished after {} measured points", measurement.builds());
    report.log_summary();
    return Ok(report);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClimbStrategy, Straight};
    use crate::error::TuneError;
    use crate::interface::mock;
    use crate::types::{BenchmarkDescriptor, HeuristicVariant, ParameterPoint};
    use std::path::Path;

    /// Each variant has its own minimum on the straight-line ray.
    fn timing(point: ParameterPoint, variant: HeuristicVariant) -> f64 {
        let target = match variant {
            HeuristicVariant::Logarithmic => ParameterPoint::new(-1500, 3000),
            HeuristicVariant::Linear => ParameterPoint::new(-3000, 6000),
        };
        let dx = (point.offset - target.offset) as f64;
        let dy = (point.multiplier - target.multiplier) as f64;
        return 0.1 + (dx * dx + dy * dy) / 1e7;
    }

    fn config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.toolchain.work_dir = dir.to_path_buf();
        config.benchmarks = vec![
            BenchmarkDescriptor::new("nbody.c", "500000", &["-lm"]),
            BenchmarkDescriptor::new("fft.c", "64", &["-std=c99", "-lm"]),
        ];
        config.measure.repetitions = 3;
        config.straight = Straight { step: 500, samples: 10, coarse_step: None, coarse_samples: 0 };
        config
    }

    #[test_log::test]
    fn searches_each_variant_independently() {
        let dir = tempfile::tempdir().unwrap();
        let (mut pipeline, mut timer, state) = mock::toolchain(dir.path(), timing);
        let config = config(dir.path());

        let report = run_session(&config, &mut pipeline, &mut timer).unwrap();

        let variants: Vec<_> = report.results.iter().map(|r| r.variant).collect();
        assert_eq!(variants, vec![HeuristicVariant::Logarithmic, HeuristicVariant::Linear]);

        let log = report.get(HeuristicVariant::Logarithmic).unwrap();
        assert_eq!(log.seed.point, ParameterPoint::new(-1500, 3000));
        assert_eq!(log.best_point(), ParameterPoint::new(-1500, 3000));

        let linear = report.get(HeuristicVariant::Linear).unwrap();
        assert_eq!(linear.seed.point, ParameterPoint::new(-3000, 6000));
        assert!(linear.best.score <= linear.seed.score);
        assert_eq!(report.reference_time, None);

        // Profiles are generated once for the whole session
        let instrumented = state.borrow().steps.iter().filter(|s| s.starts_with("instrument")).count();
        assert_eq!(instrumented, 2);
    }

    #[test_log::test]
    fn memoized_session_does_not_change_the_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        let (mut pipeline, mut timer, plain_state) = mock::toolchain(dir.path(), timing);
        let plain = run_session(&config, &mut pipeline, &mut timer).unwrap();

        config.measure.memoize = true;
        let (mut pipeline, mut timer, cached_state) = mock::toolchain(dir.path(), timing);
        let cached = run_session(&config, &mut pipeline, &mut timer).unwrap();

        for (a, b) in plain.results.iter().zip(&cached.results) {
            assert_eq!(a.best_point(), b.best_point());
            assert_eq!(a.best.score, b.best.score);
        }
        assert!(cached_state.borrow().heuristic_builds() < plain_state.borrow().heuristic_builds());
    }

    #[test_log::test]
    fn reference_time_is_reported_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.measure.reference = true;
        config.variants = vec![HeuristicVariant::Linear];
        config.hill_climb.strategy = ClimbStrategy::Accelerated;
        let (mut pipeline, mut timer, _state) = mock::toolchain(dir.path(), timing);
        timer.reference_time = 2.0;

        let report = run_session(&config, &mut pipeline, &mut timer).unwrap();
        assert_eq!(report.reference_time, Some(2.0 * 2.0 * 3.0));
        assert_eq!(report.results.len(), 1);
    }

    #[test_log::test]
    fn build_failure_ends_the_session_without_a_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let (mut pipeline, mut timer, _state) = mock::toolchain(dir.path(), timing);
        // Fails during the logarithmic straight-line search
        pipeline.fail_at = Some(ParameterPoint::new(-2000, 4000));

        let result = run_session(&config, &mut pipeline, &mut timer);
        match result {
            Err(TuneError::BuildFailure { command, .. }) => assert!(command.contains("-pgi-off=-2000")),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("session should not report a result"),
        }
    }

    #[test_log::test]
    fn failure_during_hill_climbing_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let (mut pipeline, mut timer, _state) = mock::toolchain(dir.path(), timing);
        // Neighbor of the logarithmic seed, only reached by the hill climber
        pipeline.fail_at = Some(ParameterPoint::new(-1900, 3000));

        let result = run_session(&config, &mut pipeline, &mut timer);
        assert!(matches!(result, Err(TuneError::BuildFailure { .. })));
    }
}
