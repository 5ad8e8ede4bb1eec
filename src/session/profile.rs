use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::Toolchain;
use crate::error::{Result, TuneError};
use crate::interface::{Artifacts, BuildPipeline, Executor, DEFAULT_PROFILE_OUTPUT};
use crate::types::BenchmarkDescriptor;

/// A benchmark & the profile recorded for its runtime argument.
#[derive(Clone, Debug)]
pub struct ProfiledBenchmark {
    pub bench: BenchmarkDescriptor,
    pub profile: PathBuf,
}

/// Record an edge profile for every benchmark, in registry order. Any
/// failure aborts, since later builds are meaningless without the profile.
pub fn generate_profiles(
    benchmarks: &[BenchmarkDescriptor],
    toolchain: &Toolchain,
    pipeline: &mut dyn BuildPipeline,
    executor: &mut dyn Executor,
) -> Result<Vec<ProfiledBenchmark>> {
    let runtime = toolchain.profile_runtime_path();
    let mut acc = vec![];

    for bench in benchmarks {
        let names = Artifacts::new(&toolchain.work_dir, bench);

        info!("Compiling {} to bitcode", bench.identifier);
        let bitcode = pipeline.compile_baseline(bench)?;

        info!("Adding profiling information to {}", bench.identifier);
        let instrumented = pipeline.instrument_for_profiling(bench, &bitcode)?;
        let binary = pipeline.link(
            bench,
            &instrumented,
            &[runtime.clone()],
            &names.profiling_binary(),
        )?;

        info!("Generating profile for {}", bench.identifier);
        let profile = record_profile(&toolchain.work_dir, bench, &binary, &names, executor)?;
        acc.push(ProfiledBenchmark { bench: bench.clone(), profile });
    }

    return Ok(acc);
}

/// Run the instrumented BINARY once & move its profile output out of the
/// way of the next benchmark.
fn record_profile(
    work_dir: &Path,
    bench: &BenchmarkDescriptor,
    binary: &Path,
    names: &Artifacts,
    executor: &mut dyn Executor,
) -> Result<PathBuf> {
    let default_output = work_dir.join(DEFAULT_PROFILE_OUTPUT);
    remove_stale_profile(&default_output)?;

    executor.run_and_time(binary, &bench.runtime_args())?;

    let profile = names.profile_data();
    match fs::rename(&default_output, &profile) {
        Ok(()) => {}
        Err(source) if source.kind() == ErrorKind::NotFound => {
            return Err(TuneError::ProfileArtifactMissing {
                benchmark: bench.identifier.clone(),
                expected: default_output,
                source,
            });
        }
        Err(e) => return Err(e.into()),
    }

    info!("Profile for {} written to {:?}", bench.identifier, profile);
    return Ok(profile);
}

/// Delete a leftover default profile output. Not having one is fine.
fn remove_stale_profile(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            warn!("Removed stale profile output {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
