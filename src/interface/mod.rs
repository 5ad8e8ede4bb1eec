//! Contracts of the external collaborators the search is driven through.

pub mod llvm;
pub mod names;
pub mod process;
pub mod timer;

#[cfg(test)]
pub mod mock;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{BenchmarkDescriptor, HeuristicVariant, ParameterPoint};

pub use llvm::LlvmToolchain;
pub use names::{Artifacts, DEFAULT_PROFILE_OUTPUT};
pub use timer::WallClockTimer;

/// Produces the binaries the search measures.
///
/// Every method rebuilds its outputs in place, so callers must never have
/// two builds of the same benchmark in flight. Taking `&mut self` enforces
/// that for a single adapter.
pub trait BuildPipeline {
    /// Compile BENCH to unoptimized intermediate form.
    fn compile_baseline(&mut self, bench: &BenchmarkDescriptor) -> Result<PathBuf>;

    /// Insert edge profiling instrumentation into ARTIFACT.
    fn instrument_for_profiling(
        &mut self,
        bench: &BenchmarkDescriptor,
        artifact: &Path,
    ) -> Result<PathBuf>;

    /// Link ARTIFACT & EXTRA_LIBS into the executable OUTPUT using the
    /// benchmark's flags.
    fn link(
        &mut self,
        bench: &BenchmarkDescriptor,
        artifact: &Path,
        extra_libs: &[PathBuf],
        output: &Path,
    ) -> Result<PathBuf>;

    /// Build BENCH with the stock inlining heuristic.
    fn build_reference(&mut self, bench: &BenchmarkDescriptor) -> Result<PathBuf>;

    /// Build BENCH with the profile guided heuristic configured by POINT & VARIANT.
    fn build_with_heuristic(
        &mut self,
        bench: &BenchmarkDescriptor,
        point: ParameterPoint,
        variant: HeuristicVariant,
        profile: &Path,
    ) -> Result<PathBuf>;
}

/// Runs binaries & reports how long they took.
pub trait Executor {
    /// Run EXECUTABLE with ARGS, returning the elapsed wall-clock seconds.
    fn run_and_time(&mut self, executable: &Path, args: &[String]) -> Result<f64>;
}
