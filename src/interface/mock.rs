//! In-memory collaborators for exercising the search without a compiler.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::names::{Artifacts, DEFAULT_PROFILE_OUTPUT};
use super::{BuildPipeline, Executor};
use crate::error::{Result, TuneError};
use crate::types::{BenchmarkDescriptor, HeuristicVariant, ParameterPoint};

pub type Timing = Box<dyn Fn(ParameterPoint, HeuristicVariant) -> f64>;

/// What the mock collaborators have been asked to do.
#[derive(Default)]
pub struct MockState {
    /// One entry per build step, e.g. `"compile nbody.c"`.
    pub steps: Vec<String>,
    /// Every executable run, with its arguments.
    pub runs: Vec<(PathBuf, Vec<String>)>,
    /// Profile files handed to heuristic builds.
    pub profiles_used: Vec<PathBuf>,
    /// Configuration each executable was last built with; `None` for reference builds.
    built: HashMap<PathBuf, Option<(ParameterPoint, HeuristicVariant)>>,
}

impl MockState {
    pub fn heuristic_builds(&self) -> usize {
        self.steps.iter().filter(|s| s.starts_with("heuristic")).count()
    }
}

pub struct MockPipeline {
    state: Rc<RefCell<MockState>>,
    work_dir: PathBuf,
    /// Heuristic builds at this point fail.
    pub fail_at: Option<ParameterPoint>,
}

pub struct MockTimer {
    state: Rc<RefCell<MockState>>,
    work_dir: PathBuf,
    timing: Timing,
    pub reference_time: f64,
    /// Instrumented runs leave a profile output behind.
    pub write_profile: bool,
    /// Runs of executables with this file name fail.
    pub fail_run: Option<String>,
}

/// A pipeline & timer sharing one record of calls. Every timed run of a
/// heuristic build takes `timing(point, variant)` seconds.
pub fn toolchain(
    work_dir: &Path,
    timing: impl Fn(ParameterPoint, HeuristicVariant) -> f64 + 'static,
) -> (MockPipeline, MockTimer, Rc<RefCell<MockState>>) {
    let state = Rc::new(RefCell::new(MockState::default()));
    let pipeline = MockPipeline {
        state: Rc::clone(&state),
        work_dir: work_dir.to_path_buf(),
        fail_at: None,
    };
    let timer = MockTimer {
        state: Rc::clone(&state),
        work_dir: work_dir.to_path_buf(),
        timing: Box::new(timing),
        reference_time: 1.0,
        write_profile: true,
        fail_run: None,
    };
    return (pipeline, timer, state);
}

impl MockPipeline {
    fn step(&self, kind: &str, bench: &BenchmarkDescriptor) {
        self.state
            .borrow_mut()
            .steps
            .push(format!("{} {}", kind, bench.identifier));
    }
}

impl BuildPipeline for MockPipeline {
    fn compile_baseline(&mut self, bench: &BenchmarkDescriptor) -> Result<PathBuf> {
        self.step("compile", bench);
        return Ok(Artifacts::new(&self.work_dir, bench).bitcode());
    }

    fn instrument_for_profiling(
        &mut self,
        bench: &BenchmarkDescriptor,
        _artifact: &Path,
    ) -> Result<PathBuf> {
        self.step("instrument", bench);
        return Ok(Artifacts::new(&self.work_dir, bench).profiled_bitcode());
    }

    fn link(
        &mut self,
        bench: &BenchmarkDescriptor,
        _artifact: &Path,
        _extra_libs: &[PathBuf],
        output: &Path,
    ) -> Result<PathBuf> {
        self.step("link", bench);
        return Ok(output.to_path_buf());
    }

    fn build_reference(&mut self, bench: &BenchmarkDescriptor) -> Result<PathBuf> {
        self.step("reference", bench);
        let exe = Artifacts::new(&self.work_dir, bench).reference_binary();
        self.state.borrow_mut().built.insert(exe.clone(), None);
        return Ok(exe);
    }

    fn build_with_heuristic(
        &mut self,
        bench: &BenchmarkDescriptor,
        point: ParameterPoint,
        variant: HeuristicVariant,
        profile: &Path,
    ) -> Result<PathBuf> {
        if self.fail_at == Some(point) {
            return Err(TuneError::BuildFailure {
                command: format!("opt -pgi-off={} -pgi-mul={}", point.offset, point.multiplier),
                status: "exit code 1".to_string(),
                stderr: "mock failure".to_string(),
            });
        }

        self.step("heuristic", bench);
        let exe = Artifacts::new(&self.work_dir, bench).heuristic_binary();
        let mut state = self.state.borrow_mut();
        state.profiles_used.push(profile.to_path_buf());
        state.built.insert(exe.clone(), Some((point, variant)));
        return Ok(exe);
    }
}

impl Executor for MockTimer {
    fn run_and_time(&mut self, executable: &Path, args: &[String]) -> Result<f64> {
        self.state
            .borrow_mut()
            .runs
            .push((executable.to_path_buf(), args.to_vec()));

        let name = executable
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.fail_run.as_deref() == Some(name.as_str()) {
            return Err(TuneError::ExecutionFailure {
                command: executable.display().to_string(),
                status: "exit code 1".to_string(),
            });
        }

        // Instrumented binaries record which run produced the profile
        if name.ends_with(".profile") {
            if self.write_profile {
                let contents = format!("{} {}", name, args.join(" "));
                fs::write(self.work_dir.join(DEFAULT_PROFILE_OUTPUT), contents)?;
            }
            return Ok(0.0);
        }

        let built = self.state.borrow().built.get(executable).copied();
        match built {
            Some(Some((point, variant))) => Ok((self.timing)(point, variant)),
            Some(None) => Ok(self.reference_time),
            None => Err(TuneError::ExecutionFailure {
                command: executable.display().to_string(),
                status: "never built".to_string(),
            }),
        }
    }
}
