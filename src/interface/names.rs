use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::types::BenchmarkDescriptor;

/// File written by an instrumented binary in its working directory.
pub const DEFAULT_PROFILE_OUTPUT: &str = "llvmprof.out";

lazy_static! {
    /// Bytes that may not appear verbatim in an artifact name.
    static ref UNSAFE: Regex = Regex::new(r"[^A-Za-z0-9.\-]").unwrap();
}

/// Escape ARG so it is usable inside a file name. The escape is injective:
/// `_` only ever appears as the start of a `_XX` hex sequence.
pub fn escape_argument(arg: &str) -> String {
    UNSAFE
        .replace_all(arg, |caps: &Captures| {
            caps[0].bytes().map(|b| format!("_{:02x}", b)).collect::<String>()
        })
        .into_owned()
}

/// Names of every artifact built for one benchmark.
#[derive(Clone, Debug)]
pub struct Artifacts {
    dir: PathBuf,
    stem: String,
    input: String,
}

impl Artifacts {
    pub fn new(dir: &Path, bench: &BenchmarkDescriptor) -> Self {
        return Self {
            dir: dir.to_path_buf(),
            stem: bench.stem(),
            input: escape_argument(&bench.runtime_argument),
        };
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{}", self.stem, suffix))
    }

    /// Unoptimized bitcode.
    pub fn bitcode(&self) -> PathBuf {
        self.with_suffix(".bc")
    }

    /// Bitcode with edge profiling inserted.
    pub fn profiled_bitcode(&self) -> PathBuf {
        self.with_suffix(".profile.bc")
    }

    /// Instrumented executable.
    pub fn profiling_binary(&self) -> PathBuf {
        self.with_suffix(".profile")
    }

    /// Profile data recorded for this benchmark & input.
    pub fn profile_data(&self) -> PathBuf {
        self.with_suffix(&format!(".profile.{}.out", self.input))
    }

    /// Bitcode inlined with the stock heuristic.
    pub fn reference_bitcode(&self) -> PathBuf {
        self.with_suffix(".opt.bc")
    }

    pub fn reference_binary(&self) -> PathBuf {
        self.with_suffix(".opt")
    }

    /// Bitcode inlined with the profile guided heuristic.
    pub fn heuristic_bitcode(&self) -> PathBuf {
        self.with_suffix(&format!(".pgo_opt.{}.bc", self.input))
    }

    pub fn heuristic_binary(&self) -> PathBuf {
        self.with_suffix(&format!(".pgo_opt.{}", self.input))
    }
}
