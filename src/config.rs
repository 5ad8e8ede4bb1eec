use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Local;
use lazy_static::lazy_static;
use log::LevelFilter;
use serde::Deserialize;

use crate::error::{Result, TuneError};
use crate::types::{BenchmarkDescriptor, HeuristicVariant};

lazy_static! {
    /// Benchmarks used when the configuration does not list any.
    static ref DEFAULT_BENCHMARKS: Vec<BenchmarkDescriptor> = vec![
        BenchmarkDescriptor::new("factor.c", "2000000", &[]),
        BenchmarkDescriptor::new("blocked.c", "900", &[]),
        BenchmarkDescriptor::new("kmeans.c", "1000000 10", &["-lm"]),
        BenchmarkDescriptor::new("huffman.c", "50000", &[]),
        BenchmarkDescriptor::new("aes.c", "500000", &[]),
    ];
}

/// Top level configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub toolchain: Toolchain,
    pub measure: Measure,
    pub straight: Straight,
    pub hill_climb: HillClimb,
    pub logging: Logging,
    pub variants: Vec<HeuristicVariant>,
    #[serde(rename = "benchmark")]
    pub benchmarks: Vec<BenchmarkDescriptor>,
}

/// Location of the compiler tools & the build artifacts.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Toolchain {
    /// Prepended to every tool path. Tools resolve relative to the current
    /// directory when unset.
    pub root: Option<PathBuf>,
    pub clang: PathBuf,
    pub opt: PathBuf,
    pub profile_runtime: PathBuf,
    /// Directory holding the benchmark sources, where all artifacts are written.
    pub work_dir: PathBuf,
}

/// Configuration for the objective function.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Measure {
    pub repetitions: usize,
    pub memoize: bool,
    pub reference: bool,
}

/// Configuration for the straight-line search.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Straight {
    pub step: i64,
    pub samples: u32,
    pub coarse_step: Option<i64>,
    pub coarse_samples: u32,
}

/// Candidate step multipliers used by the hill climber.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ClimbStrategy {
    Simple,
    Accelerated,
}

/// Configuration for the hill-climbing refinement.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HillClimb {
    pub strategy: ClimbStrategy,
    /// Initial step size for offset & multiplier.
    pub step_sizes: [f64; 2],
    pub epsilon: f64,
    pub acceleration: f64,
}

/// Configuration for the log output.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Logging {
    pub dir: PathBuf,
    pub level: String,
    pub report: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toolchain: Toolchain::default(),
            measure: Measure::default(),
            straight: Straight::default(),
            hill_climb: HillClimb::default(),
            logging: Logging::default(),
            variants: vec![HeuristicVariant::Logarithmic, HeuristicVariant::Linear],
            benchmarks: DEFAULT_BENCHMARKS.clone(),
        }
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            root: None,
            clang: PathBuf::from("./clang"),
            opt: PathBuf::from("./opt"),
            profile_runtime: PathBuf::from("../lib/libprofile_rt.so"),
            work_dir: PathBuf::from("."),
        }
    }
}

impl Default for Measure {
    fn default() -> Self {
        Self { repetitions: 5, memoize: false, reference: false }
    }
}

impl Default for Straight {
    fn default() -> Self {
        Self { step: 500, samples: 20, coarse_step: None, coarse_samples: 0 }
    }
}

impl Default for HillClimb {
    fn default() -> Self {
        Self {
            strategy: ClimbStrategy::Simple,
            step_sizes: [400.0, 400.0],
            epsilon: 0.01,
            acceleration: 1.2,
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self { dir: PathBuf::from("logs"), level: "info".to_string(), report: true }
    }
}

impl Toolchain {
    /// Path of TOOL, relative to the toolchain root if there is one.
    pub fn tool(&self, tool: &Path) -> PathBuf {
        match &self.root {
            Some(root) => root.join(tool),
            None => tool.to_path_buf(),
        }
    }

    pub fn clang_path(&self) -> PathBuf {
        self.tool(&self.clang)
    }

    pub fn opt_path(&self) -> PathBuf {
        self.tool(&self.opt)
    }

    pub fn profile_runtime_path(&self) -> PathBuf {
        self.tool(&self.profile_runtime)
    }
}

impl Logging {
    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.level)
            .map_err(|_| TuneError::Config(format!("Invalid log level: '{}'", self.level)))
    }
}

impl Config {
    /// Check the values that would make the search meaningless or endless.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(TuneError::Config(msg));

        if self.measure.repetitions == 0 {
            return fail("measure.repetitions must be at least 1".to_string());
        }
        if self.straight.step == 0 || self.straight.samples == 0 {
            return fail("straight.step must be non-zero & straight.samples at least 1".to_string());
        }
        if self.straight.coarse_step == Some(0) {
            return fail("straight.coarse_step must be non-zero".to_string());
        }

        let climb = &self.hill_climb;
        if !(climb.epsilon > 0.0 && climb.epsilon.is_finite()) {
            return fail(format!("hill_climb.epsilon must be positive, got {}", climb.epsilon));
        }
        if !(climb.acceleration > 1.0 && climb.acceleration.is_finite()) {
            return fail(format!("hill_climb.acceleration must exceed 1, got {}", climb.acceleration));
        }
        if climb.step_sizes.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return fail(format!("hill_climb.step_sizes must be non-zero, got {:?}", climb.step_sizes));
        }

        if self.variants.is_empty() {
            return fail("at least one heuristic variant is required".to_string());
        }
        let unique: HashSet<_> = self.variants.iter().collect();
        if unique.len() != self.variants.len() {
            return fail(format!("duplicate heuristic variant in {:?}", self.variants));
        }

        if self.benchmarks.is_empty() {
            return fail("at least one benchmark is required".to_string());
        }
        // Artifacts are named from the stem & input, so these must not repeat
        let mut seen = HashSet::new();
        for bench in &self.benchmarks {
            if bench.identifier.trim().is_empty() {
                return fail("benchmark source must not be empty".to_string());
            }
            if !seen.insert((bench.stem(), bench.runtime_argument.clone())) {
                return fail(format!(
                    "benchmark '{}' with argument '{}' is listed twice",
                    bench.identifier, bench.runtime_argument
                ));
            }
        }

        self.logging.level_filter()?;
        return Ok(());
    }
}

/// Parse & validate a configuration string.
pub fn parse_config(str: &str) -> Result<Config> {
    let config: Config = toml::from_str(str)
        .map_err(|e| TuneError::Config(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    return Ok(config);
}

/// Load the configuration at PATH, or the defaults if there is none.
pub fn read_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let str = fs::read_to_string(path).map_err(|e| {
                TuneError::Config(format!("Unable to read config {:?}: {}", path, e))
            })?;
            parse_config(&str)?
        }
        None => {
            let config = Config::default();
            config.validate()?;
            config
        }
    };

    // Set the log directory based on the time
    let now = Local::now();
    let sub_dir = now.format("%Y-%m-%dT%H-%M-%S").to_string();
    config.logging.dir = config.logging.dir.join(sub_dir);

    return Ok(config);
}
