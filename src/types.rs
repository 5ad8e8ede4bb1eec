use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

// =============================================================================
// Benchmark
// =============================================================================

/// How to build and run a single benchmark program.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BenchmarkDescriptor {
    /// Source file of the benchmark, relative to the work directory.
    #[serde(rename = "source")]
    pub identifier: String,

    /// Input given to the program when it is profiled and timed.
    #[serde(rename = "argument", default)]
    pub runtime_argument: String,

    /// Additional compiler flags (`-lm`, `-std=c99`, ...).
    #[serde(rename = "flags", default)]
    pub extra_build_flags: Vec<String>,
}

impl BenchmarkDescriptor {
    pub fn new(identifier: &str, runtime_argument: &str, flags: &[&str]) -> Self {
        return Self {
            identifier: identifier.to_string(),
            runtime_argument: runtime_argument.to_string(),
            extra_build_flags: flags.iter().map(|f| f.to_string()).collect(),
        };
    }

    /// Source path without its extension; every artifact name starts with it.
    pub fn stem(&self) -> String {
        Path::new(&self.identifier)
            .with_extension("")
            .to_string_lossy()
            .into_owned()
    }

    /// The runtime argument split into argv entries.
    pub fn runtime_args(&self) -> Vec<String> {
        self.runtime_argument
            .split_whitespace()
            .map(|a| a.to_string())
            .collect()
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// One axis of the parameter space.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Dimension {
    Offset,
    Multiplier,
}

impl Dimension {
    pub const ALL: [Dimension; 2] = [Dimension::Offset, Dimension::Multiplier];

    pub fn index(self) -> usize {
        match self {
            Dimension::Offset => 0,
            Dimension::Multiplier => 1,
        }
    }
}

/// A point in the configuration space of the inlining heuristic.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ParameterPoint {
    pub offset: i64,
    pub multiplier: i64,
}

impl ParameterPoint {
    pub const ORIGIN: ParameterPoint = ParameterPoint { offset: 0, multiplier: 0 };

    pub fn new(offset: i64, multiplier: i64) -> Self {
        return Self { offset, multiplier };
    }

    /// The point DISTANCE along the ray `multiplier = -2 * offset`.
    pub fn on_ray(distance: i64) -> Self {
        return Self::new(distance.saturating_neg(), distance.saturating_mul(2));
    }

    pub fn get(&self, dim: Dimension) -> i64 {
        match dim {
            Dimension::Offset => self.offset,
            Dimension::Multiplier => self.multiplier,
        }
    }

    /// Copy of this point with DIM moved by DELTA, rounded to the nearest integer.
    pub fn displaced(&self, dim: Dimension, delta: f64) -> Self {
        // Float to int casts saturate, so the result is always a finite integer
        let value = (self.get(dim) as f64 + delta).round() as i64;
        let mut point = *self;
        match dim {
            Dimension::Offset => point.offset = value,
            Dimension::Multiplier => point.multiplier = value,
        }
        return point;
    }
}

impl fmt::Display for ParameterPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(offset: {}, multiplier: {})", self.offset, self.multiplier)
    }
}

// =============================================================================
// Heuristic
// =============================================================================

/// Shape of the cost function the parameters are applied to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicVariant {
    Logarithmic,
    Linear,
}

impl HeuristicVariant {
    pub fn is_linear(self) -> bool {
        self == HeuristicVariant::Linear
    }
}

impl fmt::Display for HeuristicVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeuristicVariant::Logarithmic => write!(f, "logarithmic"),
            HeuristicVariant::Linear => write!(f, "linear"),
        }
    }
}
