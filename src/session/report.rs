use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::search::SearchOutcome;
use crate::types::{HeuristicVariant, ParameterPoint};

/// Search results for one heuristic variant.
#[derive(Clone, Debug, Serialize)]
pub struct VariantResult {
    pub variant: HeuristicVariant,
    /// Best point of the straight-line search.
    pub seed: SearchOutcome,
    /// Result of hill climbing from the seed.
    pub best: SearchOutcome,
}

impl VariantResult {
    pub fn best_point(&self) -> ParameterPoint {
        self.best.point
    }
}

/// Everything a completed session found.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SessionReport {
    /// Total time of the suite built with the stock inliner, if measured.
    pub reference_time: Option<f64>,
    pub results: Vec<VariantResult>,
}

impl SessionReport {
    pub fn new(reference_time: Option<f64>) -> Self {
        Self { reference_time, results: vec![] }
    }

    pub fn push(&mut self, result: VariantResult) {
        self.results.push(result);
    }

    pub fn get(&self, variant: HeuristicVariant) -> Option<&VariantResult> {
        self.results.iter().find(|r| r.variant == variant)
    }

    /// One line per variant naming its best constants.
    pub fn summary(&self) -> Vec<String> {
        self.results
            .iter()
            .map(|r| {
                let mut line = format!(
                    "{} best at offset: {} multiplier: {} ({:.3}s)",
                    r.variant, r.best.point.offset, r.best.point.multiplier, r.best.score
                );
                if let Some(reference) = self.reference_time {
                    if r.best.score > 0.0 {
                        line.push_str(&format!(", {:.3}x vs reference", reference / r.best.score));
                    }
                }
                line
            })
            .collect()
    }

    pub fn log_summary(&self) {
        if let Some(reference) = self.reference_time {
            info!("reference time: {:.3}s", reference);
        }
        for line in self.summary() {
            info!("{}", line);
        }
    }

    /// Write the report as pretty printed JSON to PATH.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let blob = serde_json::to_vec_pretty(self).map_err(std::io::Error::from)?;
        fs::write(path, blob)?;
        return Ok(());
    }
}
