//! Search for the constants of a profile guided inlining heuristic.
//!
//! Every benchmark is profiled once, then for each heuristic variant a
//! straight-line sweep picks a starting point that hill climbing refines,
//! rebuilding & timing the whole suite for each candidate.

pub mod config;
pub mod error;
pub mod interface;
pub mod logging;
pub mod search;
pub mod session;
pub mod types;

use std::fs;

use log::info;

use config::Config;
use error::Result;
use interface::{LlvmToolchain, WallClockTimer};
use session::SessionReport;

/// Run a full session against the LLVM toolchain named by CONFIG.
pub fn run(mut config: Config) -> Result<SessionReport> {
    // Binaries run inside the work dir, so every artifact path must be absolute
    config.toolchain.work_dir = fs::canonicalize(&config.toolchain.work_dir)?;
    info!("Working in {:?}", config.toolchain.work_dir);

    let mut pipeline = LlvmToolchain::new(&config.toolchain);
    let mut timer = WallClockTimer::new(&config.toolchain.work_dir);
    let report = session::run_session(&config, &mut pipeline, &mut timer)?;

    if config.logging.report {
        let path = config.logging.dir.join("report.json");
        report.write_json(&path)?;
        info!("Wrote report to {:?}", path);
    }

    return Ok(report);
}
