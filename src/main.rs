use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{arg, ArgMatches, Command};
use log::{error, info};

use inline_tuner::config::{self, Config};
use inline_tuner::error::Result;
use inline_tuner::logging;
use inline_tuner::session::SessionReport;

fn cli() -> Command {
    Command::new("inline_tuner")
        .about("Search for the best constants of the PGO inlining heuristic")
        // Configuration
        .arg(arg!(-c --config <CONFIG> "TOML configuration file")
             .value_parser(clap::value_parser!(PathBuf))
        )
        // Toolchain
        .arg(arg!([BINDIR] "Directory containing clang & opt")
             .value_parser(clap::value_parser!(PathBuf))
        )
}

/// Build the configuration from the file & command line.
fn load_config(matches: &ArgMatches) -> Result<Config> {
    let path = matches.get_one::<PathBuf>("config");
    let mut config = config::read_config(path.map(|p| p.as_path()))?;

    if let Some(bin_dir) = matches.get_one::<PathBuf>("BINDIR") {
        config.toolchain.root = Some(bin_dir.clone());
    }

    return Ok(config);
}

fn main() {
    // Parse arguments
    let matches = cli().get_matches();

    // Nothing is logged until logging is up, so report to stderr
    let config = match load_config(&matches) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    match logging::init(&config.logging) {
        Ok(path) => info!("Logging to {:?}", path),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }

    // Search
    let code = finish(inline_tuner::run(config), &mut io::stderr());
    process::exit(code);
}

/// Report how the session ended. Returns the process exit status.
fn finish(result: Result<SessionReport>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(report) => {
            info!("Finished searching {} heuristic variants", report.results.len());
            return 0;
        }
        Err(e) => {
            error!("Search aborted: {}", e);
            let _ = writeln!(stderr, "error: {}", e);
            return 1;
        }
    }
}
