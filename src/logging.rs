use std::fs;
use std::path::PathBuf;

use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::config::Logging;
use crate::error::{Result, TuneError};

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {m}{n}";

/// Log to the console & to `tuner.log` in the session's log directory.
/// Returns the path of the log file.
pub fn init(logging: &Logging) -> Result<PathBuf> {
    let level = logging.level_filter()?;
    fs::create_dir_all(&logging.dir)?;
    let path = logging.dir.join("tuner.log");

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(&path)?;

    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("stdout").appender("file").build(level))
        .map_err(|e| TuneError::Config(format!("Invalid log configuration: {}", e)))?;

    log4rs::init_config(config)
        .map_err(|e| TuneError::Config(format!("Failed to initialize logging: {}", e)))?;

    return Ok(path);
}
