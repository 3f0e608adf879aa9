use std::error::Error;
use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};

/// `env_logger` on stdout (RUST_LOG overrides `level`), or a terminal plus
/// file logger when `file` is given.
pub fn init(level: LevelFilter, file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match file {
        None => {
            env_logger::Builder::new()
                .target(env_logger::Target::Stdout)
                .filter_level(level)
                .parse_env("RUST_LOG")
                .try_init()?;
        }
        Some(path) => {
            let f = File::create(path)?;
            CombinedLogger::init(vec![
                TermLogger::new(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
                WriteLogger::new(level, Config::default(), f),
            ])?;
        }
    }
    Ok(())
}
