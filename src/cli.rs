use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Headless driver: streams terrain around a walking camera and publishes
/// chunk meshes into host-side buffers.
#[derive(Parser, Debug)]
#[command(name = "loam", version)]
pub struct Args {
    /// Session config (TOML). Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Block catalog (TOML). The built-in stone/dirt/grass set is used when omitted.
    #[arg(long)]
    pub blocks: Option<PathBuf>,

    /// View radius in chunks; overrides the config.
    #[arg(long)]
    pub radius: Option<i32>,

    /// Rebuild worker count; overrides the config.
    #[arg(long)]
    pub workers: Option<usize>,

    #[arg(long, default_value_t = 240)]
    pub frames: u32,

    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    /// Camera walk speed along +x, in blocks per second.
    #[arg(long, default_value_t = 6.0)]
    pub speed: f32,

    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,

    /// Also write the log to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
