//! Chunk coordinates, world dimensions, and terrain profiles.
#![forbid(unsafe_code)]

pub mod config;
pub mod coord;
pub mod dims;
pub mod profile;

use std::fmt;

pub use config::{ProfileKind, RuntimeConfig, SessionConfig, TerrainConfig};
pub use coord::{ChunkCoord, Edge};
pub use dims::{CHUNK_SIDE, LocalPos, WORLD_HEIGHT, WorldDims};
pub use profile::{FlatLayers, HeightProfile, Layers, NoiseHills};

#[derive(Debug)]
pub enum WorldError {
    Misaligned { x: i32, z: i32, side: usize },
    HeightOutOfRange { y: i32, height: usize },
    InvalidDims { side: usize, height: usize },
    Config(String),
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::Misaligned { x, z, side } => {
                write!(f, "chunk origin ({x}, {z}) is not a multiple of {side}")
            }
            WorldError::HeightOutOfRange { y, height } => {
                write!(f, "y={y} outside world height [0, {height})")
            }
            WorldError::InvalidDims { side, height } => {
                write!(f, "invalid world dims side={side} height={height}")
            }
            WorldError::Config(msg) => write!(f, "config: {msg}"),
            WorldError::Io(e) => write!(f, "read error: {e}"),
            WorldError::Parse(e) => write!(f, "parse error: {e}"),
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorldError::Io(e) => Some(e),
            WorldError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WorldError {
    fn from(e: std::io::Error) -> Self {
        WorldError::Io(e)
    }
}

impl From<toml::de::Error> for WorldError {
    fn from(e: toml::de::Error) -> Self {
        WorldError::Parse(e)
    }
}
