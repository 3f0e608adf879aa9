//! Block, face mask, and catalog crate.
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod types;

use std::fmt;

pub use catalog::{AtlasTile, BlockCatalog, BlockType, FaceTextures, TextureAtlas, UvRect};
pub use types::{Block, BlockId, FaceMask, FaceRole};

#[derive(Debug)]
pub enum BlockError {
    UnknownBlock(String),
    UnknownTexture { block: String, texture: String },
    DuplicateBlock(String),
    /// Every `BlockId` is taken.
    TooManyBlocks(String),
    EmptyAtlas,
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockError::UnknownBlock(name) => write!(f, "unknown block '{name}'"),
            BlockError::UnknownTexture { block, texture } => {
                write!(f, "block '{block}' references unknown texture '{texture}'")
            }
            BlockError::DuplicateBlock(name) => write!(f, "block '{name}' defined twice"),
            BlockError::TooManyBlocks(name) => {
                write!(f, "cannot register '{name}': block ids exhausted")
            }
            BlockError::EmptyAtlas => write!(f, "texture atlas has zero tiles"),
            BlockError::Io(e) => write!(f, "read error: {e}"),
            BlockError::Parse(e) => write!(f, "parse error: {e}"),
        }
    }
}

impl std::error::Error for BlockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlockError::Io(e) => Some(e),
            BlockError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BlockError {
    fn from(e: std::io::Error) -> Self {
        BlockError::Io(e)
    }
}

impl From<toml::de::Error> for BlockError {
    fn from(e: toml::de::Error) -> Self {
        BlockError::Parse(e)
    }
}
