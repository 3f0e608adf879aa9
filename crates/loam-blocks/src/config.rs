use serde::Deserialize;
use std::collections::HashMap;

// Top-level block catalog file
#[derive(Deserialize, Debug)]
pub struct BlocksConfig {
    pub atlas: AtlasConfig,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AtlasConfig {
    pub tiles_x: u32,
    pub tiles_y: u32,
    // texture name -> [column, row] in the sprite sheet
    #[serde(default)]
    pub tiles: HashMap<String, [u32; 2]>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub textures: TexturesDef,
}

// Either `all = "stone"` or any subset of the six face names; unset faces
// fall back to `all`, then to the block name.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TexturesDef {
    #[serde(default)]
    pub all: Option<String>,
    #[serde(default)]
    pub top: Option<String>,
    #[serde(default)]
    pub bottom: Option<String>,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
}
