use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::BlockError;
use super::config::{AtlasConfig, BlockDef, BlocksConfig};
use super::types::{BlockId, FaceRole};

/// Texture names for the six faces of a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceTextures {
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
    pub front: String,
    pub back: String,
}

impl FaceTextures {
    pub fn uniform(name: &str) -> Self {
        Self {
            top: name.to_string(),
            bottom: name.to_string(),
            left: name.to_string(),
            right: name.to_string(),
            front: name.to_string(),
            back: name.to_string(),
        }
    }

    pub fn for_role(&self, role: FaceRole) -> &str {
        match role {
            FaceRole::Top => &self.top,
            FaceRole::Bottom => &self.bottom,
            FaceRole::Left => &self.left,
            FaceRole::Right => &self.right,
            FaceRole::Front => &self.front,
            FaceRole::Back => &self.back,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtlasTile {
    pub col: u32,
    pub row: u32,
}

/// Normalized texture-space rectangle of one atlas tile.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl UvRect {
    /// Maps a template coordinate in `[0, 1]` into this tile.
    #[inline]
    pub fn lerp(&self, tu: f32, tv: f32) -> [f32; 2] {
        [
            self.u0 + (self.u1 - self.u0) * tu,
            self.v0 + (self.v1 - self.v0) * tv,
        ]
    }
}

#[derive(Clone, Debug)]
pub struct TextureAtlas {
    pub tiles_x: u32,
    pub tiles_y: u32,
    tiles: HashMap<String, AtlasTile>,
}

impl TextureAtlas {
    pub fn new(tiles_x: u32, tiles_y: u32) -> Result<Self, BlockError> {
        if tiles_x == 0 || tiles_y == 0 {
            return Err(BlockError::EmptyAtlas);
        }
        Ok(Self {
            tiles_x,
            tiles_y,
            tiles: HashMap::new(),
        })
    }

    pub fn from_config(cfg: &AtlasConfig) -> Result<Self, BlockError> {
        let mut atlas = Self::new(cfg.tiles_x, cfg.tiles_y)?;
        for (name, [col, row]) in cfg.tiles.iter() {
            atlas.insert(name, AtlasTile { col: *col, row: *row });
        }
        Ok(atlas)
    }

    pub fn insert(&mut self, name: &str, tile: AtlasTile) {
        self.tiles.insert(name.to_string(), tile);
    }

    pub fn tile(&self, name: &str) -> Option<AtlasTile> {
        self.tiles.get(name).copied()
    }

    pub fn uv_rect(&self, tile: AtlasTile) -> UvRect {
        let w = 1.0 / self.tiles_x as f32;
        let h = 1.0 / self.tiles_y as f32;
        UvRect {
            u0: tile.col as f32 * w,
            v0: tile.row as f32 * h,
            u1: (tile.col + 1) as f32 * w,
            v1: (tile.row + 1) as f32 * h,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub textures: FaceTextures,
}

/// Block names, their face textures, and the atlas rectangles those resolve to.
#[derive(Clone, Debug)]
pub struct BlockCatalog {
    pub atlas: TextureAtlas,
    blocks: Vec<BlockType>,
    by_name: HashMap<String, BlockId>,
    // per block, per FaceRole::index()
    uvs: Vec<[UvRect; 6]>,
}

impl BlockCatalog {
    pub fn new(atlas: TextureAtlas) -> Self {
        Self {
            atlas,
            blocks: Vec::new(),
            by_name: HashMap::new(),
            uvs: Vec::new(),
        }
    }

    /// The stone/dirt/grass set used by the flat terrain profile.
    pub fn builtin() -> Self {
        let mut atlas = TextureAtlas {
            tiles_x: 4,
            tiles_y: 4,
            tiles: HashMap::new(),
        };
        atlas.insert("stone", AtlasTile { col: 0, row: 0 });
        atlas.insert("dirt", AtlasTile { col: 1, row: 0 });
        atlas.insert("grass_top", AtlasTile { col: 2, row: 0 });
        atlas.insert("grass_side", AtlasTile { col: 3, row: 0 });
        let mut cat = Self::new(atlas);
        let grass = FaceTextures {
            top: "grass_top".into(),
            bottom: "dirt".into(),
            left: "grass_side".into(),
            right: "grass_side".into(),
            front: "grass_side".into(),
            back: "grass_side".into(),
        };
        for (name, textures) in [
            ("stone", FaceTextures::uniform("stone")),
            ("dirt", FaceTextures::uniform("dirt")),
            ("grass", grass),
        ] {
            // The builtin table is self-consistent; a failure here is a typo above.
            if let Err(e) = cat.register(name, textures) {
                debug_assert!(false, "builtin catalog: {e}");
            }
        }
        cat
    }

    pub fn register(&mut self, name: &str, textures: FaceTextures) -> Result<BlockId, BlockError> {
        if self.by_name.contains_key(name) {
            return Err(BlockError::DuplicateBlock(name.to_string()));
        }
        let id = u16::try_from(self.blocks.len())
            .map(BlockId)
            .map_err(|_| BlockError::TooManyBlocks(name.to_string()))?;
        let mut uvs = [UvRect::default(); 6];
        for role in FaceRole::ALL {
            let tex = textures.for_role(role);
            let tile = self.atlas.tile(tex).ok_or_else(|| BlockError::UnknownTexture {
                block: name.to_string(),
                texture: tex.to_string(),
            })?;
            uvs[role.index()] = self.atlas.uv_rect(tile);
        }
        self.blocks.push(BlockType {
            id,
            name: name.to_string(),
            textures,
        });
        self.by_name.insert(name.to_string(), id);
        self.uvs.push(uvs);
        Ok(id)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, BlockError> {
        let atlas = TextureAtlas::from_config(&cfg.atlas)?;
        let mut cat = Self::new(atlas);
        for def in cfg.blocks.into_iter() {
            let textures = resolve_textures(&def);
            cat.register(&def.name, textures)?;
        }
        Ok(cat)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, BlockError> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BlockError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id.0 as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<BlockId, BlockError> {
        self.id_by_name(name)
            .ok_or_else(|| BlockError::UnknownBlock(name.to_string()))
    }

    #[inline]
    pub fn uv_rect(&self, id: BlockId, role: FaceRole) -> Option<UvRect> {
        self.uvs.get(id.0 as usize).map(|u| u[role.index()])
    }

    #[inline]
    pub fn contains(&self, id: BlockId) -> bool {
        (id.0 as usize) < self.blocks.len()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn resolve_textures(def: &BlockDef) -> FaceTextures {
    let t = &def.textures;
    let fallback = t.all.clone().unwrap_or_else(|| def.name.clone());
    let pick = |face: &Option<String>| face.clone().unwrap_or_else(|| fallback.clone());
    FaceTextures {
        top: pick(&t.top),
        bottom: pick(&t.bottom),
        left: pick(&t.left),
        right: pick(&t.right),
        front: pick(&t.front),
        back: pick(&t.back),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [atlas]
        tiles_x = 8
        tiles_y = 2
        [atlas.tiles]
        stone = [0, 0]
        log_top = [1, 0]
        log_side = [2, 0]
        sand = [0, 1]

        [[blocks]]
        name = "stone"

        [[blocks]]
        name = "log"
        textures = { all = "log_side", top = "log_top", bottom = "log_top" }

        [[blocks]]
        name = "beach"
        textures = { all = "sand" }
    "#;

    #[test]
    fn per_face_textures_override_all() {
        let cat = BlockCatalog::from_toml_str(SAMPLE).unwrap();
        let log = cat.require("log").unwrap();
        let ty = cat.get(log).unwrap();
        assert_eq!(ty.textures.top, "log_top");
        assert_eq!(ty.textures.bottom, "log_top");
        assert_eq!(ty.textures.front, "log_side");
        let top = cat.uv_rect(log, FaceRole::Top).unwrap();
        assert_eq!(top, UvRect { u0: 0.125, v0: 0.0, u1: 0.25, v1: 0.5 });
    }

    #[test]
    fn block_name_is_the_default_texture() {
        let cat = BlockCatalog::from_toml_str(SAMPLE).unwrap();
        let stone = cat.require("stone").unwrap();
        assert_eq!(cat.get(stone).unwrap().textures, FaceTextures::uniform("stone"));
        assert_eq!(stone, BlockId(0));
    }

    #[test]
    fn unknown_texture_is_rejected() {
        let err = BlockCatalog::from_toml_str(
            r#"
            [atlas]
            tiles_x = 1
            tiles_y = 1
            [[blocks]]
            name = "glass"
        "#,
        )
        .unwrap_err();
        assert!(matches!(err, BlockError::UnknownTexture { .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut cat = BlockCatalog::builtin();
        let err = cat.register("stone", FaceTextures::uniform("stone")).unwrap_err();
        assert!(matches!(err, BlockError::DuplicateBlock(_)));
    }

    #[test]
    fn ids_run_out_at_u16_max() {
        let mut cat = BlockCatalog::builtin();
        for i in cat.len()..=usize::from(u16::MAX) {
            cat.register(&format!("b{i}"), FaceTextures::uniform("stone")).unwrap();
        }
        assert_eq!(cat.id_by_name("b65535"), Some(BlockId(u16::MAX)));
        let err = cat.register("one_more", FaceTextures::uniform("stone")).unwrap_err();
        assert!(matches!(err, BlockError::TooManyBlocks(_)));
        assert_eq!(cat.id_by_name("one_more"), None);
    }

    #[test]
    fn builtin_has_flat_terrain_blocks() {
        let cat = BlockCatalog::builtin();
        assert_eq!(cat.len(), 3);
        let grass = cat.require("grass").unwrap();
        assert_ne!(
            cat.uv_rect(grass, FaceRole::Top),
            cat.uv_rect(grass, FaceRole::Left)
        );
        assert!(cat.require("water").is_err());
    }

    #[test]
    fn lerp_spans_the_tile() {
        let r = UvRect { u0: 0.25, v0: 0.5, u1: 0.5, v1: 1.0 };
        assert_eq!(r.lerp(0.0, 0.0), [0.25, 0.5]);
        assert_eq!(r.lerp(1.0, 1.0), [0.5, 1.0]);
    }
}
