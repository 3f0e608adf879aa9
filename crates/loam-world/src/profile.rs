use fastnoise_lite::{FastNoiseLite, NoiseType};
use loam_blocks::{BlockCatalog, BlockError, BlockId};

/// Terrain fill function consumed once per cell when a chunk is populated.
pub trait HeightProfile: Send + Sync {
    fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockId>;
}

impl<F> HeightProfile for F
where
    F: Fn(i32, i32, i32) -> Option<BlockId> + Send + Sync,
{
    #[inline]
    fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockId> {
        self(wx, wy, wz)
    }
}

/// Stone, then dirt, then a single grass layer.
#[derive(Clone, Copy, Debug)]
pub struct Layers {
    pub stone: BlockId,
    pub dirt: BlockId,
    pub grass: BlockId,
}

impl Layers {
    pub fn from_catalog(catalog: &BlockCatalog) -> Result<Self, BlockError> {
        Ok(Self {
            stone: catalog.require("stone")?,
            dirt: catalog.require("dirt")?,
            grass: catalog.require("grass")?,
        })
    }

    /// Block at `wy` in a column whose surface (exclusive) is `top`.
    #[inline]
    fn pick(&self, wy: i32, top: i32) -> Option<BlockId> {
        if wy < 0 || wy >= top {
            None
        } else if wy < top - 4 {
            Some(self.stone)
        } else if wy < top - 1 {
            Some(self.dirt)
        } else {
            Some(self.grass)
        }
    }
}

/// Ten-block flat world: y < 6 stone, y < 9 dirt, y < 10 grass.
#[derive(Clone, Copy, Debug)]
pub struct FlatLayers {
    pub layers: Layers,
    pub surface: i32,
}

impl FlatLayers {
    pub const SURFACE: i32 = 10;

    pub fn new(layers: Layers) -> Self {
        Self {
            layers,
            surface: Self::SURFACE,
        }
    }

    pub fn from_catalog(catalog: &BlockCatalog) -> Result<Self, BlockError> {
        Ok(Self::new(Layers::from_catalog(catalog)?))
    }
}

impl HeightProfile for FlatLayers {
    fn block_at(&self, _wx: i32, wy: i32, _wz: i32) -> Option<BlockId> {
        self.layers.pick(wy, self.surface)
    }
}

/// Rolling hills from 2D simplex noise, layered like `FlatLayers`.
pub struct NoiseHills {
    pub layers: Layers,
    pub base: i32,
    pub amplitude: f32,
    pub max_height: i32,
    noise: FastNoiseLite,
}

impl NoiseHills {
    pub fn new(layers: Layers, seed: i32, max_height: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(0.03));
        Self {
            layers,
            base: FlatLayers::SURFACE,
            amplitude: 6.0,
            max_height,
            noise,
        }
    }

    /// Surface height (exclusive) of column `(wx, wz)`.
    pub fn column_top(&self, wx: i32, wz: i32) -> i32 {
        let h = self.noise.get_noise_2d(wx as f32, wz as f32);
        let top = self.base + (h * self.amplitude).round() as i32;
        top.clamp(1, self.max_height.max(1))
    }
}

impl HeightProfile for NoiseHills {
    fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockId> {
        self.layers.pick(wy, self.column_top(wx, wz))
    }
}
