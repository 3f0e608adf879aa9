use std::error::Error;
use std::sync::Arc;

use loam_blocks::BlockCatalog;
use loam_world::{FlatLayers, HeightProfile, Layers, NoiseHills, ProfileKind, SessionConfig};

use crate::cli::Args;

pub struct Setup {
    pub cfg: SessionConfig,
    pub catalog: BlockCatalog,
    pub profile: Arc<dyn HeightProfile>,
}

/// Reads the session config and block catalog, then applies CLI overrides.
pub fn load(args: &Args) -> Result<Setup, Box<dyn Error>> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => {
            log::info!("loading session config {}", path.display());
            SessionConfig::load(path)?
        }
        None => SessionConfig::default(),
    };
    if let Some(r) = args.radius {
        if r < 0 {
            return Err(format!("--radius must be >= 0, got {r}").into());
        }
        cfg.terrain.radius = r;
    }
    if let Some(w) = args.workers {
        cfg.runtime.workers = w;
    }

    let catalog = match args.blocks.as_deref() {
        Some(path) => {
            log::info!("loading block catalog {}", path.display());
            BlockCatalog::from_path(path)?
        }
        None => BlockCatalog::builtin(),
    };

    let layers = Layers::from_catalog(&catalog)?;
    let profile: Arc<dyn HeightProfile> = match cfg.terrain.profile {
        ProfileKind::Flat => Arc::new(FlatLayers::new(layers)),
        ProfileKind::Hills => Arc::new(NoiseHills::new(
            layers,
            cfg.terrain.seed,
            cfg.world.height as i32,
        )),
    };
    log::info!(
        "world side={} height={} profile={:?} radius={} workers={}",
        cfg.world.side,
        cfg.world.height,
        cfg.terrain.profile,
        cfg.terrain.radius,
        cfg.runtime.workers
    );
    Ok(Setup {
        cfg,
        catalog,
        profile,
    })
}
