use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::WorldError;
use crate::dims::WorldDims;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub world: WorldDims,
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Flat,
    Hills,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub profile: ProfileKind,
    /// View radius in chunks.
    pub radius: i32,
    pub seed: i32,
    pub idle_ms: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            profile: ProfileKind::Flat,
            radius: 4,
            seed: 1337,
            idle_ms: 50,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub workers: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { workers: 2 }
    }
}

impl SessionConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, WorldError> {
        let cfg: SessionConfig = toml::from_str(s)?;
        cfg.world.validate()?;
        if cfg.terrain.radius < 0 {
            return Err(WorldError::Config(format!(
                "terrain.radius must be >= 0, got {}",
                cfg.terrain.radius
            )));
        }
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, WorldError> {
        let s = fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&s)?;
        log::debug!(target: "session", "loaded {} -> {:?}", path.display(), cfg);
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.world, WorldDims::default());
        assert_eq!(cfg.terrain.profile, ProfileKind::Flat);
        assert_eq!(cfg.runtime.workers, 2);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let cfg = SessionConfig::from_toml_str(
            r#"
            [world]
            height = 64
            [terrain]
            profile = "hills"
            radius = 6
        "#,
        )
        .unwrap();
        assert_eq!(cfg.world.side, 8);
        assert_eq!(cfg.world.height, 64);
        assert_eq!(cfg.terrain.profile, ProfileKind::Hills);
        assert_eq!(cfg.terrain.radius, 6);
        assert_eq!(cfg.terrain.idle_ms, 50);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            SessionConfig::from_toml_str("[world]\nside = 1"),
            Err(WorldError::InvalidDims { .. })
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("[terrain]\nradius = -2"),
            Err(WorldError::Config(_))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("[terrain]\nprofile = \"caves\""),
            Err(WorldError::Parse(_))
        ));
    }
}
