use std::path::PathBuf;

use loam_world::{ProfileKind, SessionConfig};

#[test]
fn shipped_session_config_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../loam.toml");
    let cfg = SessionConfig::load(&path).unwrap();
    assert_eq!(cfg.world.side, 8);
    assert_eq!(cfg.world.height, 32);
    assert_eq!(cfg.terrain.profile, ProfileKind::Hills);
    assert!(cfg.runtime.workers >= 1);
}
