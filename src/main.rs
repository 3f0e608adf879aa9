mod cli;
mod config;
mod logging;

use std::error::Error;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use loam_chunk::HostBuffers;
use loam_runtime::Session;

fn main() {
    if let Err(e) = run() {
        eprintln!("loam: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = cli::Args::parse();
    logging::init(args.log_level, args.log_file.as_deref())?;
    let setup = config::load(&args)?;

    let buffers = Arc::new(HostBuffers::new());
    let mut session = Session::new(setup.cfg.world, Arc::new(setup.catalog), buffers.clone());
    session.set_view([0.5, setup.cfg.world.height as f32, 0.5]);
    session.start_rebuild_workers(setup.cfg.runtime.workers)?;
    session.start_terrain(
        setup.profile,
        setup.cfg.terrain.radius,
        Duration::from_millis(setup.cfg.terrain.idle_ms),
    )?;

    let marker = session.catalog().require("stone")?;
    let dt = args.frame_ms as f32 / 1000.0;
    let mut x = 0.5f32;
    for frame in 0..args.frames {
        x += args.speed * dt;
        session.set_view([x, setup.cfg.world.height as f32, 0.5]);

        // Drop a marker at the top of the world under the camera, then take
        // it away a second later.
        let (wx, wy, wz) = (x.floor() as i32, setup.cfg.world.height as i32 - 1, 0);
        let edit = if frame % 120 == 30 {
            session.add_block(marker, wx, wy, wz)
        } else if frame % 120 == 90 && session.check_block(wx, wy, wz) {
            session.remove_block(wx, wy, wz)
        } else {
            Ok(())
        };
        if let Err(e) = edit {
            log::debug!(target: "session", "frame {frame}: marker edit skipped: {e}");
        }

        let published = session.publish_buffers();
        let meshes = session.render_list();
        if frame % 60 == 0 {
            let verts: usize = meshes.iter().map(|m| m.vertex_count).sum();
            let stale = meshes.iter().filter(|m| !m.fresh).count();
            log::info!(
                target: "session",
                "frame {frame} meshes={} stale={stale} verts={verts} uploaded={} {:?}",
                meshes.len(),
                published.published,
                session.stats()
            );
        }
        thread::sleep(Duration::from_millis(args.frame_ms));
    }

    session.shutdown()?;
    let report = session.sweep_all();
    log::info!(target: "session", "final sweep {:?}", report);
    log::info!(
        target: "session",
        "chunks={} buffers={} uploads={} {:?}",
        session.registry().len(),
        buffers.len(),
        buffers.uploads(),
        session.stats()
    );
    Ok(())
}
