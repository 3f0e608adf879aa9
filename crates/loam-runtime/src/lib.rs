//! Update queue, rebuild workers, terrain generation, and the session that owns them.
#![forbid(unsafe_code)]

mod anchor;
mod error;
mod publish;
mod queue;
mod session;
mod stats;
mod sweep;
mod terrain;
mod worker;

pub use anchor::ViewAnchor;
pub use error::RuntimeError;
pub use publish::{PublishReport, publish_ready};
pub use queue::UpdateQueue;
pub use session::Session;
pub use stats::{RuntimeStats, StatsSnapshot};
pub use sweep::{RebuildCtx, SweepJob, SweepReport, spawn_sweep_all, spawn_sweep_from, sweep_all, sweep_from};
pub use terrain::{TerrainGenerator, TerrainHandle, frontier};
pub use worker::RebuildWorkers;
