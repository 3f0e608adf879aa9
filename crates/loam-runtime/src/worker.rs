use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded, select};
use loam_chunk::RebuildAttempt;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::RuntimeError;
use crate::sweep::RebuildCtx;

const CONTENTION_BACKOFF: Duration = Duration::from_micros(200);

/// Background data-rebuild loops draining the session's update queue.
///
/// Each loop holds a clone of the done sender; `join` returns once every
/// loop has exited and dropped it.
pub struct RebuildWorkers {
    _pool: Arc<ThreadPool>,
    shutdown_tx: Option<Sender<()>>,
    done_rx: Receiver<()>,
    count: usize,
}

impl RebuildWorkers {
    pub fn spawn(ctx: RebuildCtx, count: usize) -> Result<Self, RuntimeError> {
        let count = count.max(1);
        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(count)
                .thread_name(|i| format!("loam-rebuild-{i}"))
                .panic_handler(|_| log::error!(target: "scheduler", "rebuild worker panicked outside a chunk attempt"))
                .build()?,
        );
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let (done_tx, done_rx) = bounded::<()>(0);
        for _ in 0..count {
            let ctx = ctx.clone();
            let shutdown_rx = shutdown_rx.clone();
            let done_tx = done_tx.clone();
            pool.spawn(move || {
                run_loop(&ctx, &shutdown_rx);
                drop(done_tx);
            });
        }
        log::info!(target: "scheduler", "started {count} rebuild workers");
        Ok(Self {
            _pool: pool,
            shutdown_tx: Some(shutdown_tx),
            done_rx,
            count,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Asks every loop to stop after its current chunk.
    pub fn shutdown(&mut self) {
        self.shutdown_tx.take();
    }

    /// Signals shutdown and waits for every loop to exit.
    pub fn join(mut self) {
        self.shutdown();
        while self.done_rx.recv().is_ok() {}
        log::info!(target: "scheduler", "rebuild workers stopped");
    }
}

fn run_loop(ctx: &RebuildCtx, shutdown_rx: &Receiver<()>) {
    let queue_rx = ctx.queue.receiver();
    loop {
        // select! picks randomly among ready arms; prefer shutdown over pending work
        if is_closed(shutdown_rx) {
            break;
        }
        select! {
            recv(shutdown_rx) -> _ => break,
            recv(queue_rx) -> msg => match msg {
                Ok(coord) => match ctx.attempt(coord) {
                    Some(RebuildAttempt::Contended) => {
                        log::trace!(target: "scheduler", "requeue ({},{})", coord.x, coord.z);
                        ctx.requeue(coord);
                        if ctx.queue.len() <= 1 {
                            thread::sleep(CONTENTION_BACKOFF);
                        } else {
                            thread::yield_now();
                        }
                    }
                    // Empty chunks wait for the next sweep or neighbor enqueue.
                    _ => {}
                },
                Err(_) => break,
            },
        }
    }
}

fn is_closed(rx: &Receiver<()>) -> bool {
    matches!(rx.try_recv(), Err(crossbeam_channel::TryRecvError::Disconnected))
}
