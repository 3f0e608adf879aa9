use crossbeam_channel::{Receiver, Sender, unbounded};
use loam_world::ChunkCoord;

/// Multi-producer, multi-consumer FIFO of chunks awaiting a data rebuild.
/// Duplicates are allowed; rebuilding a fresh chunk is a no-op.
#[derive(Clone)]
pub struct UpdateQueue {
    tx: Sender<ChunkCoord>,
    rx: Receiver<ChunkCoord>,
}

impl Default for UpdateQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    #[inline]
    pub fn push(&self, coord: ChunkCoord) {
        // Both ends live in self, so the channel cannot be disconnected here.
        let _ = self.tx.send(coord);
    }

    pub fn push_all(&self, coords: impl IntoIterator<Item = ChunkCoord>) {
        for c in coords {
            self.push(c);
        }
    }

    pub fn try_pop(&self) -> Option<ChunkCoord> {
        self.rx.try_recv().ok()
    }

    pub fn drain(&self) -> Vec<ChunkCoord> {
        self.rx.try_iter().collect()
    }

    pub(crate) fn receiver(&self) -> &Receiver<ChunkCoord> {
        &self.rx
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_with_duplicates() {
        let q = UpdateQueue::new();
        q.push_all([ChunkCoord::new(0, 0), ChunkCoord::new(8, 0), ChunkCoord::new(0, 0)]);
        assert_eq!(q.len(), 3);
        assert_eq!(q.try_pop(), Some(ChunkCoord::new(0, 0)));
        let rest = q.clone().drain();
        assert_eq!(rest, vec![ChunkCoord::new(8, 0), ChunkCoord::new(0, 0)]);
        assert!(q.is_empty());
    }
}
