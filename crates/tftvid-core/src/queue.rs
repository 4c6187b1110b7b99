use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};

/// A bounded producer/consumer FIFO shared between exactly one producer
/// and one consumer thread. Built on `crossbeam_channel::bounded`, the
/// same bounded-channel idiom `velocut-media`'s worker pool uses for its
/// playback frame pipeline (`worker.rs`'s `pb_frame_tx`/`pb_rx`), rather
/// than a hand-rolled `Mutex`+`Condvar` deque.
///
/// Push and pop both back off when `flushing` is set: during a flush the
/// queue is drained by `clear()` and producers/consumers alike must wait
/// for the drain to finish rather than race it. Since a channel can't be
/// told to block on an extra predicate, both sides poll with a short
/// sleep instead of waiting on a condvar — the same polling granularity
/// the original `wait_timeout`-based queue used.
pub struct Queue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
    capacity: usize,
}

impl<T> Queue<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be positive");
        let (tx, rx) = bounded(capacity);
        Queue { tx, rx, capacity }
    }

    /// Blocks until there is room and `flushing` is clear, then pushes.
    /// Returns `false` without pushing if `running` drops to false first.
    pub fn push_wait(&self, item: T, running: &AtomicBool, flushing: &AtomicBool) -> bool {
        let mut item = item;
        loop {
            if !running.load(Ordering::Acquire) {
                return false;
            }
            if !flushing.load(Ordering::Acquire) {
                match self.tx.try_send(item) {
                    Ok(()) => return true,
                    Err(TrySendError::Full(returned)) => item = returned,
                    Err(TrySendError::Disconnected(_)) => return false,
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    /// Blocks until an item is available and `flushing` is clear, then
    /// pops. Returns `None` if `running` drops to false first.
    pub fn pop_wait(&self, running: &AtomicBool, flushing: &AtomicBool) -> Option<T> {
        loop {
            if !running.load(Ordering::Acquire) {
                return None;
            }
            if !flushing.load(Ordering::Acquire) {
                match self.rx.try_recv() {
                    Ok(item) => return Some(item),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => return None,
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    /// Drains every queued item via `try_recv`. Used by the demux/decode
    /// flush sequence between a seek and the resumed stream.
    pub fn clear(&self) {
        while self.rx.try_recv().is_ok() {}
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn push_pop_respects_capacity() {
        let q: Queue<i32> = Queue::new(2);
        let running = AtomicBool::new(true);
        let flushing = AtomicBool::new(false);

        assert!(q.push_wait(1, &running, &flushing));
        assert!(q.push_wait(2, &running, &flushing));
        assert_eq!(q.len(), 2);

        assert_eq!(q.pop_wait(&running, &flushing), Some(1));
        assert_eq!(q.pop_wait(&running, &flushing), Some(2));
        assert!(q.is_empty());
    }

    #[test]
    fn pop_wait_returns_none_once_stopped() {
        let q: Arc<Queue<i32>> = Arc::new(Queue::new(4));
        let running = Arc::new(AtomicBool::new(true));
        let flushing = Arc::new(AtomicBool::new(false));

        let qc = q.clone();
        let rc = running.clone();
        let fc = flushing.clone();
        let handle = thread::spawn(move || qc.pop_wait(&rc, &fc));

        thread::sleep(Duration::from_millis(30));
        running.store(false, Ordering::Release);
        q.clear();

        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn flushing_blocks_pop_until_cleared_or_stopped() {
        let q = Arc::new(Queue::new(4));
        let running = Arc::new(AtomicBool::new(true));
        let flushing = Arc::new(AtomicBool::new(true));
        q.push_wait(7, &AtomicBool::new(true), &AtomicBool::new(false));

        let qc = q.clone();
        let rc = running.clone();
        let fc = flushing.clone();
        let handle = thread::spawn(move || qc.pop_wait(&rc, &fc));

        thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished(), "pop must not proceed while flushing");

        running.store(false, Ordering::Release);
        q.clear();
        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn clear_drains_every_queued_item() {
        let q: Queue<i32> = Queue::new(4);
        let running = AtomicBool::new(true);
        let flushing = AtomicBool::new(false);
        q.push_wait(1, &running, &flushing);
        q.push_wait(2, &running, &flushing);
        q.push_wait(3, &running, &flushing);

        q.clear();

        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
    }
}
