use alloc::collections::BinaryHeap;
use core::cmp::Ordering;
use core::time::Duration;

use crate::*;

/// Work deferred until a delay has passed, pinned to the tiles it affects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Deferred {
    /// Release a matched selection.
    SettleMatch([TileId; 2]),
    /// Hide a mismatched selection and release it.
    RevertMismatch([TileId; 2]),
    /// Hide a hinted pair again, tile by tile.
    ExpireHint([TileId; 2]),
}

#[derive(Clone, Debug)]
struct Pending {
    due: Duration,
    seq: u64,
    task: Deferred,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    // reversed so the max-heap pops the earliest task, ties in scheduling order
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Queue of deferred work on a session's virtual clock.
///
/// The queue carries the generation of the session that owns it. Work never
/// crosses generations: `restamp` empties the queue, a new level gets a new
/// session with its own scheduler, and time from an older generation is
/// turned away by [`SessionHost::advance_stamped`].
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    generation: u64,
    queue: BinaryHeap<Pending>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            ..Default::default()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn schedule(&mut self, due: Duration, task: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        log::trace!("Scheduled {:?} at {:?} (#{})", task, due, seq);
        self.queue.push(Pending { due, seq, task });
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|pending| pending.due)
    }

    /// Pops the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Deferred> {
        if self.next_due()? > now {
            return None;
        }
        self.queue.pop().map(|pending| pending.task)
    }

    /// Moves the queue to a new generation, cancelling everything pending.
    pub fn restamp(&mut self, generation: u64) {
        if !self.is_empty() {
            log::debug!(
                "Cancelling {} pending tasks of generation {}",
                self.queue.len(),
                self.generation
            );
        }
        self.queue.clear();
        self.generation = generation;
    }
}
