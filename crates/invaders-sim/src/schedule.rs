//! Deferred one-shot actions keyed by wall-clock trigger time.
//!
//! Staggered boss burst shots and the defeat explosion sequence are queued
//! here instead of leaning on host timers. Entries are drained each tick in
//! trigger order and can be cancelled en masse by owner, so tearing down an
//! entity (or the whole level) never leaves a callback aimed at a stale
//! reference.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Payload fired when a scheduled entry comes due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    /// Drop a hazard at the given field position.
    SpawnHazard { x: f64, y: f64 },
    /// Spawn an explosion effect.
    SpawnExplosion { x: f64, y: f64, large: bool },
}

#[derive(Debug, Clone)]
struct Scheduled {
    fire_at_ms: f64,
    /// Insertion order; breaks ties so same-timestamp entries fire FIFO.
    seq: u64,
    owner: Option<hecs::Entity>,
    action: DeferredAction,
}

// BinaryHeap is a max-heap; reverse the ordering to pop earliest-first.
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at_ms
            .total_cmp(&self.fire_at_ms)
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

/// Min-heap of pending actions, drained once per tick.
#[derive(Debug, Default)]
pub struct ActionQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action to fire once `now >= fire_at_ms`. `owner` ties the
    /// entry's lifetime to an entity; ownerless entries belong to the level.
    pub fn schedule(&mut self, fire_at_ms: f64, owner: Option<hecs::Entity>, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled {
            fire_at_ms,
            seq,
            owner,
            action,
        });
    }

    /// Pop every entry due at `now_ms`, in trigger order, into `out`.
    pub fn drain_due(&mut self, now_ms: f64, out: &mut Vec<DeferredAction>) {
        while let Some(next) = self.heap.peek() {
            if next.fire_at_ms > now_ms {
                break;
            }
            let entry = self.heap.pop().expect("peeked entry");
            out.push(entry.action);
        }
    }

    /// Drop every pending entry owned by `entity`.
    pub fn cancel_owned_by(&mut self, entity: hecs::Entity) {
        let retained: Vec<Scheduled> = self
            .heap
            .drain()
            .filter(|entry| entry.owner != Some(entity))
            .collect();
        self.heap = retained.into();
    }

    /// Drop everything (level teardown).
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
