//! The remembered set: old objects that may hold references into the nursery.

use crossbeam::queue::SegQueue;

use crate::plan::barriers::plain_store;
use crate::util::metadata::log_bit;
use crate::util::{Address, ObjectReference};

/// A concurrent queue of remembered objects. Each object is queued at most once until the
/// collector forgets it, because only the thread that sets its remembered bit pushes it.
///
/// This is what a binding's [`crate::vm::Collection::write_barrier_slow`] usually delegates to.
#[derive(Default)]
pub struct RememberedSet {
    entries: SegQueue<ObjectReference>,
}

impl RememberedSet {
    pub fn new() -> Self {
        Self {
            entries: SegQueue::new(),
        }
    }

    /// Perform the store of `target` into `slot` of `src` and remember `src`.
    pub fn record(&self, src: ObjectReference, slot: Address, target: ObjectReference) {
        plain_store(slot, target);
        if log_bit::attempt_remember(src) {
            trace!("Remembered {}", src);
            self.entries.push(src);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take every remembered object out of the set. Their remembered bits stay set until
    /// [`RememberedSet::forget`] is called on them.
    pub fn drain(&self) -> Vec<ObjectReference> {
        let mut objects = Vec::with_capacity(self.entries.len());
        while let Some(object) = self.entries.pop() {
            objects.push(object);
        }
        debug!("Drained {} remembered objects", objects.len());
        objects
    }

    /// Clear the remembered bit of `object` after the collector has processed it, so the barrier
    /// records it again on its next old-to-young store.
    pub fn forget(&self, object: ObjectReference) {
        log_bit::clear_remembered(object);
    }
}
