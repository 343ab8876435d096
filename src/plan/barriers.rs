//! Write barriers.

use strum_macros::{Display, EnumString};

use crate::util::{Address, ObjectReference, VMMutatorThread};
use crate::vm::{Collection, VMBinding};

/// BarrierSelector describes which barrier to use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumString, Display)]
pub enum BarrierSelector {
    /// No barrier is used.
    NoBarrier,
    /// Remember old objects that get a reference into the nursery.
    GenRememberedSet,
}

impl BarrierSelector {
    /// A const function to check if two barrier selectors are the same.
    pub const fn equals(&self, other: BarrierSelector) -> bool {
        // cast enum to u8 then compare. Otherwise, we cannot do it in a const fn.
        *self as u8 == other as u8
    }
}

/// A barrier is a combination of fast-path behaviour and slow-path semantics. The fast path runs
/// inline on every reference store and decides whether the store needs the slow path, which the
/// binding implements in [`Collection::write_barrier_slow`].
///
/// One barrier is selected when the [`crate::GcHelper`] is built and shared by all threads.
pub trait Barrier<VM: VMBinding>: 'static + Send + Sync {
    /// Store `target` into `slot` of `src`, taking the slow path when the policy asks for it.
    #[inline(always)]
    fn object_reference_write(
        &self,
        tls: VMMutatorThread,
        src: ObjectReference,
        slot: Address,
        target: ObjectReference,
    ) {
        if self.needs_slow_path(src, slot, target) {
            self.object_reference_write_slow(tls, src, slot, target);
        } else {
            plain_store(slot, target);
        }
    }

    /// Does storing `target` into `slot` of `src` need to be recorded?
    fn needs_slow_path(&self, src: ObjectReference, slot: Address, target: ObjectReference)
        -> bool;

    /// Hand the store to the binding, which performs it and records the reference.
    #[cold]
    fn object_reference_write_slow(
        &self,
        tls: VMMutatorThread,
        src: ObjectReference,
        slot: Address,
        target: ObjectReference,
    ) {
        trace!("write_barrier_slow: {} [{}] = {}", src, slot, target);
        probe!(gc_fastpath, write_barrier_slow);
        VM::VMCollection::write_barrier_slow(tls, src, slot, target);
    }

    fn selector(&self) -> BarrierSelector;
}

/// Store a reference without any bookkeeping.
#[inline(always)]
pub fn plain_store(slot: Address, target: ObjectReference) {
    unsafe { slot.store::<ObjectReference>(target) }
}

pub struct NoBarrier;

impl<VM: VMBinding> Barrier<VM> for NoBarrier {
    fn needs_slow_path(&self, _src: ObjectReference, _slot: Address, _target: ObjectReference) -> bool {
        false
    }

    fn selector(&self) -> BarrierSelector {
        BarrierSelector::NoBarrier
    }
}
