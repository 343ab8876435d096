//! Generational write barrier.

use crate::gc_helper::HelperConfig;
use crate::plan::barriers::{Barrier, BarrierSelector};
use crate::util::metadata::log_bit;
use crate::util::{Address, ObjectReference};
use crate::vm::VMBinding;

use std::marker::PhantomData;

/// Remembered-set barrier for generational collection. A store needs recording only if it puts a
/// nursery reference into a slot outside the nursery, and the source object is not remembered yet.
pub struct GenRememberedSetBarrier<VM: VMBinding> {
    /// Start of the nursery.
    nos_boundary: Address,
    /// When false, every store is plain.
    gen_mode: bool,
    phantom: PhantomData<VM>,
}

impl<VM: VMBinding> GenRememberedSetBarrier<VM> {
    pub fn new(config: &HelperConfig) -> Self {
        Self {
            nos_boundary: config.nos_boundary,
            gen_mode: config.gen_mode,
            phantom: PhantomData,
        }
    }
}

impl<VM: VMBinding> Barrier<VM> for GenRememberedSetBarrier<VM> {
    #[inline(always)]
    fn needs_slow_path(&self, src: ObjectReference, slot: Address, target: ObjectReference) -> bool {
        if !self.gen_mode {
            return false;
        }
        // Slots in the nursery are scanned anyway.
        if slot >= self.nos_boundary {
            return false;
        }
        // Null and mature targets need no record.
        if target.to_raw_address() < self.nos_boundary {
            return false;
        }
        // Racing threads may both see the bit clear. The slow path tolerates that.
        !log_bit::is_remembered(src)
    }

    fn selector(&self) -> BarrierSelector {
        BarrierSelector::GenRememberedSet
    }
}
