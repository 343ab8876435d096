use memoffset::offset_of;

use crate::gc_helper::HelperConfig;
use crate::util::{Address, VMMutatorThread};
use crate::vm::{ActivePlan, VMBinding};

/// A thread local allocation area. `[free, ceiling)` is zeroed and ready to hand out,
/// `[ceiling, end)` is owned by the thread but not yet zeroed.
///
/// Only the owning thread reads or writes a TLA, so the fields are plain words. The layout is
/// `repr(C)` so that compiled code can bump `free` inline using the offsets in [`TlaLayout`].
#[repr(C)]
#[derive(Debug, Default)]
pub struct ThreadLocalAllocator {
    free: Address,
    ceiling: Address,
    end: Address,
}

impl ThreadLocalAllocator {
    /// An empty TLA. Every allocation from it takes the slow path.
    pub const fn new() -> Self {
        ThreadLocalAllocator {
            free: Address::ZERO,
            ceiling: Address::ZERO,
            end: Address::ZERO,
        }
    }

    /// Hand the region `[free, end)` to this TLA, of which `[free, ceiling)` is already zeroed.
    pub fn set_region(&mut self, free: Address, ceiling: Address, end: Address) {
        assert!(
            free <= ceiling && ceiling <= end,
            "Invalid TLA region: free = {}, ceiling = {}, end = {}",
            free,
            ceiling,
            end
        );
        self.free = free;
        self.ceiling = ceiling;
        self.end = end;
    }

    /// Drop the current region. Called by the collector when the thread's memory is reclaimed.
    pub fn reset(&mut self) {
        self.free = Address::ZERO;
        self.ceiling = Address::ZERO;
        self.end = Address::ZERO;
    }

    pub fn free(&self) -> Address {
        self.free
    }

    pub fn ceiling(&self) -> Address {
        self.ceiling
    }

    pub fn end(&self) -> Address {
        self.end
    }

    /// Bytes left before the end of the region, zeroed or not.
    pub fn remaining(&self) -> usize {
        self.end - self.free
    }

    pub(crate) fn set_free(&mut self, free: Address) {
        debug_assert!(free <= self.ceiling);
        self.free = free;
    }

    pub(crate) fn set_ceiling(&mut self, ceiling: Address) {
        debug_assert!(self.free <= ceiling && ceiling <= self.end);
        self.ceiling = ceiling;
    }

    pub(crate) fn check_invariant(&self) {
        debug_assert!(
            self.free <= self.ceiling && self.ceiling <= self.end,
            "TLA invariant broken: free = {}, ceiling = {}, end = {}",
            self.free,
            self.ceiling,
            self.end
        );
    }
}

/// The byte offsets of the [`ThreadLocalAllocator`] fields. This is provided so that runtime
/// compilers may generate the allocation fast path and load the fields directly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TlaLayout {
    pub free_offset: usize,
    pub ceiling_offset: usize,
    pub end_offset: usize,
}

impl TlaLayout {
    pub fn new() -> Self {
        TlaLayout {
            free_offset: offset_of!(ThreadLocalAllocator, free),
            ceiling_offset: offset_of!(ThreadLocalAllocator, ceiling),
            end_offset: offset_of!(ThreadLocalAllocator, end),
        }
    }
}

impl Default for TlaLayout {
    fn default() -> Self {
        Self::new()
    }
}

/// The address of the slot in the thread local storage of `tls` that holds its TLA pointer.
pub fn tla_slot<VM: VMBinding>(tls: VMMutatorThread, config: &HelperConfig) -> Address {
    VM::VMActivePlan::tls_base(tls) + config.tls_gc_offset
}

/// Get the TLA of the calling thread.
///
/// # Safety
/// `tls` must be the calling thread, and its TLA slot must hold a pointer to a live
/// [`ThreadLocalAllocator`] (see [`crate::memory_manager::bind_tla`]). No other reference to
/// that TLA may be live while the returned one is in use.
pub unsafe fn current_tla<'a, VM: VMBinding>(
    tls: VMMutatorThread,
    config: &HelperConfig,
) -> Option<&'a mut ThreadLocalAllocator> {
    let tla = tla_slot::<VM>(tls, config).load::<Address>();
    if tla.is_zero() {
        None
    } else {
        Some(tla.as_mut_ref::<ThreadLocalAllocator>())
    }
}
