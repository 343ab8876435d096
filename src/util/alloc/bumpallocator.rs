use std::cmp::min;

use crate::gc_helper::HelperConfig;
use crate::util::alloc::ThreadLocalAllocator;
use crate::util::constants::BYTES_IN_CACHE_LINE;
use crate::util::metadata::header_metadata;
use crate::util::{memory, Address, AllocationHandle};

/// The inline allocation path over one thread's [`ThreadLocalAllocator`].
///
/// `alloc_fast` either bumps `free` inside the zeroed part of the TLA, or, with prefetching
/// enabled, first zeroes another quantum past the ceiling. It never calls out of the crate:
/// `None` tells the caller to take the slow path, after this allocator has been dropped.
pub struct BumpAllocator<'a> {
    tla: &'a mut ThreadLocalAllocator,
    config: &'a HelperConfig,
}

impl<'a> BumpAllocator<'a> {
    pub fn new(tla: &'a mut ThreadLocalAllocator, config: &'a HelperConfig) -> Self {
        BumpAllocator { tla, config }
    }

    /// Allocate `size` bytes and stamp `handle` into the first word. `size` must already be
    /// aligned and no larger than the large object threshold.
    #[inline(always)]
    pub fn alloc_fast(&mut self, size: usize, handle: AllocationHandle) -> Option<Address> {
        debug_assert!(size <= self.config.large_object_threshold);
        debug_assert!(size >= std::mem::size_of::<AllocationHandle>());
        self.tla.check_invariant();

        let free = self.tla.free();
        let new_free = free + size;
        if new_free <= self.tla.ceiling() {
            return Some(self.bump(new_free, handle));
        }
        if self.config.prefetch && new_free <= self.tla.end() {
            self.extend_ceiling(new_free);
            return Some(self.bump(new_free, handle));
        }
        trace!(
            "TLA exhausted for {} bytes: free = {}, ceiling = {}, end = {}",
            size,
            free,
            self.tla.ceiling(),
            self.tla.end()
        );
        None
    }

    #[inline(always)]
    fn bump(&mut self, new_free: Address, handle: AllocationHandle) -> Address {
        let result = self.tla.free();
        #[cfg(feature = "extreme_assertions")]
        assert!(
            memory::is_zeroed(result, new_free - result),
            "Memory handed out at {} is not zeroed",
            result
        );
        self.tla.set_free(new_free);
        header_metadata::store_allocation_handle(result, handle);
        result
    }

    /// Zero ahead so that `[free, new_free)` lies below the ceiling, prefetching past the new
    /// ceiling so the next extension finds its lines in cache.
    #[inline(never)]
    fn extend_ceiling(&mut self, new_free: Address) {
        let ceiling = self.tla.ceiling();
        let end = self.tla.end();
        let new_ceiling = next_ceiling(ceiling, new_free, end, self.config.zeroing_size);
        debug_assert!(new_free <= new_ceiling);

        let prefetch_end = min(new_ceiling + self.config.prefetch_distance, end);
        memory::prefetch_range(ceiling, prefetch_end, self.config.prefetch_stride);
        memory::zero(ceiling, new_ceiling - ceiling);
        self.tla.set_ceiling(new_ceiling);
        trace!("TLA ceiling moved from {} to {}", ceiling, new_ceiling);
    }
}

/// Where the zeroing pipeline moves a ceiling to: one zeroing quantum past the current ceiling,
/// or past `new_free` if that is further, aligned down to a cache line and clipped to `end`.
/// `new_free` must not be above `end`.
pub fn next_ceiling(
    ceiling: Address,
    new_free: Address,
    end: Address,
    zeroing_size: usize,
) -> Address {
    debug_assert!(new_free <= end);
    let mut next = (ceiling + zeroing_size).align_down(BYTES_IN_CACHE_LINE);
    if next < new_free {
        next = (new_free + zeroing_size).align_down(BYTES_IN_CACHE_LINE);
    }
    min(next, end)
}
