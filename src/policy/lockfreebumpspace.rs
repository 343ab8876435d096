use atomic::Atomic;

use std::sync::atomic::Ordering;

use crate::gc_helper::HelperConfig;
use crate::util::alloc::{BumpAllocator, ThreadLocalAllocator};
use crate::util::conversions;
use crate::util::metadata::header_metadata;
use crate::util::{memory, Address, AllocationHandle};

/// A contiguous range of memory handed out by bumping one shared cursor. Threads take TLA slabs
/// from it, and objects too large for a TLA are placed in it directly.
///
/// A binding's [`crate::vm::Collection::alloc_slow`] can serve allocations from a pair of these:
/// one above the NOS boundary for the nursery, one below it for large objects.
pub struct LockFreeBumpSpace {
    name: &'static str,
    /// Next free byte
    cursor: Atomic<Address>,
    /// start of this space
    start: Address,
    /// end of this space
    limit: Address,
}

impl LockFreeBumpSpace {
    /// Manage `[start, start + size)`. The range must be mapped memory owned by the caller.
    pub fn new(name: &'static str, start: Address, size: usize) -> Self {
        debug!("{}: [{}, {})", name, start, start + size);
        LockFreeBumpSpace {
            name,
            cursor: Atomic::new(start),
            start,
            limit: start + size,
        }
    }

    pub fn get_name(&self) -> &'static str {
        self.name
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn limit(&self) -> Address {
        self.limit
    }

    pub fn contains(&self, addr: Address) -> bool {
        self.start <= addr && addr < self.limit
    }

    pub fn used_bytes(&self) -> usize {
        self.cursor.load(Ordering::Relaxed) - self.start
    }

    pub fn reserved_pages(&self) -> usize {
        conversions::bytes_to_pages_up(self.used_bytes())
    }

    /// Take `bytes` from the space. Returns `None` if the space is exhausted.
    pub fn acquire(&self, bytes: usize) -> Option<Address> {
        let limit = self.limit;
        let result = self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |addr| {
                let new_cursor = addr + bytes;
                if new_cursor > limit {
                    None
                } else {
                    Some(new_cursor)
                }
            })
            .ok();
        if result.is_none() {
            debug!("{}: cannot acquire {} bytes", self.name, bytes);
        }
        result
    }

    /// Allocate one zeroed object directly in the space, bypassing any TLA. Returns zero if the
    /// space is exhausted.
    pub fn alloc(&self, size: usize, handle: AllocationHandle) -> Address {
        match self.acquire(size) {
            Some(start) => {
                memory::zero(start, size);
                header_metadata::store_allocation_handle(start, handle);
                start
            }
            None => Address::ZERO,
        }
    }

    /// Give `tla` a fresh slab of `config.tla_size` bytes. With prefetching, the slab is zeroed
    /// lazily by the fast path, so the ceiling starts at the bottom. Otherwise it is zeroed here
    /// and the ceiling is the end. Returns false if the space is exhausted.
    pub fn refill_tla(&self, tla: &mut ThreadLocalAllocator, config: &HelperConfig) -> bool {
        let Some(start) = self.acquire(config.tla_size) else {
            return false;
        };
        let end = start + config.tla_size;
        if config.prefetch {
            tla.set_region(start, start, end);
        } else {
            memory::zero(start, config.tla_size);
            tla.set_region(start, end, end);
        }
        debug!("{}: refilled TLA with [{}, {})", self.name, start, end);
        true
    }

    /// The slow path for an allocation that did not fit in `tla`: refill it and retry. Objects
    /// larger than a slab are allocated directly. Returns zero if the space is exhausted.
    pub fn refill_and_alloc(
        &self,
        tla: &mut ThreadLocalAllocator,
        config: &HelperConfig,
        size: usize,
        handle: AllocationHandle,
    ) -> Address {
        if size > config.tla_size {
            return self.alloc(size, handle);
        }
        if !self.refill_tla(tla, config) {
            return Address::ZERO;
        }
        BumpAllocator::new(tla, config)
            .alloc_fast(size, handle)
            .unwrap_or(Address::ZERO)
    }

    /// Rewind the cursor to the start of the space. Collector only: every TLA carved from the
    /// space must have been reset first.
    pub fn reset(&self) {
        self.cursor.store(self.start, Ordering::Relaxed);
    }
}
