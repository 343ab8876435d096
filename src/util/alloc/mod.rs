//! Object allocation: the thread local allocator, its bump-pointer fast path with the
//! prefetch and zeroing pipeline, and the array layer on top of it.

pub(crate) mod allocator;
pub use allocator::align_allocation_size;

pub mod array;

mod bumpallocator;
pub use bumpallocator::{next_ceiling, BumpAllocator};

mod tla;
pub use tla::{current_tla, tla_slot, ThreadLocalAllocator, TlaLayout};

use crate::gc_helper::HelperConfig;
use crate::util::conversions::raw_is_aligned;
use crate::util::{Address, AllocationHandle, VMMutatorThread};
use crate::vm::VMBinding;

/// Allocate `size` bytes for an object with allocation handle `handle` on behalf of `tls`.
/// Objects over the large object threshold, and any request the thread's TLA cannot serve, go
/// to the binding's slow allocator. A zero address means the slow allocator failed.
#[inline(always)]
pub fn alloc<VM: VMBinding>(
    config: &HelperConfig,
    tls: VMMutatorThread,
    size: usize,
    handle: AllocationHandle,
) -> Address {
    debug_assert!(
        raw_is_aligned(size, config.object_alignment),
        "Allocation size {} is not aligned to {}",
        size,
        config.object_alignment
    );
    if size > config.large_object_threshold {
        return allocator::alloc_slow::<VM>(tls, size, handle);
    }
    // The TLA borrow must end before the slow path runs: the binding may refill it.
    let fast = match unsafe { current_tla::<VM>(tls, config) } {
        Some(tla) => BumpAllocator::new(tla, config).alloc_fast(size, handle),
        None => None,
    };
    match fast {
        Some(result) => result,
        None => allocator::alloc_slow::<VM>(tls, size, handle),
    }
}
