use crate::util::conversions::checked_align_up;
use crate::util::{Address, AllocationHandle, VMMutatorThread};
use crate::vm::{Collection, VMBinding};

/// Round an object size up to the object alignment. Returns `None` if the rounding overflows.
#[inline(always)]
pub fn align_allocation_size(size: usize, align: usize) -> Option<usize> {
    checked_align_up(size, align)
}

/// Hand an allocation the fast path cannot serve to the binding. The result is returned as is,
/// including a zero address for a failed allocation.
#[inline(never)]
pub fn alloc_slow<VM: VMBinding>(
    tls: VMMutatorThread,
    size: usize,
    handle: AllocationHandle,
) -> Address {
    trace!("alloc_slow: size = {}, handle = {:?}", size, handle);
    probe!(gc_fastpath, alloc_slow_start, size);
    let result = VM::VMCollection::alloc_slow(tls, size, handle);
    probe!(gc_fastpath, alloc_slow_end);
    if result.is_zero() {
        debug!("Slow allocation of {} bytes failed", size);
    }
    result
}

/// Hand an array allocation that cannot be sized inline to the binding.
#[inline(never)]
pub fn alloc_vector_slow<VM: VMBinding>(
    tls: VMMutatorThread,
    length: i32,
    handle: AllocationHandle,
) -> Address {
    trace!("alloc_vector_slow: length = {}, handle = {:?}", length, handle);
    probe!(gc_fastpath, alloc_vector_slow, length);
    VM::VMCollection::alloc_vector_slow(tls, length, handle)
}
