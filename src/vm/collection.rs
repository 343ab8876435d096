use crate::util::{Address, AllocationHandle, ObjectReference, VMMutatorThread};
use crate::vm::VMBinding;

/// The slow paths the runtime's collector provides. The fast paths call into these whenever they
/// cannot finish on their own.
pub trait Collection<VM: VMBinding> {
    /// Allocate `size` bytes and stamp `handle` into the first word. This is called for large
    /// objects and whenever the thread local allocator is exhausted. It may refill the thread's
    /// allocator, trigger a collection or block the thread. A zero address means the allocation
    /// failed, and is handed back to the caller unchanged.
    ///
    /// Arguments:
    /// * `tls`: The mutator thread that is allocating.
    /// * `size`: The object size in bytes, already aligned to [`VMBinding::OBJECT_ALIGNMENT`].
    /// * `handle`: The allocation handle of the object's class.
    fn alloc_slow(tls: VMMutatorThread, size: usize, handle: AllocationHandle) -> Address;

    /// Allocate an array whose size cannot be computed inline: negative lengths, and lengths whose
    /// size overflows. The runtime owns sizing and reports out-of-memory or a negative size.
    ///
    /// Arguments:
    /// * `tls`: The mutator thread that is allocating.
    /// * `length`: The requested length.
    /// * `handle`: The allocation handle of the array class.
    fn alloc_vector_slow(tls: VMMutatorThread, length: i32, handle: AllocationHandle) -> Address;

    /// Store `target` into `slot` of `src` and record the old-to-young reference. Called by the
    /// generational barrier only when `src` is not yet remembered.
    fn write_barrier_slow(
        tls: VMMutatorThread,
        src: ObjectReference,
        slot: Address,
        target: ObjectReference,
    );

    /// The start of the nursery. Addresses at or above it are young. Read once at init.
    fn nos_boundary() -> Address;
}
