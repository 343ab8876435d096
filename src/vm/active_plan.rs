use crate::util::Address;
use crate::util::VMMutatorThread;
use crate::vm::VMBinding;

/// How the fast paths find the calling thread's allocator.
pub trait ActivePlan<VM: VMBinding> {
    /// Return the base of the thread local storage block of `tls`.
    ///
    /// Arguments:
    /// * `tls`: The mutator thread that is allocating.
    fn tls_base(tls: VMMutatorThread) -> Address;

    /// Return the offset from a thread's TLS base to the slot that holds the address of its
    /// [`crate::util::alloc::ThreadLocalAllocator`]. The value is read once when the
    /// [`crate::GcHelper`] is built.
    fn tls_gc_offset() -> usize;
}
