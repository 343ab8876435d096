//! The public API for the runtime. Every operation a binding calls at runtime is here.
//!
//! The order in which a binding uses it:
//! 1. Create a [`GcHelperBuilder`], optionally set options on it, and call [`gc_init`] once its
//!    [`crate::vm::Collection::nos_boundary`] and [`crate::vm::ActivePlan::tls_gc_offset`] can
//!    answer.
//! 2. For each mutator thread, create a [`ThreadLocalAllocator`] and publish it with
//!    [`bind_tla`].
//! 3. Call [`alloc`], [`alloc_array`], [`object_reference_write`] and [`identity_hashcode`] from
//!    mutator threads. A binding that compiles its own fast paths can instead use [`tla_layout`]
//!    and the constants in [`crate::util::metadata`], and call into the binding traits on the
//!    slow paths the same way these functions do.

use crate::gc_helper::{GcHelper, GcHelperBuilder};
use crate::util::alloc::{array, tla_slot, ThreadLocalAllocator, TlaLayout};
use crate::util::metadata::hashcode::{self, HashcodeState};
use crate::util::{Address, AllocationHandle, ClassHandle, ObjectReference, VMMutatorThread};
use crate::vm::{ObjectModel, VMBinding};

/// Initialize the GC helpers. This resolves the options in `builder` against the binding and
/// selects the write barrier.
///
/// Note that this method will attempt to initialize a logger. If the runtime would like to use
/// its own logger, it should initialize the logger before calling this method.
///
/// The fast paths take the helper by reference. A binding typically leaks the returned box with
/// `Box::leak()` and keeps the `'static` reference in a global.
///
/// Arguments:
/// * `builder`: The builder holding the options.
pub fn gc_init<VM: VMBinding>(builder: &GcHelperBuilder) -> Box<GcHelper<VM>> {
    match crate::util::logger::try_init() {
        Ok(_) => debug!("GC helpers initialized the logger."),
        Err(_) => debug!(
            "GC helpers failed to initialize the logger. Possibly a logger has been initialized by user."
        ),
    }
    let helper = builder.build::<VM>();
    #[cfg(feature = "extreme_assertions")]
    warn!("The feature 'extreme_assertions' is enabled. The fast paths will run expensive checks. Slow performance should be expected.");
    Box::new(helper)
}

/// Publish `tla` as the allocator of `tls`, by storing its address in the thread's TLS slot.
/// Pass an empty [`ThreadLocalAllocator`]: the first allocation takes the slow path, which is
/// expected to refill it.
///
/// # Safety
/// `tla` must stay at the same address, and must not be accessed by any other thread, until the
/// thread is unbound with [`unbind_tla`]. The TLS block of `tls` must be writable.
///
/// Arguments:
/// * `helper`: The GC helpers.
/// * `tls`: The mutator thread that will own the allocator.
/// * `tla`: The allocator.
pub unsafe fn bind_tla<VM: VMBinding>(
    helper: &GcHelper<VM>,
    tls: VMMutatorThread,
    tla: &mut ThreadLocalAllocator,
) {
    let slot = tla_slot::<VM>(tls, helper.config());
    slot.store::<Address>(Address::from_mut_ptr(tla as *mut ThreadLocalAllocator));
    debug!("Bound TLA {} to slot {}", Address::from_ref(tla), slot);
}

/// Clear the TLA slot of `tls`. Every later allocation from the thread takes the slow path.
///
/// # Safety
/// The TLS block of `tls` must be writable.
pub unsafe fn unbind_tla<VM: VMBinding>(helper: &GcHelper<VM>, tls: VMMutatorThread) {
    tla_slot::<VM>(tls, helper.config()).store::<Address>(Address::ZERO);
}

/// The offsets of the [`ThreadLocalAllocator`] fields, for runtimes that generate the
/// allocation fast path themselves.
pub fn tla_layout() -> TlaLayout {
    TlaLayout::new()
}

/// Allocate memory for an object. The first word of the result holds `handle`, and the rest is
/// zeroed. A zero address is returned if the binding's slow allocator failed.
///
/// Objects over the large object threshold go straight to
/// [`crate::vm::Collection::alloc_slow`] and leave the thread's TLA untouched.
///
/// Arguments:
/// * `helper`: The GC helpers.
/// * `tls`: The calling mutator thread. Its TLA must have been published with [`bind_tla`].
/// * `size`: The number of bytes required for the object, aligned to
///   [`VMBinding::OBJECT_ALIGNMENT`].
/// * `handle`: The allocation handle of the object's class.
#[inline(always)]
pub fn alloc<VM: VMBinding>(
    helper: &GcHelper<VM>,
    tls: VMMutatorThread,
    size: usize,
    handle: AllocationHandle,
) -> Address {
    crate::util::alloc::alloc::<VM>(helper.config(), tls, size, handle)
}

/// Allocate an instance of the scalar class `class`.
///
/// Arguments:
/// * `helper`: The GC helpers.
/// * `tls`: The calling mutator thread.
/// * `class`: A class that is neither an interface nor an array class.
pub fn alloc_instance<VM: VMBinding>(
    helper: &GcHelper<VM>,
    tls: VMMutatorThread,
    class: ClassHandle,
) -> Address {
    debug_assert!(
        !VM::VMObjectModel::is_interface(class),
        "Cannot instantiate interface {:?}",
        class
    );
    debug_assert!(!VM::VMObjectModel::is_array(class));
    let size = VM::VMObjectModel::instance_size(class);
    alloc::<VM>(helper, tls, size, VM::VMObjectModel::allocation_handle(class))
}

/// Allocate an array of `length` elements of class `element_class`, with its length field set.
/// Negative lengths, and lengths whose size overflows, are passed to
/// [`crate::vm::Collection::alloc_vector_slow`], which reports the error.
///
/// Arguments:
/// * `helper`: The GC helpers.
/// * `tls`: The calling mutator thread.
/// * `element_class`: The class of the elements.
/// * `length`: The number of elements.
pub fn alloc_array<VM: VMBinding>(
    helper: &GcHelper<VM>,
    tls: VMMutatorThread,
    element_class: ClassHandle,
    length: i32,
) -> Address {
    array::alloc_array::<VM>(helper.config(), tls, element_class, length)
}

/// The subsuming write barrier. Store `target` into `slot` of `src`, and let the binding record
/// the reference if the selected barrier asks for it.
///
/// Arguments:
/// * `helper`: The GC helpers.
/// * `tls`: The calling mutator thread.
/// * `src`: The modified source object.
/// * `slot`: The location of the field to be modified.
/// * `target`: The target for the write operation.
#[inline(always)]
pub fn object_reference_write<VM: VMBinding>(
    helper: &GcHelper<VM>,
    tls: VMMutatorThread,
    src: ObjectReference,
    slot: Address,
    target: ObjectReference,
) {
    helper
        .barrier()
        .object_reference_write(tls, src, slot, target)
}

/// Return the identity hashcode of `object`, or 0 for null. The value never changes for the
/// lifetime of the object, including across relocation.
///
/// Arguments:
/// * `helper`: The GC helpers.
/// * `object`: The object to hash.
pub fn identity_hashcode<VM: VMBinding>(helper: &GcHelper<VM>, object: ObjectReference) -> i32 {
    hashcode::identity_hashcode::<VM>(object, helper.config().log_object_alignment)
}

/// The hashcode state of `object`. Exposed for collectors and for debugging.
pub fn hashcode_state(object: ObjectReference) -> HashcodeState {
    HashcodeState::of(object)
}
