use crate::gc_helper::HelperConfig;
use crate::util::alloc::allocator::{align_allocation_size, alloc_vector_slow};
use crate::util::metadata::header_metadata;
use crate::util::{Address, ClassHandle, VMMutatorThread};
use crate::vm::{ObjectModel, VMBinding};

/// The aligned size of an array, or `None` if it does not fit in a `usize`.
pub fn array_size(
    first_element_offset: usize,
    element_size: usize,
    length: usize,
    align: usize,
) -> Option<usize> {
    let size = element_size
        .checked_mul(length)?
        .checked_add(first_element_offset)?;
    align_allocation_size(size, align)
}

/// Allocate an array of `length` elements of class `element_class`.
///
/// Arrays the layer can size go through the ordinary allocation path, and get their length
/// stored once the allocation succeeds. Negative lengths, and lengths whose size overflows, are
/// left to [`crate::vm::Collection::alloc_vector_slow`].
pub fn alloc_array<VM: VMBinding>(
    config: &HelperConfig,
    tls: VMMutatorThread,
    element_class: ClassHandle,
    length: i32,
) -> Address {
    let class = VM::VMObjectModel::array_class(element_class);
    debug_assert!(VM::VMObjectModel::is_array(class));
    let handle = VM::VMObjectModel::allocation_handle(class);
    if length < 0 {
        return alloc_vector_slow::<VM>(tls, length, handle);
    }

    let size = match array_size(
        VM::VMObjectModel::array_first_element_offset(class),
        VM::VMObjectModel::array_element_size(class),
        length as usize,
        config.object_alignment,
    ) {
        Some(size) => size,
        None => return alloc_vector_slow::<VM>(tls, length, handle),
    };

    let result = super::alloc::<VM>(config, tls, size, handle);
    if !result.is_zero() {
        header_metadata::store_array_length(result, length);
    }
    result
}
