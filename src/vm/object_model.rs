use crate::util::{AllocationHandle, ClassHandle};
use crate::vm::VMBinding;

/// Class metadata the allocation and hashcode paths read. Every method is a pure lookup on data
/// the runtime's class subsystem owns.
pub trait ObjectModel<VM: VMBinding> {
    /// The handle to stamp into the first word of instances of `class`.
    fn allocation_handle(class: ClassHandle) -> AllocationHandle;

    /// The inverse of [`ObjectModel::allocation_handle`].
    fn class_of(handle: AllocationHandle) -> ClassHandle;

    /// The allocated size of a scalar instance of `class`, in bytes.
    fn instance_size(class: ClassHandle) -> usize;

    /// The array class whose elements are of class `element`.
    fn array_class(element: ClassHandle) -> ClassHandle;

    /// The size of one element of the array class `class`.
    fn array_element_size(class: ClassHandle) -> usize;

    /// The offset from the start of an array of class `class` to its first element.
    fn array_first_element_offset(class: ClassHandle) -> usize;

    fn is_array(class: ClassHandle) -> bool;

    fn is_interface(class: ClassHandle) -> bool;

    fn is_final(class: ClassHandle) -> bool;

    /// The depth of `class` in its superclass chain, used by inline type checks.
    fn fast_type_check_depth(class: ClassHandle) -> usize;
}
