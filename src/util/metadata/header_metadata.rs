//! The fixed object header:
//!
//! ```text
//! offset 0                      allocation handle (one word)
//! offset BYTES_IN_WORD          info word (u32): hashcode state, remembered bit, lock bits
//! offset BYTES_IN_WORD + 4      array length (i32, arrays only)
//! ```
//!
//! The info word is shared with other subsystems (such as locking), so every update to it is a
//! compare-and-exchange that only changes the bits its caller owns.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::util::alloc::array::array_size;
use crate::util::constants::{BYTES_IN_INT, BYTES_IN_WORD};
use crate::util::{Address, AllocationHandle, ObjectReference};
use crate::vm::{ObjectModel, VMBinding};

pub const ALLOCATION_HANDLE_OFFSET: usize = 0;
pub const OBJ_INFO_OFFSET: usize = BYTES_IN_WORD;
pub const ARRAY_LENGTH_OFFSET: usize = OBJ_INFO_OFFSET + BYTES_IN_INT;

const_assert!(OBJ_INFO_OFFSET % BYTES_IN_INT == 0);

pub fn store_allocation_handle(start: Address, handle: AllocationHandle) {
    unsafe { (start + ALLOCATION_HANDLE_OFFSET).store::<AllocationHandle>(handle) }
}

pub fn load_allocation_handle(start: Address) -> AllocationHandle {
    unsafe { (start + ALLOCATION_HANDLE_OFFSET).load::<AllocationHandle>() }
}

#[inline(always)]
fn info_address(object: ObjectReference) -> Address {
    object.to_raw_address() + OBJ_INFO_OFFSET
}

/// Atomically load the info word of `object`.
#[inline(always)]
pub fn load_info(object: ObjectReference, order: Ordering) -> u32 {
    unsafe { info_address(object).atomic_load::<AtomicU32>(order) }
}

/// Store the whole info word. Only valid while no other thread can access the object, such as
/// on a copy that has not been published yet.
pub fn store_info(object: ObjectReference, value: u32) {
    unsafe { info_address(object).atomic_store::<AtomicU32>(value, Ordering::SeqCst) }
}

#[inline(always)]
pub fn compare_exchange_info(
    object: ObjectReference,
    old: u32,
    new: u32,
    success: Ordering,
    failure: Ordering,
) -> Result<u32, u32> {
    unsafe { info_address(object).compare_exchange::<AtomicU32>(old, new, success, failure) }
}

pub fn load_array_length(object: ObjectReference) -> i32 {
    unsafe { (object.to_raw_address() + ARRAY_LENGTH_OFFSET).load::<i32>() }
}

pub fn store_array_length(start: Address, length: i32) {
    unsafe { (start + ARRAY_LENGTH_OFFSET).store::<i32>(length) }
}

/// The allocated size of `object`, excluding any appended hashcode word. Arrays are sized from
/// their length, scalars from their class.
pub fn object_size<VM: VMBinding>(object: ObjectReference) -> usize {
    let class = VM::VMObjectModel::class_of(load_allocation_handle(object.to_raw_address()));
    if VM::VMObjectModel::is_array(class) {
        let length = load_array_length(object);
        debug_assert!(length >= 0, "Array {} has negative length {}", object, length);
        array_size(
            VM::VMObjectModel::array_first_element_offset(class),
            VM::VMObjectModel::array_element_size(class),
            length as usize,
            VM::OBJECT_ALIGNMENT,
        )
        .unwrap_or_else(|| panic!("Array {} of length {} has no valid size", object, length))
    } else {
        VM::VMObjectModel::instance_size(class)
    }
}
