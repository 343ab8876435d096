//! The collector's side of the hashcode protocol. An object whose identity hashcode was derived
//! from its address keeps that value when it moves: the copy carries it in a word appended after
//! the object, and is marked [`HashcodeState::SetAttached`].
//!
//! These functions run while mutators are stopped. They never race with
//! [`crate::memory_manager::identity_hashcode`].

use crate::util::metadata::hashcode::{address_hashcode, HashcodeState};
use crate::util::metadata::header_metadata::{self, load_info, store_info};
use crate::util::{memory, Address, ObjectReference};
use crate::vm::VMBinding;

use std::sync::atomic::Ordering;

/// The number of bytes `object` occupies after it is copied.
pub fn size_when_copied<VM: VMBinding>(object: ObjectReference) -> usize {
    let size = header_metadata::object_size::<VM>(object);
    match HashcodeState::of(object) {
        HashcodeState::Unset => size,
        HashcodeState::SetUnallocated | HashcodeState::SetAttached => size + VM::OBJECT_ALIGNMENT,
    }
}

/// Copy `from` to `to` and return the copy. The destination must have room for
/// [`size_when_copied`] bytes.
///
/// # Safety
/// `from` must be a valid object, `[to, to + size_when_copied(from))` must be writable memory
/// that does not overlap it, and no mutator may run concurrently.
pub unsafe fn relocate_object<VM: VMBinding>(from: ObjectReference, to: Address) -> ObjectReference {
    let size = header_metadata::object_size::<VM>(from);
    let info = load_info(from, Ordering::Acquire);
    let state = HashcodeState::from_info(info);
    let copy = ObjectReference::from_raw_address(to);

    match state {
        HashcodeState::Unset => memory::copy(from.to_raw_address(), to, size),
        HashcodeState::SetAttached => {
            memory::copy(from.to_raw_address(), to, size + VM::OBJECT_ALIGNMENT)
        }
        HashcodeState::SetUnallocated => {
            let log_alignment = VM::OBJECT_ALIGNMENT.trailing_zeros() as u8;
            let hashcode = address_hashcode(from.to_raw_address(), log_alignment);
            memory::copy(from.to_raw_address(), to, size);
            memory::zero(to + size, VM::OBJECT_ALIGNMENT);
            (to + size).store::<i32>(hashcode);
            store_info(copy, HashcodeState::SetAttached.apply(info));
            trace!("Attached hashcode {} to {} moved from {}", hashcode, copy, from);
        }
    }
    copy
}
