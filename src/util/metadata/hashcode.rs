//! The identity hashcode, kept in three bits of the info word.
//!
//! An object starts [`HashcodeState::Unset`]. The first request moves it to
//! [`HashcodeState::SetUnallocated`] and answers with a value derived from the object's address.
//! When the collector later moves such an object it appends the old value as a 32-bit word after
//! the object and marks the copy [`HashcodeState::SetAttached`] (see
//! [`crate::util::relocation`]). States only ever move forward.

use std::sync::atomic::Ordering;

use strum_macros::Display;

use crate::util::metadata::header_metadata::{self, compare_exchange_info, load_info};
use crate::util::{Address, ObjectReference};
use crate::vm::VMBinding;

pub const HASHCODE_MASK: u32 = 0x1c;
pub const HASHCODE_UNSET: u32 = 0x00;
pub const HASHCODE_SET_UNALLOCATED: u32 = 0x04;
pub const HASHCODE_SET_ATTACHED: u32 = 0x0c;

const_assert!(HASHCODE_SET_UNALLOCATED & !HASHCODE_MASK == 0);
const_assert!(HASHCODE_SET_ATTACHED & !HASHCODE_MASK == 0);

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum HashcodeState {
    Unset,
    SetUnallocated,
    SetAttached,
}

impl HashcodeState {
    /// Decode the state from a full info word.
    pub fn from_info(info: u32) -> Self {
        match info & HASHCODE_MASK {
            HASHCODE_UNSET => HashcodeState::Unset,
            HASHCODE_SET_UNALLOCATED => HashcodeState::SetUnallocated,
            HASHCODE_SET_ATTACHED => HashcodeState::SetAttached,
            bits => unreachable!("Invalid hashcode bits {:#x} in info word {:#x}", bits, info),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            HashcodeState::Unset => HASHCODE_UNSET,
            HashcodeState::SetUnallocated => HASHCODE_SET_UNALLOCATED,
            HashcodeState::SetAttached => HASHCODE_SET_ATTACHED,
        }
    }

    /// The current state of `object`.
    pub fn of(object: ObjectReference) -> Self {
        Self::from_info(load_info(object, Ordering::Acquire))
    }

    /// `info` with the hashcode bits replaced by this state.
    pub fn apply(self, info: u32) -> u32 {
        (info & !HASHCODE_MASK) | self.bits()
    }
}

/// The hashcode of an object that has not moved since it was first hashed: its address with the
/// always-zero alignment bits dropped, truncated to 32 bits.
#[inline(always)]
pub fn address_hashcode(addr: Address, log_alignment: u8) -> i32 {
    (addr >> log_alignment as usize) as i32
}

/// The address of the hashcode word appended to a relocated object.
pub fn attached_hashcode_address<VM: VMBinding>(object: ObjectReference) -> Address {
    object.to_raw_address() + header_metadata::object_size::<VM>(object)
}

/// Return the identity hashcode of `object`, or 0 for null. Lock free: concurrent first requests
/// race on one compare-and-exchange of the info word, and all of them answer with the same value.
pub fn identity_hashcode<VM: VMBinding>(object: ObjectReference, log_alignment: u8) -> i32 {
    if object.is_null() {
        return 0;
    }
    let mut info = load_info(object, Ordering::Acquire);
    loop {
        match HashcodeState::from_info(info) {
            HashcodeState::Unset => {
                let new_info = HashcodeState::SetUnallocated.apply(info);
                match compare_exchange_info(
                    object,
                    info,
                    new_info,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                ) {
                    Ok(_) => {
                        trace!("Hashcode of {} set", object);
                        break;
                    }
                    // Other bits may have changed under us. Retry as long as the hashcode is
                    // still unset.
                    Err(current) => info = current,
                }
            }
            HashcodeState::SetUnallocated => break,
            HashcodeState::SetAttached => {
                let attached = attached_hashcode_address::<VM>(object);
                return unsafe { attached.load::<i32>() };
            }
        }
    }
    address_hashcode(object.to_raw_address(), log_alignment)
}
