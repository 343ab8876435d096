//! The remembered bit in the info word. It is set once an object has been recorded as holding a
//! reference into the nursery, so the write barrier can skip it until the collector clears it.

use std::sync::atomic::Ordering;

use crate::util::metadata::header_metadata::{compare_exchange_info, load_info};
use crate::util::ObjectReference;

pub const OBJ_REM_BIT: u32 = 0x80;

const_assert!(OBJ_REM_BIT & crate::util::metadata::hashcode::HASHCODE_MASK == 0);

#[inline(always)]
pub fn is_remembered(object: ObjectReference) -> bool {
    load_info(object, Ordering::Acquire) & OBJ_REM_BIT != 0
}

/// Set the remembered bit. Returns true only for the call that set it.
pub fn attempt_remember(object: ObjectReference) -> bool {
    let mut old = load_info(object, Ordering::Acquire);
    loop {
        if old & OBJ_REM_BIT != 0 {
            return false;
        }
        match compare_exchange_info(
            object,
            old,
            old | OBJ_REM_BIT,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => return true,
            Err(current) => old = current,
        }
    }
}

/// Clear the remembered bit. Collector only.
pub fn clear_remembered(object: ObjectReference) {
    let mut old = load_info(object, Ordering::Acquire);
    while old & OBJ_REM_BIT != 0 {
        match compare_exchange_info(
            object,
            old,
            old & !OBJ_REM_BIT,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => return,
            Err(current) => old = current,
        }
    }
}
