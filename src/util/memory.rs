//! Raw memory operations used by the allocation and relocation paths: zeroing, copying,
//! prefetching and anonymous mappings. Together with [`crate::util::Address`], this is the
//! whole unsafe memory surface of the crate.

use crate::util::Address;
use std::io::Result;

/// Zero `len` bytes starting at `start`.
pub fn zero(start: Address, len: usize) {
    if len == 0 {
        return;
    }
    let ptr = start.to_mut_ptr();
    wrap_libc_call(&|| unsafe { libc::memset(ptr, 0, len) }, ptr).unwrap()
}

/// Check if `len` bytes starting at `start` are all zero.
pub fn is_zeroed(start: Address, len: usize) -> bool {
    let bytes = unsafe { std::slice::from_raw_parts(start.to_ptr::<u8>(), len) };
    bytes.iter().all(|b| *b == 0)
}

/// Copy `len` bytes from `from` to `to`. The two ranges must not overlap.
pub fn copy(from: Address, to: Address, len: usize) {
    debug_assert!(
        from + len <= to || to + len <= from,
        "copy ranges overlap: [{}, {}) and [{}, {})",
        from,
        from + len,
        to,
        to + len
    );
    unsafe { std::ptr::copy_nonoverlapping(from.to_ptr::<u8>(), to.to_mut_ptr::<u8>(), len) }
}

/// Issue prefetch hints for `[start, end)`, one every `stride` bytes. Prefetching never faults,
/// but callers still keep the range inside memory they own.
#[inline(always)]
pub fn prefetch_range(start: Address, end: Address, stride: usize) {
    debug_assert!(stride > 0);
    let mut cursor = start;
    while cursor < end {
        prefetch(cursor);
        cursor += stride;
    }
}

#[inline(always)]
fn prefetch(addr: Address) {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "x86_64")] {
            unsafe {
                std::arch::x86_64::_mm_prefetch::<{ std::arch::x86_64::_MM_HINT_T0 }>(addr.to_ptr::<i8>());
            }
        } else {
            // No stable prefetch intrinsic on this target.
            let _ = addr;
        }
    }
}

/// Map `size` bytes of demand-zero, read-write memory anywhere in the address space.
pub fn mmap_anywhere(size: usize) -> Result<Address> {
    let prot = libc::PROT_READ | libc::PROT_WRITE;
    let flags = libc::MAP_ANON | libc::MAP_PRIVATE;
    let ret = unsafe { libc::mmap(std::ptr::null_mut(), size, prot, flags, -1, 0) };
    if ret == libc::MAP_FAILED {
        Err(std::io::Error::last_os_error())
    } else {
        Ok(Address::from_mut_ptr(ret))
    }
}

/// Unmap a range returned by [`mmap_anywhere`].
pub fn munmap(start: Address, size: usize) -> Result<()> {
    wrap_libc_call(&|| unsafe { libc::munmap(start.to_mut_ptr(), size) }, 0)
}

fn wrap_libc_call<T: PartialEq>(f: &dyn Fn() -> T, expect: T) -> Result<()> {
    let ret = f();
    if ret == expect {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}
