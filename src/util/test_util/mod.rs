use crate::util::constants::BYTES_IN_PAGE;
use lazy_static::lazy_static;
use crate::util::Address;
use std::alloc::Layout;
use std::panic;
use std::sync::Mutex;

#[cfg(any(test, feature = "mock_test"))]
pub mod fixtures;
#[cfg(any(test, feature = "mock_test"))]
pub mod mock_method;
#[cfg(any(test, feature = "mock_test"))]
pub mod mock_vm;

lazy_static! {
    // A global lock to make tests serial.
    // If we do want more parallelism, we can allow each set of tests to have their own locks. But it seems unnecessary for now.
    static ref SERIAL_TEST_LOCK: Mutex<()> = Mutex::default();
}

// force some tests to be executed serially
pub fn serial_test<F>(f: F)
where
    F: FnOnce(),
{
    // If one test fails, the lock will become poisoned. We would want to continue for other tests anyway.
    let _guard = SERIAL_TEST_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f();
}

// Always execute a cleanup closure no matter the test panics or not.
pub fn with_cleanup<T, C>(test: T, cleanup: C)
where
    T: FnOnce() + panic::UnwindSafe,
    C: FnOnce(),
{
    let res = panic::catch_unwind(test);
    cleanup();
    if let Err(e) = res {
        panic::resume_unwind(e);
    }
}

/// Is every byte in `[from, to)` equal to `byte`? The range must be readable.
pub fn all_bytes_are(from: Address, to: Address, byte: u8) -> bool {
    let bytes = unsafe { std::slice::from_raw_parts(from.to_ptr::<u8>(), to - from) };
    bytes.iter().all(|b| *b == byte)
}

/// A page aligned, zeroed block of memory from the global allocator, freed on drop. Used as a
/// small heap by tests that do not need a mapping.
pub struct TestMemory {
    start: Address,
    layout: Layout,
}

impl TestMemory {
    pub fn new(size: usize) -> Self {
        let layout = Layout::from_size_align(size, BYTES_IN_PAGE).unwrap();
        let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
        assert!(!ptr.is_null());
        TestMemory {
            start: Address::from_mut_ptr(ptr),
            layout,
        }
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn size(&self) -> usize {
        self.layout.size()
    }

    pub fn end(&self) -> Address {
        self.start + self.size()
    }

    /// Overwrite the whole block with `byte`.
    pub fn fill(&self, byte: u8) {
        unsafe { std::ptr::write_bytes(self.start.to_mut_ptr::<u8>(), byte, self.size()) }
    }

    /// Is every byte in `[from, to)` equal to `byte`?
    pub fn all_bytes(&self, from: Address, to: Address, byte: u8) -> bool {
        assert!(self.start <= from && from <= to && to <= self.end());
        all_bytes_are(from, to, byte)
    }
}

impl Drop for TestMemory {
    fn drop(&mut self) {
        unsafe { std::alloc::dealloc(self.start.to_mut_ptr::<u8>(), self.layout) }
    }
}
