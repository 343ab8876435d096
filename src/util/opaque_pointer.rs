use crate::util::Address;
use libc::c_void;

/// OpaquePointer represents pointers that the GC helpers need to know about but never dereference,
/// such as a pointer to the thread or to its thread local storage.
/// The type does not provide any method for dereferencing.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OpaquePointer(*mut c_void);

// We never dereference an opaque pointer in this crate.
unsafe impl Sync for OpaquePointer {}
unsafe impl Send for OpaquePointer {}

impl Default for OpaquePointer {
    fn default() -> Self {
        Self::UNINITIALIZED
    }
}

impl OpaquePointer {
    /// Represents an uninitialized value for [`OpaquePointer`].
    pub const UNINITIALIZED: Self = Self(std::ptr::null_mut::<c_void>());

    /// Cast an [`Address`] type to an [`OpaquePointer`].
    pub fn from_address(addr: Address) -> Self {
        OpaquePointer(addr.to_mut_ptr::<c_void>())
    }

    /// Cast the opaque pointer to an [`Address`] type.
    pub fn to_address(self) -> Address {
        Address::from_mut_ptr(self.0)
    }

    /// Is this opaque pointer null?
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

/// A VMThread is an opaque pointer that uniquely identifies a thread in the runtime.
/// The runtime passes it in, and it is passed back unchanged through the binding traits.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct VMThread(pub OpaquePointer);

impl VMThread {
    /// Represents an uninitialized value for [`VMThread`].
    pub const UNINITIALIZED: Self = Self(OpaquePointer::UNINITIALIZED);
}

/// A VMMutatorThread is a VMThread running application code. Every fast path runs on one,
/// and its thread local storage holds the pointer to its [`crate::util::alloc::ThreadLocalAllocator`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct VMMutatorThread(pub VMThread);

/// The word the allocator stamps at offset 0 of every new object. It is owned by the runtime's
/// class subsystem and never interpreted here.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct AllocationHandle(usize);

impl AllocationHandle {
    pub const fn from_usize(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn as_usize(self) -> usize {
        self.0
    }
}

/// An opaque identifier for a class, used to look up sizes and array classes through
/// [`crate::vm::ObjectModel`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ClassHandle(usize);

impl ClassHandle {
    pub const fn from_usize(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn as_usize(self) -> usize {
        self.0
    }
}
