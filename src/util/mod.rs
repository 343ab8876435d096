//! Utilities shared by the fast paths.

/// Address and object reference types.
pub mod address;
/// Object allocation: thread local allocators and the array layer.
pub mod alloc;
/// Constants used across the crate.
pub mod constants;
/// Calculation, conversion and rounding for memory related numbers.
pub mod conversions;
/// Logger initialization.
pub mod logger;
/// Wrapper functions for memory syscalls and zeroing.
pub mod memory;
/// Metadata kept in the object header: the hashcode state and the remembered bit.
pub mod metadata;
/// Opaque pointers and handles passed between the runtime and the crate.
pub mod opaque_pointer;
/// Options, and their parsing from environment variables.
pub mod options;
/// Moving objects without changing their identity hashcode.
pub mod relocation;

#[cfg(any(test, feature = "test_private"))]
pub mod test_util;

pub use self::address::Address;
pub use self::address::ObjectReference;
pub use self::opaque_pointer::*;
