/// log2 of the number of bytes in a byte
pub const LOG_BYTES_IN_BYTE: u8 = 0;
/// The number of bytes in a byte
pub const BYTES_IN_BYTE: usize = 1;
/// log2 of the number of bits in a byte
pub const LOG_BITS_IN_BYTE: u8 = 3;
/// The number of bits in a byte
pub const BITS_IN_BYTE: usize = 1 << LOG_BITS_IN_BYTE;

/// log2 of the number of bytes in a megabyte
pub const LOG_BYTES_IN_MBYTE: u8 = 20;
/// The number of bytes in a megabyte
pub const BYTES_IN_MBYTE: usize = 1 << LOG_BYTES_IN_MBYTE;

/// log2 of the number of bytes in a kilobyte
pub const LOG_BYTES_IN_KBYTE: u8 = 10;
/// The number of bytes in a kilobyte
pub const BYTES_IN_KBYTE: usize = 1 << LOG_BYTES_IN_KBYTE;

/// log2 of the number of bytes in a 32-bit int. The header info word and the array length are ints.
pub const LOG_BYTES_IN_INT: u8 = 2;
/// The number of bytes in a 32-bit int
pub const BYTES_IN_INT: usize = 1 << LOG_BYTES_IN_INT;

#[cfg(target_pointer_width = "32")]
/// log2 of the number of bytes in an address
pub const LOG_BYTES_IN_ADDRESS: u8 = 2;
#[cfg(target_pointer_width = "64")]
/// log2 of the number of bytes in an address
pub const LOG_BYTES_IN_ADDRESS: u8 = 3;
/// The number of bytes in an address
pub const BYTES_IN_ADDRESS: usize = 1 << LOG_BYTES_IN_ADDRESS;

/// log2 of the number of bytes in a word
pub const LOG_BYTES_IN_WORD: u8 = LOG_BYTES_IN_ADDRESS;
/// The number of bytes in a word
pub const BYTES_IN_WORD: usize = 1 << LOG_BYTES_IN_WORD;

/// log2 of the number of bytes in a page
pub const LOG_BYTES_IN_PAGE: u8 = 12;
/// The number of bytes in a page
pub const BYTES_IN_PAGE: usize = 1 << LOG_BYTES_IN_PAGE;

/// log2 of the cache line size assumed by the zeroing pipeline.
pub const LOG_BYTES_IN_CACHE_LINE: u8 = 6;
/// The cache line size. A TLA ceiling moved by the zeroing pipeline is aligned down to it.
pub const BYTES_IN_CACHE_LINE: usize = 1 << LOG_BYTES_IN_CACHE_LINE;

/// log2 of the default object alignment.
pub const LOG_GC_OBJECT_ALIGNMENT: u8 = 3;
/// The default object alignment. Every object size is rounded up to it, and the
/// address-derived hashcode drops these low bits.
pub const GC_OBJECT_ALIGNMENT: usize = 1 << LOG_GC_OBJECT_ALIGNMENT;

const_assert!(GC_OBJECT_ALIGNMENT.is_power_of_two());
const_assert!(GC_OBJECT_ALIGNMENT >= BYTES_IN_INT);

/// log2 of the minimal object size in bytes: the allocation handle plus the info word.
pub const LOG_MIN_OBJECT_SIZE: u8 = LOG_BYTES_IN_WORD + 1;
/// The minimal object size in bytes
pub const MIN_OBJECT_SIZE: usize = 1 << LOG_MIN_OBJECT_SIZE;

/// Objects larger than this bypass the thread-local buffer.
pub const DEFAULT_LARGE_OBJECT_THRESHOLD: usize = 5 * BYTES_IN_KBYTE;
/// How far past the new ceiling the zeroing pipeline prefetches.
pub const DEFAULT_PREFETCH_DISTANCE: usize = BYTES_IN_KBYTE;
/// The step between two prefetch hints.
pub const DEFAULT_PREFETCH_STRIDE: usize = BYTES_IN_CACHE_LINE;
/// How much the zeroing pipeline advances the ceiling at a time.
pub const DEFAULT_ZEROING_SIZE: usize = 2 * BYTES_IN_KBYTE;
/// The slab size handed to a thread when its TLA is refilled.
pub const DEFAULT_TLA_SIZE: usize = 32 * BYTES_IN_KBYTE;
