//! Per-object metadata kept in the object header.

pub mod hashcode;
pub mod header_metadata;
pub mod log_bit;
