//! Memory providers for the allocation slow paths.

pub mod lockfreebumpspace;
