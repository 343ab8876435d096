//! Mutator-side fast paths for a generational garbage collector.
//!
//! The crate provides what a managed runtime runs inline on every allocation, reference store
//! and identity hash request, and leaves the rest of the collector to the runtime:
//! * thread local bump-pointer allocation, with a pipeline that zeroes and prefetches memory
//!   ahead of the allocation pointer ([`util::alloc`]);
//! * array allocation on top of it ([`util::alloc::array`]);
//! * a generational write barrier that filters old-to-young stores into a remembered set
//!   ([`plan`]);
//! * a lock-free identity hashcode protocol kept in three header bits
//!   ([`util::metadata::hashcode`]), and its collector side ([`util::relocation`]).
//!
//! A runtime implements [`vm::VMBinding`] and the traits it names, builds a [`GcHelper`] with
//! [`memory_manager::gc_init`] and calls the functions in [`memory_manager`].

#[macro_use]
extern crate log;
#[macro_use]
extern crate probe;
#[macro_use]
extern crate static_assertions;

mod gc_helper;
pub use gc_helper::{GcHelper, GcHelperBuilder, HelperConfig};

pub mod memory_manager;
pub mod plan;
pub mod policy;
pub mod util;
pub mod vm;
