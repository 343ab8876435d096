//! The binding traits. A runtime implements [`VMBinding`] and its associated traits to tell the
//! fast paths where a thread's allocator lives, how its classes are laid out, and what to do when
//! a fast path gives up.

use crate::util::constants::GC_OBJECT_ALIGNMENT;

mod active_plan;
mod collection;
mod object_model;

pub use self::active_plan::ActivePlan;
pub use self::collection::Collection;
pub use self::object_model::ObjectModel;

#[cfg(test)]
mod tests;

/// The `VMBinding` trait associates with each trait, and provides VM-specific constants.
pub trait VMBinding
where
    Self: Sized + 'static + Send + Sync + Default,
{
    type VMObjectModel: ObjectModel<Self>;
    type VMCollection: Collection<Self>;
    type VMActivePlan: ActivePlan<Self>;

    /// The alignment every object size is rounded up to. It must be a power of two and at least
    /// the size of the appended hashcode word.
    const OBJECT_ALIGNMENT: usize = GC_OBJECT_ALIGNMENT;
}
