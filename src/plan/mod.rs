//! Write barriers and the generational bookkeeping behind them.
//!
//! The barrier is chosen by [`BarrierSelector`] when the [`crate::GcHelper`] is built:
//! * [`barriers::NoBarrier`] stores references plainly.
//! * [`generational::barrier::GenRememberedSetBarrier`] filters stores that create old-to-young
//!   references and sends them to the binding's slow path, which usually records them in the
//!   [`generational::remset::RememberedSet`].

pub mod barriers;
pub mod generational;

pub use self::barriers::{Barrier, BarrierSelector};

use crate::gc_helper::HelperConfig;
use crate::vm::VMBinding;

/// Create the barrier for `selector`.
pub fn create_barrier<VM: VMBinding>(
    selector: BarrierSelector,
    config: &HelperConfig,
) -> Box<dyn Barrier<VM>> {
    match selector {
        BarrierSelector::NoBarrier => Box::new(barriers::NoBarrier),
        BarrierSelector::GenRememberedSet => {
            Box::new(generational::barrier::GenRememberedSetBarrier::<VM>::new(config))
        }
    }
}
