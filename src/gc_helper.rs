use crate::plan::barriers::Barrier;
use crate::plan::create_barrier;
use crate::plan::generational::remset::RememberedSet;
use crate::util::alloc::TlaLayout;
use crate::util::constants::BYTES_IN_INT;
use crate::util::options::Options;
use crate::util::Address;
use crate::vm::{ActivePlan, Collection, VMBinding};

/// Build a [`GcHelper`] instance.
///
/// Options are read from `GC_FASTPATH_*` environment variables when the builder is created, and
/// can be overridden with [`GcHelperBuilder::set_option`] before calling
/// [`GcHelperBuilder::build`].
pub struct GcHelperBuilder {
    pub options: Options,
}

impl GcHelperBuilder {
    /// Create a builder with options read from environment variables or the defaults.
    pub fn new() -> Self {
        GcHelperBuilder {
            options: Options::default(),
        }
    }

    /// Set an option by its snake case name. Returns false if the key is unknown or the value
    /// is rejected, in which case the previous value is kept.
    pub fn set_option(&mut self, name: &str, val: &str) -> bool {
        self.options.set_from_str(name, val)
    }

    /// Resolve the options against the binding and build the helper.
    pub fn build<VM: VMBinding>(&self) -> GcHelper<VM> {
        GcHelper::new(&self.options)
    }
}

impl Default for GcHelperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the fast paths read, resolved once when the helper is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HelperConfig {
    pub large_object_threshold: usize,
    pub prefetch: bool,
    pub prefetch_distance: usize,
    pub prefetch_stride: usize,
    pub zeroing_size: usize,
    pub tla_size: usize,
    pub object_alignment: usize,
    pub log_object_alignment: u8,
    pub gen_mode: bool,
    /// Addresses at or above this are in the nursery.
    pub nos_boundary: Address,
    /// Offset from a thread's TLS base to its TLA pointer.
    pub tls_gc_offset: usize,
    pub tla_layout: TlaLayout,
}

impl HelperConfig {
    pub fn from_options(
        options: &Options,
        nos_boundary: Address,
        tls_gc_offset: usize,
        object_alignment: usize,
    ) -> Self {
        assert!(
            object_alignment.is_power_of_two(),
            "Object alignment {} is not a power of two",
            object_alignment
        );
        assert!(
            object_alignment >= BYTES_IN_INT,
            "Object alignment {} cannot hold an appended hashcode",
            object_alignment
        );
        HelperConfig {
            large_object_threshold: options.large_object_threshold,
            prefetch: options.prefetch,
            prefetch_distance: options.prefetch_distance,
            prefetch_stride: options.prefetch_stride,
            zeroing_size: options.zeroing_size,
            tla_size: options.tla_size,
            object_alignment,
            log_object_alignment: object_alignment.trailing_zeros() as u8,
            gen_mode: options.gen_mode,
            nos_boundary,
            tls_gc_offset,
            tla_layout: TlaLayout::new(),
        }
    }

    /// Query the binding for the values the options do not cover.
    pub fn resolve<VM: VMBinding>(options: &Options) -> Self {
        Self::from_options(
            options,
            VM::VMCollection::nos_boundary(),
            VM::VMActivePlan::tls_gc_offset(),
            VM::OBJECT_ALIGNMENT,
        )
    }

    /// Is `addr` in the nursery?
    #[inline(always)]
    pub fn is_young(&self, addr: Address) -> bool {
        addr >= self.nos_boundary
    }
}

/// The per-process state of the fast paths: the resolved configuration, the selected write
/// barrier and the remembered set the barrier slow path records into.
///
/// A binding usually creates one with [`crate::memory_manager::gc_init`] and keeps it for the
/// lifetime of the process.
pub struct GcHelper<VM: VMBinding> {
    config: HelperConfig,
    options: Options,
    barrier: Box<dyn Barrier<VM>>,
    remembered_set: RememberedSet,
}

impl<VM: VMBinding> GcHelper<VM> {
    fn new(options: &Options) -> Self {
        let config = HelperConfig::resolve::<VM>(options);
        let barrier = create_barrier::<VM>(options.barrier, &config);
        info!(
            "Initialized GC helpers: barrier = {}, gen_mode = {}, nos_boundary = {}, prefetch = {}",
            barrier.selector(),
            config.gen_mode,
            config.nos_boundary,
            config.prefetch
        );
        debug!("{:?}", config);
        GcHelper {
            config,
            options: options.clone(),
            barrier,
            remembered_set: RememberedSet::new(),
        }
    }

    pub fn config(&self) -> &HelperConfig {
        &self.config
    }

    pub fn get_options(&self) -> &Options {
        &self.options
    }

    pub fn barrier(&self) -> &dyn Barrier<VM> {
        self.barrier.as_ref()
    }

    /// The remembered set for the binding's [`crate::vm::Collection::write_barrier_slow`] to
    /// record into.
    pub fn remembered_set(&self) -> &RememberedSet {
        &self.remembered_set
    }
}
