// Some tests are conditionally compiled. So not all the code in this module will be used. We simply allow dead code in this module.
#![allow(dead_code)]

use std::sync::Arc;

use crate::memory_manager;
use crate::policy::lockfreebumpspace::LockFreeBumpSpace;
use crate::util::alloc::ThreadLocalAllocator;
use crate::util::constants::{BYTES_IN_MBYTE, BYTES_IN_WORD};
use crate::util::memory;
use crate::util::test_util::mock_method::MockMethod;
use crate::util::test_util::mock_vm::{write_mockvm, MockVM};
use crate::util::{Address, AllocationHandle, OpaquePointer, VMMutatorThread, VMThread};
use crate::{GcHelper, GcHelperBuilder, HelperConfig};

/// Where the TLA pointer lives in a mock thread's TLS block.
pub const MOCK_TLS_GC_OFFSET: usize = 2 * BYTES_IN_WORD;
const MOCK_TLS_WORDS: usize = 4;

/// The default heap: half mature space, half nursery.
pub const MOCK_HEAP_SIZE: usize = 4 * BYTES_IN_MBYTE;

/// One mutator thread on a mapped heap, with the [`MockVM`] wired to it: the TLS lookups find
/// the fixture's TLS block, the NOS boundary splits the heap, `alloc_slow` refills the TLA from the
/// nursery (or places large objects in the mature space), and `write_barrier_slow` records into
/// the helper's remembered set.
///
/// Create it inside `with_mockvm`. The setup replaces the closures installed here.
pub struct MutatorFixture {
    helper: Arc<GcHelper<MockVM>>,
    heap: Address,
    heap_size: usize,
    pub mature: Arc<LockFreeBumpSpace>,
    pub nursery: Arc<LockFreeBumpSpace>,
    tls_block: *mut [usize; MOCK_TLS_WORDS],
    tla: *mut ThreadLocalAllocator,
}

impl MutatorFixture {
    pub fn create() -> Self {
        Self::create_with(GcHelperBuilder::new())
    }

    pub fn create_with_options(options: &[(&str, &str)]) -> Self {
        let mut builder = GcHelperBuilder::new();
        for (name, val) in options {
            assert!(builder.set_option(name, val), "Bad option {}={}", name, val);
        }
        Self::create_with(builder)
    }

    pub fn create_with(builder: GcHelperBuilder) -> Self {
        let heap_size = MOCK_HEAP_SIZE;
        let heap = memory::mmap_anywhere(heap_size).unwrap();
        let half = heap_size / 2;
        let mature = Arc::new(LockFreeBumpSpace::new("mature", heap, half));
        let nursery = Arc::new(LockFreeBumpSpace::new("nursery", heap + half, half));
        let nos_boundary = nursery.start();

        write_mockvm(|mock| {
            mock.tls_base = MockMethod::new_fixed(Box::new(|tls: VMMutatorThread| {
                tls.0 .0.to_address()
            }));
            mock.tls_gc_offset = MockMethod::new_fixed(Box::new(|_| MOCK_TLS_GC_OFFSET));
            mock.nos_boundary = MockMethod::new_fixed(Box::new(move |_| nos_boundary));
        });

        let helper: Arc<GcHelper<MockVM>> = Arc::from(memory_manager::gc_init::<MockVM>(&builder));
        let config = *helper.config();

        let tls_block = Box::into_raw(Box::new([0usize; MOCK_TLS_WORDS]));
        let tla = Box::into_raw(Box::new(ThreadLocalAllocator::new()));
        let tla_addr = Address::from_mut_ptr(tla);

        {
            let mature = mature.clone();
            let nursery = nursery.clone();
            let helper = helper.clone();
            write_mockvm(move |mock| {
                mock.alloc_slow = MockMethod::new_fixed(Box::new(move |(_, size, handle)| {
                    Self::alloc_slow(&config, &mature, &nursery, tla_addr, size, handle)
                }));
                mock.write_barrier_slow =
                    MockMethod::new_fixed(Box::new(move |(_, src, slot, target)| {
                        helper.remembered_set().record(src, slot, target)
                    }));
            });
        }

        let fixture = MutatorFixture {
            helper,
            heap,
            heap_size,
            mature,
            nursery,
            tls_block,
            tla,
        };
        unsafe { memory_manager::bind_tla(fixture.helper(), fixture.tls(), &mut *tla) };
        fixture
    }

    fn alloc_slow(
        config: &HelperConfig,
        mature: &LockFreeBumpSpace,
        nursery: &LockFreeBumpSpace,
        tla: Address,
        size: usize,
        handle: AllocationHandle,
    ) -> Address {
        if size > config.large_object_threshold {
            mature.alloc(size, handle)
        } else {
            // The fast path has given up its borrow by now.
            let tla = unsafe { tla.as_mut_ref::<ThreadLocalAllocator>() };
            nursery.refill_and_alloc(tla, config, size, handle)
        }
    }

    pub fn helper(&self) -> &GcHelper<MockVM> {
        &self.helper
    }

    pub fn config(&self) -> &HelperConfig {
        self.helper.config()
    }

    pub fn tls(&self) -> VMMutatorThread {
        VMMutatorThread(VMThread(OpaquePointer::from_address(Address::from_mut_ptr(
            self.tls_block,
        ))))
    }

    /// The TLS slot that holds the TLA pointer.
    pub fn tla_slot(&self) -> Address {
        Address::from_mut_ptr(self.tls_block) + MOCK_TLS_GC_OFFSET
    }

    pub fn tla(&self) -> &ThreadLocalAllocator {
        unsafe { &*self.tla }
    }

    pub fn tla_mut(&mut self) -> &mut ThreadLocalAllocator {
        unsafe { &mut *self.tla }
    }

    pub fn nos_boundary(&self) -> Address {
        self.nursery.start()
    }
}

impl Drop for MutatorFixture {
    fn drop(&mut self) {
        unsafe {
            drop(Box::from_raw(self.tla));
            drop(Box::from_raw(self.tls_block));
        }
        memory::munmap(self.heap, self.heap_size).unwrap();
    }
}
