use criterion::Criterion;

use gc_fastpath::util::alloc::{BumpAllocator, ThreadLocalAllocator};
use gc_fastpath::util::constants::*;
use gc_fastpath::util::options::Options;
use gc_fastpath::util::test_util::TestMemory;
use gc_fastpath::util::{Address, AllocationHandle};
use gc_fastpath::HelperConfig;

const HANDLE: AllocationHandle = AllocationHandle::from_usize(0x40);

fn bench_bump(c: &mut Criterion, name: &str, prefetch: bool) {
    let mut options = Options::default();
    options.prefetch = prefetch;
    let config = HelperConfig::from_options(&options, Address::MAX, 0, GC_OBJECT_ALIGNMENT);
    let mem = TestMemory::new(BYTES_IN_MBYTE);
    let mut tla = ThreadLocalAllocator::new();
    let refill = |tla: &mut ThreadLocalAllocator| {
        let ceiling = if prefetch { mem.start() } else { mem.end() };
        tla.set_region(mem.start(), ceiling, mem.end());
    };
    refill(&mut tla);

    c.bench_function(name, |b| {
        b.iter(|| {
            if BumpAllocator::new(&mut tla, &config)
                .alloc_fast(32, HANDLE)
                .is_none()
            {
                refill(&mut tla);
            }
        })
    });
}

pub fn bench(c: &mut Criterion) {
    bench_bump(c, "bump", false);
    bench_bump(c, "bump_prefetch", true);
}
