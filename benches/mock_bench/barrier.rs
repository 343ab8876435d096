use criterion::Criterion;

use gc_fastpath::memory_manager;
use gc_fastpath::util::test_util::fixtures::*;
use gc_fastpath::util::test_util::mock_vm::*;
use gc_fastpath::util::ObjectReference;

pub fn bench(c: &mut Criterion) {
    let fixture = MutatorFixture::create();
    let handle = mock_allocation_handle(register_class(MockClass::scalar(32)));
    let old = ObjectReference::from_raw_address(fixture.mature.alloc(32, handle));
    let old2 = ObjectReference::from_raw_address(fixture.mature.alloc(32, handle));
    let young = ObjectReference::from_raw_address(memory_manager::alloc(
        fixture.helper(),
        fixture.tls(),
        32,
        handle,
    ));
    let slot = old.to_raw_address() + 16usize;

    c.bench_function("write_barrier_old_to_old", |b| {
        b.iter(|| {
            memory_manager::object_reference_write(fixture.helper(), fixture.tls(), old, slot, old2)
        })
    });

    // The first store remembers `old`. Every later one is filtered by the remembered bit.
    c.bench_function("write_barrier_remembered", |b| {
        b.iter(|| {
            memory_manager::object_reference_write(fixture.helper(), fixture.tls(), old, slot, young)
        })
    });
}
