use criterion::Criterion;

use gc_fastpath::memory_manager;
use gc_fastpath::util::test_util::fixtures::*;
use gc_fastpath::util::test_util::mock_vm::*;

fn bench_alloc(c: &mut Criterion, name: &str, fixture: &mut MutatorFixture) {
    let class = register_class(MockClass::scalar(32));
    let handle = mock_allocation_handle(class);
    c.bench_function(name, |b| {
        b.iter(|| {
            let addr = memory_manager::alloc(fixture.helper(), fixture.tls(), 32, handle);
            if addr.is_zero() {
                // The nursery is used up. Start over.
                fixture.tla_mut().reset();
                fixture.nursery.reset();
            }
        })
    });
}

pub fn bench(c: &mut Criterion) {
    let mut fixture = MutatorFixture::create();
    bench_alloc(c, "alloc", &mut fixture);
    drop(fixture);

    let mut fixture = MutatorFixture::create_with_options(&[("prefetch", "true")]);
    bench_alloc(c, "alloc_prefetch", &mut fixture);
}
