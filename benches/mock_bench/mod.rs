pub use criterion::Criterion;

mod alloc;
mod barrier;

pub fn bench(c: &mut Criterion) {
    alloc::bench(c);
    barrier::bench(c);
    hashcode::bench(c);
}
