pub use criterion::Criterion;

mod bump;

pub fn bench(c: &mut Criterion) {
    bump::bench(c);
}
