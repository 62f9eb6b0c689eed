use criterion::{criterion_group, criterion_main};

mod lens_source;

criterion_group!(
    benches,
    lens_source::bench_forward,
    pixelated::bench_pixelated_convergence
);
criterion_main!(benches);
