use criterion::{criterion_group, criterion_main};

mod system;

criterion_group!(
    benches,
    system::dispatch::bench_flash,
    system::dispatch::bench_load,
    system::dispatch::bench_navigation
);
criterion_main!(benches);
