use criterion::{Criterion, Throughput};
use dotenvy::dotenv;
use std::env;
use tickshell::commands::Builtin;
use tickshell::config::EngineConfig;
use tickshell::demo::ROOT_BLOCK;
use tickshell::io::{Actuator, Transport};
use tickshell::Dispatcher;

/// Console that accepts everything immediately.
struct SinkConnection;

impl Transport for SinkConnection {
    type Error = ();

    fn busy(&self) -> bool {
        false
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        std::hint::black_box(bytes);
        Ok(())
    }
}

struct Led {
    on: bool,
}

impl Actuator for Led {
    fn set(&mut self, on: bool) {
        self.on = on;
    }

    fn toggle(&mut self) {
        self.on = !self.on;
    }
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn setup_shell(config: EngineConfig) -> Dispatcher<Builtin, Led, SinkConnection> {
    let mut shell = Dispatcher::new(&ROOT_BLOCK, Led { on: false }, SinkConnection)
        .expect("Demo tree is valid")
        .with_config(config);
    shell.run_until_idle(16).expect("Failed to print prompt");
    shell
}

fn run(shell: &mut Dispatcher<Builtin, Led, SinkConnection>, line: &str) {
    shell.submit(line).expect("Failed to submit");
    while !shell.is_idle() {
        shell.tick().expect("Failed to tick");
    }
}

pub fn bench_flash(c: &mut Criterion) {
    dotenv().ok();
    let count = env_u32("BENCH_FLASH_COUNT", 50);
    let delay = env_u32("BENCH_FLASH_DELAY_TICKS", 10);
    let line = format!("flash {count}");

    let mut group = c.benchmark_group("flash");
    // Parse, then on/hold/off/hold/next per cycle
    group.throughput(Throughput::Elements(1 + u64::from(count) * (3 + 2 * u64::from(delay))));
    group.bench_function("flash", |b| {
        b.iter_batched_ref(
            || setup_shell(EngineConfig::new().with_flash_delay_ticks(delay)),
            |shell| run(shell, &line),
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn bench_load(c: &mut Criterion) {
    dotenv().ok();
    let iterations = env_u32("BENCH_LOAD_ITERATIONS", 100);
    let work = env_u32("BENCH_LOAD_WORK", 1_000);

    let mut group = c.benchmark_group("load");
    group.throughput(Throughput::Elements(u64::from(iterations)));
    group.bench_function("load", |b| {
        b.iter_batched_ref(
            || {
                setup_shell(
                    EngineConfig::new()
                        .with_load_iterations(iterations)
                        .with_load_work(work),
                )
            },
            |shell| run(shell, "load"),
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn bench_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigation");
    group.throughput(Throughput::Elements(4));
    group.bench_function("enter_and_back", |b| {
        b.iter_batched_ref(
            || setup_shell(EngineConfig::new()),
            |shell| {
                run(shell, "sm1");
                run(shell, "sm2");
                run(shell, "back");
                run(shell, "back");
            },
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}
