/*!
 * Registry Benchmarks
 *
 * Lookup cost on the dispatch path and the register/switch/unregister cycle
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use handoff_kernel::providers::{ProviderTable, SyscallDispatcher, TableProvider};
use handoff_kernel::{HandlerId, ProcessKey, ProcessRegistry, SyscallRequest};
use std::sync::Arc;

fn populated(size: u64) -> ProcessRegistry {
    let registry = ProcessRegistry::new();
    for pid in 0..size {
        registry
            .register_handler(ProcessKey(pid), HandlerId((pid % 4) as u32))
            .unwrap();
    }
    registry
}

fn bench_get_handler(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_handler");

    for size in [16u64, 1_024, 32_768] {
        let registry = populated(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut pid = 0;
            b.iter(|| {
                pid = (pid + 7) % size;
                black_box(registry.get_handler(ProcessKey(pid)))
            });
        });
    }

    group.finish();
}

fn bench_handoff_cycle(c: &mut Criterion) {
    let registry = populated(1_024);
    let p = ProcessKey(1_000_000);

    c.bench_function("switch_then_unregister", |b| {
        b.iter(|| {
            registry.switch_handler(p, HandlerId(1)).unwrap();
            black_box(registry.unregister(p).unwrap())
        });
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let registry = Arc::new(populated(1_024));
    let providers = Arc::new(ProviderTable::new());
    let host = providers
        .register(Arc::new(TableProvider::new("host").with_syscall(0, |_, r| r.arg(0) as isize)))
        .unwrap();
    for id in 1..4 {
        providers
            .register(Arc::new(
                TableProvider::new(format!("p{}", id)).with_syscall(0, |_, r| r.arg(0) as isize),
            ))
            .unwrap();
    }
    let dispatcher = SyscallDispatcher::new(registry, providers, host);
    let request = SyscallRequest::new(0).with_args(&[1]);

    c.bench_function("dispatch_tracked", |b| {
        b.iter(|| black_box(dispatcher.dispatch(ProcessKey(513), &request)));
    });
    c.bench_function("dispatch_untracked", |b| {
        b.iter(|| black_box(dispatcher.dispatch(ProcessKey(u64::MAX), &request)));
    });
}

criterion_group!(benches, bench_get_handler, bench_handoff_cycle, bench_dispatch);
criterion_main!(benches);
