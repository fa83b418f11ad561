//! Benchmarks for kernel resolution.
//!
//! Run with: cargo bench --package ronn-framework

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ronn_core::{Node, Result};
use ronn_framework::{
    ExecutionProvider, KernelCreateInfo, KernelDef, KernelMetadata, KernelRegistry,
    KernelRegistryManager, OpKernel, OpKernelContext,
};

const OPS: [&str; 8] = ["Add", "Mul", "Conv", "Relu", "MatMul", "Gemm", "Softmax", "Reshape"];

struct Noop(KernelMetadata);

impl OpKernel for Noop {
    fn metadata(&self) -> &KernelMetadata {
        &self.0
    }

    fn compute(&self, _context: &mut OpKernelContext) -> Result<()> {
        Ok(())
    }
}

struct Provider(&'static str, Arc<KernelRegistry>);

impl ExecutionProvider for Provider {
    fn provider_type(&self) -> &str {
        self.0
    }

    fn kernel_registry(&self) -> Option<Arc<KernelRegistry>> {
        Some(Arc::clone(&self.1))
    }
}

fn registry(provider_type: &str) -> Arc<KernelRegistry> {
    let kernels = OPS.iter().flat_map(|op| {
        [(1, 10), (11, 12), (13, i32::MAX)].map(|(start, end)| {
            let def = KernelDef::builder(*op)
                .version_range(start, end)
                .provider(provider_type)
                .build();
            KernelCreateInfo::new(def, |info| Ok(Box::new(Noop(info.metadata()))))
        })
    });
    Arc::new(KernelRegistry::with_kernels(kernels).unwrap())
}

fn manager(custom_count: usize) -> KernelRegistryManager {
    let mut manager = KernelRegistryManager::new();
    let providers: Vec<Arc<dyn ExecutionProvider>> = vec![
        Arc::new(Provider("CPU", registry("CPU"))),
        Arc::new(Provider("TRT", registry("TRT"))),
    ];
    manager.register_kernels(&providers).unwrap();
    for _ in 0..custom_count {
        manager.register_kernel_registry(registry("CUDA"));
    }
    manager
}

fn nodes(count: usize) -> Vec<Node> {
    (0..count)
        .map(|i| {
            Node::new(OPS[i % OPS.len()], 13)
                .with_index(i)
                .with_execution_provider(if i % 3 == 0 { "TRT" } else { "CPU" })
        })
        .collect()
}

fn bench_single_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_kernel_registry");
    let node = Node::new("Conv", 13).with_execution_provider("CPU");

    for custom_count in [0, 4, 16].iter() {
        let manager = manager(*custom_count);
        group.bench_with_input(
            BenchmarkId::new("custom_registries", custom_count),
            custom_count,
            |bencher, _| {
                bencher.iter(|| black_box(manager.search_kernel_registry(&node).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_hash_resolution(c: &mut Criterion) {
    let manager = manager(4);
    let hash = KernelDef::builder("Softmax")
        .version_range(13, i32::MAX)
        .provider("TRT")
        .build()
        .hash();

    c.bench_function("search_kernel_registries_by_hash", |bencher| {
        bencher.iter(|| black_box(manager.search_kernel_registries_by_hash(hash).unwrap()));
    });
}

fn bench_bulk_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_kernel_registries");
    let manager = manager(2);

    for count in [64, 1024].iter() {
        let nodes = nodes(*count);
        group.bench_with_input(BenchmarkId::new("nodes", count), count, |bencher, _| {
            bencher.iter(|| black_box(manager.search_kernel_registries(&nodes).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_resolution,
    bench_hash_resolution,
    bench_bulk_resolution
);

criterion_main!(benches);
