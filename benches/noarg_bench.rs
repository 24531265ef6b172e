//! No-arg Synthesis Benchmark
//!
//! Measures pass throughput over synthetic modules: a deep marked-class
//! inheritance chain (stresses recursive synthesis and memoization) and a
//! wide module of independent classes with initializers (stresses
//! extraction and deep copy).

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use veld_ir::{ClassKind, IrArena, NodeIndex};
use veld_noarg::NoArgGenerationExtension;

fn build_chain_module(arena: &mut IrArena, depth: usize) -> NodeIndex {
    let module = arena.add_module("bench_chain");
    let root = arena.add_class(module, "Layer0", ClassKind::Class);
    arena.add_constructor(root, true);

    let mut parent = root;
    for i in 1..depth {
        let class = arena.add_class(module, &format!("Layer{i}"), ClassKind::Class);
        arena.add_annotation(class, "test.NoArg");
        arena.add_super_type(class, parent);
        let primary = arena.add_constructor(class, true);
        arena.add_constructor_parameter(primary, "x", arena.unit_type(), NodeIndex::NONE);
        parent = class;
    }
    module
}

fn build_wide_module(arena: &mut IrArena, width: usize) -> NodeIndex {
    let module = arena.add_module("bench_wide");
    for i in 0..width {
        let class = arena.add_class(module, &format!("Entity{i}"), ClassKind::Class);
        arena.add_annotation(class, "test.NoArg");
        for f in 0..4 {
            let init = arena.add_const_int(f as i64);
            arena.add_field(class, &format!("field{f}"), arena.unit_type(), false, init);
        }
        let touch = arena.add_call("touch", Vec::new());
        let body = arena.add_block_body(vec![touch]);
        arena.add_anonymous_initializer(class, false, body);
    }
    module
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("noarg_chain");
    for depth in [8, 64, 256] {
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter_batched(
                || {
                    let mut arena = IrArena::new();
                    let module = build_chain_module(&mut arena, depth);
                    (arena, module)
                },
                |(mut arena, module)| {
                    let extension =
                        NoArgGenerationExtension::new(vec!["test.NoArg".to_string()], false);
                    extension.generate(&mut arena, module).unwrap();
                    black_box(arena.nodes.len())
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_wide_with_initializers(c: &mut Criterion) {
    let mut group = c.benchmark_group("noarg_wide_initializers");
    for width in [16, 128] {
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter_batched(
                || {
                    let mut arena = IrArena::new();
                    let module = build_wide_module(&mut arena, width);
                    (arena, module)
                },
                |(mut arena, module)| {
                    let extension =
                        NoArgGenerationExtension::new(vec!["test.NoArg".to_string()], true);
                    extension.generate(&mut arena, module).unwrap();
                    black_box(arena.nodes.len())
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_chain, bench_wide_with_initializers);
criterion_main!(benches);
