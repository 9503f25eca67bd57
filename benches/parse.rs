#![allow(unused)]
extern crate dotid;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use dotid::{ParseOptions, TypeIdentity, TypeIdentityVisitor};
use std::hint::black_box;

/// Benchmark parsing of representative assembly-qualified type names, from a
/// bare elemental name up to a decorated, deeply nested generic.
fn bench_parse_type_names(c: &mut Criterion) {
    let options = ParseOptions::default();

    let inputs = [
        ("elemental", "System.Int32"),
        (
            "qualified",
            "System.Int32, mscorlib, Version=4.0.0.0, Culture=neutral, \
             PublicKeyToken=b77a5c561934e089",
        ),
        (
            "generic",
            "System.Collections.Generic.Dictionary`2[[System.Int32],[System.String]]",
        ),
        (
            "nested_decorated",
            "Outer`2[[Inner`1[[System.Int32[]]], LibA],[System.String*]][,,], LibB, \
             Version=1.2.3.4, Culture=en-US, PublicKeyToken=b03f5f7f11d50a3a",
        ),
    ];

    let mut group = c.benchmark_group("parse_assembly_qualified_name");
    for (name, input) in inputs {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let parsed =
                    TypeIdentity::parse_assembly_qualified_name(black_box(input), &options)
                        .unwrap();
                black_box(parsed)
            });
        });
    }
    group.finish();
}

/// Benchmark the no-op visitor traversal, which should never reallocate.
fn bench_visit(c: &mut Criterion) {
    struct Untouched;
    impl TypeIdentityVisitor for Untouched {}

    let options = ParseOptions::default();
    let parsed = TypeIdentity::parse_assembly_qualified_name(
        "Outer`2[[Inner`1[[System.Int32[]]], LibA],[System.String*]][,,], LibB",
        &options,
    )
    .unwrap();

    c.bench_function("visit_unchanged", |b| {
        b.iter(|| {
            let visited = Untouched.visit_type(black_box(&parsed)).unwrap();
            black_box(visited)
        });
    });
}

criterion_group!(benches, bench_parse_type_names, bench_visit);
criterion_main!(benches);
