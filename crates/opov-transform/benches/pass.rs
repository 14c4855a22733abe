// Rewriting pass benchmarks.
//
// Parsing is done outside the timed loop where possible so the numbers
// track the traversal and subtree construction.

use criterion::{Bencher, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use opov_transform::{TransformOptions, transform_program, transform_source};

const VECTOR_MATH: &str = r#"
'operator-overload enabled';
import Vector from './vector';

let a = new Vector(1, 2), b = new Vector(3, 4);
let c = a + b * 2 - -a;
c += b;
for (let i = 0; i < 10; i++) {
    c = c * (a - b) / 2;
    o.count++;
}
{
    'operator-overload disabled';
    c = c + 1;
}
"#;

/// Parse, rewrite, and print one module.
fn bench_transform_source(c: &mut Criterion) {
    let options = TransformOptions::default();
    c.bench_function("transform_source", |b: &mut Bencher| {
        b.iter(|| transform_source(black_box(VECTOR_MATH), &options).unwrap());
    });
}

/// Rewrite only, on a fresh clone of the parsed program each iteration.
fn bench_rewrite_only(c: &mut Criterion) {
    let options = TransformOptions::default();
    let (program, interner) = opov_syntax::parse_program(VECTOR_MATH).unwrap();

    c.bench_function("rewrite_only", |b: &mut Bencher| {
        b.iter(|| {
            let mut program = program.clone();
            let mut interner = interner.clone();
            transform_program(&mut program, &mut interner, black_box(&options))
        });
    });
}

/// A disabled unit: traversal with no rewrites.
fn bench_disabled_unit(c: &mut Criterion) {
    let options = TransformOptions::opt_in();
    let source = VECTOR_MATH.replace("enabled", "disabled");
    let (program, interner) = opov_syntax::parse_program(&source).unwrap();

    c.bench_function("disabled_unit", |b: &mut Bencher| {
        b.iter(|| {
            let mut program = program.clone();
            let mut interner = interner.clone();
            transform_program(&mut program, &mut interner, black_box(&options))
        });
    });
}

/// Growing numbers of rewritable statements.
fn bench_pass_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("pass_scaling");
    let options = TransformOptions::default();

    for lines in [10, 100, 1_000] {
        let source: String = (0..lines)
            .map(|i| format!("x{i} += a * b - (c >>> {i});\n"))
            .collect();
        let (program, interner) = opov_syntax::parse_program(&source).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(lines), &program, |b, program| {
            b.iter(|| {
                let mut program = program.clone();
                let mut interner = interner.clone();
                transform_program(&mut program, &mut interner, &options)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_transform_source,
    bench_rewrite_only,
    bench_disabled_unit,
    bench_pass_scaling
);
criterion_main!(benches);
