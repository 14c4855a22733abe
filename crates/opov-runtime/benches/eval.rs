// Evaluator benchmarks.
//
// Rewritten code adds a closure call per operator, so these compare plain
// arithmetic with the same loop calling a capability by hand.

use criterion::{Bencher, Criterion, black_box, criterion_group, criterion_main};
use opov_runtime::Interpreter;

const PLAIN_LOOP: &str = "
let total = 0;
for (let i = 0; i < 200; i++) {
    total = total + i * 2;
}
";

const CAPABILITY_LOOP: &str = "
function Num(v) { this.v = v; }
Num.prototype[Symbol.for('+')] = function (other) { return new Num(this.v + other.v); };
let total = new Num(0);
const two = new Num(2);
for (let i = 0; i < 200; i++) {
    total = total[Symbol.for('+')](two);
}
";

fn run(source: &str) {
    let (program, interner) = opov_syntax::parse_program(source).unwrap();
    let mut interp = Interpreter::new(interner);
    interp.run(&program).unwrap();
}

fn bench_plain_loop(c: &mut Criterion) {
    c.bench_function("plain_loop", |b: &mut Bencher| {
        b.iter(|| run(black_box(PLAIN_LOOP)));
    });
}

fn bench_capability_loop(c: &mut Criterion) {
    c.bench_function("capability_loop", |b: &mut Bencher| {
        b.iter(|| run(black_box(CAPABILITY_LOOP)));
    });
}

criterion_group!(benches, bench_plain_loop, bench_capability_loop);
criterion_main!(benches);
