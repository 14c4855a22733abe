//! Rewritten programs executed by the reference evaluator.
//!
//! Each test runs the transformed source and checks the logged output, so
//! these cover what the generated dispatch code actually does rather than
//! how it is printed.

use opov_runtime::run_source;
use opov_transform::catalog::{self, Arity};
use opov_transform::{TransformOptions, transform_source};

fn run_transformed(source: &str) -> Vec<String> {
    let (text, _) = transform_source(source, &TransformOptions::default()).unwrap();
    run_source(&text).unwrap_or_else(|err| panic!("{err}\n--- transformed ---\n{text}"))
}

fn binary_tokens() -> impl Iterator<Item = (&'static str, &'static str)> {
    catalog::rewritable()
        .filter(|entry| entry.arity == Arity::Binary)
        .map(|entry| (entry.token, entry.key))
}

#[test]
fn test_binary_fallback_matches_native() {
    let operands = [("7", "3"), ("'7'", "3"), ("null", "2"), ("undefined", "1"), ("-8", "2"), ("'b'", "'a'")];

    for (token, _) in binary_tokens() {
        for (a, b) in operands {
            let source = format!("const a = {a}; const b = {b}; console.log(a {token} b);");
            assert_eq!(
                run_transformed(&source),
                run_source(&source).unwrap(),
                "{a} {token} {b}"
            );
        }
    }
}

#[test]
fn test_binary_dispatch_calls_left_capability() {
    for (token, key) in binary_tokens() {
        let source = format!(
            "const a = {{ [Symbol.for('{key}')](other) {{ return 'cap ' + other; }} }};
             console.log(a {token} 5);"
        );
        assert_eq!(run_transformed(&source), ["cap 5"], "{token}");
    }
}

#[test]
fn test_capability_receives_left_operand_as_this() {
    let source = "
        const a = { tag: 'A', [Symbol.for('-')](o) { return this.tag + o; } };
        console.log(a - 1);
    ";
    assert_eq!(run_transformed(source), ["A1"]);
}

#[test]
fn test_right_operand_capability_is_ignored() {
    let source = "
        const v = { [Symbol.for('+')](o) { return 'cap'; } };
        console.log(1 + v);
    ";
    assert_eq!(run_transformed(source), ["1[object Object]"]);
}

#[test]
fn test_operands_evaluated_exactly_once() {
    let source = "
        let calls = 0;
        function count(v) { calls++; return v; }
        const v = { [Symbol.for('*')](o) { return o * 10; } };
        console.log(count(v) * count(2), calls);
        console.log(count(3) - count(1), calls);
    ";
    assert_eq!(run_transformed(source), ["20 2", "2 4"]);
}

#[test]
fn test_unary_dispatch_and_fallback() {
    let source = "
        const v = {
            [Symbol.for('unary-minus')]() { return 'neg'; },
            [Symbol.for('unary-plus')]() { return 'pos'; },
            [Symbol.for('~')]() { return 'not'; }
        };
        console.log(-v, +v, ~v);
        console.log(-5, ~5, +'3', -null);
    ";
    assert_eq!(run_transformed(source), ["neg pos not", "-5 -6 3 0"]);
}

#[test]
fn test_update_capabilities_follow_fixity() {
    let source = "
        function Counter(n) { this.n = n; }
        Counter.prototype[Symbol.for('prefix-increment')] = function () { return new Counter(this.n + 1); };
        Counter.prototype[Symbol.for('postfix-increment')] = function () { return new Counter(this.n + 10); };
        Counter.prototype[Symbol.for('prefix-decrement')] = function () { return new Counter(this.n - 1); };
        Counter.prototype[Symbol.for('postfix-decrement')] = function () { return new Counter(this.n - 10); };
        let c = new Counter(0);
        const before = c++;
        const after = ++c;
        console.log(before.n, after.n, c.n);
        c--;
        --c;
        console.log(c.n);
    ";
    assert_eq!(run_transformed(source), ["0 11 11", "0"]);
}

#[test]
fn test_update_fallback_matches_native() {
    let source = "
        let i = 1;
        const a = i++;
        const b = ++i;
        const o = { i: 0 };
        o.i++;
        ++o['i'];
        console.log(a, b, i, o.i--, o.i, --o.i);
        for (let j = 0; j < 3; j++) { i--; }
        console.log(i);
    ";
    let expected = run_source(source).unwrap();
    assert_eq!(expected, ["1 3 3 2 1 0", "0"]);
    assert_eq!(run_transformed(source), expected);
}

#[test]
fn test_update_member_base_evaluated_once() {
    let source = "
        let gets = 0;
        const o = { n: 5 };
        function target() { gets++; return o; }
        target().n++;
        const old = target().n--;
        --target()['n'];
        console.log(o.n, old, gets);
    ";
    assert_eq!(run_transformed(source), ["4 6 3"]);
}

#[test]
fn test_compound_assignment() {
    let source = "
        let x = 2;
        x += 3;
        x **= 2;
        x >>= 1;
        let v = { [Symbol.for('+')](o) { return 'sum ' + o; } };
        v += 1;
        console.log(x, v);
    ";
    assert_eq!(run_transformed(source), ["12 sum 1"]);
}

#[test]
fn test_compound_member_target_evaluated_once() {
    let source = "
        let n = 0;
        const o = { p: 1 };
        function get() { n++; return o; }
        get().p += 5;
        const arr = [1, 2];
        let k = 0;
        arr[k++] *= 10;
        console.log(o.p, n, arr, k);
    ";
    assert_eq!(run_transformed(source), ["6 1 10,2 1"]);
}

#[test]
fn test_compound_evaluation_order() {
    let source = "
        const order = [];
        function note(tag, value) { order[order.length] = tag; return value; }
        const o = { p: 'x' };
        note('base', o)[note('key', 'p')] += note('value', 'y');
        console.log(order, o.p);
    ";
    let expected = run_source(source).unwrap();
    assert_eq!(expected, ["base,key,value xy"]);
    assert_eq!(run_transformed(source), expected);
}

#[test]
fn test_nested_scope_suppression() {
    let source = "
        'operator-overload enabled';
        const x = { [Symbol.for('+')](o) { return 'over'; } };
        console.log(x + 1);
        {
            'operator-overload disabled';
            console.log(x + 1);
        }
        console.log(x + 1);
    ";
    assert_eq!(
        run_transformed(source),
        ["over", "[object Object]1", "over"]
    );
}

#[test]
fn test_reentrant_override() {
    let source = "
        'operator-overload disabled';
        const x = { [Symbol.for('+')](o) { return 'over'; } };
        function f() {
            'operator-overload enabled';
            console.log(x + 1);
            {
                'operator-overload disabled';
                console.log(x + 1);
            }
            console.log(x + 1);
        }
        f();
        console.log(x + 1);
    ";
    assert_eq!(
        run_transformed(source),
        ["over", "[object Object]1", "over", "[object Object]1"]
    );
}

#[test]
fn test_strict_equality_never_dispatches() {
    let source = "
        const v = {
            [Symbol.for('==')](o) { return 'loose'; },
            [Symbol.for('!=')](o) { return 'not loose'; }
        };
        console.log(v == 1, v != 1, v === v, v !== v, v && 1, 0 || v === v);
    ";
    assert_eq!(
        run_transformed(source),
        ["loose not loose true false 1 true"]
    );
}

#[test]
fn test_opt_in_unit_runs_unchanged() {
    let source = "const a = 2; console.log(a * 21);";
    let (text, report) = transform_source(source, &TransformOptions::opt_in()).unwrap();
    assert_eq!(report.total(), 0);
    assert_eq!(run_source(&text).unwrap(), ["42"]);
}

#[test]
fn test_vector_program() {
    let source = "
        function Vector(x, y) { this.x = x; this.y = y; }
        Vector.prototype[Symbol.for('+')] = function (o) { return new Vector(this.x + o.x, this.y + o.y); };
        Vector.prototype[Symbol.for('*')] = function (k) { return new Vector(this.x * k, this.y * k); };
        Vector.prototype[Symbol.for('unary-minus')] = function () { return this * -1; };
        Vector.prototype[Symbol.for('==')] = function (o) { return this.x == o.x && this.y == o.y; };
        Vector.prototype.toString = function () { return '(' + this.x + ', ' + this.y + ')'; };

        let a = new Vector(1, 2);
        const b = new Vector(3, 4);
        a += b * 2;
        console.log(a, -a, a == new Vector(7, 10), a === a);
    ";
    assert_eq!(run_transformed(source), ["(7, 10) (-7, -10) true true"]);
}
