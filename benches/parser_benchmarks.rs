//! Performance benchmarks for the Cinnabar parser
//!
//! Run with: cargo bench
//!
//! These benchmarks measure key performance characteristics:
//! - Expression and statement parsing speed
//! - Position tracking and capture overhead
//! - Parse throughput on realistic program shapes
//! - JSX scanning

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cinnabar::{parse_module, parse_script, Options};

/// Benchmark: Expression-heavy sources
fn bench_expressions(c: &mut Criterion) {
    let mut group = c.benchmark_group("expressions");

    // Arithmetic with mixed precedence
    group.bench_function("arithmetic", |b| {
        b.iter(|| parse_script(black_box("1 + 2 * 3 - 4 / 2 ** 2;"), Options::default()).unwrap())
    });

    // Member and optional chains
    group.bench_function("member_chains", |b| {
        b.iter(|| {
            parse_script(black_box("a.b.c.d?.e(1, 2).f[0];"), Options::default()).unwrap()
        })
    });

    // Arrow heads force cover-grammar reinterpretation
    group.bench_function("arrows_and_destructuring", |b| {
        b.iter(|| {
            parse_script(
                black_box("const f = ({ a, b: [c = 1] }, ...rest) => a + c + rest.length;"),
                Options::default(),
            )
            .unwrap()
        })
    });

    // Nested template literals
    group.bench_function("template_literals", |b| {
        b.iter(|| {
            parse_script(
                black_box("`a${1 + 2}b${`nested${x}`}c`;"),
                Options::default(),
            )
            .unwrap()
        })
    });

    // Division and regex literals force rescans at expression starts
    group.bench_function("regex_disambiguation", |b| {
        b.iter(|| {
            parse_script(
                black_box("a / b / c; x = /[a-z]+/gi.test(s) ? s.replace(/\\d+/g, '') : s;"),
                Options::default(),
            )
            .unwrap()
        })
    });

    group.finish();
}

/// Benchmark: Statement-heavy sources
fn bench_statements(c: &mut Criterion) {
    let mut group = c.benchmark_group("statements");

    group.bench_function("for_loop", |b| {
        b.iter(|| {
            parse_script(
                black_box("let sum = 0; for (let i = 0; i < 1000; i++) { sum += i; }"),
                Options::default(),
            )
            .unwrap()
        })
    });

    group.bench_function("try_catch", |b| {
        b.iter(|| {
            parse_script(
                black_box("try { risky(); } catch ({ message }) { log(message); } finally { done(); }"),
                Options::default(),
            )
            .unwrap()
        })
    });

    group.bench_function("switch", |b| {
        b.iter(|| {
            parse_script(
                black_box("switch (x) { case 1: a(); break; case 2: b(); break; default: c(); }"),
                Options::default(),
            )
            .unwrap()
        })
    });

    group.bench_function("class_declaration", |b| {
        b.iter(|| {
            parse_script(
                black_box(
                    "class Point { constructor(x, y) { this.x = x; this.y = y; } \
                     get norm() { return Math.sqrt(this.x ** 2 + this.y ** 2); } \
                     static origin() { return new Point(0, 0); } }",
                ),
                Options::default(),
            )
            .unwrap()
        })
    });

    group.finish();
}

/// Benchmark: Module goal with imports and exports
fn bench_modules(c: &mut Criterion) {
    let source = "import dflt, { a, b as c } from 'dep';\n\
                  import * as ns from 'other';\n\
                  export const answer = a + c;\n\
                  export default function run() { return ns.go(dflt); }\n\
                  export { answer as result };";

    c.bench_function("module_items", |b| {
        b.iter(|| parse_module(black_box(source), Options::default()).unwrap())
    });
}

/// Benchmark: Position tracking and capture overhead
fn bench_tracking_overhead(c: &mut Criterion) {
    let source = "function fib(n) { return n <= 1 ? n : fib(n - 1) + fib(n - 2); }\n\
                  const memo = new Map();\n\
                  for (let i = 0; i < 30; i++) memo.set(i, fib(i));";
    let mut group = c.benchmark_group("tracking");

    group.bench_function("bare", |b| {
        b.iter(|| parse_script(black_box(source), Options::default()).unwrap())
    });

    group.bench_function("ranges_and_loc", |b| {
        let options = Options {
            ranges: true,
            loc: true,
            raw: true,
            ..Options::default()
        };
        b.iter(|| parse_script(black_box(source), options.clone()).unwrap())
    });

    group.bench_function("token_capture", |b| {
        let options = Options {
            tokens: true,
            comments: true,
            ..Options::default()
        };
        b.iter(|| parse_script(black_box(source), options.clone()).unwrap())
    });

    group.finish();
}

/// Benchmark: JSX scanning modes
fn bench_jsx(c: &mut Criterion) {
    let source = "const view = <ul className=\"list\">{items.map(item => \
                  <li key={item.id} data-state={item.state}>{item.label}</li>)}</ul>;";
    let options = Options {
        jsx: true,
        ..Options::default()
    };

    c.bench_function("jsx_tree", |b| {
        b.iter(|| parse_script(black_box(source), options.clone()).unwrap())
    });
}

/// Benchmark: Parse throughput on realistic program shapes
fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    let small_program = "function add(a, b) { return a + b; } add(1, 2);";
    group.throughput(Throughput::Bytes(small_program.len() as u64));
    group.bench_function("small_program", |b| {
        b.iter(|| parse_script(black_box(small_program), Options::default()).unwrap())
    });

    let medium_program = r#"
        class Calculator {
            constructor() { this.result = 0; }
            add(n) { this.result += n; return this; }
            sub(n) { this.result -= n; return this; }
            mul(n) { this.result *= n; return this; }
            div(n) { this.result /= n; return this; }
            get() { return this.result; }
        }
        const calc = new Calculator();
        calc.add(10).mul(2).sub(5).div(3).get();
    "#;
    group.throughput(Throughput::Bytes(medium_program.len() as u64));
    group.bench_function("medium_program", |b| {
        b.iter(|| parse_script(black_box(medium_program), Options::default()).unwrap())
    });

    group.finish();
}

/// Benchmark: Scalability with source size
fn bench_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalability");
    group.sample_size(50);

    for size in [10, 100, 1000].iter() {
        let mut code = String::new();
        for i in 0..*size {
            code.push_str(&format!("const x{i} = {i} * 2; f(x{i});\n"));
        }
        group.throughput(Throughput::Bytes(code.len() as u64));
        group.bench_with_input(BenchmarkId::new("statements", size), &code, |b, code| {
            b.iter(|| parse_script(black_box(code), Options::default()).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_expressions,
    bench_statements,
    bench_modules,
    bench_tracking_overhead,
    bench_jsx,
    bench_throughput,
    bench_scalability,
);

criterion_main!(benches);
