//! Analysis Benchmarks
//!
//! Parsing, differentiation and the four analyses on small formulas plus one
//! large mixed expression.

use criterion::{criterion_group, criterion_main, Criterion};
use std::fmt::Write;
use std::hint::black_box;
use stepcalc::{differentiate, parse, Analyzer, Expression, Mode};

const FORMULAS: [&str; 4] = [
    "(x^2 - 8*x + 15)/(x^2 - 5)",
    "(x^2 - 4)/(x - 2)",
    "sin(x)/x",
    "sqrt(x + 1)*exp(-x^2)",
];

/// Sum of N mixed terms: polynomials, trig, exponentials and quotients
fn generate_mixed(n: usize) -> String {
    let mut s = String::with_capacity(n * 24);
    for i in 1..=n {
        if i > 1 {
            s.push_str(if i % 2 == 0 { " + " } else { " - " });
        }
        let _ = match i % 4 {
            0 => write!(s, "{}*x^{}", i, i % 6 + 1),
            1 => write!(s, "sin({i}*x)*cos(x)"),
            2 => write!(s, "exp(x/{i})"),
            _ => write!(s, "(x^2 + {i})/(x + {i})"),
        };
    }
    s
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for f in FORMULAS {
        group.bench_function(f, |b| b.iter(|| parse(black_box(f))));
    }
    let mixed = generate_mixed(100);
    group.bench_function("mixed_100", |b| b.iter(|| parse(black_box(&mixed))));
    group.finish();
}

fn bench_differentiate(c: &mut Criterion) {
    let mixed = Expression::parse(&generate_mixed(100)).expect("benchmark formula parses");
    c.bench_function("differentiate/mixed_100", |b| {
        b.iter(|| differentiate(black_box(&mixed)))
    });
}

fn bench_analyses(c: &mut Criterion) {
    let analyzer = Analyzer::new();
    let mut group = c.benchmark_group("analysis");
    for mode in Mode::ALL {
        for f in FORMULAS {
            group.bench_function(format!("{mode}/{f}"), |b| {
                b.iter(|| analyzer.run(mode, black_box(f), black_box(2.0)))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_differentiate, bench_analyses);
criterion_main!(benches);
