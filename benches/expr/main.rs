mod expr_parser;

use criterion::{black_box, criterion_group, Criterion};
use expr_parser::parse_expr;
use log::trace;

const EXPR: &str = "((((((((((12345))))))))))";

pub fn bench_expr(c: &mut Criterion) {
    c.bench_function("expr_chicory", |b| b.iter(|| parse_expr(black_box(EXPR))));
}

criterion_group!(benches, bench_expr);

fn main() {
    env_logger::init();
    trace!(target: "cy", "Logging enabled");
    benches();
    Criterion::default().configure_from_args().final_summary();
}
