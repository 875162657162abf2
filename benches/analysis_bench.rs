use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use texa::builder::IrBuilder;
use texa::ir::*;
use texa::*;

/// Flattening kernel repeated `n_bufs` times: each buffer gets a loop nest
/// copying a 2-D input into a flat output, and every fourth one also draws
/// a random mask so the detector has to scan most of the tree.
fn generate_kernel(n_bufs: usize) -> Stmt {
    let mut b = IrBuilder::new();
    let mut stmts = Vec::with_capacity(n_bufs);
    for k in 0..n_bufs {
        let i = b.var("i", Dtype::Int);
        let j = b.var("j", Dtype::Int);
        let input = b.buf(
            format!("in_{}", k),
            vec![Expr::int(16), Expr::int(16)],
            Dtype::Float,
        );
        let flat = b.flat_buf(format!("in_{}_flat", k), 256, Dtype::Float);
        let idx = Expr::add(Expr::mul(Expr::var(&i), Expr::int(16)), Expr::var(&j));
        let mut value = Expr::load(&input, vec![Expr::var(&i), Expr::var(&j)]);
        if k % 4 == 3 {
            value = Expr::binary(BinaryOpKind::Mul, value, Expr::rand());
        }
        let store = Stmt::store(&flat, vec![idx], value);
        let inner = Stmt::for_loop(&j, Expr::int(0), Expr::int(16), store);
        stmts.push(Stmt::for_loop(&i, Expr::int(0), Expr::int(16), inner));
    }
    Stmt::block(stmts)
}

fn sizes() -> [usize; 3] {
    [16, 256, 4096]
}

// KPI: per-analysis latency as the tree grows.
fn bench_kpi_analysis_latency(c: &mut Criterion) {
    for n in sizes() {
        let root = generate_kernel(n);

        let mut group = c.benchmark_group(format!("kpi/analysis_latency/{}", n));
        group.bench_function("has_rand", |b| {
            b.iter(|| black_box(has_rand::has_rand(black_box(&root))));
        });
        group.bench_function("find_stores", |b| {
            b.iter(|| black_box(node_finder::find::<Store>(black_box(&root)).len()));
        });
        group.bench_function("find_vars", |b| {
            b.iter(|| black_box(var_finder::find_vars(black_box(&root)).len()));
        });
        group.bench_function("buffer_map", |b| {
            b.iter(|| black_box(buffer_map::buffer_map(black_box(&root)).len()));
        });
        group.finish();
    }
}

// KPI: full report (all analyses plus verification) throughput.
fn bench_kpi_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("kpi/report");
    for n in sizes() {
        let root = generate_kernel(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &root, |b, root| {
            b.iter(|| {
                let cert = verify::verify_ir(root);
                let r = report::build_report("", black_box(root), Some(&cert));
                black_box(r.node_counts.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kpi_analysis_latency, bench_kpi_report);
criterion_main!(benches);
