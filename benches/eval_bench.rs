use criterion::{criterion_group, criterion_main, Criterion, black_box};
use pstbot::search::Evaluator;
use pstbot::Position;

fn bench_eval(c: &mut Criterion) {
    let ev = Evaluator::default();
    let start = Position::startpos();
    let kiwipete = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    c.bench_function("evaluate_startpos", |ben| {
        ben.iter(|| black_box(ev.evaluate(black_box(&start))))
    });
    c.bench_function("evaluate_kiwipete", |ben| {
        ben.iter(|| black_box(ev.evaluate(black_box(&kiwipete))))
    });
}

criterion_group!(benches, bench_eval);
criterion_main!(benches);
