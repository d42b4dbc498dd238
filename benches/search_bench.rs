use criterion::{criterion_group, criterion_main, Criterion, black_box};
use arbor::board::cozy::Position;
use arbor::search::eval::EvalKind;
use arbor::search::root::{Engine, SearchParams};

fn bench_search(c: &mut Criterion) {
    let pos = Position::startpos();
    for threads in [1usize, 4] {
        let engine = Engine::new(EvalKind::Pst, 16, threads).unwrap();
        let p = SearchParams { depth: 4, threads, ..SearchParams::default() };
        c.bench_function(&format!("search_depth_4_startpos_t{threads}"), |ben| {
            ben.iter(|| {
                engine.new_game();
                let r = engine.search(black_box(&pos), &p).unwrap();
                black_box(r.nodes)
            })
        });
    }
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
