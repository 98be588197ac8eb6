use criterion::{criterion_group, criterion_main, Criterion};
use engine::text::{analyze, tokenize};

fn bench_tokenize(c: &mut Criterion) {
    let text = "The Los Angeles City Council on Tuesday approved a $42.3-million \
                plan to repave 1,200 miles of city streets, officials said. \
                Council members voted 12-1 after a two-hour debate; opponents \
                called the figure inflated. Work begins in January, 1990. "
        .repeat(200);
    c.bench_function("tokenize_newswire", |b| b.iter(|| tokenize(&text)));
    c.bench_function("analyze_newswire", |b| b.iter(|| analyze(&text)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
