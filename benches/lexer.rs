use criterion::{Criterion, black_box, criterion_group, criterion_main};
use minipy::lexer;

/// A class-heavy program exercising indentation, strings, comparisons, and
/// comments.
fn workload() -> String {
    let mut source = String::new();
    source.push_str("class Counter:\n");
    source.push_str("  def __init__(start):\n");
    source.push_str("    self.count = start\n");
    source.push_str("  def bump(amount):\n");
    source.push_str("    self.count = self.count + amount\n");
    source.push_str("    return self.count\n");
    for i in 0..200 {
        source.push_str(&format!("c{i} = Counter({i}) # instance {i}\n"));
        source.push_str(&format!(
            "print c{i}.bump({i} * 2 + 1), 'step', {i} <= 100 or {i} != 0\n"
        ));
    }
    source
}

fn bench_lexer(c: &mut Criterion) {
    let source = workload();

    c.bench_function("lexer_tokenize_classes", |b| {
        b.iter(|| {
            let tokens = lexer::tokenize(black_box(&source)).expect("tokenize");
            black_box(tokens);
        })
    });
}

criterion_group!(benches, bench_lexer);
criterion_main!(benches);
