use calcpad_core::DocumentStateManager;
use calcpad_decorate::PatternDecorationProcessor;
use calcpad_eval::{Calculator, ResultSequence, evaluate_lines};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

fn formula_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 32);
    for i in 0..line_count {
        match i % 4 {
            0 => out.push_str(&format!("({i} + 1) * 2 ** 3 / 7\n")),
            1 => out.push_str(&format!("ans({}) - {i} % 5\n", i - 1)),
            2 => out.push_str("@calc #total 12 not a formula\n"),
            _ => out.push_str(&format!("-{i}.25e-1 + ans(0)\n")),
        }
    }
    out.pop();
    out
}

fn bench_evaluate_lines(c: &mut Criterion) {
    let text = formula_text(5_000);
    let lines: Vec<&str> = text.lines().collect();
    let previous = evaluate_lines(&lines, &ResultSequence::default());

    c.bench_function("evaluate_lines/5k_lines", |b| {
        b.iter(|| black_box(evaluate_lines(black_box(&lines), &previous)))
    });
}

fn bench_enter_pass(c: &mut Criterion) {
    let text = formula_text(5_000);
    let state = DocumentStateManager::new(&text);

    c.bench_function("enter_pass/decorate_and_calculate_5k", |b| {
        b.iter_batched(
            || {
                (
                    PatternDecorationProcessor::default_rules().unwrap(),
                    Calculator::default(),
                )
            },
            |(mut processor, mut calculator)| {
                let edits = calcpad_core::DocumentProcessor::process(&mut processor, &state)
                    .unwrap();
                black_box(edits);
                black_box(calculator.calculate(&state.lines()).len());
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_evaluate_lines, bench_enter_pass);
criterion_main!(benches);
