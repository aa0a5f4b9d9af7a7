//! Benchmarks de construção de prompts.
//!
//! Executar: `cargo bench --bench prompts_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use medagentx::prompts::{PromptBuilder, PromptValues};
use medagentx::types::Role;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HELPERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn report_of(chars: usize) -> String {
    "Chest pain radiating to the left arm, shortness of breath, anxiety. "
        .chars()
        .cycle()
        .take(chars)
        .collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Prompt Builder
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_specialist_prompts(c: &mut Criterion) {
    let mut group = c.benchmark_group("specialist_prompt");
    let builder = PromptBuilder::default();

    for size in [200usize, 2_000, 20_000] {
        let values = PromptValues::for_report(report_of(size));
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &values, |b, values| {
            b.iter(|| black_box(builder.build(Role::Cardiologist, values)))
        });
    }

    group.finish();
}

fn bench_team_prompt(c: &mut Criterion) {
    let builder = PromptBuilder::default();
    let opinion = report_of(600);
    let values = PromptValues::for_team(opinion.clone(), opinion.clone(), opinion);

    c.bench_function("team_prompt", |b| {
        b.iter(|| black_box(builder.build(Role::MultidisciplinaryTeam, &values)))
    });
}

criterion_group!(benches, bench_specialist_prompts, bench_team_prompt);
criterion_main!(benches);
