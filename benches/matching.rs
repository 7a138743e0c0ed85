use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use matcher::{rank, score, select};
use pricematch::{
    normalize, EmbeddingClient, InquiryItem, Matcher, NoProgress, Normalizer, Pipeline,
    ReferenceItem,
};
use semantic::{stub_vector, StubEmbeddingProvider};

const DIM: usize = 256;

fn vectors(prefix: &str, count: usize) -> Vec<Vec<f64>> {
    (0..count)
        .map(|i| stub_vector(&format!("{prefix} item {i}"), DIM))
        .collect()
}

/// Cosine matrix plus argmax over growing pricelists.
fn bench_score_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_select");
    let inquiries = vectors("inquiry", 100);

    for refs in [100usize, 1_000, 5_000] {
        let references = vectors("pricelist", refs);
        group.throughput(Throughput::Elements((refs * inquiries.len()) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(refs), &references, |b, refs| {
            b.iter(|| {
                let report = score(black_box(&inquiries), black_box(refs)).expect("score");
                select(&report.matrix)
            });
        });
    }
    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let inquiries = vectors("inquiry", 100);
    let references = vectors("pricelist", 1_000);
    let report = score(&inquiries, &references).expect("score");

    c.bench_function("rank_top4_100x1000", |b| {
        b.iter(|| rank(black_box(&report.matrix), 4));
    });
}

fn bench_normalize(c: &mut Criterion) {
    let lines: Vec<String> = (0..1_000)
        .map(|i| format!("  Reinforced Cement Concrete M{i}  SLAB 150MM. thick "))
        .collect();

    let mut group = c.benchmark_group("normalize");
    group.throughput(Throughput::Elements(lines.len() as u64));
    group.bench_function("1000_lines", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(normalize(black_box(line)));
            }
        });
    });
    group.finish();
}

/// Whole pipeline with the offline stub provider.
fn bench_pipeline(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let client =
        EmbeddingClient::new(Arc::new(StubEmbeddingProvider::new()), 96, DIM).expect("client");
    let pipeline = Pipeline::new(Normalizer::default(), client, Matcher::default());

    let references: Vec<ReferenceItem> = (0..500)
        .map(|i| ReferenceItem::new(format!("Steel Rebar {i}MM."), 100.0 + i as f64))
        .collect();
    let inquiries: Vec<InquiryItem> = (0..200)
        .map(|i| InquiryItem::new(format!("steel rebar {}mm", i * 2), format!("row-{i}")))
        .collect();

    c.bench_function("pipeline_stub_200x500", |b| {
        b.iter(|| {
            runtime
                .block_on(pipeline.reconcile(references.clone(), inquiries.clone(), &NoProgress))
                .expect("reconcile")
        });
    });
}

criterion_group!(
    benches,
    bench_score_select,
    bench_rank,
    bench_normalize,
    bench_pipeline
);
criterion_main!(benches);
