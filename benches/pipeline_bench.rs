//! Classification pipeline performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use message_classifier::handlers::ui::{render_page, FormOutcome, PageView};
use message_classifier::models::{ClassificationResult, RankedLabels};
use message_classifier::services::classifier::normalize_ranking;
use message_classifier::services::validate_message;

fn candidate_labels() -> Vec<String> {
    vec!["Urgente".to_string(), "Moderado".to_string(), "Normal".to_string()]
}

fn raw_output() -> RankedLabels {
    RankedLabels {
        labels: vec!["Normal".to_string(), "Urgente".to_string(), "Moderado".to_string()],
        scores: vec![0.2, 0.7, 0.1],
    }
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_message");

    for size in [64usize, 512, 4096] {
        let message = "Hay un incendio en el edificio. ".repeat(size / 32 + 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &message, |b, message| {
            b.iter(|| validate_message(black_box(message), black_box(512)))
        });
    }

    group.finish();
}

fn bench_normalization(c: &mut Criterion) {
    let labels = candidate_labels();

    c.bench_function("normalize_ranking", |b| {
        b.iter(|| normalize_ranking(black_box(raw_output()), black_box(&labels)))
    });
}

fn bench_render(c: &mut Criterion) {
    let labels = candidate_labels();
    let result = ClassificationResult {
        classification: "Urgente".to_string(),
        confidence: 0.7,
        details: normalize_ranking(raw_output(), &labels).unwrap(),
    };

    c.bench_function("render_page", |b| {
        b.iter(|| {
            render_page(black_box(&PageView {
                candidate_labels: &labels,
                confidence_threshold: 0.5,
                model: "facebook/bart-large-mnli",
                message: "Hay un incendio en el edificio.",
                outcome: Some(FormOutcome::Success(result.clone())),
                history: Vec::new(),
            }))
        })
    });
}

criterion_group!(benches, bench_validation, bench_normalization, bench_render);
criterion_main!(benches);
