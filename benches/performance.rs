/// 採点・分類のスループットベンチマーク。
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use press_ranker::classification::{AnalyzeOptions, ContentClassifier};
use press_ranker::profile::Profile;
use press_ranker::scoring::SearchResult;

const PUBLICATIONS: &[&str] = &[
    "variety",
    "filmdaily",
    "boxoffice",
    "motionpictureherald",
    "photoplay",
    "harrisonsreports",
];
const STRATEGIES: &[&str] = &["exact_title", "title_year", "title_star", "fuzzy_title", "keyword_only"];

fn synthetic_results(count: usize) -> Vec<SearchResult> {
    (0..count)
        .map(|index| {
            let publication = PUBLICATIONS[index % PUBLICATIONS.len()];
            let strategy = STRATEGIES[index % STRATEGIES.len()];
            SearchResult::new(
                format!("{publication}{index}-1939-01_{index:04}"),
                format!("Stagecoach notice {index}: booked for a first run engagement downtown"),
            )
            .with_strategy(strategy)
        })
        .collect()
}

fn bench_score_all(c: &mut Criterion) {
    let scorer = Profile::builtin("base").expect("base profile").scorer();
    let results = synthetic_results(200);

    c.bench_function("score_all_200_results", |b| {
        b.iter(|| {
            let scored = scorer.score_all(results.clone());
            black_box(scored.len());
        });
    });
}

fn bench_analyze(c: &mut Criterion) {
    let classifier = ContentClassifier::default();
    let text = "Stagecoach grossed $18,000 this week at the Music Hall, a house record. \
        Exhibitors report strong business and the feature is held over. "
        .repeat(20);

    c.bench_function("analyze_trade_page", |b| {
        b.iter(|| {
            let analysis = classifier.analyze(&text, AnalyzeOptions::with_evidence());
            black_box(analysis.types.len());
        });
    });
}

criterion_group!(benches, bench_score_all, bench_analyze);
criterion_main!(benches);
