/// 複合スコアラーの振る舞いを公開APIだけで確認する統合テスト。
use press_ranker::profile::Profile;
use press_ranker::scoring::{
    CompositeScorer, DIVERSITY_FLOOR, QueryKeywords, ScoringRecord, SearchResult,
};

fn base_scorer() -> CompositeScorer {
    Profile::builtin("base").expect("base profile").scorer()
}

fn record<'a>(results: &'a [SearchResult], id: &str) -> &'a ScoringRecord {
    results
        .iter()
        .find(|result| result.id == id)
        .and_then(|result| result.scoring.as_ref())
        .expect("scored result present")
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn repeated_publication_and_strategy_applies_all_penalties() {
    let results = vec![
        SearchResult::new("a", "Stagecoach opens at the Music Hall")
            .with_publication("variety")
            .with_strategy("exact_title"),
        SearchResult::new("b", "Ford western sets a fast pace downtown")
            .with_publication("variety")
            .with_strategy("exact_title"),
    ];

    let scored = base_scorer().score_all(results);

    approx(record(&scored, "a").diversity, 100.0);
    approx(record(&scored, "b").diversity, 29.75);
}

#[test]
fn single_result_gets_full_relevance() {
    let scored = base_scorer().score_all(vec![SearchResult::new("only", "text")]);
    let only = record(&scored, "only");
    approx(only.relevance, 100.0);
    assert_eq!(only.rank, 1);
}

#[test]
fn single_result_relevance_ignores_weights() {
    let weights = press_ranker::scoring::ScoringWeights {
        credibility: 0.0,
        precision: 0.0,
        diversity: 0.0,
        relevance: 1.0,
    };
    let scored = base_scorer()
        .with_weights(weights)
        .score_all(vec![SearchResult::new("only", "text")]);
    approx(record(&scored, "only").relevance, 100.0);
    approx(record(&scored, "only").composite, 100.0);
}

#[test]
fn variety_identifier_resolves_and_scores_with_its_weight() {
    let scorer = base_scorer();
    assert_eq!(scorer.resolver().resolve("variety137-1940-01_0054"), "variety");

    let scored = scorer.score_all(vec![
        SearchResult::new("variety137-1940-01_0054", "Stagecoach").with_strategy("exact_title"),
    ]);
    let variety = record(&scored, "variety137-1940-01_0054");
    assert_eq!(variety.publication, "variety");
    approx(variety.credibility, 75.0);
    approx(variety.precision, 95.0);
    approx(variety.composite, 90.0);
}

#[test]
fn unresolvable_identifier_is_neutral() {
    let scorer = base_scorer();
    assert_eq!(scorer.resolver().resolve("unknownpub123"), "unknown");

    let scored = scorer.score_all(vec![SearchResult::new("unknownpub123", "text")]);
    let unknown = record(&scored, "unknownpub123");
    assert_eq!(unknown.publication, "unknown");
    approx(unknown.credibility, 50.0);
    approx(unknown.precision, 50.0);
}

#[test]
fn keyword_bonus_is_capped_at_one_hundred() {
    let keywords = QueryKeywords {
        first: Some("Stagecoach".into()),
        second: Some("Ford".into()),
        third: Some("Wayne".into()),
    };
    let scored = base_scorer().score_all(vec![
        SearchResult::new("capped", "x")
            .with_strategy("exact_title")
            .with_keywords(keywords.clone()),
        SearchResult::new("bonus", "y")
            .with_strategy("keyword_only")
            .with_keywords(keywords),
    ]);
    approx(record(&scored, "capped").precision, 100.0);
    approx(record(&scored, "bonus").precision, 40.0);
}

#[test]
fn scoring_is_deterministic() {
    let input = vec![
        SearchResult::new("variety1-1939_0001", "Stagecoach review").with_strategy("exact_title"),
        SearchResult::new("filmdaily1-1939_0002", "Stagecoach booked").with_strategy("title_year"),
        SearchResult::new("photoplay1-1939_0003", "").with_strategy("fuzzy_title"),
    ];
    let scorer = base_scorer();
    assert_eq!(scorer.score_all(input.clone()), scorer.score_all(input));
}

#[test]
fn input_order_changes_diversity() {
    let a = SearchResult::new("a", "first excerpt")
        .with_publication("variety")
        .with_strategy("exact_title");
    let b = SearchResult::new("b", "second excerpt")
        .with_publication("variety")
        .with_strategy("exact_title");
    let scorer = base_scorer();

    let forward = scorer.score_all(vec![a.clone(), b.clone()]);
    let reverse = scorer.score_all(vec![b, a]);

    approx(record(&forward, "a").diversity, 100.0);
    approx(record(&reverse, "a").diversity, 29.75);
    approx(record(&reverse, "b").diversity, 100.0);
}

#[test]
fn diversity_decays_monotonically_to_the_floor() {
    let results: Vec<SearchResult> = (0..8)
        .map(|index| {
            SearchResult::new(format!("r{index}"), format!("distinct excerpt number {index}"))
                .with_publication("variety")
                .with_strategy("exact_title")
        })
        .collect();
    let scored = base_scorer().score_all(results);

    let diversities: Vec<f64> = (0..8)
        .map(|index| record(&scored, &format!("r{index}")).diversity)
        .collect();
    for pair in diversities.windows(2) {
        assert!(pair[1] <= pair[0], "diversity increased: {diversities:?}");
    }
    assert!(diversities.iter().all(|value| *value >= DIVERSITY_FLOOR));
    approx(diversities[7], DIVERSITY_FLOOR);
}

#[test]
fn duplicate_excerpt_is_penalised_but_blank_is_not() {
    let scored = base_scorer().score_all(vec![
        SearchResult::new("first", "Stagecoach held over second week at the Roxy")
            .with_publication("variety")
            .with_strategy("exact_title"),
        SearchResult::new("copy", "  STAGECOACH held over second week at the Roxy")
            .with_publication("film_daily")
            .with_strategy("title_year"),
        SearchResult::new("ocr-copy", "Stagecoach  held\nover   second week at the\n\nRoxy")
            .with_publication("motion_picture_daily")
            .with_strategy("title_director"),
        SearchResult::new("blank-1", "")
            .with_publication("boxoffice")
            .with_strategy("title_star"),
        SearchResult::new("blank-2", "   ")
            .with_publication("photoplay")
            .with_strategy("fuzzy_title"),
    ]);

    approx(record(&scored, "copy").diversity, 20.0);
    approx(record(&scored, "ocr-copy").diversity, 20.0);
    approx(record(&scored, "blank-1").diversity, 100.0);
    approx(record(&scored, "blank-2").diversity, 100.0);
}

#[test]
fn every_component_stays_within_bounds() {
    let results: Vec<SearchResult> = (0..25)
        .map(|index| {
            let strategy = if index % 3 == 0 { "exact_title" } else { "mystery" };
            SearchResult::new(format!("variety{index}-1940_00{index}"), "same excerpt each time")
                .with_strategy(strategy)
        })
        .collect();
    let scored = base_scorer().score_all(results);

    for result in &scored {
        let record = result.scoring.as_ref().expect("scored");
        for value in [
            record.credibility,
            record.precision,
            record.diversity,
            record.relevance,
            record.composite,
        ] {
            assert!((0.0..=100.0).contains(&value), "out of bounds: {record:?}");
        }
    }
    let ranks: Vec<usize> = scored
        .iter()
        .map(|result| result.scoring.as_ref().expect("scored").rank)
        .collect();
    assert_eq!(ranks, (1..=25).collect::<Vec<_>>());
}

#[test]
fn empty_list_yields_empty_list() {
    assert!(base_scorer().score_all(Vec::new()).is_empty());
}
