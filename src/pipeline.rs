//! 映画単位のランキングパイプライン。
//!
//! 1本の映画につき1回の採点パスを実行し、必要なら各結果の本文を分類して
//! 結果に添付する。独立した映画のバッチは rayon で並列に処理する。
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

use crate::classification::{AnalyzeOptions, ContentAnalysis, ContentClassifier, ContentType};
use crate::observability::metrics::Metrics;
use crate::scoring::{CompositeScorer, PassStats, SearchResult};

/// 1本の映画に対するランキング要求。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilmRequest {
    pub film_id: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    /// 未指定ならサービス既定値に従う。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classify: Option<bool>,
    #[serde(default)]
    pub capture_evidence: bool,
}

impl FilmRequest {
    #[must_use]
    pub fn new(film_id: impl Into<String>, results: Vec<SearchResult>) -> Self {
        Self {
            film_id: film_id.into(),
            results,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_classification(mut self, capture_evidence: bool) -> Self {
        self.classify = Some(true);
        self.capture_evidence = capture_evidence;
        self
    }
}

/// 1本の映画に対するランキングパスの要約。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassSummary {
    pub total: usize,
    pub distinct_publications: usize,
    pub unknown_publications: usize,
    pub duplicate_excerpts: usize,
    /// primary content type -> 件数。分類しなかった場合は空。
    #[serde(default)]
    pub content_types: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFilm {
    pub film_id: String,
    pub results: Vec<SearchResult>,
    pub summary: PassSummary,
}

/// 採点器と分類器を束ねるランキング実行器。
#[derive(Debug, Clone)]
pub struct FilmRanker {
    scorer: CompositeScorer,
    classifier: ContentClassifier,
    metrics: Arc<Metrics>,
    classify_by_default: bool,
}

impl FilmRanker {
    #[must_use]
    pub fn new(
        scorer: CompositeScorer,
        classifier: ContentClassifier,
        metrics: Arc<Metrics>,
        classify_by_default: bool,
    ) -> Self {
        Self {
            scorer,
            classifier,
            metrics,
            classify_by_default,
        }
    }

    #[must_use]
    pub fn scorer(&self) -> &CompositeScorer {
        &self.scorer
    }

    #[must_use]
    pub fn classifier(&self) -> &ContentClassifier {
        &self.classifier
    }

    /// 1本の映画をランキングする。
    #[must_use]
    pub fn rank(&self, request: FilmRequest) -> RankedFilm {
        let started = Instant::now();
        let span = info_span!(
            "rank_film",
            film_id = %request.film_id,
            results = request.results.len()
        );
        let _entered = span.enter();

        let classify = request.classify.unwrap_or(self.classify_by_default);
        let options = AnalyzeOptions {
            capture_evidence: request.capture_evidence,
        };

        let pass = self.scorer.score_pass(request.results);
        self.record_pass(&pass.stats);
        if pass.stats.unknown_strategies > 0 {
            warn!(
                film_id = %request.film_id,
                unknown_strategies = pass.stats.unknown_strategies,
                "results with missing or unrecognised strategies scored at default trust"
            );
        }

        let mut results = pass.results;
        if classify {
            for result in &mut results {
                let analysis = self.classify(result.classification_text(), options);
                result.content = Some(analysis);
            }
        }

        let summary = summarize(&results, &pass.stats);
        self.metrics.films_ranked.inc();
        self.metrics
            .rank_duration
            .observe(started.elapsed().as_secs_f64());
        debug!(
            total = summary.total,
            distinct_publications = summary.distinct_publications,
            classified = classify,
            "film ranked"
        );

        RankedFilm {
            film_id: request.film_id,
            results,
            summary,
        }
    }

    /// 独立した映画を並列にランキングする。出力順は入力順と同じ。
    #[must_use]
    pub fn rank_batch(&self, requests: Vec<FilmRequest>) -> Vec<RankedFilm> {
        let started = Instant::now();
        self.metrics.active_batches.inc();
        let ranked: Vec<RankedFilm> = requests
            .into_par_iter()
            .map(|request| self.rank(request))
            .collect();
        self.metrics.active_batches.dec();
        self.metrics
            .batch_duration
            .observe(started.elapsed().as_secs_f64());
        ranked
    }

    /// 任意テキストを分類する。
    #[must_use]
    pub fn classify(&self, text: &str, options: AnalyzeOptions) -> ContentAnalysis {
        let started = Instant::now();
        let analysis = self.classifier.analyze(text, options);
        self.metrics.texts_classified.inc();
        if analysis.is_empty() {
            self.metrics.unclassified_texts.inc();
        } else if analysis.primary_type == Some(ContentType::Mention) {
            self.metrics.fallback_mentions.inc();
        }
        self.metrics
            .classify_duration
            .observe(started.elapsed().as_secs_f64());
        analysis
    }

    fn record_pass(&self, stats: &PassStats) {
        self.metrics.results_scored.inc_by(stats.scored as f64);
        self.metrics
            .unknown_publications
            .inc_by(stats.unknown_publications as f64);
        self.metrics
            .unknown_strategies
            .inc_by(stats.unknown_strategies as f64);
        self.metrics
            .duplicate_excerpts
            .inc_by(stats.duplicate_excerpts as f64);
    }
}

fn summarize(results: &[SearchResult], stats: &PassStats) -> PassSummary {
    let distinct_publications = results
        .iter()
        .filter_map(|result| result.scoring.as_ref())
        .map(|record| record.publication.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let mut content_types = BTreeMap::new();
    for analysis in results.iter().filter_map(|result| result.content.as_ref()) {
        if let Some(primary) = analysis.primary_type {
            *content_types.entry(primary.as_str().to_string()).or_insert(0) += 1;
        }
    }

    PassSummary {
        total: results.len(),
        distinct_publications,
        unknown_publications: stats.unknown_publications,
        duplicate_excerpts: stats.duplicate_excerpts,
        content_types,
    }
}
