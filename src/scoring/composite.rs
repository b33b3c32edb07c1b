//! 複合スコアラー: 信頼性・精度・多様性・関連度を1つの重み付きスコアにまとめる。

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};
use uuid::Uuid;

use crate::util::text::excerpt_fingerprint;

use super::diversity::DiversityTracker;
use super::publication::{PublicationResolver, PublicationWeights, UNKNOWN_PUBLICATION};
use super::strategy::{StrategyTrustTable, UNKNOWN_STRATEGY};
use super::{ScoringRecord, SearchResult};

const SCORE_CEILING: f64 = 100.0;
const CREDIBILITY_SCALE: f64 = 50.0;
const KEYWORD_BONUS: f64 = 5.0;
const RELEVANCE_SPAN: f64 = 80.0;
const RELEVANCE_FLOOR: f64 = 20.0;

/// 4成分の重み。合計は慣例として 1.0 だが強制しない。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub credibility: f64,
    pub precision: f64,
    pub diversity: f64,
    pub relevance: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            credibility: 0.35,
            precision: 0.25,
            diversity: 0.25,
            relevance: 0.15,
        }
    }
}

impl ScoringWeights {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.credibility + self.precision + self.diversity + self.relevance
    }

    #[must_use]
    pub fn combine(&self, credibility: f64, precision: f64, diversity: f64, relevance: f64) -> f64 {
        self.credibility * credibility
            + self.precision * precision
            + self.diversity * diversity
            + self.relevance * relevance
    }
}

/// 1回の採点パスで集計したカウンター。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub scored: usize,
    pub unknown_publications: usize,
    pub unknown_strategies: usize,
    pub duplicate_excerpts: usize,
}

/// 並べ替え済みの結果とパス統計。
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPass {
    pub results: Vec<SearchResult>,
    pub stats: PassStats,
}

/// 位置 `index`（0始まり）の結果に与える順位由来の関連度。
///
/// 先頭100から末尾20まで線形に下がる。1件だけのリストは100。
#[must_use]
pub fn positional_relevance(index: usize, total: usize) -> f64 {
    let denominator = total.saturating_sub(1).max(1) as f64;
    (SCORE_CEILING - (index as f64 / denominator) * RELEVANCE_SPAN).max(RELEVANCE_FLOOR)
}

#[derive(Debug, Clone, Default)]
pub struct CompositeScorer {
    resolver: PublicationResolver,
    publication_weights: PublicationWeights,
    strategies: StrategyTrustTable,
    weights: ScoringWeights,
}

impl CompositeScorer {
    #[must_use]
    pub fn new(
        resolver: PublicationResolver,
        publication_weights: PublicationWeights,
        strategies: StrategyTrustTable,
        weights: ScoringWeights,
    ) -> Self {
        Self {
            resolver,
            publication_weights,
            strategies,
            weights,
        }
    }

    #[must_use]
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    #[must_use]
    pub fn resolver(&self) -> &PublicationResolver {
        &self.resolver
    }

    /// 1本の映画の結果リストを採点し、複合スコアの降順で返す。
    #[must_use]
    pub fn score_all(&self, results: Vec<SearchResult>) -> Vec<SearchResult> {
        self.score_pass(results).results
    }

    /// [`Self::score_all`] と同じ処理に加えてパス統計を返す。
    ///
    /// トラッカーはこの呼び出しの中だけで生成・破棄されるので、映画をまたいで
    /// 状態が持ち越されることはない。
    #[must_use]
    pub fn score_pass(&self, results: Vec<SearchResult>) -> ScoredPass {
        let total = results.len();
        let span = debug_span!("score_pass", pass_id = %Uuid::now_v7(), results = total);
        let _entered = span.enter();

        let mut tracker = DiversityTracker::new();
        let mut stats = PassStats::default();
        let mut scored = Vec::with_capacity(total);

        for (index, mut result) in results.into_iter().enumerate() {
            let publication = self.publication_for(&result);
            let strategy = result
                .strategy
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty());
            let strategy_key = strategy.unwrap_or(UNKNOWN_STRATEGY);
            let fingerprint = excerpt_fingerprint(&result.excerpt);

            let credibility = self.credibility(&publication);
            let precision = self.precision(strategy, &result);
            let diversity = tracker.assess(&publication, strategy_key, fingerprint);
            let relevance = positional_relevance(index, total);
            let composite =
                self.weights
                    .combine(credibility, precision, diversity.score, relevance);

            tracker.record(&publication, strategy_key, fingerprint);

            stats.scored += 1;
            if publication == UNKNOWN_PUBLICATION {
                stats.unknown_publications += 1;
            }
            if !strategy.is_some_and(|id| self.strategies.contains(id)) {
                stats.unknown_strategies += 1;
            }
            if diversity.duplicate_excerpt {
                stats.duplicate_excerpts += 1;
            }

            result.position = index;
            result.scoring = Some(ScoringRecord {
                publication,
                credibility,
                precision,
                diversity: diversity.score,
                relevance,
                composite,
                rank: 0,
            });
            scored.push(result);
        }

        // Vec::sort_by は安定ソートなので同点は元の順序を保つ
        scored.sort_by(|a, b| {
            b.composite()
                .partial_cmp(&a.composite())
                .unwrap_or(Ordering::Equal)
        });
        for (rank, result) in scored.iter_mut().enumerate() {
            if let Some(record) = result.scoring.as_mut() {
                record.rank = rank + 1;
            }
        }

        debug!(
            scored = stats.scored,
            unknown_publications = stats.unknown_publications,
            unknown_strategies = stats.unknown_strategies,
            duplicate_excerpts = stats.duplicate_excerpts,
            "scoring pass completed"
        );

        ScoredPass {
            results: scored,
            stats,
        }
    }

    fn publication_for(&self, result: &SearchResult) -> String {
        match result.publication.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.resolver.resolve(&result.id).to_string(),
        }
    }

    fn credibility(&self, publication: &str) -> f64 {
        (self.publication_weights.weight(publication) * CREDIBILITY_SCALE).clamp(0.0, SCORE_CEILING)
    }

    fn precision(&self, strategy: Option<&str>, result: &SearchResult) -> f64 {
        let mut bonus = 0.0;
        if let Some(keywords) = result.keywords.as_ref() {
            if keywords.uses_second() {
                bonus += KEYWORD_BONUS;
            }
            if keywords.uses_third() {
                bonus += KEYWORD_BONUS;
            }
        }
        (self.strategies.trust(strategy) * SCORE_CEILING + bonus).min(SCORE_CEILING)
    }
}
