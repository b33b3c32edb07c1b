/// Prometheusメトリクス定義。
use prometheus::{
    Counter, Gauge, Histogram, Registry, register_counter_with_registry,
    register_gauge_with_registry, register_histogram_with_registry,
};
use std::sync::Arc;

/// メトリクスコレクター。
#[derive(Debug, Clone)]
pub struct Metrics {
    // カウンター
    pub films_ranked: Counter,
    pub results_scored: Counter,
    pub unknown_publications: Counter,
    pub unknown_strategies: Counter,
    pub duplicate_excerpts: Counter,
    pub texts_classified: Counter,
    pub fallback_mentions: Counter,
    pub unclassified_texts: Counter,
    pub rejected_requests: Counter,

    // ヒストグラム
    pub rank_duration: Histogram,
    pub classify_duration: Histogram,
    pub batch_duration: Histogram,

    // ゲージ
    pub active_batches: Gauge,
}

impl Metrics {
    /// 新しいメトリクスコレクターを作成する。
    ///
    /// # Errors
    /// 同名のメトリクスが既にレジストリに登録されている場合はエラーを返す。
    pub fn new(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        Ok(Self {
            films_ranked: register_counter_with_registry!(
                "press_ranker_films_ranked_total",
                "Total number of film result lists ranked",
                registry
            )?,
            results_scored: register_counter_with_registry!(
                "press_ranker_results_scored_total",
                "Total number of search results scored",
                registry
            )?,
            unknown_publications: register_counter_with_registry!(
                "press_ranker_unknown_publications_total",
                "Results whose publication could not be resolved",
                registry
            )?,
            unknown_strategies: register_counter_with_registry!(
                "press_ranker_unknown_strategies_total",
                "Results with a missing or unrecognised search strategy",
                registry
            )?,
            duplicate_excerpts: register_counter_with_registry!(
                "press_ranker_duplicate_excerpts_total",
                "Results penalised as near-duplicate excerpts",
                registry
            )?,
            texts_classified: register_counter_with_registry!(
                "press_ranker_texts_classified_total",
                "Total number of texts run through the content-type classifier",
                registry
            )?,
            fallback_mentions: register_counter_with_registry!(
                "press_ranker_fallback_mentions_total",
                "Texts that matched no family and fell back to mention",
                registry
            )?,
            unclassified_texts: register_counter_with_registry!(
                "press_ranker_unclassified_texts_total",
                "Short texts that matched no family",
                registry
            )?,
            rejected_requests: register_counter_with_registry!(
                "press_ranker_rejected_requests_total",
                "API requests rejected by validation",
                registry
            )?,
            rank_duration: register_histogram_with_registry!(
                "press_ranker_rank_duration_seconds",
                "Duration of ranking one film's result list",
                registry
            )?,
            classify_duration: register_histogram_with_registry!(
                "press_ranker_classify_duration_seconds",
                "Duration of classifying one text",
                registry
            )?,
            batch_duration: register_histogram_with_registry!(
                "press_ranker_batch_duration_seconds",
                "Duration of ranking a batch of films",
                registry
            )?,
            active_batches: register_gauge_with_registry!(
                "press_ranker_active_batches",
                "Number of batches currently being ranked",
                registry
            )?,
        })
    }

    /// テスト・ベンチ用に専用レジストリへ登録したコレクターを作る。
    ///
    /// # Errors
    /// 登録に失敗した場合はエラーを返す。
    pub fn isolated() -> Result<Self, prometheus::Error> {
        Self::new(Arc::new(Registry::new()))
    }
}
