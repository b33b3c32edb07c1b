//! 検索ヒットの複合スコアリング。
//!
//! 1本の映画に対する検索結果リストを、出典の信頼性・検索戦略の精度・多様性・
//! 検索エンジン上の順位から算出した複合スコアで並べ替える。
use serde::{Deserialize, Serialize};

use crate::classification::ContentAnalysis;

mod composite;
mod diversity;
mod publication;
mod strategy;

pub use composite::{CompositeScorer, PassStats, ScoredPass, ScoringWeights, positional_relevance};
pub use diversity::{
    DIVERSITY_FLOOR, DiversityAssessment, DiversityTracker, DUPLICATE_PENALTY, PAIR_PENALTY,
    PUBLICATION_DECAY, STRATEGY_DECAY,
};
pub use publication::{
    PublicationPattern, PublicationResolver, PublicationWeights, UNKNOWN_PUBLICATION,
};
pub use strategy::{DEFAULT_STRATEGY_TRUST, StrategyTrustTable, UNKNOWN_STRATEGY};

/// 検索クエリの組み立てに使ったキーワード。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryKeywords {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third: Option<String>,
}

impl QueryKeywords {
    #[must_use]
    pub fn uses_second(&self) -> bool {
        is_used(self.second.as_deref())
    }

    #[must_use]
    pub fn uses_third(&self) -> bool {
        is_used(self.third.as_deref())
    }
}

fn is_used(keyword: Option<&str>) -> bool {
    keyword.is_some_and(|value| !value.trim().is_empty())
}

/// 1件の検索ヒット。
///
/// 任意フィールドが欠けていても採点は失敗せず、既定値で処理される。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<QueryKeywords>,
    /// 解決済みの誌名。指定されていればパターン照合より優先する。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication: Option<String>,
    /// 到着順のインデックス。採点時にリスト上の位置で上書きされる。
    #[serde(default)]
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentAnalysis>,
}

impl SearchResult {
    #[must_use]
    pub fn new(id: impl Into<String>, excerpt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            excerpt: excerpt.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    #[must_use]
    pub fn with_publication(mut self, publication: impl Into<String>) -> Self {
        self.publication = Some(publication.into());
        self
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: QueryKeywords) -> Self {
        self.keywords = Some(keywords);
        self
    }

    #[must_use]
    pub fn with_full_text(mut self, text: impl Into<String>) -> Self {
        self.full_text = Some(text.into());
        self
    }

    /// 分類対象のテキスト。全文があれば全文、なければ抜粋。
    #[must_use]
    pub fn classification_text(&self) -> &str {
        match self.full_text.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => &self.excerpt,
        }
    }

    /// 採点済みなら複合スコアを返す。
    #[must_use]
    pub fn composite(&self) -> Option<f64> {
        self.scoring.as_ref().map(|record| record.composite)
    }
}

/// 1回の採点パスで付与される記録。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRecord {
    pub publication: String,
    pub credibility: f64,
    pub precision: f64,
    pub diversity: f64,
    pub relevance: f64,
    pub composite: f64,
    /// 並べ替え後の1始まりの順位。
    pub rank: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_ignore_blank_values() {
        let keywords = QueryKeywords {
            first: Some("Stagecoach".into()),
            second: Some("  ".into()),
            third: None,
        };
        assert!(!keywords.uses_second());
        assert!(!keywords.uses_third());
    }

    #[test]
    fn classification_text_prefers_full_text() {
        let result = SearchResult::new("id", "excerpt").with_full_text("full page text");
        assert_eq!(result.classification_text(), "full page text");

        let blank = SearchResult::new("id", "excerpt").with_full_text("   ");
        assert_eq!(blank.classification_text(), "excerpt");
    }

    #[test]
    fn search_result_deserializes_with_missing_fields() {
        let result: SearchResult =
            serde_json::from_str(r#"{"id": "variety137-1940-01_0054"}"#).expect("valid json");
        assert_eq!(result.excerpt, "");
        assert!(result.strategy.is_none());
        assert!(result.scoring.is_none());
    }
}
