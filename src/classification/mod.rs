//! 業界紙テキストの内容種別分類。
//!
//! 重み付き正規表現ファミリーに対してテキストを照合し、一致したファミリーを
//! 信頼度ティアと静的スコアで並べ、先頭を主種別とする。
use std::fmt;

use serde::{Deserialize, Serialize};

mod analyzer;
mod families;

pub use analyzer::{AnalyzeOptions, ContentClassifier, DEFAULT_FALLBACK_MIN_WORDS, confidence_for};
pub use families::{ContentTypeFamily, DEFAULT_FAMILIES, MENTION_SCORE};

/// 内容種別のラベル。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Review,
    ProductionPhoto,
    BoxOffice,
    Interview,
    ProductionNews,
    Advertisement,
    TradeMention,
    Awards,
    /// どのファミリーにも一致しなかった長文のフォールバック。
    Mention,
}

impl ContentType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::ProductionPhoto => "production_photo",
            Self::BoxOffice => "box_office",
            Self::Interview => "interview",
            Self::ProductionNews => "production_news",
            Self::Advertisement => "advertisement",
            Self::TradeMention => "trade_mention",
            Self::Awards => "awards",
            Self::Mention => "mention",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 信頼度ティア。`High > Medium > Low` の順に比較される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一致した1ファミリー分の候補。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeMatch {
    pub content_type: ContentType,
    pub score: u32,
    pub match_count: usize,
    pub pattern_count: usize,
    pub confidence: ConfidenceTier,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,
}

/// 分類結果。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub types: Vec<ContentTypeMatch>,
    pub primary_type: Option<ContentType>,
    pub confidence: Option<ConfidenceTier>,
    pub word_count: usize,
}

impl ContentAnalysis {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[must_use]
    pub fn primary(&self) -> Option<&ContentTypeMatch> {
        self.types.first()
    }

    #[must_use]
    pub fn get(&self, content_type: ContentType) -> Option<&ContentTypeMatch> {
        self.types
            .iter()
            .find(|candidate| candidate.content_type == content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_tiers_order_high_first() {
        assert!(ConfidenceTier::High > ConfidenceTier::Medium);
        assert!(ConfidenceTier::Medium > ConfidenceTier::Low);
    }

    #[test]
    fn content_type_serializes_snake_case() {
        let json = serde_json::to_string(&ContentType::BoxOffice).expect("serializes");
        assert_eq!(json, "\"box_office\"");
        assert_eq!(ContentType::ProductionPhoto.to_string(), "production_photo");
    }
}
