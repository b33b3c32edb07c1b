//! 資料IDから誌名を解決し、誌ごとの信頼性倍率を引く。
use std::collections::HashMap;

use regex::Regex;

/// どのパターンにも一致しなかった場合の誌名。
pub const UNKNOWN_PUBLICATION: &str = "unknown";

const NEUTRAL_WEIGHT: f64 = 1.0;

/// 誌名と、小文字化したIDに対して照合する正規表現の組。
#[derive(Debug, Clone)]
pub struct PublicationPattern {
    name: String,
    regex: Regex,
}

impl PublicationPattern {
    /// # Errors
    /// 正規表現のコンパイルに失敗した場合は [`regex::Error`] を返す。
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            regex: Regex::new(pattern)?,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// 順序付きパターン表による誌名リゾルバ。先に一致したものが勝つ。
#[derive(Debug, Clone, Default)]
pub struct PublicationResolver {
    patterns: Vec<PublicationPattern>,
}

impl PublicationResolver {
    #[must_use]
    pub fn new(patterns: Vec<PublicationPattern>) -> Self {
        Self { patterns }
    }

    /// IDを小文字化し、表の順にパターンを試して最初に一致した誌名を返す。
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> &str {
        let lowered = identifier.to_lowercase();
        self.patterns
            .iter()
            .find(|pattern| pattern.regex.is_match(&lowered))
            .map_or(UNKNOWN_PUBLICATION, |pattern| pattern.name.as_str())
    }

    #[must_use]
    pub fn patterns(&self) -> &[PublicationPattern] {
        &self.patterns
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// 誌名ごとの信頼性倍率。未登録の誌は 1.0。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicationWeights {
    weights: HashMap<String, f64>,
}

impl PublicationWeights {
    #[must_use]
    pub fn new(weights: HashMap<String, f64>) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weight(&self, publication: &str) -> f64 {
        self.weights
            .get(publication)
            .copied()
            .unwrap_or(NEUTRAL_WEIGHT)
    }

    #[must_use]
    pub fn contains(&self, publication: &str) -> bool {
        self.weights.contains_key(publication)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(name, weight)| (name.as_str(), *weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(pairs: &[(&str, &str)]) -> PublicationResolver {
        PublicationResolver::new(
            pairs
                .iter()
                .map(|(name, pattern)| PublicationPattern::new(*name, pattern).expect("valid"))
                .collect(),
        )
    }

    #[test]
    fn resolve_lowercases_identifier() {
        let resolver = resolver(&[("variety", "^variety")]);
        assert_eq!(resolver.resolve("Variety137-1940-01_0054"), "variety");
    }

    #[test]
    fn resolve_first_match_wins() {
        let resolver = resolver(&[
            ("motion_picture_daily", "motionpicturedai"),
            ("motion_picture", "motionpicture"),
        ]);
        assert_eq!(
            resolver.resolve("motionpicturedai40quig"),
            "motion_picture_daily"
        );

        let reversed = PublicationResolver::new(resolver.patterns().iter().rev().cloned().collect());
        assert_eq!(reversed.resolve("motionpicturedai40quig"), "motion_picture");
    }

    #[test]
    fn resolve_falls_back_to_unknown() {
        let resolver = resolver(&[("variety", "^variety")]);
        assert_eq!(resolver.resolve("unknownpub123"), UNKNOWN_PUBLICATION);
        assert_eq!(PublicationResolver::default().resolve("variety"), UNKNOWN_PUBLICATION);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(PublicationPattern::new("broken", "(unclosed").is_err());
    }

    #[test]
    fn weights_default_to_neutral() {
        let weights = PublicationWeights::new(HashMap::from([("variety".to_string(), 1.5)]));
        assert!((weights.weight("variety") - 1.5).abs() < f64::EPSILON);
        assert!((weights.weight("unknown") - 1.0).abs() < f64::EPSILON);
    }
}
