//! 内容種別アナライザ本体。
use tracing::trace;

use crate::util::text::{context_window, normalize_whitespace, word_count};

use super::families::{ContentTypeFamily, DEFAULT_FAMILIES, MENTION_SCORE};
use super::{ConfidenceTier, ContentAnalysis, ContentType, ContentTypeMatch};

/// 未一致テキストを `mention` とみなす語数の閾値。
pub const DEFAULT_FALLBACK_MIN_WORDS: usize = 50;

const EVIDENCE_RADIUS_CHARS: usize = 60;
const MAX_EVIDENCE_PER_FAMILY: usize = 5;

/// 分類オプション。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// 一致箇所の前後を証拠スニペットとして保持するか。
    pub capture_evidence: bool,
}

impl AnalyzeOptions {
    #[must_use]
    pub fn with_evidence() -> Self {
        Self {
            capture_evidence: true,
        }
    }
}

/// 一致数とパターン数から信頼度ティアを決める。
#[must_use]
pub fn confidence_for(match_count: usize, pattern_count: usize) -> ConfidenceTier {
    let ratio = if pattern_count == 0 {
        0.0
    } else {
        match_count as f64 / pattern_count as f64
    };
    if match_count >= 3 || ratio >= 0.5 {
        ConfidenceTier::High
    } else if match_count >= 2 || ratio >= 0.3 {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// 静的なファミリー表に基づくステートレスな分類器。
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    families: Vec<ContentTypeFamily>,
    fallback_min_words: usize,
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_FAMILIES.clone(), DEFAULT_FALLBACK_MIN_WORDS)
    }
}

impl ContentClassifier {
    #[must_use]
    pub fn new(families: Vec<ContentTypeFamily>, fallback_min_words: usize) -> Self {
        Self {
            families,
            fallback_min_words,
        }
    }

    #[must_use]
    pub fn families(&self) -> &[ContentTypeFamily] {
        &self.families
    }

    /// テキストを分類する。入力は変更せず、呼び出し間で状態を持たない。
    #[must_use]
    pub fn analyze(&self, text: &str, options: AnalyzeOptions) -> ContentAnalysis {
        let normalized = normalize_whitespace(text);
        let length = normalized.chars().count();
        let words = word_count(&normalized);

        let mut candidates: Vec<ContentTypeMatch> = Vec::new();
        for family in &self.families {
            if family.min_length().is_some_and(|min| length < min) {
                continue;
            }
            if let Some(candidate) = Self::match_family(family, &normalized, options) {
                candidates.push(candidate);
            }
        }

        // 安定ソート: ティア降順、同ティア内は静的スコア降順、同点は表の順
        candidates.sort_by(|a, b| {
            b.confidence
                .cmp(&a.confidence)
                .then_with(|| b.score.cmp(&a.score))
        });

        if candidates.is_empty() && words > self.fallback_min_words {
            candidates.push(ContentTypeMatch {
                content_type: ContentType::Mention,
                score: MENTION_SCORE,
                match_count: 0,
                pattern_count: 0,
                confidence: ConfidenceTier::Low,
                evidence: Vec::new(),
            });
        }

        let primary_type = candidates.first().map(|candidate| candidate.content_type);
        let confidence = candidates.first().map(|candidate| candidate.confidence);
        trace!(
            primary = ?primary_type,
            candidates = candidates.len(),
            words,
            "content analysis completed"
        );

        ContentAnalysis {
            types: candidates,
            primary_type,
            confidence,
            word_count: words,
        }
    }

    fn match_family(
        family: &ContentTypeFamily,
        normalized: &str,
        options: AnalyzeOptions,
    ) -> Option<ContentTypeMatch> {
        let mut match_count = 0;
        let mut evidence = Vec::new();

        for pattern in family.patterns() {
            let Some(found) = pattern.find(normalized) else {
                continue;
            };
            match_count += 1;
            if options.capture_evidence && evidence.len() < MAX_EVIDENCE_PER_FAMILY {
                evidence.push(context_window(
                    normalized,
                    found.start(),
                    found.end(),
                    EVIDENCE_RADIUS_CHARS,
                ));
            }
        }

        if match_count == 0 {
            return None;
        }

        let pattern_count = family.patterns().len();
        Some(ContentTypeMatch {
            content_type: family.label(),
            score: family.score(),
            match_count,
            pattern_count,
            confidence: confidence_for(match_count, pattern_count),
            evidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn family(label: ContentType, score: u32, patterns: &[&str]) -> ContentTypeFamily {
        ContentTypeFamily::new(label, score, None, patterns).expect("valid")
    }

    #[rstest]
    #[case(3, 10, ConfidenceTier::High)]
    #[case(1, 2, ConfidenceTier::High)]
    #[case(2, 10, ConfidenceTier::Medium)]
    #[case(1, 3, ConfidenceTier::Medium)]
    #[case(1, 4, ConfidenceTier::Low)]
    #[case(1, 8, ConfidenceTier::Low)]
    #[case(0, 0, ConfidenceTier::Low)]
    fn confidence_tiers(
        #[case] matches: usize,
        #[case] patterns: usize,
        #[case] expected: ConfidenceTier,
    ) {
        assert_eq!(confidence_for(matches, patterns), expected);
    }

    #[test]
    fn tier_outranks_static_score() {
        let classifier = ContentClassifier::new(
            vec![
                family(ContentType::Review, 10, &["alpha", "zzz1", "zzz2", "zzz3", "zzz4"]),
                family(
                    ContentType::TradeMention,
                    1,
                    &["beta", "gamma", "delta", "yyy1", "yyy2", "yyy3", "yyy4"],
                ),
            ],
            DEFAULT_FALLBACK_MIN_WORDS,
        );
        let analysis = classifier.analyze("alpha beta gamma delta", AnalyzeOptions::default());
        assert_eq!(analysis.primary_type, Some(ContentType::TradeMention));
        assert_eq!(analysis.types[0].confidence, ConfidenceTier::High);
        assert_eq!(analysis.types[1].content_type, ContentType::Review);
        assert_eq!(analysis.types[1].confidence, ConfidenceTier::Low);
    }

    #[test]
    fn static_score_breaks_tier_ties() {
        let classifier = ContentClassifier::new(
            vec![
                family(ContentType::TradeMention, 3, &["alpha"]),
                family(ContentType::Awards, 7, &["alpha"]),
            ],
            DEFAULT_FALLBACK_MIN_WORDS,
        );
        let analysis = classifier.analyze("alpha", AnalyzeOptions::default());
        assert_eq!(analysis.primary_type, Some(ContentType::Awards));
    }

    #[test]
    fn min_length_gates_family() {
        let gated = ContentTypeFamily::new(ContentType::Review, 10, Some(200), &["review"])
            .expect("valid");
        let classifier = ContentClassifier::new(vec![gated], DEFAULT_FALLBACK_MIN_WORDS);
        let analysis = classifier.analyze("A short review.", AnalyzeOptions::default());
        assert!(analysis.is_empty());
        assert_eq!(analysis.primary_type, None);
        assert_eq!(analysis.confidence, None);
    }

    #[test]
    fn long_unmatched_text_falls_back_to_mention() {
        let classifier = ContentClassifier::new(
            vec![family(ContentType::Review, 10, &["nomatch"])],
            DEFAULT_FALLBACK_MIN_WORDS,
        );
        let text = "word ".repeat(60);
        let analysis = classifier.analyze(&text, AnalyzeOptions::default());
        assert_eq!(analysis.primary_type, Some(ContentType::Mention));
        assert_eq!(analysis.confidence, Some(ConfidenceTier::Low));
        assert_eq!(analysis.types.len(), 1);
        assert_eq!(analysis.types[0].score, MENTION_SCORE);
    }

    #[test]
    fn short_unmatched_text_is_empty() {
        let classifier = ContentClassifier::new(
            vec![family(ContentType::Review, 10, &["nomatch"])],
            DEFAULT_FALLBACK_MIN_WORDS,
        );
        let analysis = classifier.analyze("only a few words", AnalyzeOptions::default());
        assert!(analysis.is_empty());
        assert_eq!(analysis.word_count, 4);
    }

    #[test]
    fn evidence_is_captured_only_on_request() {
        let classifier = ContentClassifier::new(
            vec![family(ContentType::BoxOffice, 9, &[r"house record"])],
            DEFAULT_FALLBACK_MIN_WORDS,
        );
        let text = "The picture set a   house record at the Palace";

        let without = classifier.analyze(text, AnalyzeOptions::default());
        assert!(without.types[0].evidence.is_empty());

        let with = classifier.analyze(text, AnalyzeOptions::with_evidence());
        assert_eq!(with.types[0].evidence.len(), 1);
        assert!(with.types[0].evidence[0].contains("house record"));
    }

    #[test]
    fn analysis_is_stateless() {
        let classifier = ContentClassifier::default();
        let text = "Box office gross $45,000 this week, a house record";
        let first = classifier.analyze(text, AnalyzeOptions::default());
        let second = classifier.analyze(text, AnalyzeOptions::default());
        assert_eq!(first, second);
    }
}
