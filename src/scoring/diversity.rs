//! 1回の採点パス内での多様性トラッカー。
//!
//! 同じ誌・同じ戦略・同じ組み合わせ・近似重複の抜粋が続くほど多様性スコアを下げる。
//! 状態は走査順に依存するため、同じ集合でも順序が違えば結果が変わる。
use rustc_hash::{FxHashMap, FxHashSet};

/// 同じ誌を既に見た回数ごとの減衰率。
pub const PUBLICATION_DECAY: f64 = 0.7;
/// 同じ戦略を既に見た回数ごとの減衰率。
pub const STRATEGY_DECAY: f64 = 0.85;
/// 同じ (誌, 戦略) の組を既に見た場合の係数。
pub const PAIR_PENALTY: f64 = 0.5;
/// 抜粋フィンガープリントが重複した場合の係数。
pub const DUPLICATE_PENALTY: f64 = 0.2;
/// 多様性スコアの下限。ランキングから完全に消えないようにする。
pub const DIVERSITY_FLOOR: f64 = 10.0;

const DIVERSITY_START: f64 = 100.0;

/// 1件分の多様性評価。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiversityAssessment {
    pub score: f64,
    pub publication_repeats: u32,
    pub strategy_repeats: u32,
    pub pair_seen: bool,
    pub duplicate_excerpt: bool,
}

#[derive(Debug, Default)]
pub struct DiversityTracker {
    publications: FxHashMap<String, u32>,
    strategies: FxHashMap<String, u32>,
    pairs: FxHashMap<(String, String), u32>,
    fingerprints: FxHashSet<u64>,
}

impl DiversityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在の状態から多様性スコアを計算する。状態は変更しない。
    #[must_use]
    pub fn assess(
        &self,
        publication: &str,
        strategy: &str,
        fingerprint: Option<u64>,
    ) -> DiversityAssessment {
        let publication_repeats = self.publication_count(publication);
        let strategy_repeats = self.strategy_count(strategy);
        let pair_seen = self.pair_count(publication, strategy) > 0;
        let duplicate_excerpt = fingerprint.is_some_and(|key| self.fingerprints.contains(&key));

        let mut score = DIVERSITY_START;
        score *= PUBLICATION_DECAY.powf(f64::from(publication_repeats));
        score *= STRATEGY_DECAY.powf(f64::from(strategy_repeats));
        if pair_seen {
            score *= PAIR_PENALTY;
        }
        if duplicate_excerpt {
            score *= DUPLICATE_PENALTY;
        }

        DiversityAssessment {
            score: score.max(DIVERSITY_FLOOR),
            publication_repeats,
            strategy_repeats,
            pair_seen,
            duplicate_excerpt,
        }
    }

    /// 採点後に1件分の出現を記録する。
    ///
    /// 誌、戦略、組み合わせ、フィンガープリントの順に更新する。
    pub fn record(&mut self, publication: &str, strategy: &str, fingerprint: Option<u64>) {
        *self
            .publications
            .entry(publication.to_string())
            .or_insert(0) += 1;
        *self.strategies.entry(strategy.to_string()).or_insert(0) += 1;
        *self
            .pairs
            .entry((publication.to_string(), strategy.to_string()))
            .or_insert(0) += 1;
        if let Some(key) = fingerprint {
            self.fingerprints.insert(key);
        }
    }

    #[must_use]
    pub fn publication_count(&self, publication: &str) -> u32 {
        self.publications.get(publication).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn strategy_count(&self, strategy: &str) -> u32 {
        self.strategies.get(strategy).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn pair_count(&self, publication: &str, strategy: &str) -> u32 {
        self.pairs
            .get(&(publication.to_string(), strategy.to_string()))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn fingerprint_count(&self) -> usize {
        self.fingerprints.len()
    }
}
