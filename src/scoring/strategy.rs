//! 検索戦略ごとの信頼係数。
use std::collections::HashMap;

/// 未登録の戦略に与える信頼係数。
pub const DEFAULT_STRATEGY_TRUST: f64 = 0.5;

/// 戦略IDが欠けている結果を数えるときのキー。
pub const UNKNOWN_STRATEGY: &str = "unknown";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyTrustTable {
    trust: HashMap<String, f64>,
}

impl StrategyTrustTable {
    #[must_use]
    pub fn new(trust: HashMap<String, f64>) -> Self {
        Self { trust }
    }

    /// 戦略の信頼係数を [0, 1] で返す。未登録・未指定なら 0.5。
    #[must_use]
    pub fn trust(&self, strategy: Option<&str>) -> f64 {
        strategy
            .and_then(|id| self.trust.get(id))
            .copied()
            .unwrap_or(DEFAULT_STRATEGY_TRUST)
            .clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn contains(&self, strategy: &str) -> bool {
        self.trust.contains_key(strategy)
    }

    /// 既存の表に上書きを重ねた新しい表を返す。
    #[must_use]
    pub fn merged_with(&self, overrides: &HashMap<String, f64>) -> Self {
        let mut trust = self.trust.clone();
        trust.extend(overrides.iter().map(|(key, value)| (key.clone(), *value)));
        Self { trust }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trust.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trust.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.trust.iter().map(|(name, trust)| (name.as_str(), *trust))
    }
}
