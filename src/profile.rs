//! 採点プロファイル: YAMLから読み込む名前付きの静的な重み表。
//!
//! プロファイルは誌ごとの重み、順序付きの誌名パターン表、戦略の信頼係数、
//! 採点重みの上書きを持つ。省略したセクションは組み込みの `base` プロファイルを引き継ぐ。
//! 不正なパターンや重みは読み込み時に拒否するので、採点中に失敗することはない。
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::scoring::{
    CompositeScorer, PublicationPattern, PublicationResolver, PublicationWeights,
    ScoringWeights, StrategyTrustTable,
};

/// 他のすべてのプロファイルが引き継ぐ基底プロファイル名。
pub const BASE_PROFILE: &str = "base";

const BUILTIN_PROFILES: &[(&str, &str)] = &[
    (BASE_PROFILE, include_str!("../resources/profiles/base.yaml")),
    (
        "exhibitor",
        include_str!("../resources/profiles/exhibitor.yaml"),
    ),
];

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
struct ProfileFile {
    name: Option<String>,
    publication_weights: Option<HashMap<String, f64>>,
    publication_patterns: Option<Vec<PatternEntry>>,
    strategy_weights: Option<HashMap<String, f64>>,
    scoring_weights: Option<ScoringWeightsFile>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct PatternEntry {
    name: String,
    pattern: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct ScoringWeightsFile {
    credibility: Option<f64>,
    precision: Option<f64>,
    diversity: Option<f64>,
    relevance: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to read profile at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse profile {origin}: {source}")]
    Deserialize {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid pattern for publication {publication}: {source}")]
    InvalidPattern {
        publication: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid {table} weight for {key}: {value}")]
    InvalidWeight {
        table: &'static str,
        key: String,
        value: f64,
    },
    #[error("unknown built-in profile: {0}")]
    UnknownBuiltin(String),
}

/// コンパイル済みのプロファイル。ここから [`CompositeScorer`] を組み立てる。
#[derive(Debug, Clone)]
pub struct Profile {
    name: String,
    resolver: PublicationResolver,
    publication_weights: PublicationWeights,
    strategies: StrategyTrustTable,
    scoring_weights: ScoringWeights,
}

/// 制御プレーン向けのプロファイル要約。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfileSummary {
    pub name: String,
    pub publication_patterns: Vec<PatternSummary>,
    pub publication_weights: Vec<(String, f64)>,
    pub strategy_weights: Vec<(String, f64)>,
    pub scoring_weights: ScoringWeights,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PatternSummary {
    pub name: String,
    pub pattern: String,
}

impl Profile {
    /// バイナリに組み込まれたプロファイル名。
    #[must_use]
    pub fn builtin_names() -> Vec<&'static str> {
        BUILTIN_PROFILES.iter().map(|(name, _)| *name).collect()
    }

    /// 組み込みプロファイルを名前で読み込む。
    ///
    /// # Errors
    /// 未知の名前なら [`ProfileError::UnknownBuiltin`]、埋め込みYAMLが壊れていれば
    /// パース／検証エラーを返す。
    pub fn builtin(name: &str) -> Result<Self, ProfileError> {
        let base = Self::compile(parse_file(BASE_PROFILE, builtin_source(BASE_PROFILE)?)?, None)?;
        if name == BASE_PROFILE {
            return Ok(base);
        }
        let source = builtin_source(name)?;
        Self::compile(parse_file(name, source)?, Some(&base))
    }

    /// YAMLファイルからプロファイルを読み込む。省略セクションは `base` を使う。
    ///
    /// # Errors
    /// ファイルの読み込み・パース・検証に失敗した場合はエラーを返す。
    pub fn load_from_path(path: &Path) -> Result<Self, ProfileError> {
        let contents = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_yaml_str(&path.display().to_string(), &contents)?;
        info!(
            profile = %profile.name,
            path = %path.display(),
            patterns = profile.resolver.patterns().len(),
            "loaded scoring profile from file"
        );
        Ok(profile)
    }

    /// YAML文字列からプロファイルを組み立てる。省略セクションは `base` を使う。
    ///
    /// # Errors
    /// YAMLのパースまたは検証に失敗した場合はエラーを返す。
    pub fn from_yaml_str(origin: &str, contents: &str) -> Result<Self, ProfileError> {
        let base = Self::builtin(BASE_PROFILE)?;
        Self::compile(parse_file(origin, contents)?, Some(&base))
    }

    fn compile(file: ProfileFile, fallback: Option<&Profile>) -> Result<Self, ProfileError> {
        let name = file
            .name
            .unwrap_or_else(|| fallback.map_or_else(|| BASE_PROFILE.to_string(), |p| p.name.clone()));

        let resolver = match file.publication_patterns {
            Some(entries) => PublicationResolver::new(
                entries
                    .into_iter()
                    .map(|entry| {
                        PublicationPattern::new(entry.name.clone(), &entry.pattern).map_err(
                            |source| ProfileError::InvalidPattern {
                                publication: entry.name,
                                source,
                            },
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => fallback.map(|p| p.resolver.clone()).unwrap_or_default(),
        };

        let mut publication_weights: HashMap<String, f64> = fallback
            .map(|p| {
                p.publication_weights
                    .iter()
                    .map(|(name, weight)| (name.to_string(), weight))
                    .collect()
            })
            .unwrap_or_default();
        if let Some(overrides) = file.publication_weights {
            for (key, value) in &overrides {
                validate_non_negative("publication", key, *value)?;
            }
            publication_weights.extend(overrides);
        }

        let mut strategies = fallback.map(|p| p.strategies.clone()).unwrap_or_default();
        if let Some(overrides) = file.strategy_weights {
            for (key, value) in &overrides {
                if !value.is_finite() || !(0.0..=1.0).contains(value) {
                    return Err(ProfileError::InvalidWeight {
                        table: "strategy",
                        key: key.clone(),
                        value: *value,
                    });
                }
            }
            strategies = strategies.merged_with(&overrides);
        }

        let mut scoring_weights = fallback.map_or_else(ScoringWeights::default, |p| p.scoring_weights);
        if let Some(overrides) = file.scoring_weights {
            scoring_weights = apply_scoring_overrides(scoring_weights, overrides)?;
        }

        Ok(Self {
            name,
            resolver,
            publication_weights: PublicationWeights::new(publication_weights),
            strategies,
            scoring_weights,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn resolver(&self) -> &PublicationResolver {
        &self.resolver
    }

    #[must_use]
    pub fn publication_weights(&self) -> &PublicationWeights {
        &self.publication_weights
    }

    #[must_use]
    pub fn strategies(&self) -> &StrategyTrustTable {
        &self.strategies
    }

    #[must_use]
    pub fn scoring_weights(&self) -> ScoringWeights {
        self.scoring_weights
    }

    /// 採点重みを差し替える（環境変数による上書きなど）。
    #[must_use]
    pub fn with_scoring_weights(mut self, weights: ScoringWeights) -> Self {
        self.scoring_weights = weights;
        self
    }

    #[must_use]
    pub fn scorer(&self) -> CompositeScorer {
        CompositeScorer::new(
            self.resolver.clone(),
            self.publication_weights.clone(),
            self.strategies.clone(),
            self.scoring_weights,
        )
    }

    #[must_use]
    pub fn summary(&self) -> ProfileSummary {
        let mut publication_weights: Vec<(String, f64)> = self
            .publication_weights
            .iter()
            .map(|(name, weight)| (name.to_string(), weight))
            .collect();
        publication_weights.sort_by(|a, b| a.0.cmp(&b.0));
        let mut strategy_weights: Vec<(String, f64)> = self
            .strategies
            .iter()
            .map(|(name, trust)| (name.to_string(), trust))
            .collect();
        strategy_weights.sort_by(|a, b| a.0.cmp(&b.0));

        ProfileSummary {
            name: self.name.clone(),
            publication_patterns: self
                .resolver
                .patterns()
                .iter()
                .map(|pattern| PatternSummary {
                    name: pattern.name().to_string(),
                    pattern: pattern.pattern().to_string(),
                })
                .collect(),
            publication_weights,
            strategy_weights,
            scoring_weights: self.scoring_weights,
        }
    }
}

fn builtin_source(name: &str) -> Result<&'static str, ProfileError> {
    BUILTIN_PROFILES
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, source)| *source)
        .ok_or_else(|| ProfileError::UnknownBuiltin(name.to_string()))
}

fn parse_file(origin: &str, contents: &str) -> Result<ProfileFile, ProfileError> {
    serde_yaml::from_str(contents).map_err(|source| ProfileError::Deserialize {
        origin: origin.to_string(),
        source,
    })
}

fn validate_non_negative(table: &'static str, key: &str, value: f64) -> Result<(), ProfileError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProfileError::InvalidWeight {
            table,
            key: key.to_string(),
            value,
        })
    }
}

fn apply_scoring_overrides(
    mut weights: ScoringWeights,
    overrides: ScoringWeightsFile,
) -> Result<ScoringWeights, ProfileError> {
    let fields = [
        ("credibility", overrides.credibility, &mut weights.credibility),
        ("precision", overrides.precision, &mut weights.precision),
        ("diversity", overrides.diversity, &mut weights.diversity),
        ("relevance", overrides.relevance, &mut weights.relevance),
    ];
    for (key, value, slot) in fields {
        if let Some(value) = value {
            validate_non_negative("scoring", key, value)?;
            *slot = value;
        }
    }
    Ok(weights)
}
