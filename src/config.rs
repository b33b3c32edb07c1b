use std::{env, net::SocketAddr, num::NonZeroUsize, path::PathBuf};

use thiserror::Error;

use crate::classification::DEFAULT_FALLBACK_MIN_WORDS;
use crate::profile::BASE_PROFILE;
use crate::scoring::ScoringWeights;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    http_bind: SocketAddr,
    profile_name: String,
    profile_path: Option<PathBuf>,
    classify_by_default: bool,
    max_batch_films: NonZeroUsize,
    fallback_min_words: usize,
    weight_credibility: Option<f64>,
    weight_precision: Option<f64>,
    weight_diversity: Option<f64>,
    weight_relevance: Option<f64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// 環境変数からランカーの設定値を読み込み、検証する。
    ///
    /// すべての値に既定値があるため、未設定でも起動できる。
    ///
    /// # Errors
    /// 数値／アドレス／真偽値のパースに失敗した場合は [`ConfigError`] を返す。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_bind = parse_socket_addr("PRESS_RANKER_HTTP_BIND", "0.0.0.0:9015")?;
        let profile_name =
            env::var("PRESS_RANKER_PROFILE").unwrap_or_else(|_| BASE_PROFILE.to_string());
        let profile_path = match env::var("PRESS_RANKER_PROFILE_PATH") {
            Ok(raw) if !raw.trim().is_empty() => Some(PathBuf::from(raw)),
            _ => None,
        };
        let classify_by_default = parse_bool("PRESS_RANKER_CLASSIFY_BY_DEFAULT", false)?;
        let max_batch_films = parse_non_zero_usize("PRESS_RANKER_MAX_BATCH_FILMS", 64)?;
        let fallback_min_words =
            parse_usize("PRESS_RANKER_FALLBACK_MIN_WORDS", DEFAULT_FALLBACK_MIN_WORDS)?;

        // Scoring weight overrides (unset = keep profile value)
        let weight_credibility = parse_optional_weight("PRESS_RANKER_WEIGHT_CREDIBILITY")?;
        let weight_precision = parse_optional_weight("PRESS_RANKER_WEIGHT_PRECISION")?;
        let weight_diversity = parse_optional_weight("PRESS_RANKER_WEIGHT_DIVERSITY")?;
        let weight_relevance = parse_optional_weight("PRESS_RANKER_WEIGHT_RELEVANCE")?;

        Ok(Self {
            http_bind,
            profile_name,
            profile_path,
            classify_by_default,
            max_batch_films,
            fallback_min_words,
            weight_credibility,
            weight_precision,
            weight_diversity,
            weight_relevance,
        })
    }

    #[must_use]
    pub fn http_bind(&self) -> SocketAddr {
        self.http_bind
    }

    #[must_use]
    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    #[must_use]
    pub fn profile_path(&self) -> Option<&PathBuf> {
        self.profile_path.as_ref()
    }

    #[must_use]
    pub fn classify_by_default(&self) -> bool {
        self.classify_by_default
    }

    #[must_use]
    pub fn max_batch_films(&self) -> NonZeroUsize {
        self.max_batch_films
    }

    #[must_use]
    pub fn fallback_min_words(&self) -> usize {
        self.fallback_min_words
    }

    /// 環境変数で指定された重みだけをプロファイルの重みに上書きする。
    #[must_use]
    pub fn apply_weight_overrides(&self, weights: ScoringWeights) -> ScoringWeights {
        ScoringWeights {
            credibility: self.weight_credibility.unwrap_or(weights.credibility),
            precision: self.weight_precision.unwrap_or(weights.precision),
            diversity: self.weight_diversity.unwrap_or(weights.diversity),
            relevance: self.weight_relevance.unwrap_or(weights.relevance),
        }
    }

    #[must_use]
    pub fn has_weight_overrides(&self) -> bool {
        self.weight_credibility.is_some()
            || self.weight_precision.is_some()
            || self.weight_diversity.is_some()
            || self.weight_relevance.is_some()
    }
}

fn parse_socket_addr(name: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<SocketAddr>()
        .map_err(|error| ConfigError::Invalid {
            name,
            source: anyhow::Error::new(error),
        })
}

fn parse_non_zero_usize(name: &'static str, default: usize) -> Result<NonZeroUsize, ConfigError> {
    let value = parse_usize(name, default)?;
    NonZeroUsize::new(value).ok_or_else(|| ConfigError::Invalid {
        name,
        source: anyhow::anyhow!("must be greater than zero"),
    })
}

fn parse_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_optional_weight(name: &'static str) -> Result<Option<f64>, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let value = raw.trim().parse::<f64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("weight must be a non-negative number"),
        });
    }
    Ok(Some(value))
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("expected a boolean, got {raw}"),
        }),
    }
}
