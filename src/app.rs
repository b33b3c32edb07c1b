use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    api,
    classification::{ContentClassifier, DEFAULT_FAMILIES},
    config::Config,
    observability::Telemetry,
    pipeline::FilmRanker,
    profile::Profile,
};

#[derive(Clone)]
pub(crate) struct AppState {
    registry: Arc<ComponentRegistry>,
}

pub struct ComponentRegistry {
    config: Arc<Config>,
    telemetry: Telemetry,
    profile: Arc<Profile>,
    ranker: Arc<FilmRanker>,
}

impl AppState {
    pub(crate) fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub(crate) fn telemetry(&self) -> &Telemetry {
        &self.registry.telemetry
    }

    pub(crate) fn config(&self) -> &Config {
        &self.registry.config
    }

    pub(crate) fn profile(&self) -> &Profile {
        &self.registry.profile
    }

    pub(crate) fn ranker(&self) -> Arc<FilmRanker> {
        Arc::clone(&self.registry.ranker)
    }
}

impl ComponentRegistry {
    /// 構成情報からプロファイル・採点器・分類器を組み立て、共有レジストリを構築する。
    ///
    /// # Errors
    /// プロファイルの読み込み・検証や Telemetry の初期化に失敗した場合はエラーを返す。
    pub fn build(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let telemetry = Telemetry::new()?;

        let profile = match config.profile_path() {
            Some(path) => Profile::load_from_path(path)
                .with_context(|| format!("failed to load profile from {}", path.display()))?,
            None => Profile::builtin(config.profile_name()).with_context(|| {
                format!("failed to load built-in profile {}", config.profile_name())
            })?,
        };
        let profile = if config.has_weight_overrides() {
            let weights = config.apply_weight_overrides(profile.scoring_weights());
            info!(
                credibility = weights.credibility,
                precision = weights.precision,
                diversity = weights.diversity,
                relevance = weights.relevance,
                "scoring weights overridden from environment"
            );
            profile.with_scoring_weights(weights)
        } else {
            profile
        };

        let classifier =
            ContentClassifier::new(DEFAULT_FAMILIES.clone(), config.fallback_min_words());
        let ranker = Arc::new(FilmRanker::new(
            profile.scorer(),
            classifier,
            telemetry.metrics_arc(),
            config.classify_by_default(),
        ));

        info!(
            profile = profile.name(),
            publication_patterns = profile.resolver().patterns().len(),
            classify_by_default = config.classify_by_default(),
            "component registry built"
        );

        Ok(Self {
            config,
            telemetry,
            profile: Arc::new(profile),
            ranker,
        })
    }

    #[must_use]
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    #[must_use]
    pub fn ranker(&self) -> Arc<FilmRanker> {
        Arc::clone(&self.ranker)
    }
}

pub fn build_router(registry: ComponentRegistry) -> Router {
    let state = AppState::new(registry);
    api::router(state).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_VARS: &[&str] = &[
        "PRESS_RANKER_HTTP_BIND",
        "PRESS_RANKER_PROFILE",
        "PRESS_RANKER_PROFILE_PATH",
        "PRESS_RANKER_CLASSIFY_BY_DEFAULT",
        "PRESS_RANKER_MAX_BATCH_FILMS",
        "PRESS_RANKER_FALLBACK_MIN_WORDS",
        "PRESS_RANKER_WEIGHT_CREDIBILITY",
        "PRESS_RANKER_WEIGHT_PRECISION",
        "PRESS_RANKER_WEIGHT_DIVERSITY",
        "PRESS_RANKER_WEIGHT_RELEVANCE",
    ];

    #[test]
    fn component_registry_builds_with_defaults() {
        let config = temp_env::with_vars_unset(CONFIG_VARS, Config::from_env).expect("config");
        let registry = ComponentRegistry::build(config).expect("registry");
        assert_eq!(registry.profile().name(), "base");
        assert!(!registry.profile().resolver().is_empty());
    }

    #[test]
    fn component_registry_applies_weight_overrides() {
        let config = temp_env::with_vars(
            [
                ("PRESS_RANKER_PROFILE", Some("exhibitor")),
                ("PRESS_RANKER_WEIGHT_RELEVANCE", Some("0.5")),
                ("PRESS_RANKER_PROFILE_PATH", None),
            ],
            Config::from_env,
        )
        .expect("config");
        let registry = ComponentRegistry::build(config).expect("registry");
        assert_eq!(registry.profile().name(), "exhibitor");
        let weights = registry.ranker().scorer().weights();
        assert!((weights.relevance - 0.5).abs() < f64::EPSILON);
        assert!((weights.credibility - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_builtin_profile_fails_to_build() {
        let config = temp_env::with_vars(
            [
                ("PRESS_RANKER_PROFILE", Some("nonexistent")),
                ("PRESS_RANKER_PROFILE_PATH", None),
            ],
            Config::from_env,
        )
        .expect("config");
        assert!(ComponentRegistry::build(config).is_err());
    }
}
