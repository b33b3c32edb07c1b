use anyhow::{Context, Error, Result};
use once_cell::sync::OnceCell;
use opentelemetry::{KeyValue, global, trace::TracerProvider};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, SdkTracer, SdkTracerProvider},
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use super::structured_log::StructuredLogLayer;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Tracing サブスクライバを一度だけ初期化する。
///
/// `OTEL_EXPORTER_OTLP_ENDPOINT` が設定されていれば OTLP エクスポーターを併用し、
/// 未設定なら JSON fmt レイヤーと [`StructuredLogLayer`] のみを使う。
/// ホスト側（テストハーネスなど）が既にグローバルサブスクライバを設定している場合は
/// それを尊重し、エラーにはしない。
///
/// # Errors
/// OTLP 以外の初期化処理が失敗した場合はエラーを返す。
pub fn init() -> Result<()> {
    TRACING_INIT.get_or_try_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false).json();

        let otel_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();
        let Some(endpoint) = otel_endpoint else {
            let installed = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .with(StructuredLogLayer)
                .try_init()
                .is_ok();
            if installed {
                info!(otel_enabled = false, "standard tracing initialized");
            }
            return Ok::<(), Error>(());
        };

        match init_tracer(&endpoint) {
            Ok(tracer) => {
                let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
                let installed = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(otel_layer)
                    .try_init()
                    .is_ok();
                if installed {
                    info!(
                        otel_enabled = true,
                        endpoint = %endpoint,
                        "tracing initialized with OpenTelemetry"
                    );
                }
            }
            Err(error) => {
                let installed = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(StructuredLogLayer)
                    .try_init()
                    .is_ok();
                if installed {
                    warn!(
                        otel_enabled = false,
                        error = %error,
                        "tracing initialized without OpenTelemetry (init failed)"
                    );
                }
            }
        }

        Ok::<(), Error>(())
    })?;
    Ok(())
}

/// OTLPエクスポーター経由でOpenTelemetryトレーサーを初期化する。
///
/// サンプリング比率は `OTEL_SAMPLING_RATIO`（既定 1.0）で制御する。
fn init_tracer(endpoint: &str) -> Result<SdkTracer> {
    let sampling_ratio = std::env::var("OTEL_SAMPLING_RATIO")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(1.0);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .context("failed to build OTLP span exporter")?;

    let resource = Resource::builder()
        .with_attributes([
            KeyValue::new("service.name", "press-ranker"),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ])
        .build();

    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(Sampler::TraceIdRatioBased(sampling_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .build();

    let tracer = tracer_provider.tracer("press-ranker");
    global::set_tracer_provider(tracer_provider);

    Ok(tracer)
}
