/// 構造化JSON形式ログ。
use serde_json::json;
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// 警告以上のイベントを1行JSONで標準エラーへ複製するレイヤー。
pub(crate) struct StructuredLogLayer;

struct JsonVisitor {
    values: serde_json::Map<String, serde_json::Value>,
}

impl tracing::field::Visit for JsonVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.values
            .insert(field.name().to_string(), json!(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.values.insert(field.name().to_string(), json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.values.insert(field.name().to_string(), json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.values.insert(field.name().to_string(), json!(value));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.values.insert(field.name().to_string(), json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.values.insert(field.name().to_string(), json!(value));
    }
}

pub(crate) fn render_event(event: &Event<'_>) -> serde_json::Value {
    let mut visitor = JsonVisitor {
        values: serde_json::Map::new(),
    };
    event.record(&mut visitor);

    json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "level": event.metadata().level().as_str(),
        "target": event.metadata().target(),
        "service": "press-ranker",
        "fields": visitor.values,
    })
}

impl<S: Subscriber> Layer<S> for StructuredLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // 通常ログは fmt レイヤーが出すので、ここでは警告以上のみ
        if matches!(
            *event.metadata().level(),
            tracing::Level::ERROR | tracing::Level::WARN
        ) {
            let entry = render_event(event);
            eprintln!("{}", serde_json::to_string(&entry).unwrap_or_default());
        }
    }
}
