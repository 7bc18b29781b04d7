use std::collections::HashMap;

use opentelemetry::trace::TracerProvider as TracerProviderTrait;
use opentelemetry::KeyValue;
use opentelemetry_otlp::{SpanExporter, WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::Resource;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Collector settings for `stratus --otlp-endpoint`. Without an endpoint
/// nothing leaves the machine.
#[derive(Debug, Clone, Default)]
pub struct OtlpExport {
    /// Base URL of an OTLP/HTTP collector. The exporter appends `/v1/traces`.
    pub endpoint: Option<String>,
    /// Sent as `Authorization: Bearer <token>` when non-empty.
    pub token: Option<String>,
}

impl OtlpExport {
    fn headers(&self) -> HashMap<String, String> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| ("Authorization".to_string(), format!("Bearer {t}")))
            .into_iter()
            .collect()
    }
}

/// Logs go to stderr so `stratus plan --output json` can be piped as is.
/// Filtering follows `RUST_LOG`, defaulting to `info`.
///
/// With an endpoint configured, the provisioning spans of a `deploy` run are
/// exported too; the returned provider must reach [`shutdown`] or the last
/// batch is lost. An exporter that fails to build downgrades to stderr only.
pub fn init_tracing(service_name: &str, export: &OtlpExport) -> Option<TracerProvider> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(env_filter).with(stderr);

    let Some((endpoint, exporter)) = span_exporter(export) else {
        registry.init();
        return None;
    };

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(Resource::new([KeyValue::new(
            "service.name",
            service_name.to_string(),
        )]))
        .build();
    let tracer = provider.tracer(service_name.to_string());

    registry
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .init();
    tracing::info!(endpoint, "exporting deploy spans");
    Some(provider)
}

fn span_exporter(export: &OtlpExport) -> Option<(&str, SpanExporter)> {
    let endpoint = export.endpoint.as_deref().filter(|e| !e.is_empty())?;
    match SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .with_headers(export.headers())
        .build()
    {
        Ok(exporter) => Some((endpoint, exporter)),
        Err(err) => {
            // the subscriber is not up yet
            eprintln!("span export to {endpoint} disabled: {err}");
            None
        }
    }
}

/// Flushes pending spans. A no-op when export was never enabled.
pub fn shutdown(provider: Option<TracerProvider>) {
    if let Some(provider) = provider {
        if let Err(err) = provider.shutdown() {
            eprintln!("failed to flush spans: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header_only_with_token() {
        let mut export = OtlpExport {
            endpoint: Some("http://collector:4318".to_string()),
            token: None,
        };
        assert!(export.headers().is_empty());

        export.token = Some(String::new());
        assert!(export.headers().is_empty());

        export.token = Some("s3cret".to_string());
        assert_eq!(
            export.headers().get("Authorization").map(String::as_str),
            Some("Bearer s3cret")
        );
    }
}
