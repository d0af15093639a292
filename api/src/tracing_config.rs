use opentelemetry_otlp::WithExportConfig;
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_error::ErrorLayer;
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

use crate::config::Config;

/// The `name` field on every log line.
pub const SERVICE_NAME: &str = "trip-planner";

/// Filter directives, in `EnvFilter` syntax, are read from this variable.
pub const FILTER_ENV: &str = "LOG";

/// Request and session events are INFO; diesel's connection chatter stays at WARN.
const DEFAULT_FILTER: &str = "info,diesel=warn";

/// Where to ship spans. Only present when `HONEYCOMB_TEAM` is set.
#[derive(Debug, PartialEq, Eq)]
pub struct HoneycombConfig {
    pub team: String,
    pub dataset: String,
}

impl HoneycombConfig {
    /// Move the Honeycomb settings out of the server config, since the API key has no
    /// further use once the exporter is built.
    pub fn take_from(config: &mut Config) -> Option<Self> {
        config.honeycomb_team.take().map(|team| HoneycombConfig {
            team,
            dataset: std::mem::take(&mut config.honeycomb_dataset),
        })
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber for the trip planner server. Events go to `console_sink`
/// as Bunyan JSON. With a [HoneycombConfig], spans are also exported over OTLP, tagged with
/// the configured dataset as their service name.
pub fn configure<W>(
    console_sink: W,
    honeycomb_config: Option<HoneycombConfig>,
) -> Result<(), anyhow::Error>
where
    W: for<'a> MakeWriter<'a> + 'static + Send + Sync,
{
    LogTracer::builder()
        .ignore_crate("rustls")
        .with_max_level(log::LevelFilter::Debug)
        .init()?;

    let formatting_layer = BunyanFormattingLayer::new(SERVICE_NAME.to_string(), console_sink);
    let subscriber = Registry::default()
        .with(env_filter())
        .with(JsonStorageLayer)
        .with(formatting_layer)
        .with(ErrorLayer::default());

    if let Some(honeycomb_config) = honeycomb_config {
        let mut oltp_meta = tonic::metadata::MetadataMap::new();
        oltp_meta.insert("x-honeycomb-team", honeycomb_config.team.parse()?);

        let exporter = opentelemetry_otlp::new_exporter()
            .tonic()
            .with_endpoint("api.honeycomb.io:443")
            .with_metadata(oltp_meta);

        let oltp = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_trace_config(opentelemetry::sdk::trace::config().with_resource(
                opentelemetry::sdk::Resource::new(vec![opentelemetry::KeyValue::new(
                    "service.name",
                    honeycomb_config.dataset,
                )]),
            ))
            .with_exporter(exporter)
            .install_batch(opentelemetry::runtime::TokioCurrentThread)?;
        let telemetry = tracing_opentelemetry::layer().with_tracer(oltp);

        set_global_default(subscriber.with(telemetry))?;
    } else {
        set_global_default(subscriber)?;
    }

    Ok(())
}

/// Flush spans from the final requests before the process exits.
pub fn teardown() {
    opentelemetry::global::shutdown_tracer_provider();
}
