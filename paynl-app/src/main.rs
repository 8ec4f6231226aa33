//! # Pay.nl Facade Server
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the Pay.nl client and the bank cache
//! - Create the payment facade
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paynl_client::PaynlClient;
use paynl_facade::{InMemoryCache, PaymentFacade, inbound::HttpServer};

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("paynl-facade"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::from_env()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,paynl_app=debug,paynl_facade=debug,paynl_client=debug".into());

    // Spans go to the OTLP collector only when one is configured
    let otel_provider = if config.otlp_enabled {
        let (otel_tracer, otel_provider) = init_tracer()?;
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .with(tracing_opentelemetry::layer().with_tracer(otel_tracer))
            .init();
        Some(otel_provider)
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
        None
    };

    tracing::info!("Starting payment facade on port {}", config.port);
    tracing::info!(
        service_id = %config.gateway.service_id,
        test_mode = config.gateway.test_mode,
        api = %config.gateway.api_base_url,
        "Using Pay.nl service"
    );

    let client = PaynlClient::from_config(&config.gateway)?;
    let facade = PaymentFacade::new(config.gateway, config.facade, client, InMemoryCache::new())?;

    // Create and run the HTTP server
    let server = HttpServer::new(facade)?;
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
