use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cv_ingest::config::Config;
use cv_ingest::llm_client::LlmClient;
use cv_ingest::pipeline::CvPipeline;
use cv_ingest::routes::build_router;
use cv_ingest::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV ingest service v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(&config.llm)?;
    if config.llm.api_key.is_none() {
        warn!("LLM_API_KEY is not set; extraction requests will fail with ConfigurationError");
    }
    info!(
        base_url = llm.base_url(),
        structuring_model = %config.pipeline.structuring_model,
        vision_model = %config.pipeline.vision_model,
        "LLM client initialized"
    );

    let pipeline = CvPipeline::new(config.pipeline.clone(), Arc::new(llm));

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
