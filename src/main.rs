//! RSearch server entry point

use anyhow::Result;
use rsearch::{
    config,
    engines::ProviderLoader,
    network::HttpClient,
    search::Aggregator,
    web::{bind_listener, create_router, AppState},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before logging so `general.debug` can pick the level
    let settings_path = config::settings_path();
    let settings = config::load_from(settings_path.as_deref())?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting RSearch v{}", rsearch::VERSION);
    match &settings_path {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }
    info!(
        "Loaded configuration for instance: {}",
        settings.general.instance_name
    );

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;

    // Bind the provider for the lifetime of the process
    let provider = ProviderLoader::load(&settings);
    let aggregator = Aggregator::new(client, provider);

    let listener = bind_listener(&settings.server).await?;
    info!("Starting server on http://{}", listener.local_addr()?);

    let state = AppState::new(settings, aggregator)?;
    let app = create_router(state);

    axum::serve(listener, app).await?;

    Ok(())
}
