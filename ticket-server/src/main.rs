use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ticket_server::config::AppConfig;
use ticket_server::search::SessionController;
use ticket_server::search_api::{Backend, ScriptedSource, SearchClient};
use ticket_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Pick the ticket source
    let backend = match &config.fixture {
        Some(path) => {
            tracing::info!(path = %path.display(), "serving tickets from fixture");
            Backend::Scripted(ScriptedSource::from_json_file(path)?)
        }
        None => {
            let client = SearchClient::new(config.client.clone())?;
            tracing::info!(base_url = client.base_url(), "using live ticket API");
            Backend::Http(client)
        }
    };

    let state = AppState::new(SessionController::new(backend, config.poll));
    let controller = Arc::clone(&state.controller);

    // Search once at boot, like opening the page
    if controller.start().is_some() {
        tracing::info!("initial search started");
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Ticket search listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {e}");
            }
            tracing::info!("shutting down");
            controller.stop();
        })
        .await?;

    Ok(())
}
