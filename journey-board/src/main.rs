use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use journey_board::board::JourneyBoard;
use journey_board::config::{AppConfig, SourceConfig};
use journey_board::navitia::{MockNavitiaClient, NavitiaClient};
use journey_board::web::{AppState, create_router, view_channel};
use journey_board::worker::JourneyService;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("journey_board=info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");
    let catalog = Arc::new(config.catalog().expect("Failed to load route catalog"));
    info!(routes = catalog.len(), "route catalog loaded");

    // Start the worker over the live API or fixtures
    let worker = match &config.source {
        SourceConfig::Navitia(navitia) => {
            let client =
                NavitiaClient::new(navitia.clone()).expect("Failed to create Navitia client");
            info!(endpoint = client.endpoint(), "using live journey API");
            JourneyService::start(client)
        }
        SourceConfig::Mock(dir) => {
            let mock = MockNavitiaClient::from_dir(dir).expect("Failed to load mock fixtures");
            info!(dir = %dir.display(), fixtures = mock.len(), "using mock journey data");
            JourneyService::start(mock)
        }
    };

    let (sink, view) = view_channel();
    let (board, board_task) =
        JourneyBoard::spawn(Arc::new(worker.clone()), Arc::clone(&catalog), sink);
    board.connect().expect("Journey board exited during startup");

    let state = AppState::new(board.clone(), view, catalog);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("Failed to bind listen address");
    info!(addr = %config.listen_addr, "journey board listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
    }

    if board.close().is_ok() && board_task.await.is_err() {
        error!("journey board task panicked");
    }
    worker.stop();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
