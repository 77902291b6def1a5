mod config;
mod error;
mod handlers;
mod logging;
mod persistence;
mod routes;
mod state;

use config::ServerConfig;
use persistence::DataFile;
use state::AppState;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::from_path(".env").ok();
    logging::setup();

    let config = ServerConfig::from_env()?;
    let data_file = config.data_file.clone().map(DataFile::new);
    match &data_file {
        Some(file) => info!("Persisting collections to {}", file.path().display()),
        None => info!("No DATA_FILE set, collections live in memory only"),
    }

    let state = AppState::load(data_file).await?;
    let app = routes::app(state, &config);

    info!("Serving static files from {}", config.static_dir.display());
    info!("listening on {}", config.bind_addr);
    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
