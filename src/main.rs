use std::sync::Arc;
use three13::{app, AppState, InMemoryGameRepository, ServerConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "three13=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Three 13 game server");

    let config = ServerConfig::from_env()?;
    let game_repository = Arc::new(InMemoryGameRepository::new());
    let app_state = AppState::new(game_repository);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(address = %config.bind_address(), "Server running");
    axum::serve(listener, app(app_state)).await?;
    Ok(())
}
