use market_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    setup_environment();

    print_banner();

    tracing::info!("Kraal Market Server starting...");

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize server state (work dir, database, services)
    let state = ServerState::initialize(&config).await?;

    // 4. Run the HTTP server
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(anyhow::anyhow!(e));
    }

    Ok(())
}
