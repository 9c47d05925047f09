use todo_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env, logger)
    setup_environment()?;

    print_banner();
    tracing::info!("Todo server starting...");

    // 2. Configuration
    let config = Config::from_env();
    config.log_summary();

    // 3. Database; any failure here ends the process
    let state = match ServerState::initialize(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            if let Some(hint) = e.remediation() {
                tracing::error!("{hint}");
            }
            return Err(e.into());
        }
    };

    // 4. Serve
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
