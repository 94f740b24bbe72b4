use mesa_server::{Config, Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env, logging)
    setup_environment()?;

    print_banner();

    // 2. Configuration
    let config = Config::from_env()?;
    tracing::info!(environment = %config.environment, "Mesa Feliz API starting...");

    // 3. Run until Ctrl-C
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
