use anyhow::Context;

use tictactoe_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tictactoe_observability::init();

    let config = ApiConfig::from_env();
    let app = tictactoe_api::app::build_app(&config).context("failed to wire services")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
