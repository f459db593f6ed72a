use ragchat_server::{AppConfig, build_state, run_server, telemetry::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing();
    tracing::debug!(?config, "configuration loaded");

    let state = build_state(&config).await?;
    run_server(config.server, state).await
}
