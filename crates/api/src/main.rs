use anyhow::Context;

use warung_infra::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    warung_observability::init();

    let config = Config::from_env().context("invalid configuration")?;
    let app = warung_api::app::build_app(&config)
        .await
        .context("failed to build application")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        seed_demo = config.seed_demo,
        low_stock_multiplier = %config.low_stock_multiplier,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
