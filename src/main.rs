use anyhow::Context;
use portfolio_chat_proxy::{build_app, config::ProxyConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ProxyConfig::from_env().context("invalid configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    if !config.has_api_key() {
        tracing::warn!("GEMINI_API_KEY is not set; chat requests will fail until it is");
    }

    let bind_addr = config.bind_addr.clone();
    tracing::info!(
        model = %config.model,
        static_dir = %config.static_dir,
        timeout_secs = config.request_timeout.as_secs(),
        "starting chat proxy"
    );

    let app = build_app(config).context("failed to build backend client")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("chat proxy listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("chat proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
