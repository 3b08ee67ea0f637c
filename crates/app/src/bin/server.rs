// Gatekeeper - HTTP server

use std::net::SocketAddr;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gatekeeper_auth::ProviderSettings;
use gatekeeper_common::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Env files are loaded here, so this runs before the subscriber exists
    let config = AppConfig::from_env()?;

    init_tracing(&config);

    info!(env = %config.app_env, "Starting Gatekeeper server");

    let settings = ProviderSettings::from_env();
    let gateway = gatekeeper_app::build_gateway(&settings).map_err(|e| {
        error!("Failed to initialize auth gateway: {}", e);
        e
    })?;

    info!(provider = %gateway.provider(), "Auth gateway ready");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = gatekeeper_app::create_app(config, gateway);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!(
        "Health check available at http://{}{}",
        addr,
        gatekeeper_app::HEALTH_PATH
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
