use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use flawis_gateway::config::loader::load_config;
use flawis_gateway::config::watcher::ConfigWatcher;
use flawis_gateway::lifecycle::{signals, Shutdown};
use flawis_gateway::observability::init_logging;
use flawis_gateway::{GatewayConfig, HttpServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config path: first CLI argument, else ./gateway.toml, else defaults.
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("gateway.toml"));

    let config = if config_path.exists() {
        load_config(&config_path)?
    } else {
        GatewayConfig::default()
    };

    init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        app_upstream = %config.upstream.app_address,
        search_upstream = %config.upstream.search_base_url,
        fallback_locale = %config.i18n.fallback,
        "flawis-gateway v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let server = HttpServer::new(config);
    let config_handle = server.config_handle();
    let shutdown = Arc::new(Shutdown::new());

    // Hot reload: swap the live config when the file changes and validates.
    let _watcher_guard = if config_path.exists() {
        let (watcher, mut updates) = ConfigWatcher::new(&config_path);
        let guard = watcher.run()?;
        let mut shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    update = updates.recv() => match update {
                        Some(new_config) => {
                            config_handle.store(Arc::new(new_config));
                            tracing::info!("Configuration reloaded");
                        }
                        None => break,
                    },
                }
            }
        });
        Some(guard)
    } else {
        tracing::info!(path = ?config_path, "No config file found, using defaults");
        None
    };

    // Translate OS signals into the shutdown broadcast.
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
