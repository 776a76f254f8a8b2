mod adapters;
mod config;
mod core;
mod ports;

use crate::adapters::aws::client_factory::AwsSdkClientFactory;
use crate::adapters::config::file_store::TomlFileConfigAdapter;
use crate::adapters::server::http_listener::run_http_listener;
use crate::config::models::{LogFormat, LoggingConfig};
use crate::core::credential_cache::CredentialCache;
use crate::core::credential_resolver::RdsClientResolver;
use crate::core::discovery_service::DiscoveryService;
use crate::ports::{AwsClientFactory, ConfigurationStore};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Prometheus HTTP service discovery for AWS RDS", long_about = None)]
struct CliArgs {
    #[clap(long, help = "Port to run server (overrides server.listen_address port)")]
    port: Option<u16>,

    #[clap(long, value_name = "PATH", help = "Path to the TOML configuration file")]
    config: Option<PathBuf>,
}

fn init_logger(logging_config: &LoggingConfig) {
    let env_filter_str = std::env::var("RUST_LOG").unwrap_or_else(|_| logging_config.level.clone());
    let env_filter = EnvFilter::try_new(&env_filter_str).unwrap_or_else(|e| {
        eprintln!("[LOGGER WARN] Failed to parse RUST_LOG/config log level '{env_filter_str}': {e}. Defaulting to 'info'.");
        EnvFilter::new("info")
    });

    let subscriber_builder = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true);

    match logging_config.format {
        LogFormat::Pretty => {
            let _ = tracing::subscriber::set_global_default(subscriber_builder.pretty().finish());
        }
        LogFormat::Json => {
            let _ = tracing::subscriber::set_global_default(subscriber_builder.json().finish());
        }
        LogFormat::Compact => {
            let _ = tracing::subscriber::set_global_default(subscriber_builder.compact().finish());
        }
    }
    tracing::debug!(
        "Logger initialized with effective filter: '{}' and format '{:?}'",
        env_filter_str,
        logging_config.format
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down."),
        _ = terminate => info!("Received SIGTERM, shutting down."),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli_args = CliArgs::parse();

    let config_store: Arc<dyn ConfigurationStore> =
        Arc::new(TomlFileConfigAdapter::new(config::find_config_file()));
    let mut app_config = config::load_app_config(config_store.as_ref(), cli_args.config.as_deref())
        .map_err(|e| {
            eprintln!("[CRITICAL] Failed to load configuration: {e}. Exiting.");
            e
        })?;
    if let Some(port) = cli_args.port {
        app_config.server = app_config.server.with_port(port)?;
    }

    init_logger(&app_config.logging);
    info!(
        listen_address = %app_config.server.listen_address,
        credential_cache_ttl = ?app_config.aws.credential_cache_ttl,
        credential_cache_capacity = app_config.aws.credential_cache_capacity,
        "RDS service discovery v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let client_factory: Arc<dyn AwsClientFactory> = Arc::new(
        AwsSdkClientFactory::from_default_chain(app_config.aws.region.as_deref()).await,
    );
    let credential_cache = Arc::new(CredentialCache::new(
        app_config.aws.credential_cache_capacity,
        app_config.aws.credential_cache_ttl,
    ));
    let resolver = RdsClientResolver::new(
        client_factory,
        Arc::clone(&credential_cache),
        app_config.aws.role_session_name.clone(),
    );
    let discovery_service = Arc::new(DiscoveryService::new(resolver));

    let listen_addr = app_config.server.socket_addr()?;
    run_http_listener(listen_addr, discovery_service, shutdown_signal()).await?;

    let stats = credential_cache.stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        cached_roles = stats.size,
        validity_window = ?credential_cache.validity_window(),
        "Shutdown complete."
    );
    Ok(())
}
