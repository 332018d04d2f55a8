#![deny(rust_2018_idioms)]

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use kestrel_lib::monitoring;
use kestrel_rpc::RpcContext;
use kestrel_storage::Storage;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

use crate::config::Config;

mod config;

const MONITORING_PORT: u16 = 9080;

fn main() -> anyhow::Result<()> {
    let config = Config::parse()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Creating tokio runtime")?
        .block_on(async_main(config))
}

async fn async_main(config: Config) -> anyhow::Result<()> {
    setup_tracing(&config);

    info!(
        network = %config.network,
        rpc_port = config.rpc_port,
        "Starting kestrel"
    );

    let database_path = database_path(&config).context("Determining the database location")?;
    std::fs::create_dir_all(&database_path)
        .with_context(|| format!("Creating database directory {}", database_path.display()))?;
    // Startup storage failures are fatal.
    let storage = Storage::migrate(&database_path.join("kestrel.sqlite"))
        .context("Opening the database")?;

    let readiness = Arc::new(AtomicBool::new(false));
    if config.pprof {
        let prometheus_handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Installing the metrics recorder")?;
        let addr = (Ipv4Addr::UNSPECIFIED, MONITORING_PORT);
        monitoring::spawn_server(addr, readiness.clone(), Arc::new(prometheus_handle)).await;
        info!(port = MONITORING_PORT, "Monitoring server started");
    }

    let context = RpcContext::new(storage, config.network.chain_id());
    let router = kestrel_rpc::register_methods(context);
    let rpc_addr = SocketAddr::from((Ipv4Addr::LOCALHOST, config.rpc_port));
    let (rpc_server, rpc_addr) = kestrel_rpc::serve(router, rpc_addr)
        .await
        .context("Starting the RPC server")?;
    info!(%rpc_addr, "RPC server started");

    readiness.store(true, Ordering::Relaxed);

    tokio::select! {
        result = rpc_server => match result {
            Ok(Ok(())) => anyhow::bail!("RPC server stopped unexpectedly"),
            Ok(Err(e)) => Err(e).context("RPC server error"),
            Err(e) => Err(e).context("RPC server task panicked"),
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down kestrel");
            Ok(())
        }
    }
}

fn database_path(config: &Config) -> anyhow::Result<PathBuf> {
    if !config.database_path.as_os_str().is_empty() {
        return Ok(config.database_path.clone());
    }
    let base = dirs::data_dir().context("No OS data directory available, pass --db-path")?;
    Ok(base.join("kestrel").join(config.network.to_string()))
}

fn setup_tracing(config: &Config) {
    use tracing_subscriber::EnvFilter;

    // RUST_LOG wins over the configured level, for ad-hoc debugging.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
