use clap::Parser;
use dns_forwarder_application::use_cases::ForwardingEngine;
use dns_forwarder_domain::CliOverrides;
use dns_forwarder_infrastructure::dns::{DnsServerHandler, UdpExchange};
use dns_forwarder_infrastructure::jobs::HeartbeatJob;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod bootstrap;
mod server;

#[derive(Parser)]
#[command(name = "dns-forwarder")]
#[command(version)]
#[command(about = "Minimal DNS forwarder: relays each question to one upstream resolver")]
struct Cli {
    /// Upstream resolver as HOST:PORT
    #[arg(long, value_name = "HOST:PORT")]
    resolver: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// DNS listen port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Upstream query timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Seconds between heartbeat log lines (0 disables)
    #[arg(long)]
    heartbeat_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        resolver: cli.resolver,
        bind_address: cli.bind,
        dns_port: cli.port,
        query_timeout_ms: cli.timeout_ms,
        heartbeat_interval_secs: cli.heartbeat_secs,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting DNS forwarder v{}", env!("CARGO_PKG_VERSION"));

    let upstream_addr = bootstrap::resolve_upstream(&config).await?;
    info!(
        upstream = %upstream_addr,
        timeout_ms = config.upstream.query_timeout_ms,
        "Forwarding to upstream resolver"
    );

    let upstream = Arc::new(UdpExchange::new(upstream_addr));
    let engine = Arc::new(ForwardingEngine::new(upstream, config.upstream.query_timeout()));
    let handler = DnsServerHandler::new(engine);

    let shutdown = CancellationToken::new();

    let heartbeat = HeartbeatJob::new()
        .with_interval(config.server.heartbeat_interval_secs)
        .with_cancellation(shutdown.clone())
        .start();

    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        info!("Shutdown signal received");
        ctrl_c_token.cancel();
    });

    let result =
        server::run_dns_server(config.server.listen_addr(), handler, shutdown.clone()).await;

    shutdown.cancel();
    join_heartbeat(heartbeat).await;

    if let Err(e) = &result {
        error!(error = %e, "DNS server error");
    }
    info!("Server shutdown complete");
    result
}

/// Waits for the heartbeat task after cancellation. Returns false if it
/// panicked or was aborted.
async fn join_heartbeat(heartbeat: Option<JoinHandle<()>>) -> bool {
    let Some(heartbeat) = heartbeat else {
        return true;
    };
    match heartbeat.await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Heartbeat task did not stop cleanly");
            false
        }
    }
}
