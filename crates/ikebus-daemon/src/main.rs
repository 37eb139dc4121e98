use ikebus_core::{dbg1, Signal};
use ikebus_daemon::{build_bus, load_config, spawn_monitor, DaemonError};
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("IKEBUS_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("ikebus-daemon: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DaemonError> {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("ikebus.toml"));

    let config = load_config(selected_config_path)?;

    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        config_path = selected_config_path,
        config_source,
        monitor = config.monitor.enabled,
        "starting ikebus daemon"
    );

    let bus = build_bus(&config)?;
    let monitor = if config.monitor.enabled {
        Some(spawn_monitor(bus.clone(), &config.monitor)?)
    } else {
        None
    };

    dbg1!(bus, Signal::DbgDmn, "daemon started, %u listeners", bus.listener_count());

    shutdown_signal().await;

    dbg1!(bus, Signal::DbgDmn, "daemon shutting down");
    let joined = tokio::task::spawn_blocking(move || {
        bus.teardown();
        monitor.map(|handle| handle.join())
    })
    .await;

    match joined {
        Ok(Some(Ok(reported))) => tracing::info!(reported, "monitor stopped"),
        Ok(Some(Err(_))) => tracing::error!("monitor thread panicked"),
        Ok(None) => {}
        Err(error) => tracing::error!(%error, "shutdown task failed"),
    }

    tracing::info!("ikebus daemon shut down");
    Ok(())
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
