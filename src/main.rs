//! `rtcnd` daemon entry point.
//!
//! Reads configuration from the environment (and `.env` when present),
//! starts the scheduler and HTTP listener, and runs until Ctrl-C or SIGTERM.

use std::process::ExitCode;

use anyhow::Context;
use tokio::sync::watch;
use tracing::{error, info};

use rtcnd::builders::build_daemon;
use rtcnd::config::{env_checklist, DaemonConfig};
use rtcnd::core::{AppResult, RtcnError};
use rtcnd::util::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match DaemonConfig::from_env() {
        Ok(config) => config,
        Err(RtcnError::MissingEnv(missing)) => {
            eprint!("{}", env_checklist(&missing));
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("rtcnd: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: DaemonConfig) -> AppResult<()> {
    let daemon = build_daemon(&config).context("failed to build daemon")?;

    let (stop, shutdown) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown requested");
        let _ = stop.send(true);
    });

    daemon.serve(shutdown).await.context("server failed")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
