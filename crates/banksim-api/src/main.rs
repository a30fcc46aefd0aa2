use anyhow::Context;
use banksim_api::{
    create_ledger_app, create_user_app, logging, HttpUserLookup, LedgerState, ServerConfig,
    UserState,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Run the banksim user directory and account ledger services
#[derive(Debug, Parser)]
#[command(name = "banksim-server", version)]
struct Args {
    /// JSON config file; BANKSIM_* environment variables override its values
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = ServerConfig::load(args.config.as_deref()).context("failed to load config")?;

    logging::init(&config.log_filter);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // User service
    let user_listener = TcpListener::bind(config.user_addr)
        .await
        .with_context(|| format!("failed to bind user service to {}", config.user_addr))?;
    let user_app = create_user_app(UserState::new());
    let user_shutdown = wait_for(shutdown_rx.clone());
    let user_server = tokio::spawn(async move {
        axum::serve(user_listener, user_app)
            .with_graceful_shutdown(user_shutdown)
            .await
    });
    tracing::info!(addr = %config.user_addr, "user service listening");

    // Ledger service, validating owners against the user service
    let lookup =
        HttpUserLookup::new(&config.user_service_url).context("invalid user service url")?;
    let ledger_listener = TcpListener::bind(config.ledger_addr)
        .await
        .with_context(|| format!("failed to bind ledger service to {}", config.ledger_addr))?;
    let ledger_app = create_ledger_app(LedgerState::new(Arc::new(lookup)));
    let ledger_shutdown = wait_for(shutdown_rx);
    let ledger_server = tokio::spawn(async move {
        axum::serve(ledger_listener, ledger_app)
            .with_graceful_shutdown(ledger_shutdown)
            .await
    });
    tracing::info!(
        addr = %config.ledger_addr,
        user_service = %config.user_service_url,
        "ledger service listening"
    );

    shutdown_signal().await;
    let _ = shutdown_tx.send(true);

    let (user_result, ledger_result) = tokio::join!(user_server, ledger_server);
    user_result?.context("user service failed")?;
    ledger_result?.context("ledger service failed")?;

    tracing::info!("banksim stopped");
    Ok(())
}

async fn wait_for(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_help_is_not_a_config_path() {
        let err = Args::try_parse_from(["banksim-server", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_config_path_is_optional() {
        let args = Args::try_parse_from(["banksim-server"]).unwrap();
        assert!(args.config.is_none());

        let args = Args::try_parse_from(["banksim-server", "banksim.json"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("banksim.json")));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = Args::try_parse_from(["banksim-server", "--verbose"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
