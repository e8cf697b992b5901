//! Domain provisioner daemon
//!
//! Loads the configuration, re-runs provisioning for sites a previous process
//! left unfinished, then keeps propagation monitors alive until Ctrl-C.

use std::process::ExitCode;

use anyhow::{Context, Result};
use domain_provisioner_app::ProvisionerAppBuilder;
use domain_provisioner_app::config::AppConfig;
use domain_provisioner_app::logging::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // tracing may not be initialised yet
            eprintln!("domain-provisioner: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = AppConfig::default_path();
    let config = AppConfig::load(&path)?;
    init_tracing(&config.logging).context("failed to initialise logging")?;
    tracing::info!("Starting domain provisioner with {}", path.display());

    let app = ProvisionerAppBuilder::from_config(&config)
        .build()
        .context("failed to build application")?;

    tokio::select! {
        report = app.run_startup_recovery() => {
            if let Some(report) = report {
                tracing::info!(
                    attempted = report.attempted,
                    succeeded = report.succeeded,
                    failed = report.failed,
                    skipped = report.skipped,
                    "Startup recovery finished"
                );
            }
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for shutdown signal")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
            tracing::warn!("Shutdown requested during startup recovery");
        }
    }

    let aborted = app.shutdown().await;
    tracing::info!("Shut down, {aborted} propagation monitor(s) aborted");
    Ok(())
}
