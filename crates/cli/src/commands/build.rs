//! `build` command implementation.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::BuildArgs;
use crate::pipeline::{BuildConfig, BuildJob};
use crate::replay_io::load_config;

/// Execute the `build` command
pub async fn run_build(args: &BuildArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    // Apply CLI overrides
    if let Some(fps) = args.fps {
        info!(fps, "Overriding frame rate from CLI");
        config.fps = fps;
    }
    if let Some(workers) = args.workers {
        info!(workers, "Overriding resampler worker cap from CLI");
        config.resampler.max_workers = Some(workers);
    }
    config_loader::ConfigLoader::validate(&config)
        .context("Configuration invalid after CLI overrides")?;

    info!(
        session = %args.session.display(),
        output = %args.output.display(),
        fps = config.fps,
        dense_points = config.projector.dense_points,
        "Building replay"
    );

    let build_config = BuildConfig {
        session_path: args.session.clone(),
        output_path: args.output.clone(),
        replay_config: config,
        metrics_port: if args.metrics_port > 0 {
            Some(args.metrics_port)
        } else {
            None
        },
    };

    // Setup graceful shutdown
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = setup_shutdown_signal() => {
                    info!("Shutdown signal received, cancelling build...");
                    cancel.cancel();
                }
                _ = cancel.cancelled() => {}
            }
        })
    };

    let result = BuildJob::new(build_config).run(cancel.clone()).await;

    // Stop the signal watcher
    cancel.cancel();
    let _ = watcher.await;

    let stats = result?;
    stats.print_summary();
    Ok(())
}

/// Setup shutdown signal handler (Ctrl+C)
async fn setup_shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
