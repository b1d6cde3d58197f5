//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{ReplayConfig, SyncMode};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    fps: u32,
    dense_points: usize,
    track_width: f64,
    brake_scale: String,
    max_workers: Option<usize>,
    grid_order_threshold_m: f64,
    default_mode: SyncMode,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    fps: config.fps,
                    dense_points: config.projector.dense_points,
                    track_width: config.projector.track_width,
                    brake_scale: format!("{:?}", config.resampler.brake_scale),
                    max_workers: config.resampler.max_workers,
                    grid_order_threshold_m: config.synthesizer.grid_order_threshold_m,
                    default_mode: config.comparison.default_mode,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &ReplayConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.fps > 60 {
        warnings.push(format!(
            "fps = {} - replay files grow linearly with frame rate",
            config.fps
        ));
    }

    if config.projector.dense_points < 500 {
        warnings.push(format!(
            "projector.dense_points = {} - progress near corners will be coarse",
            config.projector.dense_points
        ));
    }

    if config.synthesizer.grid_order_threshold_m == 0.0 {
        warnings.push(
            "synthesizer.grid_order_threshold_m is 0 - start order follows raw progress".to_string(),
        );
    }

    if config.projector.track_width == 0.0 {
        warnings.push("projector.track_width is 0 - track boundaries collapse onto the centerline".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  FPS: {}", summary.fps);
            println!("  Dense points: {}", summary.dense_points);
            println!("  Track width: {}", summary.track_width);
            println!("  Brake scale: {}", summary.brake_scale);
            match summary.max_workers {
                Some(workers) => println!("  Max workers: {}", workers),
                None => println!("  Max workers: (auto)"),
            }
            println!("  Grid order threshold: {} m", summary.grid_order_threshold_m);
            println!("  Default sync mode: {}", summary.default_mode);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
