//! `compare` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use comparison::{ComparisonMetrics, MultiSessionSynchronizer};
use contracts::{ReplayData, SyncMode};
use serde::Serialize;
use tracing::info;

use crate::cli::CompareArgs;
use crate::replay_io::{load_config, read_replay};

/// Comparison report for JSON output
#[derive(Serialize)]
struct CompareReport {
    mode: SyncMode,
    frames_a: usize,
    frames_b: usize,
    pairs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    unavailable: Option<String>,
    modes: Vec<ModeAvailability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<ComparisonMetrics>,
}

#[derive(Serialize)]
struct ModeAvailability {
    mode: SyncMode,
    pairs: usize,
    available: bool,
}

/// Execute the `compare` command
pub async fn run_compare(args: &CompareArgs) -> Result<()> {
    let mode = match args.mode {
        Some(mode) => mode,
        None => load_config(args.config.as_deref())?.comparison.default_mode,
    };

    info!(a = %args.a.display(), b = %args.b.display(), %mode, "Comparing replays");

    let a = Arc::new(read_replay(&args.a).await?);
    let b = Arc::new(read_replay(&args.b).await?);
    let report = build_report(a, b, mode, args.tick);

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize comparison report")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    match report.unavailable {
        Some(reason) => anyhow::bail!("Sync mode {} unavailable: {}", mode, reason),
        None => Ok(()),
    }
}

fn build_report(
    a: Arc<ReplayData>,
    b: Arc<ReplayData>,
    mode: SyncMode,
    tick: usize,
) -> CompareReport {
    let frames_a = a.frame_count();
    let frames_b = b.frame_count();
    let mut synchronizer = MultiSessionSynchronizer::new(a, b, mode);

    let mut modes = Vec::with_capacity(3);
    for candidate in [SyncMode::Lap, SyncMode::Time, SyncMode::Distance] {
        synchronizer.set_mode(candidate);
        modes.push(ModeAvailability {
            mode: candidate,
            pairs: synchronizer.total_frames(),
            available: synchronizer.unavailable().is_none(),
        });
    }
    synchronizer.set_mode(mode);

    CompareReport {
        mode,
        frames_a,
        frames_b,
        pairs: synchronizer.total_frames(),
        unavailable: synchronizer.unavailable().map(|e| e.to_string()),
        modes,
        metrics: synchronizer.comparison_metrics(tick),
    }
}

fn print_report(report: &CompareReport) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                      Replay Comparison                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Sync");
    println!("   ├─ Mode: {}", report.mode);
    println!("   ├─ Frames: A={} B={}", report.frames_a, report.frames_b);
    match &report.unavailable {
        Some(reason) => println!("   └─ Unavailable: {}", reason),
        None => println!("   └─ Pairs: {}", report.pairs),
    }

    println!("\nModes");
    for (i, mode) in report.modes.iter().enumerate() {
        let prefix = if i + 1 == report.modes.len() { "└─" } else { "├─" };
        let state = if mode.available { "✓" } else { "✗" };
        println!("   {} {} {:<8} {} pairs", prefix, state, mode.mode, mode.pairs);
    }

    let Some(metrics) = &report.metrics else {
        println!();
        return;
    };

    println!("\nTick {}", metrics.tick);
    println!(
        "   ├─ A: lap {} t={:.2}s leader {}",
        metrics.lap_a,
        metrics.time_a,
        metrics.leader_a.as_deref().unwrap_or("-")
    );
    println!(
        "   └─ B: lap {} t={:.2}s leader {}",
        metrics.lap_b,
        metrics.time_b,
        metrics.leader_b.as_deref().unwrap_or("-")
    );

    if !metrics.position_deltas.is_empty() {
        println!("\nDrivers (position B-A, time delta)");
        let count = metrics.position_deltas.len();
        for (i, (code, delta)) in metrics.position_deltas.iter().enumerate() {
            let prefix = if i + 1 == count { "└─" } else { "├─" };
            let time = metrics
                .time_deltas
                .get(code)
                .map(|dt| format!("{:+.2}s", dt))
                .unwrap_or_else(|| "n/a".to_string());
            println!("   {} {} {:+} {}", prefix, code, delta, time);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DriverSnapshot, Frame};
    use indexmap::IndexMap;

    fn frame(t: f64, lap: u32, progress_m: f64) -> Frame {
        let mut drivers = IndexMap::new();
        drivers.insert(
            "AAA".to_string(),
            DriverSnapshot {
                x: 0.0,
                y: 0.0,
                lap,
                rel_dist: 0.0,
                progress_m,
                tyre: Default::default(),
                tyre_life: 0.0,
                speed_kph: 36.0,
                gear: 4,
                drs: 0,
                throttle_pct: 0.0,
                brake_pct: 0.0,
                gap_to_leader_s: 0.0,
                interval_to_ahead_s: 0.0,
                position: 1,
                is_out: false,
            },
        );
        Frame {
            t,
            lap,
            drivers,
            track_status: None,
            weather: None,
        }
    }

    fn replay(total_laps: u32) -> Arc<ReplayData> {
        Arc::new(ReplayData {
            fps: 1,
            frames: (0..4).map(|i| frame(i as f64, 1, i as f64 * 10.0)).collect(),
            total_laps,
            track_length_m: 100.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_report_time_mode() {
        let report = build_report(replay(1), replay(1), SyncMode::Time, 2);
        assert_eq!(report.pairs, 4);
        assert!(report.unavailable.is_none());
        assert_eq!(report.modes.len(), 3);
        assert!(report.modes.iter().all(|m| m.available));

        let metrics = report.metrics.unwrap();
        assert_eq!(metrics.tick, 2);
        assert_eq!(metrics.position_deltas.get("AAA"), Some(&0));
        assert_eq!(metrics.time_deltas.get("AAA"), Some(&0.0));
    }

    #[test]
    fn test_report_lap_mode_unavailable() {
        let report = build_report(replay(0), replay(1), SyncMode::Lap, 0);
        assert_eq!(report.pairs, 0);
        assert!(report.unavailable.is_some());
        assert!(report.metrics.is_none());
        assert!(!report.modes[0].available);
        assert!(report.modes[1].available);
    }
}
