//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{RaceEvent, RaceEventKind, ReplayData};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::replay_io::read_replay;

/// Replay info for JSON output
#[derive(Serialize)]
struct ReplayInfo {
    event_name: String,
    fps: u32,
    frames: usize,
    duration_s: f64,
    total_laps: u32,
    track_length_m: f64,
    flag_windows: usize,
    drs_zones: usize,
    race_control_messages: usize,
    drivers: Vec<DriverInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<RaceEvent>,
}

#[derive(Serialize)]
struct DriverInfo {
    code: String,
    color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_position: Option<u32>,
    retired: bool,
}

/// Execute the `info` command
pub async fn run_info(args: &InfoArgs) -> Result<()> {
    info!(replay = %args.replay.display(), "Loading replay info");

    let replay = read_replay(&args.replay).await?;
    let info = build_replay_info(&replay, args);

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize replay info")?;
        println!("{}", json);
    } else {
        print_replay_info(&info, args);
    }

    Ok(())
}

fn build_replay_info(replay: &ReplayData, args: &InfoArgs) -> ReplayInfo {
    let last = replay.frames.last();
    let drivers = replay
        .driver_colors
        .iter()
        .map(|(code, rgb)| {
            let snapshot = last.and_then(|f| f.drivers.get(code));
            DriverInfo {
                code: code.clone(),
                color: format!("#{:02X}{:02X}{:02X}", rgb.0, rgb.1, rgb.2),
                final_position: snapshot.map(|s| s.position),
                retired: snapshot.is_some_and(|s| s.is_out),
            }
        })
        .collect();

    let events = if args.events {
        sync_engine::extract_race_events(&replay.frames, &replay.flag_windows, replay.fps)
    } else {
        Vec::new()
    };

    ReplayInfo {
        event_name: replay.info.event_name.clone(),
        fps: replay.fps,
        frames: replay.frame_count(),
        duration_s: replay.max_time(),
        total_laps: replay.total_laps,
        track_length_m: replay.track_length_m,
        flag_windows: replay.flag_windows.len(),
        drs_zones: replay.drs_zones.len(),
        race_control_messages: replay.race_control_messages.len(),
        drivers,
        events,
    }
}

fn print_replay_info(info: &ReplayInfo, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                        Replay Summary                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Session");
    if !info.event_name.is_empty() {
        println!("   ├─ Event: {}", info.event_name);
    }
    println!("   ├─ Frames: {} @ {} fps", info.frames, info.fps);
    println!("   ├─ Duration: {:.1}s", info.duration_s);
    println!("   ├─ Laps: {}", info.total_laps);
    println!("   ├─ Track length: {:.1}", info.track_length_m);
    println!("   ├─ Flag windows: {}", info.flag_windows);
    println!("   ├─ DRS zones: {}", info.drs_zones);
    println!("   └─ Race control messages: {}", info.race_control_messages);

    let mut drivers: Vec<&DriverInfo> = info.drivers.iter().collect();
    drivers.sort_by_key(|d| d.final_position.unwrap_or(u32::MAX));

    println!("\nDrivers ({})", drivers.len());
    for (i, driver) in drivers.iter().enumerate() {
        let prefix = if i + 1 == drivers.len() { "└─" } else { "├─" };
        let position = driver
            .final_position
            .map(|p| format!("P{p}"))
            .unwrap_or_else(|| "-".to_string());
        let status = if driver.retired { " (out)" } else { "" };
        println!(
            "   {} {:<4} {} {}{}",
            prefix, position, driver.code, driver.color, status
        );
    }

    if args.events {
        println!("\nEvents ({})", info.events.len());
        for (i, event) in info.events.iter().enumerate() {
            let prefix = if i + 1 == info.events.len() { "└─" } else { "├─" };
            let span = match event.end_frame {
                Some(end) => format!("frames {}..={}", event.frame, end),
                None => format!("frame {}", event.frame),
            };
            println!(
                "   {} lap {:>3}  {:<10} {} ({})",
                prefix,
                event.lap,
                event_name(&event.kind),
                event_label(event),
                span
            );
        }
    }

    println!();
}

fn event_name(kind: &RaceEventKind) -> &'static str {
    match kind {
        RaceEventKind::Dnf => "DNF",
        RaceEventKind::YellowFlag => "YELLOW",
        RaceEventKind::SafetyCar => "SC",
        RaceEventKind::RedFlag => "RED",
        RaceEventKind::Vsc => "VSC",
        RaceEventKind::Overtake { .. } => "OVERTAKE",
        RaceEventKind::PitStop => "PIT",
    }
}

fn event_label(event: &RaceEvent) -> String {
    match &event.kind {
        RaceEventKind::Overtake { overtaken } => format!("{} on {}", event.label, overtaken),
        _ => event.label.clone(),
    }
}
