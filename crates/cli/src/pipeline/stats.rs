//! Build statistics.

use std::path::PathBuf;
use std::time::Duration;

use observability::BuildMetricsAggregator;

/// Statistics from a replay build
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Event name from the session info
    pub event_name: String,

    /// Frames written
    pub frames: usize,

    /// Timeline frame rate
    pub fps: u32,

    /// Drivers present in the replay
    pub drivers: usize,

    /// Drivers dropped for missing telemetry
    pub drivers_excluded: usize,

    pub total_laps: u32,

    pub track_length_m: f64,

    pub flag_windows: usize,

    pub drs_zones: usize,

    pub output_path: PathBuf,

    /// Wall-clock duration of the build
    pub duration: Duration,

    /// Per-frame aggregates
    pub frame_metrics: BuildMetricsAggregator,
}

impl BuildStats {
    /// Replay duration in seconds
    pub fn replay_seconds(&self) -> f64 {
        if self.fps > 0 {
            self.frames as f64 / f64::from(self.fps)
        } else {
            0.0
        }
    }

    /// Frames synthesized per wall-clock second
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Replay Build Statistics                   ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("Overview");
        if !self.event_name.is_empty() {
            println!("   ├─ Event: {}", self.event_name);
        }
        println!("   ├─ Build time: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Frames: {} @ {} fps ({:.1}s)", self.frames, self.fps, self.replay_seconds());
        println!("   ├─ Throughput: {:.0} frames/s", self.throughput());
        println!("   ├─ Drivers: {} ({} excluded)", self.drivers, self.drivers_excluded);
        println!("   ├─ Laps: {}", self.total_laps);
        println!("   ├─ Track length: {:.1}", self.track_length_m);
        println!("   ├─ Flag windows: {}", self.flag_windows);
        println!("   ├─ DRS zones: {}", self.drs_zones);
        println!("   └─ Output: {}", self.output_path.display());

        let summary = self.frame_metrics.summary();

        println!("\nFrame Metrics");
        println!(
            "   ├─ Caution frames: {} ({:.2}%)",
            summary.caution_frames, summary.caution_rate
        );
        println!("   ├─ Gap to leader (s): {}", summary.gap_to_leader_s);
        println!("   ├─ Interval (s): {}", summary.interval_to_ahead_s);
        println!("   └─ Leader speed (km/h): {}", summary.leader_speed_kph);

        if !summary.retirements.is_empty() {
            println!("\nRetirements");
            for (code, frame) in &summary.retirements {
                println!("   ├─ {}: frame {}", code, frame);
            }
        }

        println!();
    }
}
