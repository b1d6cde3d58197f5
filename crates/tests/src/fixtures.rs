//! Synthetic sessions on a 25 m x 25 m square circuit.

use std::collections::BTreeMap;

use contracts::{
    DriverLaps, LapSample, ReferenceLap, ReferencePoint, ReplayConfig, SessionData, SessionInfo,
    TelemetryPoint, TyreCompound,
};

/// Perimeter of the square circuit
pub const LAP_LENGTH_M: f64 = 100.0;

const SIDE_M: f64 = 25.0;

/// Telemetry rows per second
pub const SAMPLE_RATE_HZ: u32 = 10;

/// Position on the circuit after `distance_m` meters, start line at the origin.
pub fn square_point(distance_m: f64) -> (f64, f64) {
    let s = distance_m.rem_euclid(LAP_LENGTH_M);
    match (s / SIDE_M) as u32 {
        0 => (s, 0.0),
        1 => (SIDE_M, s - SIDE_M),
        2 => (3.0 * SIDE_M - s, SIDE_M),
        _ => (0.0, LAP_LENGTH_M - s),
    }
}

/// Closed reference lap, one point per meter; DRS open on the first straight
pub fn square_reference() -> ReferenceLap {
    let points = (0..=100)
        .map(|m| {
            let (x, y) = square_point(f64::from(m));
            ReferencePoint {
                x,
                y,
                drs_state: if (5..=15).contains(&m) { 12 } else { 0 },
            }
        })
        .collect();
    ReferenceLap {
        driver: None,
        lap_number: None,
        points,
    }
}

/// Driver lapping the square; `distance_at` maps session time to race distance.
///
/// Sampling stops once `laps` are complete or after `until_s`.
pub fn driver_on_square(
    code: &str,
    laps: u32,
    until_s: f64,
    distance_at: impl Fn(f64) -> f64,
) -> DriverLaps {
    let total_m = f64::from(laps) * LAP_LENGTH_M;
    let dt = 1.0 / f64::from(SAMPLE_RATE_HZ);
    let mut out: Vec<LapSample> = Vec::new();

    for k in 0u32.. {
        let t = f64::from(k) / f64::from(SAMPLE_RATE_HZ);
        if t > until_s {
            break;
        }
        let d = distance_at(t);
        if d >= total_m {
            break;
        }
        let lap_number = (d / LAP_LENGTH_M).floor() as u32 + 1;
        let in_lap = d - f64::from(lap_number - 1) * LAP_LENGTH_M;
        let (x, y) = square_point(d);
        let speed_kph = (distance_at(t + dt) - d) / dt * 3.6;

        if out.last().map(|l| l.lap_number) != Some(lap_number) {
            out.push(LapSample {
                lap_number,
                tyre_compound: TyreCompound::Medium,
                tyre_life_laps: f64::from(lap_number),
                telemetry: Vec::new(),
            });
        }
        if let Some(lap) = out.last_mut() {
            lap.telemetry.push(TelemetryPoint {
                time_s: t,
                x,
                y,
                distance_m: in_lap,
                relative_distance: in_lap / LAP_LENGTH_M,
                speed_kph,
                gear: 5,
                drs_state: 0,
                throttle_pct: 100.0,
                brake: 0.0,
            });
        }
    }

    DriverLaps {
        code: code.to_string(),
        laps: out,
        grid_position: None,
        dnf: false,
    }
}

/// Constant-speed driver
pub fn steady_driver(code: &str, laps: u32, speed_mps: f64) -> DriverLaps {
    driver_on_square(code, laps, f64::INFINITY, move |t| t * speed_mps)
}

/// Session on the square circuit with an explicit reference lap
pub fn session(event_name: &str, drivers: Vec<DriverLaps>) -> SessionData {
    SessionData {
        info: SessionInfo {
            event_name: event_name.to_string(),
            year: Some(2024),
            round: Some(1),
            session_kind: "R".to_string(),
        },
        drivers,
        driver_colors: BTreeMap::new(),
        reference_lap: Some(square_reference()),
        ..Default::default()
    }
}

/// Configuration sized for the square circuit, no grid ordering
pub fn config(fps: u32) -> ReplayConfig {
    let mut config = ReplayConfig::default();
    config.fps = fps;
    config.projector.dense_points = 401;
    config.projector.track_width = 2.0;
    config.synthesizer.grid_order_threshold_m = 0.0;
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_point_corners() {
        assert_eq!(square_point(0.0), (0.0, 0.0));
        assert_eq!(square_point(25.0), (25.0, 0.0));
        assert_eq!(square_point(50.0), (25.0, 25.0));
        assert_eq!(square_point(75.0), (0.0, 25.0));
        assert_eq!(square_point(110.0), (10.0, 0.0));
    }

    #[test]
    fn test_steady_driver_laps() {
        let driver = steady_driver("AAA", 2, 10.0);
        assert_eq!(driver.laps.len(), 2);
        assert_eq!(driver.laps[0].telemetry.len(), 100);
        assert_eq!(driver.laps[1].telemetry[0].time_s, 10.0);
        assert_eq!(driver.laps[1].telemetry[0].distance_m, 0.0);
    }
}
