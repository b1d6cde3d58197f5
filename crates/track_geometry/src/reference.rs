//! Reference lap selection.

use contracts::{DriverLaps, LapSample, ReferenceLap, ReferencePoint};

/// Minimum lap-fraction span of a lap that is not followed by another lap
const COMPLETE_LAP_SPAN: f64 = 0.9;

/// Fastest complete lap across all drivers, by telemetry duration.
///
/// Only complete laps qualify: a lap the same driver followed with a later lap,
/// or one whose `relative_distance` covers at least 90% of the circuit. A
/// retired driver's last partial lap is never picked. Laps with fewer than two
/// samples are skipped. Ties keep the first lap found in driver order.
pub fn fastest_reference_lap(drivers: &[DriverLaps]) -> Option<ReferenceLap> {
    let mut best: Option<(f64, &DriverLaps, usize)> = None;

    for driver in drivers {
        for (idx, lap) in driver.laps.iter().enumerate() {
            if !is_complete(driver, lap) {
                continue;
            }
            let Some(duration) = lap.duration_s() else {
                continue;
            };
            if !duration.is_finite() || duration <= 0.0 {
                continue;
            }
            match best {
                Some((fastest, _, _)) if duration >= fastest => {}
                _ => best = Some((duration, driver, idx)),
            }
        }
    }

    best.map(|(_, driver, idx)| {
        let lap = &driver.laps[idx];
        ReferenceLap {
            driver: Some(driver.code.clone()),
            lap_number: Some(lap.lap_number),
            points: lap
                .telemetry
                .iter()
                .map(|p| ReferencePoint {
                    x: p.x,
                    y: p.y,
                    drs_state: p.drs_state,
                })
                .collect(),
        }
    })
}

fn is_complete(driver: &DriverLaps, lap: &LapSample) -> bool {
    let followed = driver
        .laps
        .iter()
        .any(|other| other.lap_number > lap.lap_number && !other.telemetry.is_empty());
    if followed {
        return true;
    }
    match (lap.telemetry.first(), lap.telemetry.last()) {
        (Some(first), Some(last)) => {
            last.relative_distance - first.relative_distance >= COMPLETE_LAP_SPAN
        }
        _ => false,
    }
}
