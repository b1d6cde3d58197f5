//! Driver timeline construction
//!
//! Concatenates a driver's laps into one time-ordered series with accumulated
//! race distance, and derives the global timeline spanning every driver.

use contracts::{BrakeScale, DriverLaps, ReplayError, Timeline, TyreCompound};

/// One concatenated sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineSample {
    /// Session time (seconds)
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub race_distance: f64,
    pub relative_distance: f64,
    pub speed_kph: f64,
    pub throttle_pct: f64,
    /// Normalized brake (0..100)
    pub brake_pct: f64,
    pub gear: u8,
    pub drs_state: u8,
    pub tyre_compound: TyreCompound,
    pub tyre_life_laps: f64,
    pub lap: u32,
}

/// A driver's laps concatenated, sorted by time, one sample per timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct DriverTimeline {
    pub code: String,
    pub samples: Vec<TimelineSample>,
    /// Samples discarded on timestamp collisions
    pub duplicates_dropped: usize,
}

impl DriverTimeline {
    /// Build the timeline of one driver.
    ///
    /// Race distance of a sample is its in-lap distance plus the final in-lap
    /// distance of every earlier lap. On exact timestamp collisions the later
    /// lap's sample wins. Laps without lap fractions get them from in-lap
    /// distance over the driver's longest lap.
    ///
    /// # Errors
    /// `MissingTelemetry` when no lap carries a usable sample.
    pub fn from_laps(driver: &DriverLaps, brake_scale: BrakeScale) -> Result<Self, ReplayError> {
        if !driver.has_telemetry() {
            return Err(ReplayError::missing_telemetry(
                &driver.code,
                "no lap carries telemetry",
            ));
        }
        let mut laps: Vec<_> = driver
            .laps
            .iter()
            .filter(|lap| !lap.telemetry.is_empty())
            .collect();
        laps.sort_by_key(|lap| lap.lap_number);

        let brake_factor = brake_factor(driver, brake_scale);
        // longest lap stands in for the circuit length when a feed omits lap fractions
        let lap_length = laps
            .iter()
            .map(|lap| lap.final_distance_m())
            .fold(0.0_f64, f64::max);
        let total: usize = laps.iter().map(|lap| lap.telemetry.len()).sum();
        let mut samples = Vec::with_capacity(total);
        let mut lap_offset = 0.0;

        for lap in laps {
            let derive_fraction =
                lap_length > 0.0 && lap.telemetry.iter().all(|p| p.relative_distance == 0.0);
            for point in &lap.telemetry {
                let relative_distance = if derive_fraction {
                    point.distance_m / lap_length
                } else {
                    point.relative_distance
                };
                samples.push(TimelineSample {
                    t: point.time_s,
                    x: point.x,
                    y: point.y,
                    race_distance: lap_offset + point.distance_m,
                    relative_distance,
                    speed_kph: point.speed_kph,
                    throttle_pct: point.throttle_pct,
                    brake_pct: (point.brake * brake_factor).clamp(0.0, 100.0),
                    gear: point.gear,
                    drs_state: point.drs_state,
                    tyre_compound: lap.tyre_compound,
                    tyre_life_laps: lap.tyre_life_laps,
                    lap: lap.lap_number,
                });
            }
            lap_offset += lap.final_distance_m();
        }

        samples.retain(|s| s.t.is_finite() && s.x.is_finite() && s.y.is_finite());
        if samples.is_empty() {
            return Err(ReplayError::missing_telemetry(
                &driver.code,
                "every sample has a non-finite time or position",
            ));
        }

        // stable: equal timestamps keep concatenation (lap) order
        samples.sort_by(|a, b| a.t.total_cmp(&b.t));

        let before = samples.len();
        let mut deduped: Vec<TimelineSample> = Vec::with_capacity(before);
        for sample in samples {
            match deduped.last_mut() {
                Some(last) if last.t == sample.t => *last = sample,
                _ => deduped.push(sample),
            }
        }

        Ok(Self {
            code: driver.code.clone(),
            duplicates_dropped: before - deduped.len(),
            samples: deduped,
        })
    }

    pub fn start_time(&self) -> f64 {
        self.samples.first().map(|s| s.t).unwrap_or(0.0)
    }

    pub fn end_time(&self) -> f64 {
        self.samples.last().map(|s| s.t).unwrap_or(0.0)
    }
}

/// Multiplier bringing the raw brake channel to 0..100
fn brake_factor(driver: &DriverLaps, scale: BrakeScale) -> f64 {
    match scale {
        BrakeScale::Percent => 1.0,
        BrakeScale::Fraction => 100.0,
        BrakeScale::Auto => {
            let peak = driver
                .laps
                .iter()
                .flat_map(|lap| lap.telemetry.iter())
                .map(|p| p.brake)
                .fold(0.0_f64, f64::max);
            if peak <= 1.0 {
                100.0
            } else {
                1.0
            }
        }
    }
}

/// Uniform timeline over `[t_min, t_max)` of all drivers, one tick every `1/fps` seconds.
///
/// # Errors
/// - `NoValidDrivers` when `timelines` is empty
/// - `InconsistentTimeline` when the bounds are empty or inverted
pub fn global_timeline(timelines: &[DriverTimeline], fps: u32) -> Result<Timeline, ReplayError> {
    if timelines.is_empty() {
        return Err(ReplayError::NoValidDrivers);
    }

    let t_min = timelines
        .iter()
        .map(DriverTimeline::start_time)
        .fold(f64::INFINITY, f64::min);
    let t_max = timelines
        .iter()
        .map(DriverTimeline::end_time)
        .fold(f64::NEG_INFINITY, f64::max);

    if !t_min.is_finite() || !t_max.is_finite() || t_max <= t_min || fps == 0 {
        return Err(ReplayError::InconsistentTimeline {
            start_s: t_min,
            end_s: t_max,
        });
    }

    let dt = 1.0 / f64::from(fps);
    let len = ((t_max - t_min) * f64::from(fps)).ceil() as usize;
    Ok(Timeline::new(t_min, dt, len))
}
