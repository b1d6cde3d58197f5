//! Resampling onto the uniform timeline.

use contracts::{ResampledTrack, Timeline};

use crate::timeline::{DriverTimeline, TimelineSample};

/// Resample one driver onto `timeline`.
///
/// Continuous channels are linearly interpolated and clamp flat outside the
/// driver's own time range. Discrete channels take the last sample at or before
/// the tick (the first sample before the driver's data begins).
///
/// `relative_distance` is blended as `(lap - 1) + fraction` and stored relative
/// to the tick's (stepped) lap, so between the line crossing and the first
/// sample of the next lap it runs slightly past 1 instead of collapsing to the
/// midpoint of the two fractions.
///
/// Pure: identical input produces an identical track.
pub fn resample(driver: &DriverTimeline, timeline: &Timeline) -> ResampledTrack {
    let n = timeline.len();
    let mut track = ResampledTrack {
        code: driver.code.clone(),
        x: Vec::with_capacity(n),
        y: Vec::with_capacity(n),
        race_distance: Vec::with_capacity(n),
        relative_distance: Vec::with_capacity(n),
        speed_kph: Vec::with_capacity(n),
        throttle_pct: Vec::with_capacity(n),
        brake_pct: Vec::with_capacity(n),
        gear: Vec::with_capacity(n),
        drs_state: Vec::with_capacity(n),
        tyre_compound: Vec::with_capacity(n),
        tyre_life_laps: Vec::with_capacity(n),
        lap: Vec::with_capacity(n),
        last_sample_s: timeline.relative(driver.end_time()),
    };

    let samples = &driver.samples;
    if samples.is_empty() {
        return track;
    }

    let mut cursor = 0usize;
    for i in 0..n {
        let t = timeline.session_time_at(i);
        while cursor + 1 < samples.len() && samples[cursor + 1].t <= t {
            cursor += 1;
        }

        let current = &samples[cursor];
        let (a, b, frac) = if t <= samples[0].t || cursor + 1 == samples.len() {
            (current, current, 0.0)
        } else {
            let next = &samples[cursor + 1];
            (current, next, (t - current.t) / (next.t - current.t))
        };
        push_tick(&mut track, a, b, frac);
    }

    track
}

fn push_tick(track: &mut ResampledTrack, a: &TimelineSample, b: &TimelineSample, frac: f64) {
    let lerp = |from: f64, to: f64| from + (to - from) * frac;

    track.x.push(lerp(a.x, b.x));
    track.y.push(lerp(a.y, b.y));
    track.race_distance.push(lerp(a.race_distance, b.race_distance));
    // unwrapped across the line: lap fraction relative to `a.lap`
    let lap_step = f64::from(b.lap) - f64::from(a.lap);
    track
        .relative_distance
        .push(lerp(a.relative_distance, b.relative_distance + lap_step));
    track.speed_kph.push(lerp(a.speed_kph, b.speed_kph));
    track.throttle_pct.push(lerp(a.throttle_pct, b.throttle_pct));
    track.brake_pct.push(lerp(a.brake_pct, b.brake_pct));

    // never blend discrete states
    track.gear.push(a.gear);
    track.drs_state.push(a.drs_state);
    track.tyre_compound.push(a.tyre_compound);
    track.tyre_life_laps.push(a.tyre_life_laps);
    track.lap.push(a.lap);
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{BrakeScale, DriverLaps, LapSample, TelemetryPoint, TyreCompound};

    fn driver_timeline(points: &[(f64, f64, u8, u32)]) -> DriverTimeline {
        let mut laps: Vec<LapSample> = Vec::new();
        for &(t, d, gear, lap) in points {
            if laps.last().map(|l| l.lap_number) != Some(lap) {
                laps.push(LapSample {
                    lap_number: lap,
                    tyre_compound: TyreCompound::Medium,
                    ..Default::default()
                });
            }
            if let Some(current) = laps.last_mut() {
                current.telemetry.push(TelemetryPoint {
                    time_s: t,
                    x: d,
                    y: -d,
                    distance_m: d,
                    speed_kph: d * 2.0,
                    gear,
                    ..Default::default()
                });
            }
        }
        DriverTimeline::from_laps(
            &DriverLaps {
                code: "TST".into(),
                laps,
                ..Default::default()
            },
            BrakeScale::Auto,
        )
        .unwrap()
    }

    #[test]
    fn test_linear_interpolation() {
        let tl = driver_timeline(&[(0.0, 0.0, 1, 1), (1.0, 10.0, 2, 1)]);
        let timeline = Timeline::new(0.0, 0.25, 4);
        let track = resample(&tl, &timeline);
        assert_eq!(track.len(), 4);
        assert_eq!(track.x, vec![0.0, 2.5, 5.0, 7.5]);
        assert_eq!(track.y, vec![0.0, -2.5, -5.0, -7.5]);
        assert_eq!(track.speed_kph[2], 10.0);
    }

    #[test]
    fn test_discrete_nearest_previous() {
        let tl = driver_timeline(&[(0.0, 0.0, 3, 1), (1.0, 10.0, 4, 1), (2.0, 20.0, 5, 1)]);
        let timeline = Timeline::new(0.0, 0.5, 5);
        let track = resample(&tl, &timeline);
        // ticks at 0.0, 0.5, 1.0, 1.5, 2.0
        assert_eq!(track.gear, vec![3, 3, 4, 4, 5]);
    }

    #[test]
    fn test_clamps_outside_driver_range() {
        let tl = driver_timeline(&[(2.0, 50.0, 6, 1), (3.0, 60.0, 7, 1)]);
        // global timeline starts earlier and ends later than this driver
        let timeline = Timeline::new(0.0, 1.0, 6);
        let track = resample(&tl, &timeline);
        assert_eq!(track.race_distance, vec![50.0, 50.0, 50.0, 60.0, 60.0, 60.0]);
        assert_eq!(track.gear, vec![6, 6, 6, 7, 7, 7]);
        assert_eq!(track.last_sample_s, 3.0);
    }

    #[test]
    fn test_lap_boundary_is_step() {
        let tl = driver_timeline(&[(0.0, 0.0, 1, 1), (1.0, 100.0, 1, 1), (2.0, 0.0, 1, 2)]);
        let timeline = Timeline::new(0.0, 0.5, 5);
        let track = resample(&tl, &timeline);
        assert_eq!(track.lap, vec![1, 1, 1, 1, 2]);
        // race distance continues from the previous lap instead of resetting
        assert_eq!(track.race_distance, vec![0.0, 50.0, 100.0, 100.0, 100.0]);
    }

    #[test]
    fn test_lap_fraction_unwraps_across_the_line() {
        let lap_point = |t: f64, d: f64, rel: f64| TelemetryPoint {
            time_s: t,
            x: d,
            distance_m: d,
            relative_distance: rel,
            ..Default::default()
        };
        // last sample of lap 1 just before the line, first of lap 2 already past it
        let laps = vec![
            LapSample {
                lap_number: 1,
                telemetry: vec![lap_point(8.0, 98.0, 0.98), lap_point(8.25, 99.6, 0.996)],
                ..Default::default()
            },
            LapSample {
                lap_number: 2,
                telemetry: vec![lap_point(8.5, 0.8, 0.008), lap_point(8.75, 2.0, 0.02)],
                ..Default::default()
            },
        ];
        let tl = DriverTimeline::from_laps(
            &DriverLaps {
                code: "AAA".into(),
                laps,
                ..Default::default()
            },
            BrakeScale::Auto,
        )
        .unwrap();
        let timeline = Timeline::new(8.25, 0.125, 4);
        let track = resample(&tl, &timeline);

        assert_eq!(track.lap, vec![1, 1, 2, 2]);
        assert!((track.relative_distance[0] - 0.996).abs() < 1e-9);
        // halfway between 0.996 and 1.008, not between 0.996 and 0.008
        assert!((track.relative_distance[1] - 1.002).abs() < 1e-9);
        assert!((track.relative_distance[2] - 0.008).abs() < 1e-9);
        assert!((track.relative_distance[3] - 0.014).abs() < 1e-9);
    }

    #[test]
    fn test_noisy_telemetry_keeps_distance_monotonic() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let (mut t, mut d) = (0.0, 0.0);
        let mut points = Vec::new();
        for _ in 0..200 {
            t += rng.random_range(0.05..0.3);
            d += rng.random_range(0.0..5.0);
            points.push((t, d, rng.random_range(1..=8u8), 1));
        }

        let tl = driver_timeline(&points);
        let timeline = Timeline::new(0.0, 0.04, (t / 0.04) as usize + 10);
        let track = resample(&tl, &timeline);
        assert!(track.race_distance.windows(2).all(|w| w[1] >= w[0]));
        assert!(track.gear.iter().all(|g| (1..=8).contains(g)));
        assert_eq!(*track.race_distance.last().unwrap(), d);
    }

    #[test]
    fn test_resample_is_deterministic() {
        let tl = driver_timeline(&[(0.0, 0.0, 1, 1), (0.7, 13.0, 2, 1), (1.9, 41.0, 3, 1)]);
        let timeline = Timeline::new(0.0, 0.04, 48);
        let first = resample(&tl, &timeline);
        let second = resample(&tl, &timeline);
        assert_eq!(first, second);
    }
}
