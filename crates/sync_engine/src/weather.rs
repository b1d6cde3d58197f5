//! Weather series interpolated onto frames.

use contracts::{RainState, WeatherSample, WeatherSnapshot};

/// Rainfall fraction at or above which a frame reports rain
const RAIN_THRESHOLD: f64 = 0.5;

/// Weather rows on the replay timeline, sorted by time
#[derive(Debug, Clone, Default)]
pub struct WeatherSeries {
    samples: Vec<WeatherSample>,
}

impl WeatherSeries {
    /// Shift `samples` so that `origin_s` maps to 0; `None` without usable rows
    pub fn new(samples: &[WeatherSample], origin_s: f64) -> Option<Self> {
        let mut samples: Vec<WeatherSample> = samples
            .iter()
            .filter(|s| s.time_s.is_finite())
            .map(|s| WeatherSample {
                time_s: s.time_s - origin_s,
                ..*s
            })
            .collect();
        if samples.is_empty() {
            return None;
        }
        samples.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
        Some(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Interpolated weather at relative time `t`, clamped to the series range
    pub fn at(&self, t: f64) -> WeatherSnapshot {
        let first = &self.samples[0];
        let last = &self.samples[self.samples.len() - 1];

        let (a, b, frac) = if t <= first.time_s {
            (first, first, 0.0)
        } else if t >= last.time_s {
            (last, last, 0.0)
        } else {
            // first index with time > t; 1..len by the guards above
            let j = self.samples.partition_point(|s| s.time_s <= t);
            let (a, b) = (&self.samples[j - 1], &self.samples[j]);
            let span = b.time_s - a.time_s;
            let frac = if span > 0.0 { (t - a.time_s) / span } else { 0.0 };
            (a, b, frac)
        };
        let lerp = |from: f64, to: f64| from + (to - from) * frac;
        let rain = |s: &WeatherSample| if s.rainfall { 1.0 } else { 0.0 };

        WeatherSnapshot {
            track_temp_c: lerp(a.track_temp_c, b.track_temp_c),
            air_temp_c: lerp(a.air_temp_c, b.air_temp_c),
            humidity_pct: lerp(a.humidity_pct, b.humidity_pct),
            wind_speed_mps: lerp(a.wind_speed_mps, b.wind_speed_mps),
            wind_direction_deg: lerp(a.wind_direction_deg, b.wind_direction_deg),
            rain_state: if lerp(rain(a), rain(b)) >= RAIN_THRESHOLD {
                RainState::Raining
            } else {
                RainState::Dry
            },
        }
    }
}
