//! Time gaps from the leader's progress curve.

/// Leader's (progress -> time) curve, made non-decreasing by a running maximum
#[derive(Debug, Clone)]
pub struct LeaderCurve {
    times: Vec<f64>,
    progress: Vec<f64>,
}

impl LeaderCurve {
    pub fn new(times: &[f64], progress: &[f64]) -> Self {
        let mut peak = f64::NEG_INFINITY;
        let progress = progress
            .iter()
            .map(|&p| {
                peak = peak.max(p);
                peak
            })
            .collect();
        Self {
            times: times.to_vec(),
            progress,
        }
    }

    /// Time at which the leader first reached `progress`.
    ///
    /// Interpolates between the bracketing ticks; clamps to the first time below
    /// the curve and to the last time beyond it.
    pub fn time_at(&self, progress: f64) -> f64 {
        let n = self.progress.len().min(self.times.len());
        if n == 0 {
            return 0.0;
        }

        let j = self.progress[..n].partition_point(|&p| p < progress);
        if j == 0 {
            return self.times[0];
        }
        if j == n {
            return self.times[n - 1];
        }

        let (p0, p1) = (self.progress[j - 1], self.progress[j]);
        let (t0, t1) = (self.times[j - 1], self.times[j]);
        if p1 > p0 {
            t0 + (t1 - t0) * (progress - p0) / (p1 - p0)
        } else {
            t1
        }
    }

    /// Seconds the leader was ahead of a car at `progress` at time `t`, >= 0
    pub fn gap(&self, t: f64, progress: f64) -> f64 {
        (t - self.time_at(progress)).max(0.0)
    }
}

/// Interval to the car ahead for gaps listed in ranking order
pub fn intervals(gaps_in_order: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(gaps_in_order.len());
    for (i, &gap) in gaps_in_order.iter().enumerate() {
        if i == 0 {
            out.push(0.0);
        } else {
            out.push((gap - gaps_in_order[i - 1]).max(0.0));
        }
    }
    out
}
