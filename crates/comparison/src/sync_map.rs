//! SyncMap construction per alignment mode.

use std::collections::BTreeMap;

use contracts::{Frame, ReplayData, ReplayError, SyncMap, SyncMode, SyncPair};

/// Pair frames lap by lap.
///
/// For every lap number present in both sessions, the sparser lap range is
/// sampled index-proportionally onto the denser one: one pair per frame of
/// the denser range.
pub fn build_lap_map(a: &ReplayData, b: &ReplayData) -> Result<SyncMap, ReplayError> {
    let common = a.total_laps.min(b.total_laps);
    if common == 0 {
        return Err(ReplayError::sync_unavailable(
            SyncMode::Lap,
            format!("total laps are {} and {}", a.total_laps, b.total_laps),
        ));
    }

    let laps_a = frames_by_lap(&a.frames);
    let laps_b = frames_by_lap(&b.frames);

    let mut map = SyncMap::new();
    for lap in 1..=common {
        let (Some(range_a), Some(range_b)) = (laps_a.get(&lap), laps_b.get(&lap)) else {
            continue;
        };
        if range_a.len() >= range_b.len() {
            for (i, &frame_a) in range_a.iter().enumerate() {
                let frame_b = range_b[i * range_b.len() / range_a.len()];
                map.push(SyncPair::new(frame_a, frame_b));
            }
        } else {
            for (i, &frame_b) in range_b.iter().enumerate() {
                let frame_a = range_a[i * range_a.len() / range_b.len()];
                map.push(SyncPair::new(frame_a, frame_b));
            }
        }
    }

    if map.is_empty() {
        return Err(ReplayError::sync_unavailable(
            SyncMode::Lap,
            "no lap is present in both sessions",
        ));
    }
    Ok(map)
}

/// Pair every frame of A up to the shorter session's end with the
/// nearest-timestamp frame of B; the earlier frame wins ties.
pub fn build_time_map(a: &ReplayData, b: &ReplayData) -> Result<SyncMap, ReplayError> {
    ensure_frames(SyncMode::Time, a, b)?;
    let horizon = a.max_time().min(b.max_time());

    let mut map = SyncMap::new();
    let mut j = 0;
    for (i, frame) in a.frames.iter().enumerate() {
        if frame.t > horizon {
            break;
        }
        while j + 1 < b.frames.len()
            && (b.frames[j + 1].t - frame.t).abs() < (b.frames[j].t - frame.t).abs()
        {
            j += 1;
        }
        map.push(SyncPair::new(i, j));
    }
    Ok(map)
}

/// Pair every frame of A with the frame of B whose leader progress, in laps,
/// is closest.
///
/// Both progress curves pass through a running maximum, so a single forward
/// scan suffices and the B indices never decrease. The earlier frame wins ties.
pub fn build_distance_map(a: &ReplayData, b: &ReplayData) -> Result<SyncMap, ReplayError> {
    ensure_frames(SyncMode::Distance, a, b)?;
    if a.track_length_m <= 0.0 || b.track_length_m <= 0.0 {
        return Err(ReplayError::sync_unavailable(
            SyncMode::Distance,
            "track length is unknown",
        ));
    }

    let progress_a = leader_progress(a);
    let progress_b = leader_progress(b);

    // first index of the plateau each B frame belongs to
    let mut plateau = Vec::with_capacity(progress_b.len());
    for k in 0..progress_b.len() {
        if k > 0 && progress_b[k] == progress_b[k - 1] {
            plateau.push(plateau[k - 1]);
        } else {
            plateau.push(k);
        }
    }

    let last = progress_b.len() - 1;
    let mut map = SyncMap::with_capacity(progress_a.len());
    let mut j = 0;
    for (i, &target) in progress_a.iter().enumerate() {
        while j < progress_b.len() && progress_b[j] < target {
            j += 1;
        }
        let frame_b = if j == 0 {
            0
        } else if j > last {
            plateau[last]
        } else {
            let below = plateau[j - 1];
            if target - progress_b[below] <= progress_b[j] - target {
                below
            } else {
                j
            }
        };
        map.push(SyncPair::new(i, frame_b));
    }
    Ok(map)
}

/// Frame indices per leader lap, in frame order
fn frames_by_lap(frames: &[Frame]) -> BTreeMap<u32, Vec<usize>> {
    let mut laps: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, frame) in frames.iter().enumerate() {
        laps.entry(frame.lap).or_default().push(i);
    }
    laps
}

/// Leader progress in laps with a running maximum applied
fn leader_progress(replay: &ReplayData) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    replay
        .frames
        .iter()
        .map(|frame| {
            let p = frame.leader_progress_laps(replay.track_length_m);
            if p > peak {
                peak = p;
            }
            peak
        })
        .collect()
}

fn ensure_frames(mode: SyncMode, a: &ReplayData, b: &ReplayData) -> Result<(), ReplayError> {
    if a.frames.is_empty() || b.frames.is_empty() {
        return Err(ReplayError::sync_unavailable(
            mode,
            format!("sessions have {} and {} frames", a.frames.len(), b.frames.len()),
        ));
    }
    Ok(())
}
