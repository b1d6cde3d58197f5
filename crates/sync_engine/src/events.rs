//! Race events for progress bars and event logs.

use std::collections::{BTreeMap, BTreeSet};

use contracts::{FlagWindow, Frame, RaceEvent, RaceEventKind, TrackStatus};

/// Frames averaged before a candidate pit stop
const PIT_WINDOW_FRAMES: usize = 10;
const PIT_APPROACH_KPH: f64 = 100.0;
const PIT_STOPPED_KPH: f64 = 40.0;
const PIT_DROP_KPH: f64 = 50.0;
/// Repeats of one event for the same drivers inside this window collapse
const REPEAT_WINDOW_S: f64 = 5.0;

/// Timeline events derived from a synthesized frame sequence. Sorted by frame.
///
/// - DNF where a driver's `is_out` first turns true
/// - one event per caution flag window, spanning its frame range
/// - overtakes: a driver gains a place on a car that was ahead and is now
///   behind; retired cars being passed do not count
/// - pit stops: speed falls below 40 km/h from a 10-frame mean above
///   100 km/h, and the car later runs above 100 km/h again
pub fn extract_race_events(frames: &[Frame], windows: &[FlagWindow], fps: u32) -> Vec<RaceEvent> {
    let Some(last_frame) = frames.len().checked_sub(1) else {
        return Vec::new();
    };
    let mut events = Vec::new();

    let mut retired: BTreeSet<&str> = BTreeSet::new();
    for (index, frame) in frames.iter().enumerate() {
        for (code, snapshot) in &frame.drivers {
            if snapshot.is_out && retired.insert(code.as_str()) {
                events.push(RaceEvent {
                    kind: RaceEventKind::Dnf,
                    frame: index,
                    end_frame: None,
                    lap: snapshot.lap,
                    label: code.clone(),
                });
            }
        }
    }

    let fps = f64::from(fps);
    let to_frame = |t: f64| ((t * fps).max(0.0) as usize).min(last_frame);
    for window in windows {
        let kind = match window.status {
            TrackStatus::Yellow => RaceEventKind::YellowFlag,
            TrackStatus::SafetyCar => RaceEventKind::SafetyCar,
            TrackStatus::Red => RaceEventKind::RedFlag,
            TrackStatus::VscDeployed | TrackStatus::VscEnding => RaceEventKind::Vsc,
            _ => continue,
        };
        if window.start_s * fps > last_frame as f64 {
            continue;
        }
        let frame = to_frame(window.start_s);
        events.push(RaceEvent {
            kind,
            frame,
            end_frame: Some(window.end_s.map_or(last_frame, to_frame)),
            lap: frames[frame].lap,
            label: window.status.to_string(),
        });
    }

    detect_overtakes(frames, &mut events);
    detect_pit_stops(frames, &mut events);

    events.sort_by_key(|e| e.frame);
    events
}

fn detect_overtakes(frames: &[Frame], events: &mut Vec<RaceEvent>) {
    let mut last_pass: BTreeMap<(&str, &str), f64> = BTreeMap::new();

    for (offset, pair) in frames.windows(2).enumerate() {
        let (prev, curr) = (&pair[0], &pair[1]);
        for (code, now) in &curr.drivers {
            let Some(before) = prev.drivers.get(code) else {
                continue;
            };
            if now.is_out || now.position >= before.position {
                continue;
            }
            // closest car that was ahead and has dropped behind
            let passed = prev
                .drivers
                .iter()
                .filter(|(other, was)| *other != code && was.position < before.position)
                .filter(|(other, _)| {
                    curr.drivers
                        .get(*other)
                        .is_some_and(|o| !o.is_out && o.position > now.position)
                })
                .max_by_key(|(_, was)| was.position);
            let Some((passed, _)) = passed else {
                continue;
            };

            let key = (code.as_str(), passed.as_str());
            if last_pass
                .get(&key)
                .is_some_and(|&t| curr.t - t < REPEAT_WINDOW_S)
            {
                continue;
            }
            last_pass.insert(key, curr.t);
            events.push(RaceEvent {
                kind: RaceEventKind::Overtake {
                    overtaken: passed.clone(),
                },
                frame: offset + 1,
                end_frame: None,
                lap: now.lap,
                label: code.clone(),
            });
        }
    }
}

fn detect_pit_stops(frames: &[Frame], events: &mut Vec<RaceEvent>) {
    if frames.len() <= PIT_WINDOW_FRAMES {
        return;
    }
    let codes: BTreeSet<&str> = frames
        .iter()
        .flat_map(|f| f.drivers.keys().map(String::as_str))
        .collect();

    for code in codes {
        let samples: Vec<Option<(f64, u32)>> = frames
            .iter()
            .map(|f| {
                f.drivers
                    .get(code)
                    .filter(|s| !s.is_out)
                    .map(|s| (s.speed_kph, s.lap))
            })
            .collect();
        // a car that never runs at speed again has stopped for good
        let Some(last_fast) = samples
            .iter()
            .rposition(|s| s.is_some_and(|(speed, _)| speed > PIT_APPROACH_KPH))
        else {
            continue;
        };

        let mut last_stop: Option<f64> = None;
        for index in PIT_WINDOW_FRAMES..last_fast {
            let Some((speed, lap)) = samples[index] else {
                continue;
            };
            let window: Vec<f64> = samples[index - PIT_WINDOW_FRAMES..index]
                .iter()
                .flatten()
                .map(|&(s, _)| s)
                .collect();
            if window.is_empty() {
                continue;
            }
            let mean = window.iter().sum::<f64>() / window.len() as f64;
            if mean <= PIT_APPROACH_KPH || speed >= PIT_STOPPED_KPH || mean - speed <= PIT_DROP_KPH {
                continue;
            }

            let t = frames[index].t;
            if last_stop.is_some_and(|s| t - s < REPEAT_WINDOW_S) {
                continue;
            }
            last_stop = Some(t);
            events.push(RaceEvent {
                kind: RaceEventKind::PitStop,
                frame: index,
                end_frame: None,
                lap,
                label: code.to_string(),
            });
        }
    }
}
