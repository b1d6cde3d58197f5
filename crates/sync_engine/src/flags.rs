//! Flag windows and race-control messages on the replay timeline.

use contracts::{FlagWindow, RaceControlMessage, TrackStatus, TrackStatusEvent};

/// Build flag windows from a status transition table.
///
/// Transitions are sorted by time and shifted so that `origin_s` maps to 0.
/// Each window ends where the next transition starts; the last one is open.
/// Consecutive transitions to the same status extend the current window.
pub fn build_flag_windows(events: &[TrackStatusEvent], origin_s: f64) -> Vec<FlagWindow> {
    let mut sorted: Vec<&TrackStatusEvent> =
        events.iter().filter(|e| e.time_s.is_finite()).collect();
    sorted.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));

    let mut windows: Vec<FlagWindow> = Vec::with_capacity(sorted.len());
    for event in sorted {
        let status = TrackStatus::from_code(&event.status_code);
        let start = event.time_s - origin_s;

        if let Some(last) = windows.last_mut() {
            if last.status == status {
                continue;
            }
            last.end_s = Some(start);
        }
        windows.push(FlagWindow::new(status, start, None));
    }

    windows
}

/// Status of the first window containing `t`
pub fn active_status(windows: &[FlagWindow], t: f64) -> Option<&TrackStatus> {
    windows.iter().find(|w| w.contains(t)).map(|w| &w.status)
}

/// Shift race-control messages onto the timeline, ordered by time
pub fn shift_race_control(
    messages: &[RaceControlMessage],
    origin_s: f64,
) -> Vec<RaceControlMessage> {
    let mut shifted: Vec<RaceControlMessage> = messages
        .iter()
        .filter(|m| m.time_s.is_finite())
        .map(|m| RaceControlMessage {
            time_s: m.time_s - origin_s,
            ..m.clone()
        })
        .collect();
    shifted.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(time_s: f64, code: &str) -> TrackStatusEvent {
        TrackStatusEvent {
            time_s,
            status_code: code.to_string(),
        }
    }

    #[test]
    fn test_windows_from_transitions() {
        let windows = build_flag_windows(
            &[event(110.0, "1"), event(160.0, "2"), event(190.0, "1")],
            110.0,
        );
        assert_eq!(
            windows,
            vec![
                FlagWindow::new(TrackStatus::Green, 0.0, Some(50.0)),
                FlagWindow::new(TrackStatus::Yellow, 50.0, Some(80.0)),
                FlagWindow::new(TrackStatus::Green, 80.0, None),
            ]
        );
    }

    #[test]
    fn test_unsorted_and_repeated_transitions() {
        let windows = build_flag_windows(
            &[event(30.0, "4"), event(0.0, "1"), event(10.0, "1"), event(f64::NAN, "5")],
            0.0,
        );
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0], FlagWindow::new(TrackStatus::Green, 0.0, Some(30.0)));
        assert_eq!(windows[1].status, TrackStatus::SafetyCar);
        assert!(build_flag_windows(&[], 0.0).is_empty());
    }

    #[test]
    fn test_active_status_lookup() {
        let windows = vec![
            FlagWindow::new(TrackStatus::Green, 0.0, Some(50.0)),
            FlagWindow::new(TrackStatus::Yellow, 50.0, Some(80.0)),
            FlagWindow::new(TrackStatus::Green, 80.0, None),
        ];
        assert_eq!(active_status(&windows, 65.0), Some(&TrackStatus::Yellow));
        assert_eq!(active_status(&windows, 90.0), Some(&TrackStatus::Green));
        assert_eq!(active_status(&windows, 50.0), Some(&TrackStatus::Yellow));
        assert_eq!(active_status(&windows, -1.0), None);
    }

    #[test]
    fn test_shift_race_control() {
        let messages = vec![
            RaceControlMessage {
                time_s: 130.0,
                category: "Flag".into(),
                message: "GREEN LIGHT".into(),
                flag: Some("GREEN".into()),
            },
            RaceControlMessage {
                time_s: 120.0,
                category: "Other".into(),
                message: "PIT EXIT OPEN".into(),
                flag: None,
            },
        ];
        let shifted = shift_race_control(&messages, 100.0);
        assert_eq!(shifted[0].time_s, 20.0);
        assert_eq!(shifted[0].message, "PIT EXIT OPEN");
        assert_eq!(shifted[1].time_s, 30.0);
    }
}
