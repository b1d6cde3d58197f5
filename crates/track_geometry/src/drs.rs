//! DRS zone extraction from the reference lap.

use contracts::{DrsZone, ReferencePoint, TrackPoint};

/// DRS state values at or above this mean the flap is open
pub const DRS_OPEN_THRESHOLD: u8 = 10;

/// Contiguous index ranges of `points` where DRS is open.
///
/// A zone still open at the last point closes there.
pub fn extract_drs_zones(points: &[ReferencePoint]) -> Vec<DrsZone> {
    let mut zones = Vec::new();
    let mut open: Option<usize> = None;

    for (i, p) in points.iter().enumerate() {
        let active = p.drs_state >= DRS_OPEN_THRESHOLD;
        match (open, active) {
            (None, true) => open = Some(i),
            (Some(start), false) => {
                zones.push(zone(points, start, i - 1));
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        zones.push(zone(points, start, points.len() - 1));
    }

    zones
}

fn zone(points: &[ReferencePoint], start_index: usize, end_index: usize) -> DrsZone {
    let at = |i: usize| TrackPoint::new(points[i].x, points[i].y);
    DrsZone {
        start_index,
        end_index,
        start: at(start_index),
        end: at(end_index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lap(states: &[u8]) -> Vec<ReferencePoint> {
        states
            .iter()
            .enumerate()
            .map(|(i, &drs_state)| ReferencePoint {
                x: i as f64,
                y: 0.0,
                drs_state,
            })
            .collect()
    }

    #[test]
    fn test_two_zones() {
        let zones = extract_drs_zones(&lap(&[0, 0, 10, 12, 14, 8, 0, 12, 12, 0]));
        assert_eq!(zones.len(), 2);
        assert_eq!((zones[0].start_index, zones[0].end_index), (2, 4));
        assert_eq!((zones[1].start_index, zones[1].end_index), (7, 8));
        assert_eq!(zones[0].start, TrackPoint::new(2.0, 0.0));
        assert_eq!(zones[1].end, TrackPoint::new(8.0, 0.0));
    }

    #[test]
    fn test_zone_open_at_end() {
        let zones = extract_drs_zones(&lap(&[0, 12, 12]));
        assert_eq!(zones.len(), 1);
        assert_eq!((zones[0].start_index, zones[0].end_index), (1, 2));
    }

    #[test]
    fn test_no_zones() {
        assert!(extract_drs_zones(&lap(&[0, 1, 8, 9])).is_empty());
        assert!(extract_drs_zones(&[]).is_empty());
    }
}
