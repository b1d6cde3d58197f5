//! Per-tick ranking.

use std::cmp::Ordering;

/// One driver's ranking inputs at a tick
#[derive(Debug, Clone, Copy)]
pub struct RankEntry<'a> {
    pub code: &'a str,
    pub progress_m: f64,
    pub grid_position: Option<u32>,
}

/// Indices of `entries` in finishing order.
///
/// Descending progress with ties broken by code. With `grid_order` set the
/// field is ordered by starting slot instead; drivers without one go last.
pub fn rank(entries: &[RankEntry<'_>], grid_order: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    if grid_order {
        order.sort_by(|&a, &b| {
            let (a, b) = (&entries[a], &entries[b]);
            let slot = |e: &RankEntry<'_>| e.grid_position.unwrap_or(u32::MAX);
            slot(a).cmp(&slot(b)).then_with(|| a.code.cmp(b.code))
        });
    } else {
        order.sort_by(|&a, &b| {
            let (a, b) = (&entries[a], &entries[b]);
            b.progress_m
                .partial_cmp(&a.progress_m)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.code.cmp(b.code))
        });
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, progress_m: f64, grid_position: Option<u32>) -> RankEntry<'_> {
        RankEntry {
            code,
            progress_m,
            grid_position,
        }
    }

    #[test]
    fn test_rank_by_progress() {
        let entries = [
            entry("AAA", 100.0, Some(1)),
            entry("BBB", 250.0, Some(2)),
            entry("CCC", 100.0, Some(3)),
        ];
        assert_eq!(rank(&entries, false), vec![1, 0, 2]);
    }

    #[test]
    fn test_rank_by_grid() {
        let entries = [
            entry("ZZZ", 5.0, None),
            entry("BBB", -3.0, Some(2)),
            entry("AAA", 0.0, None),
            entry("CCC", 1.0, Some(1)),
        ];
        assert_eq!(rank(&entries, true), vec![3, 1, 2, 0]);
    }
}
