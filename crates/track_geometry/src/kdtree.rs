//! Static 2-d tree for nearest-neighbour lookup over the dense track polyline.

use nalgebra::Point2;

/// Balanced 2-d tree stored as an index permutation.
///
/// For a range `[lo, hi)` of `order`, the node is `order[lo + (hi - lo) / 2]`,
/// its left subtree is `[lo, mid)` and its right subtree `[mid + 1, hi)`. The
/// split axis alternates x / y with depth.
#[derive(Debug, Clone)]
pub struct KdTree {
    points: Vec<Point2<f64>>,
    order: Vec<usize>,
}

impl KdTree {
    /// Build the tree; O(n log n)
    pub fn build(points: Vec<Point2<f64>>) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        build_range(&points, &mut order, 0);
        Self { points, order }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the point closest to `query`; ties resolve to the lowest index
    pub fn nearest(&self, query: &Point2<f64>) -> Option<usize> {
        if self.points.is_empty() {
            return None;
        }
        let mut best = (f64::INFINITY, usize::MAX);
        self.search(0, self.order.len(), 0, query, &mut best);
        Some(best.1)
    }

    fn search(&self, lo: usize, hi: usize, depth: usize, query: &Point2<f64>, best: &mut (f64, usize)) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let idx = self.order[mid];
        let node = &self.points[idx];

        let d2 = (node - query).norm_squared();
        if d2 < best.0 || (d2 == best.0 && idx < best.1) {
            *best = (d2, idx);
        }

        let axis = depth % 2;
        let diff = query[axis] - node[axis];
        let (near, far) = if diff < 0.0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };

        self.search(near.0, near.1, depth + 1, query, best);
        if diff * diff <= best.0 {
            self.search(far.0, far.1, depth + 1, query, best);
        }
    }
}

fn build_range(points: &[Point2<f64>], slice: &mut [usize], depth: usize) {
    if slice.len() <= 1 {
        return;
    }
    let axis = depth % 2;
    let mid = slice.len() / 2;
    slice.select_nth_unstable_by(mid, |&a, &b| points[a][axis].total_cmp(&points[b][axis]));

    let (left, rest) = slice.split_at_mut(mid);
    build_range(points, left, depth + 1);
    build_range(points, &mut rest[1..], depth + 1);
}
