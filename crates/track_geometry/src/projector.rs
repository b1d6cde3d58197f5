//! Arc-length parametrized reference polyline with nearest-point projection.

use contracts::{ProjectorConfig, ReplayError, TrackPoint};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::kdtree::KdTree;

const MIN_TRACK_LENGTH: f64 = 1e-9;

/// Polyline orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// Axis-aligned extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    fn from_points<'a>(points: impl IntoIterator<Item = &'a TrackPoint>) -> Self {
        let mut bounds = Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for p in points {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        bounds
    }
}

/// Inner and outer edges offset from the centerline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackBoundaries {
    pub inner: Vec<TrackPoint>,
    pub outer: Vec<TrackPoint>,
    pub bounds: Bounds,
}

/// Track projector
///
/// Immutable once built; share it behind `Arc` across threads.
#[derive(Debug, Clone)]
pub struct TrackProjector {
    dense: Vec<Point2<f64>>,
    cumulative: Vec<f64>,
    tree: KdTree,
    length: f64,
}

impl TrackProjector {
    /// Build from a reference lap polyline.
    ///
    /// The polyline is densified to `config.dense_points` points by parametric
    /// interpolation over the sample index.
    ///
    /// # Errors
    /// `ProjectionFailure` for fewer than two points, non-finite coordinates or
    /// a zero-length polyline.
    #[instrument(
        name = "track_projector_build",
        skip(points, config),
        fields(points = points.len(), dense_points = config.dense_points)
    )]
    pub fn new(points: &[TrackPoint], config: &ProjectorConfig) -> Result<Self, ReplayError> {
        if points.len() < 2 {
            return Err(ReplayError::projection(format!(
                "reference lap needs at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some(bad) = points.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(ReplayError::projection(format!(
                "reference lap point {bad} has non-finite coordinates"
            )));
        }

        let dense = densify(points, config.dense_points.max(2));
        let mut cumulative = Vec::with_capacity(dense.len());
        cumulative.push(0.0);
        for pair in dense.windows(2) {
            let last = cumulative[cumulative.len() - 1];
            cumulative.push(last + (pair[1] - pair[0]).norm());
        }
        let length = cumulative[cumulative.len() - 1];
        if length <= MIN_TRACK_LENGTH {
            return Err(ReplayError::projection("reference lap has zero length"));
        }

        let tree = KdTree::build(dense.clone());
        debug!(length_m = length, "track projector built");

        Ok(Self {
            dense,
            cumulative,
            tree,
            length,
        })
    }

    /// Total arc length
    pub fn track_length(&self) -> f64 {
        self.length
    }

    /// Number of dense points
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Dense centerline
    pub fn centerline(&self) -> Vec<TrackPoint> {
        self.dense.iter().map(|p| TrackPoint::new(p.x, p.y)).collect()
    }

    /// Arc length from the start of the polyline to the point closest to `(x, y)`.
    ///
    /// The nearest dense point is refined by a clamped projection onto both
    /// adjacent segments; the closer foot wins.
    pub fn project(&self, x: f64, y: f64) -> f64 {
        let query = Point2::new(x, y);
        let Some(idx) = self.tree.nearest(&query) else {
            return 0.0;
        };

        let mut best = ((self.dense[idx] - query).norm_squared(), self.cumulative[idx]);
        if idx + 1 < self.dense.len() {
            let candidate = self.project_on_segment(idx, &query);
            if candidate.0 < best.0 {
                best = candidate;
            }
        }
        if idx > 0 {
            let candidate = self.project_on_segment(idx - 1, &query);
            if candidate.0 < best.0 {
                best = candidate;
            }
        }
        best.1
    }

    /// In-lap distance reconciled with the telemetry's lap fraction.
    ///
    /// A car on the grid behind the line projects near the end of the lap even
    /// though its lap fraction is near zero; such positions are moved back by one
    /// track length (and symmetrically forward). The result may therefore be
    /// negative or exceed `track_length`.
    pub fn project_in_lap(&self, x: f64, y: f64, relative_distance: f64) -> f64 {
        let projected = self.project(x, y);
        if !relative_distance.is_finite() {
            return projected;
        }
        let fraction = projected / self.length;
        if fraction - relative_distance > 0.5 {
            projected - self.length
        } else if relative_distance - fraction > 0.5 {
            projected + self.length
        } else {
            projected
        }
    }

    /// (squared distance to foot, arc length of foot) on segment `i -> i + 1`
    fn project_on_segment(&self, i: usize, query: &Point2<f64>) -> (f64, f64) {
        let a = self.dense[i];
        let segment = self.dense[i + 1] - a;
        let len2 = segment.norm_squared();
        let t = if len2 > 0.0 {
            ((query - a).dot(&segment) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let foot = a + segment * t;
        (
            (query - foot).norm_squared(),
            self.cumulative[i] + t * len2.sqrt(),
        )
    }

    /// Shoelace signed area including the closing edge; positive when counter-clockwise
    pub fn signed_area(&self) -> f64 {
        let n = self.dense.len();
        let mut twice_area = 0.0;
        for i in 0..n {
            let p = self.dense[i];
            let q = self.dense[(i + 1) % n];
            twice_area += p.x * q.y - q.x * p.y;
        }
        twice_area * 0.5
    }

    pub fn winding(&self) -> Winding {
        if self.signed_area() > 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }

    /// Unit normals pointing away from the enclosed area
    pub fn outward_normals(&self) -> Vec<Vector2<f64>> {
        let n = self.dense.len();
        let flip = self.winding() == Winding::CounterClockwise;

        (0..n)
            .map(|i| {
                let tangent = if i == 0 {
                    self.dense[1] - self.dense[0]
                } else if i == n - 1 {
                    self.dense[n - 1] - self.dense[n - 2]
                } else {
                    (self.dense[i + 1] - self.dense[i - 1]) * 0.5
                };
                let norm = tangent.norm();
                let norm = if norm > 0.0 { norm } else { 1.0 };
                // left-hand normal points inward on a counter-clockwise loop
                let left = Vector2::new(-tangent.y / norm, tangent.x / norm);
                if flip {
                    -left
                } else {
                    left
                }
            })
            .collect()
    }

    /// Inner and outer edges at `track_width / 2` from the centerline
    pub fn boundaries(&self, track_width: f64) -> TrackBoundaries {
        let half = track_width * 0.5;
        let normals = self.outward_normals();
        let (inner, outer): (Vec<_>, Vec<_>) = self
            .dense
            .iter()
            .zip(&normals)
            .map(|(p, n)| {
                let inner = p - n * half;
                let outer = p + n * half;
                (
                    TrackPoint::new(inner.x, inner.y),
                    TrackPoint::new(outer.x, outer.y),
                )
            })
            .unzip();
        let bounds = Bounds::from_points(inner.iter().chain(outer.iter()));

        TrackBoundaries {
            inner,
            outer,
            bounds,
        }
    }
}

/// Resample `points` to `count` points, linear in the sample index
fn densify(points: &[TrackPoint], count: usize) -> Vec<Point2<f64>> {
    let last = points.len() - 1;
    (0..count)
        .map(|k| {
            let u = k as f64 * last as f64 / (count - 1) as f64;
            let i = (u.floor() as usize).min(last - 1);
            let frac = u - i as f64;
            let a = points[i];
            let b = points[i + 1];
            Point2::new(a.x + (b.x - a.x) * frac, a.y + (b.y - a.y) * frac)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Closed 25 x 25 square, counter-clockwise, one point per meter
    fn square_loop() -> Vec<TrackPoint> {
        (0..=100)
            .map(|d| {
                let d = d as f64;
                match d {
                    d if d <= 25.0 => TrackPoint::new(d, 0.0),
                    d if d <= 50.0 => TrackPoint::new(25.0, d - 25.0),
                    d if d <= 75.0 => TrackPoint::new(75.0 - d, 25.0),
                    d => TrackPoint::new(0.0, 100.0 - d),
                }
            })
            .collect()
    }

    fn config(dense_points: usize) -> ProjectorConfig {
        ProjectorConfig {
            dense_points,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_degenerate_input() {
        let err = TrackProjector::new(&[TrackPoint::new(0.0, 0.0)], &config(100)).unwrap_err();
        assert!(matches!(err, ReplayError::ProjectionFailure { .. }));

        let same = vec![TrackPoint::new(1.0, 1.0); 5];
        assert!(TrackProjector::new(&same, &config(100)).is_err());

        let nan = vec![TrackPoint::new(0.0, 0.0), TrackPoint::new(f64::NAN, 1.0)];
        assert!(TrackProjector::new(&nan, &config(100)).is_err());
    }

    #[test]
    fn test_track_length() {
        let projector = TrackProjector::new(&square_loop(), &config(2001)).unwrap();
        assert!((projector.track_length() - 100.0).abs() < 1e-9);
        assert_eq!(projector.len(), 2001);
    }

    #[test]
    fn test_projection_on_and_off_track() {
        let projector = TrackProjector::new(&square_loop(), &config(401)).unwrap();
        assert!((projector.project(10.0, 0.0) - 10.0).abs() < 1e-9);
        assert!((projector.project(25.0, 12.5) - 37.5).abs() < 1e-9);
        // half a meter outside the bottom edge
        assert!((projector.project(13.3, -0.5) - 13.3).abs() < 1e-9);
        // inside the top edge
        assert!((projector.project(20.0, 24.0) - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_projection_between_dense_points() {
        // 11 dense points along a straight: 10 m spacing
        let line = vec![TrackPoint::new(0.0, 0.0), TrackPoint::new(100.0, 0.0)];
        let projector = TrackProjector::new(&line, &config(11)).unwrap();
        // nearest dense point is 40; the foot lies behind it
        assert!((projector.project(37.0, 3.0) - 37.0).abs() < 1e-9);
        assert!((projector.project(44.0, -3.0) - 44.0).abs() < 1e-9);
        // clamped before the start and after the end
        assert_eq!(projector.project(-20.0, 0.0), 0.0);
        assert!((projector.project(150.0, 0.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_project_in_lap_unwraps_seam() {
        let projector = TrackProjector::new(&square_loop(), &config(401)).unwrap();
        // two meters before the line, telemetry says start of lap
        let behind = projector.project_in_lap(0.0, 2.0, 0.0);
        assert!((behind - -2.0).abs() < 1e-9);
        // just after the line, telemetry says end of lap
        let ahead = projector.project_in_lap(1.0, 0.0, 0.99);
        assert!((ahead - 101.0).abs() < 1e-9);
        // consistent values are untouched
        assert!((projector.project_in_lap(10.0, 0.0, 0.1) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_winding_and_normals() {
        let projector = TrackProjector::new(&square_loop(), &config(401)).unwrap();
        assert!((projector.signed_area() - 625.0).abs() < 1e-6);
        assert_eq!(projector.winding(), Winding::CounterClockwise);

        // bottom edge: outward is -y
        let normals = projector.outward_normals();
        let n = normals[40];
        assert!(n.x.abs() < 1e-9 && (n.y + 1.0).abs() < 1e-9);

        let reversed: Vec<TrackPoint> = square_loop().into_iter().rev().collect();
        let projector = TrackProjector::new(&reversed, &config(401)).unwrap();
        assert_eq!(projector.winding(), Winding::Clockwise);
        // still outward after reversing direction
        let n = projector.outward_normals()[400 - 40];
        assert!(n.x.abs() < 1e-9 && (n.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_boundaries_offset() {
        let projector = TrackProjector::new(&square_loop(), &config(401)).unwrap();
        let edges = projector.boundaries(2.0);
        assert_eq!(edges.inner.len(), 401);
        // dense point 40 is (10, 0)
        assert!((edges.outer[40].y - -1.0).abs() < 1e-9);
        assert!((edges.inner[40].y - 1.0).abs() < 1e-9);
        assert!((edges.bounds.min_y - -1.0).abs() < 1e-9);
        assert!((edges.bounds.max_x - 26.0).abs() < 1e-9);
    }
}
