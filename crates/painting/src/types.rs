use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A pointer position in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// One continuous stroke: a move-to followed by straight line-to segments.
///
/// Paths only grow while the pointer is down. Once committed to a
/// [`Drawing`] they are shared behind an `Arc` and never mutated again.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    /// Start a path at the given point
    pub fn starting_at(start: Point) -> Self {
        Self {
            points: vec![start],
        }
    }

    /// Build a path from a list of points (first point is the move-to)
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Extend the path with a straight segment to `point`
    pub fn line_to(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate the straight segments of the path in order
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Ordered collection of committed paths. Insertion order is paint order.
///
/// Cloning is cheap: paths are reference counted, so a snapshot handed to
/// the dispatcher shares storage with the recorder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Drawing {
    paths: Vec<Arc<Path>>,
}

impl Drawing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> + '_ {
        self.paths.iter().map(|p| p.as_ref())
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(|p| p.as_ref())
    }

    /// Total number of points across all paths
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(|p| p.len()).sum()
    }

    pub(crate) fn commit(&mut self, path: Path) {
        self.paths.push(Arc::new(path));
    }

    pub(crate) fn clear(&mut self) {
        self.paths.clear();
    }
}

impl FromIterator<Path> for Drawing {
    fn from_iter<I: IntoIterator<Item = Path>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Arc::new).collect(),
        }
    }
}
