//! Events emitted by the stroke recorder after each mutation.

use crate::types::Point;

/// Canvas lifecycle events.
///
/// These let a renderer (or any other observer) follow the drawing without
/// polling the recorder after every pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// A new in-progress path was started.
    StrokeStarted { start: Point },
    /// The in-progress path gained a point; `points` is its new length.
    StrokeExtended { point: Point, points: usize },
    /// The in-progress path was committed at `index` in the drawing.
    StrokeCommitted { index: usize, points: usize },
    /// Drawing and in-progress path were discarded.
    Cleared,
}
