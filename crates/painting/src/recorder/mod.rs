//! Stroke recorder for the drawing canvas.
//!
//! The recorder owns the committed [`Drawing`] plus at most one in-progress
//! [`Path`]. It is driven by the three pointer callbacks of a drag gesture:
//!
//! ```text
//! pointer_down(p) -> in-progress = [p]
//! pointer_move(p) -> in-progress.push(p)
//! pointer_up()    -> drawing.push(in-progress), returns drawing snapshot
//! ```
//!
//! Out-of-order callbacks (a move or release without a press, a second
//! press while a stroke is open) are ignored.

mod events;

pub use events::CanvasEvent;

use tracing::debug;

use crate::types::{Drawing, Path, Point};

type Listener = Box<dyn Fn(&CanvasEvent) + Send + Sync>;

/// Records pointer gestures into a [`Drawing`].
#[derive(Default)]
pub struct StrokeRecorder {
    drawing: Drawing,
    current: Option<Path>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for StrokeRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrokeRecorder")
            .field("committed", &self.drawing.len())
            .field("current_points", &self.current.as_ref().map(|p| p.len()))
            .field("listener_count", &self.listeners.len())
            .finish()
    }
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new stroke at `point`
    pub fn pointer_down(&mut self, point: Point) {
        if self.current.is_some() {
            debug!("pointer_down: stroke already in progress, ignoring");
            return;
        }
        debug!("Stroke started at ({:.1}, {:.1})", point.x, point.y);
        self.current = Some(Path::starting_at(point));
        self.emit(CanvasEvent::StrokeStarted { start: point });
    }

    /// Extend the in-progress stroke to `point`
    pub fn pointer_move(&mut self, point: Point) {
        let Some(path) = self.current.as_mut() else {
            debug!("pointer_move: no active stroke, ignoring");
            return;
        };
        path.line_to(point);
        let points = path.len();
        self.emit(CanvasEvent::StrokeExtended { point, points });
    }

    /// Commit the in-progress stroke.
    ///
    /// Returns a snapshot of the whole drawing including the new path, or
    /// `None` when no stroke was in progress (nothing should be dispatched).
    pub fn pointer_up(&mut self) -> Option<Drawing> {
        let Some(path) = self.current.take() else {
            debug!("pointer_up: no active stroke, ignoring");
            return None;
        };
        let points = path.len();
        self.drawing.commit(path);
        let index = self.drawing.len() - 1;
        debug!("Stroke {} committed ({} points)", index, points);
        self.emit(CanvasEvent::StrokeCommitted { index, points });
        Some(self.drawing.clone())
    }

    /// Discard every committed path and the in-progress one
    pub fn clear(&mut self) {
        self.drawing.clear();
        self.current = None;
        debug!("Canvas cleared");
        self.emit(CanvasEvent::Cleared);
    }

    /// Committed paths
    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    /// The stroke currently being drawn, if any
    pub fn current(&self) -> Option<&Path> {
        self.current.as_ref()
    }

    /// Check if a stroke is currently in progress
    pub fn is_stroking(&self) -> bool {
        self.current.is_some()
    }

    /// Paths as the live canvas shows them: committed ones in order, then
    /// the in-progress stroke on top.
    pub fn visible_paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.drawing.iter().chain(self.current.iter())
    }

    /// Register an observer called after every mutation
    pub fn add_event_listener<F>(&mut self, listener: F)
    where
        F: Fn(&CanvasEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, event: CanvasEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_down_moves_up_commits_one_path() {
        let mut recorder = StrokeRecorder::new();
        recorder.pointer_down(Point::new(1.0, 2.0));
        for i in 0..5 {
            recorder.pointer_move(Point::new(10.0 + i as f32, 20.0));
        }
        let snapshot = recorder.pointer_up().expect("stroke should commit");

        assert_eq!(snapshot.len(), 1);
        let path = snapshot.get(0).unwrap();
        assert_eq!(path.len(), 6);
        assert_eq!(path.points()[0], Point::new(1.0, 2.0));
        assert_eq!(path.points()[5], Point::new(14.0, 20.0));
        assert!(!recorder.is_stroking());
    }

    #[test]
    fn test_straight_stroke_has_two_points() {
        let mut recorder = StrokeRecorder::new();
        recorder.pointer_down(Point::new(0.0, 0.0));
        recorder.pointer_move(Point::new(10.0, 0.0));
        let snapshot = recorder.pointer_up().unwrap();
        assert_eq!(snapshot.get(0).unwrap().points(), &[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0)
        ]);
    }

    #[test]
    fn test_tap_commits_single_point_path() {
        let mut recorder = StrokeRecorder::new();
        recorder.pointer_down(Point::new(5.0, 5.0));
        let snapshot = recorder.pointer_up().unwrap();
        assert_eq!(snapshot.get(0).unwrap().len(), 1);
    }

    #[test]
    fn test_up_without_down_returns_none() {
        let mut recorder = StrokeRecorder::new();
        assert!(recorder.pointer_up().is_none());
        assert!(recorder.drawing().is_empty());
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut recorder = StrokeRecorder::new();
        recorder.pointer_move(Point::new(3.0, 3.0));
        assert!(recorder.current().is_none());
    }

    #[test]
    fn test_second_down_is_ignored() {
        let mut recorder = StrokeRecorder::new();
        recorder.pointer_down(Point::new(0.0, 0.0));
        recorder.pointer_move(Point::new(1.0, 0.0));
        recorder.pointer_down(Point::new(50.0, 50.0));

        let path = recorder.current().unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.points()[0], Point::new(0.0, 0.0));
    }

    #[test]
    fn test_committed_paths_unchanged_by_later_strokes() {
        let mut recorder = StrokeRecorder::new();
        recorder.pointer_down(Point::new(0.0, 0.0));
        recorder.pointer_move(Point::new(1.0, 1.0));
        let first = recorder.pointer_up().unwrap();

        recorder.pointer_down(Point::new(5.0, 5.0));
        recorder.pointer_move(Point::new(6.0, 6.0));
        recorder.pointer_move(Point::new(7.0, 7.0));
        let second = recorder.pointer_up().unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert_eq!(first.get(0), second.get(0));
        assert_eq!(second.get(1).unwrap().len(), 3);
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut recorder = StrokeRecorder::new();
        recorder.pointer_down(Point::new(0.0, 0.0));
        recorder.pointer_up();
        recorder.pointer_down(Point::new(1.0, 1.0));

        recorder.clear();

        assert!(recorder.drawing().is_empty());
        assert!(!recorder.is_stroking());
        assert!(recorder.pointer_up().is_none());
    }

    #[test]
    fn test_visible_paths_include_current() {
        let mut recorder = StrokeRecorder::new();
        recorder.pointer_down(Point::new(0.0, 0.0));
        recorder.pointer_up();
        recorder.pointer_down(Point::new(9.0, 9.0));

        let visible: Vec<_> = recorder.visible_paths().collect();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[1].points()[0], Point::new(9.0, 9.0));
    }

    #[test]
    fn test_event_listener() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);

        let mut recorder = StrokeRecorder::new();
        recorder.add_event_listener(move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        recorder.pointer_down(Point::new(0.0, 0.0));
        recorder.pointer_move(Point::new(2.0, 0.0));
        recorder.pointer_up();
        recorder.clear();

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                CanvasEvent::StrokeStarted {
                    start: Point::new(0.0, 0.0)
                },
                CanvasEvent::StrokeExtended {
                    point: Point::new(2.0, 0.0),
                    points: 2
                },
                CanvasEvent::StrokeCommitted {
                    index: 0,
                    points: 2
                },
                CanvasEvent::Cleared,
            ]
        );
    }
}
