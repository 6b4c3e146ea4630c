//! Pen engine for stroke geometry
//!
//! A stroke is stamped as one capsule per segment: every pixel whose center
//! lies within the pen radius of the segment is inked. Consecutive capsules
//! share their end circles, so joins and caps are round, the width is the
//! same everywhere along the line, and a path renders as one connected line.
//!
//! Segments are clipped to the surface (grown by the pen radius) before they
//! are emitted, so the work per segment is bounded by the surface size no
//! matter how far off-canvas the input points lie.

use tracing::debug;

use crate::constants::{INK, STROKE_WIDTH};
use crate::types::{Path, Point};

/// Pen configuration
#[derive(Debug, Clone)]
pub struct PenPreset {
    /// Diameter in pixels
    pub width: f32,
    /// RGBA8 color
    pub color: [u8; 4],
}

impl Default for PenPreset {
    fn default() -> Self {
        Self {
            width: STROKE_WIDTH,
            color: INK,
        }
    }
}

impl PenPreset {
    pub fn new(width: f32, color: [u8; 4]) -> Self {
        Self {
            width: width.max(0.0),
            color,
        }
    }

    pub fn radius(&self) -> f32 {
        self.width / 2.0
    }

    /// The same pen with its width multiplied by a display scale
    pub fn scaled(&self, scale: f32) -> Self {
        Self::new(self.width * scale, self.color)
    }
}

/// One piece of stroke geometry to stamp. `from == to` is a dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSegment {
    pub from: Point,
    pub to: Point,
}

/// Axis-aligned clip rectangle in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
struct ClipRect {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

/// Turns a sequence of pen positions into clipped stroke segments.
pub struct PenEngine {
    preset: PenPreset,
    clip: Option<ClipRect>,
    /// Last finite input position (None if stroke not started)
    last_pos: Option<Point>,
    /// Whether the stroke has moved past its first point
    moved: bool,
}

impl PenEngine {
    pub fn new(preset: PenPreset) -> Self {
        Self {
            preset,
            clip: None,
            last_pos: None,
            moved: false,
        }
    }

    pub fn with_default_preset() -> Self {
        Self::new(PenPreset::default())
    }

    /// Only emit geometry that can touch a `width` x `height` surface
    pub fn with_clip(mut self, width: u32, height: u32) -> Self {
        let margin = f64::from(self.preset.radius());
        self.clip = Some(ClipRect {
            min_x: -margin,
            min_y: -margin,
            max_x: f64::from(width) + margin,
            max_y: f64::from(height) + margin,
        });
        self
    }

    pub fn preset(&self) -> &PenPreset {
        &self.preset
    }

    /// Start a new stroke
    pub fn begin_stroke(&mut self) {
        self.last_pos = None;
        self.moved = false;
    }

    /// Process one input position and return the segment to stamp, if any.
    ///
    /// Non-finite positions are dropped; the stroke continues from the last
    /// finite one.
    pub fn stroke_to(&mut self, point: Point) -> Option<StrokeSegment> {
        if !point.x.is_finite() || !point.y.is_finite() {
            debug!("PenEngine::stroke_to: non-finite point dropped");
            return None;
        }

        let Some(last) = self.last_pos.replace(point) else {
            return None;
        };
        self.moved = true;

        let segment = self.clip_segment(last, point);
        if segment.is_none() {
            debug!(
                "PenEngine::stroke_to: segment ({:.1}, {:.1}) -> ({:.1}, {:.1}) is off the surface",
                last.x, last.y, point.x, point.y
            );
        }
        segment
    }

    /// End the current stroke.
    ///
    /// A stroke that never moved past its first point ends as a dot.
    pub fn end_stroke(&mut self) -> Option<StrokeSegment> {
        let dot = match (self.last_pos, self.moved) {
            (Some(pos), false) => self.clip_segment(pos, pos),
            _ => None,
        };
        self.begin_stroke();
        dot
    }

    /// All segments for a complete path
    pub fn segments_for_path(&mut self, path: &Path) -> Vec<StrokeSegment> {
        self.begin_stroke();
        let mut segments = Vec::new();
        for &point in path.points() {
            segments.extend(self.stroke_to(point));
        }
        segments.extend(self.end_stroke());
        segments
    }

    /// Liang-Barsky clipping against the clip rectangle
    fn clip_segment(&self, from: Point, to: Point) -> Option<StrokeSegment> {
        let Some(clip) = self.clip else {
            return Some(StrokeSegment { from, to });
        };

        let (x0, y0) = (f64::from(from.x), f64::from(from.y));
        let dx = f64::from(to.x) - x0;
        let dy = f64::from(to.y) - y0;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;

        for (p, q) in [
            (-dx, x0 - clip.min_x),
            (dx, clip.max_x - x0),
            (-dy, y0 - clip.min_y),
            (dy, clip.max_y - y0),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        let at = |t: f64| {
            if t == 0.0 {
                from
            } else if t == 1.0 {
                to
            } else {
                Point::new((x0 + dx * t) as f32, (y0 + dy * t) as f32)
            }
        };
        Some(StrokeSegment {
            from: at(t0),
            to: at(t1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(from: (f32, f32), to: (f32, f32)) -> StrokeSegment {
        StrokeSegment {
            from: from.into(),
            to: to.into(),
        }
    }

    #[test]
    fn test_pen_preset_default() {
        let preset = PenPreset::default();
        assert_eq!(preset.width, 5.0);
        assert_eq!(preset.radius(), 2.5);
        assert_eq!(preset.color, [0, 0, 0, 255]);
    }

    #[test]
    fn test_pen_preset_scaled() {
        let preset = PenPreset::default().scaled(2.0);
        assert_eq!(preset.width, 10.0);
        assert_eq!(preset.color, INK);
        assert_eq!(PenPreset::default().scaled(-1.0).width, 0.0);
    }

    #[test]
    fn test_first_point_emits_nothing() {
        let mut engine = PenEngine::with_default_preset();
        engine.begin_stroke();
        assert!(engine.stroke_to(Point::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn test_each_move_emits_one_segment() {
        let mut engine = PenEngine::with_default_preset();
        engine.begin_stroke();
        engine.stroke_to(Point::new(0.0, 0.0));

        assert_eq!(
            engine.stroke_to(Point::new(50.0, 0.0)),
            Some(segment((0.0, 0.0), (50.0, 0.0)))
        );
        assert_eq!(
            engine.stroke_to(Point::new(50.0, 8.0)),
            Some(segment((50.0, 0.0), (50.0, 8.0)))
        );
        assert!(engine.end_stroke().is_none());
    }

    #[test]
    fn test_single_point_ends_as_dot() {
        let mut engine = PenEngine::with_default_preset();
        let dot = engine.segments_for_path(&Path::starting_at(Point::new(7.0, 3.0)));
        assert_eq!(dot, vec![segment((7.0, 3.0), (7.0, 3.0))]);
    }

    #[test]
    fn test_segments_for_empty_path() {
        let mut engine = PenEngine::with_default_preset();
        assert!(engine.segments_for_path(&Path::default()).is_empty());
    }

    #[test]
    fn test_far_segment_is_clipped_to_surface() {
        let mut engine = PenEngine::with_default_preset().with_clip(32, 32);
        let path = Path::from_points([Point::new(10.0, 10.0), Point::new(5.0e6, 10.0)]);

        let segments = engine.segments_for_path(&path);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].from, Point::new(10.0, 10.0));
        assert!((segments[0].to.x - 34.5).abs() < 0.01, "{:?}", segments[0]);
        assert_eq!(segments[0].to.y, 10.0);
    }

    #[test]
    fn test_segment_entering_surface_is_clipped_on_both_ends() {
        let mut engine = PenEngine::with_default_preset().with_clip(20, 20);
        let path = Path::from_points([Point::new(-1.0e9, 5.0), Point::new(1.0e9, 5.0)]);

        let segments = engine.segments_for_path(&path);
        assert_eq!(segments.len(), 1);
        assert!((segments[0].from.x + 2.5).abs() < 0.01);
        assert!((segments[0].to.x - 22.5).abs() < 0.01);
    }

    #[test]
    fn test_off_surface_geometry_is_skipped() {
        let mut engine = PenEngine::with_default_preset().with_clip(20, 20);
        let path = Path::from_points([
            Point::new(100.0, 100.0),
            Point::new(200.0, 100.0),
            Point::new(5.0, 5.0),
        ]);

        let segments = engine.segments_for_path(&path);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].to, Point::new(5.0, 5.0));

        let far_dot = engine.segments_for_path(&Path::starting_at(Point::new(-50.0, 5.0)));
        assert!(far_dot.is_empty());
    }

    #[test]
    fn test_non_finite_points_are_dropped() {
        let mut engine = PenEngine::with_default_preset().with_clip(20, 20);
        let path = Path::from_points([
            Point::new(2.0, 2.0),
            Point::new(f32::INFINITY, 2.0),
            Point::new(f32::NAN, 3.0),
            Point::new(12.0, 2.0),
        ]);

        assert_eq!(
            engine.segments_for_path(&path),
            vec![segment((2.0, 2.0), (12.0, 2.0))]
        );
    }
}
