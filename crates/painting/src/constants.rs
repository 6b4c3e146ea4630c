/// Pen diameter in logical pixels used for both on-screen and rasterized strokes.
pub const STROKE_WIDTH: f32 = 5.0;

/// Stroke color (opaque black, RGBA8).
pub const INK: [u8; 4] = [0, 0, 0, 255];

/// Canvas background (opaque white, RGBA8).
pub const PAPER: [u8; 4] = [255, 255, 255, 255];
