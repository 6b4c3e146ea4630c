//! Drawing rasterization
//!
//! Flattens vector paths onto an opaque bitmap: white paper, then every path
//! in paint order stamped with the pen. The result is fully determined by
//! the paths, the canvas size and the pen, so identical input always yields
//! identical pixels.

use std::io::Cursor;

use image::ImageFormat;
use thiserror::Error;
use tracing::debug;

use crate::constants::PAPER;
use crate::pen::{PenEngine, PenPreset};
use crate::surface::CpuSurface;
use crate::types::{Path, Point};

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Rasterize paths with the default pen (5px black, round joins)
pub fn rasterize<'a>(
    paths: impl IntoIterator<Item = &'a Path>,
    width: u32,
    height: u32,
) -> CpuSurface {
    rasterize_with(paths, width, height, &PenPreset::default(), 1.0)
}

/// Rasterize paths with an explicit pen.
///
/// Path coordinates and the pen width are in logical pixels and are
/// multiplied by `scale` to land on the `width` x `height` physical surface.
/// A scale that is not a positive finite number is treated as 1.
pub fn rasterize_with<'a>(
    paths: impl IntoIterator<Item = &'a Path>,
    width: u32,
    height: u32,
    pen: &PenPreset,
    scale: f32,
) -> CpuSurface {
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        debug!("Invalid display scale {}, using 1", scale);
        1.0
    };

    let mut surface = CpuSurface::new(width, height);
    surface.clear(PAPER);

    let pen = pen.scaled(scale);
    let radius = pen.radius();
    let mut engine = PenEngine::new(pen.clone()).with_clip(width, height);
    let mut path_count = 0usize;
    let mut segment_count = 0usize;

    for path in paths {
        engine.begin_stroke();
        for &point in path.points() {
            let physical = Point::new(point.x * scale, point.y * scale);
            if let Some(segment) = engine.stroke_to(physical) {
                surface.stamp_segment(segment.from, segment.to, radius, pen.color);
                segment_count += 1;
            }
        }
        if let Some(dot) = engine.end_stroke() {
            surface.stamp_segment(dot.from, dot.to, radius, pen.color);
            segment_count += 1;
        }
        path_count += 1;
    }

    debug!(
        "Rasterized {} paths ({} segments) onto {}x{} surface at scale {}",
        path_count, segment_count, width, height, scale
    );
    surface
}

/// Encode a surface as PNG bytes
pub fn encode_png(surface: &CpuSurface) -> Result<Vec<u8>, RasterError> {
    let invalid = RasterError::InvalidSize {
        width: surface.width,
        height: surface.height,
    };
    if surface.width == 0 || surface.height == 0 {
        return Err(invalid);
    }
    let image = surface.to_rgba_image().ok_or(invalid)?;

    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Rasterize and encode in one step
pub fn render_png<'a>(
    paths: impl IntoIterator<Item = &'a Path>,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, RasterError> {
    render_png_scaled(paths, width, height, 1.0)
}

/// Rasterize logical-pixel paths onto a physical canvas and encode as PNG
pub fn render_png_scaled<'a>(
    paths: impl IntoIterator<Item = &'a Path>,
    width: u32,
    height: u32,
    scale: f32,
) -> Result<Vec<u8>, RasterError> {
    encode_png(&rasterize_with(paths, width, height, &PenPreset::default(), scale))
}
