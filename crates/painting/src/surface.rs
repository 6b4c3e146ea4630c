//! CPU surface for rasterizing strokes - 8-bit RGBA storage

use image::RgbaImage;

use crate::types::Point;

/// An 8-bit RGBA CPU surface (ARGB_8888 equivalent)
pub struct CpuSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a]
    pixels: Vec<[u8; 4]>,
}

impl CpuSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 0]; pixel_count],
        }
    }

    /// Clear the surface to a solid color
    pub fn clear(&mut self, color: [u8; 4]) {
        self.pixels.fill(color);
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        Some(self.pixels[index])
    }

    /// Set a pixel at the given coordinates
    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        self.pixels[index] = color;
    }

    /// Stamp a hard-edged filled circle.
    ///
    /// A pixel is covered when its center lies within `radius` of the dab
    /// center. Returns the affected region (x, y, width, height), or None if
    /// the dab is completely outside the surface.
    pub fn stamp_dab(
        &mut self,
        center_x: f32,
        center_y: f32,
        radius: f32,
        color: [u8; 4],
    ) -> Option<(u32, u32, u32, u32)> {
        if radius <= 0.0 || self.width == 0 || self.height == 0 {
            return None;
        }

        let x_min = (center_x - radius).floor().max(0.0);
        let y_min = (center_y - radius).floor().max(0.0);
        let x_max = (center_x + radius).ceil().min(self.width as f32);
        let y_max = (center_y + radius).ceil().min(self.height as f32);

        if x_min >= x_max || y_min >= y_max {
            return None;
        }

        let (x0, y0, x1, y1) = (x_min as u32, y_min as u32, x_max as u32, y_max as u32);
        let radius_sq = radius * radius;

        for y in y0..y1 {
            let dy = y as f32 + 0.5 - center_y;
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - center_x;
                if dx * dx + dy * dy <= radius_sq {
                    self.set_pixel(x, y, color);
                }
            }
        }

        Some((x0, y0, x1 - x0, y1 - y0))
    }

    /// Stamp a hard-edged capsule: the segment `from`-`to` swept by a circle.
    ///
    /// A pixel is covered when its center lies within `radius` of the
    /// segment, so the covered band has the same width along the whole
    /// segment. A zero-length segment is a dot. Returns the affected region
    /// like [`Self::stamp_dab`].
    pub fn stamp_segment(
        &mut self,
        from: Point,
        to: Point,
        radius: f32,
        color: [u8; 4],
    ) -> Option<(u32, u32, u32, u32)> {
        if from == to {
            return self.stamp_dab(from.x, from.y, radius, color);
        }
        if radius <= 0.0 || self.width == 0 || self.height == 0 {
            return None;
        }

        let (ax, ay) = (f64::from(from.x), f64::from(from.y));
        let (bx, by) = (f64::from(to.x), f64::from(to.y));
        let r = f64::from(radius);

        let x_min = (ax.min(bx) - r).floor().max(0.0);
        let y_min = (ay.min(by) - r).floor().max(0.0);
        let x_max = (ax.max(bx) + r).ceil().min(f64::from(self.width));
        let y_max = (ay.max(by) + r).ceil().min(f64::from(self.height));

        if !(x_min < x_max && y_min < y_max) {
            return None;
        }

        let (x0, y0, x1, y1) = (x_min as u32, y_min as u32, x_max as u32, y_max as u32);
        let (dx, dy) = (bx - ax, by - ay);
        let length_sq = dx * dx + dy * dy;
        let radius_sq = r * r;

        for y in y0..y1 {
            let py = f64::from(y) + 0.5;
            for x in x0..x1 {
                let px = f64::from(x) + 0.5;
                let t = if length_sq > 0.0 {
                    (((px - ax) * dx + (py - ay) * dy) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let ex = px - (ax + dx * t);
                let ey = py - (ay + dy * t);
                if ex * ex + ey * ey <= radius_sq {
                    self.set_pixel(x, y, color);
                }
            }
        }

        Some((x0, y0, x1 - x0, y1 - y0))
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Get direct access to pixel data
    #[inline]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Count pixels exactly matching `color`
    pub fn count_pixels(&self, color: [u8; 4]) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Copy into an `image` buffer for encoding
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.pixels.as_flattened().to_vec())
    }
}
