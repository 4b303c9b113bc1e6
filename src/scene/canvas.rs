//! A tiny software canvas for painting textures at startup.
//!
//! Shapes are rasterised with signed-distance coverage, which gives
//! one-pixel antialiasing without a path renderer.

use glam::Vec2;

use super::texture::Image;

/// Straight-alpha RGBA color in 8-bit channels.
pub type Rgba = [u8; 4];

/// RGBA8 drawing surface backed by an [`Image`].
#[derive(Debug, Clone)]
pub struct Canvas {
    image: Image,
}

impl Canvas {
    /// Transparent canvas of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: Image::filled(width, height, [0; 4]),
        }
    }

    /// Canvas filled with an opaque background.
    #[must_use]
    pub fn with_background(width: u32, height: u32, rgba: Rgba) -> Self {
        Self {
            image: Image::filled(width, height, rgba),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Finish painting and hand back the image.
    #[must_use]
    pub fn into_image(self) -> Image {
        self.image
    }

    /// Read-only view of the pixels painted so far.
    #[must_use]
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Composite `rgba` over the pixel at `(x, y)` with extra `coverage`.
    pub fn blend_pixel(&mut self, x: i32, y: i32, rgba: Rgba, coverage: f32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let Some(dst) = self.image.pixel(x, y) else {
            return;
        };
        let src_a = f32::from(rgba[3]) / 255.0 * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst_a = f32::from(dst[3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mut out = [0u8; 4];
        for c in 0..3 {
            let s = f32::from(rgba[c]);
            let d = f32::from(dst[c]);
            let v = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            out[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        out[3] = (out_a * 255.0).round() as u8;
        self.image.set_pixel(x, y, out);
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rgba: Rgba) {
        self.fill_rounded_rect(x, y, w, h, 0.0, rgba);
    }

    /// Fill a rectangle with rounded corners of radius `r`.
    pub fn fill_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        r: f32,
        rgba: Rgba,
    ) {
        self.shade_rounded_rect(x, y, w, h, r, rgba, |d| 0.5 - d);
    }

    /// Stroke the outline of a rounded rectangle, centred on its edge.
    pub fn stroke_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        r: f32,
        thickness: f32,
        rgba: Rgba,
    ) {
        let half = thickness * 0.5;
        self.shade_rounded_rect(x, y, w, h, r, rgba, |d| 0.5 - (d.abs() - half));
    }

    /// Fill a circle centred at `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, rgba: Rgba) {
        let x0 = (cx - radius - 1.0).floor() as i32;
        let x1 = (cx + radius + 1.0).ceil() as i32;
        let y0 = (cy - radius - 1.0).floor() as i32;
        let y1 = (cy + radius + 1.0).ceil() as i32;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let d = p.distance(Vec2::new(cx, cy)) - radius;
                self.blend_pixel(px, py, rgba, 0.5 - d);
            }
        }
    }

    /// Blit an 8-bit coverage mask (e.g. a rasterised glyph) in `rgba`.
    pub fn draw_coverage(
        &mut self,
        x: i32,
        y: i32,
        width: usize,
        mask: &[u8],
        rgba: Rgba,
    ) {
        if width == 0 {
            return;
        }
        for (i, &m) in mask.iter().enumerate() {
            if m == 0 {
                continue;
            }
            let px = x + (i % width) as i32;
            let py = y + (i / width) as i32;
            self.blend_pixel(px, py, rgba, f32::from(m) / 255.0);
        }
    }

    /// Composite `image` with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, x: i32, y: i32, image: &Image) {
        for iy in 0..image.height() {
            for ix in 0..image.width() {
                if let Some(rgba) = image.pixel(ix, iy) {
                    self.blend_pixel(x + ix as i32, y + iy as i32, rgba, 1.0);
                }
            }
        }
    }

    /// Stroke a straight segment with round caps.
    pub fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, rgba: Rgba) {
        let half = width * 0.5;
        let min = a.min(b) - Vec2::splat(half + 1.0);
        let max = a.max(b) + Vec2::splat(half + 1.0);
        let ab = b - a;
        let len_sq = ab.length_squared().max(f32::EPSILON);
        for py in min.y.floor() as i32..=max.y.ceil() as i32 {
            for px in min.x.floor() as i32..=max.x.ceil() as i32 {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
                let d = p.distance(a + ab * t) - half;
                self.blend_pixel(px, py, rgba, 0.5 - d);
            }
        }
    }

    fn shade_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        r: f32,
        rgba: Rgba,
        coverage: impl Fn(f32) -> f32,
    ) {
        let half = Vec2::new(w, h) * 0.5;
        let center = Vec2::new(x, y) + half;
        let r = r.clamp(0.0, half.min_element());
        let x0 = (x - 2.0).floor() as i32;
        let x1 = (x + w + 2.0).ceil() as i32;
        let y0 = (y - 2.0).floor() as i32;
        let y1 = (y + h + 2.0).ceil() as i32;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5) - center;
                let d = rounded_box_sdf(p, half, r);
                self.blend_pixel(px, py, rgba, coverage(d));
            }
        }
    }
}

/// Signed distance from `p` to a box of half-extent `half` with corner
/// radius `r`, both centred on the origin.
fn rounded_box_sdf(p: Vec2, half: Vec2, r: f32) -> f32 {
    let q = p.abs() - half + Vec2::splat(r);
    q.max(Vec2::ZERO).length() + q.max_element().min(0.0) - r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_covers_interior_only() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_rect(2.0, 2.0, 4.0, 4.0, [255, 0, 0, 255]);
        let image = canvas.into_image();
        assert_eq!(image.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(image.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(image.pixel(7, 7), Some([0, 0, 0, 0]));
    }

    #[test]
    fn half_transparent_over_opaque_mixes() {
        let mut canvas = Canvas::with_background(1, 1, [0, 0, 255, 255]);
        canvas.blend_pixel(0, 0, [255, 0, 0, 128], 1.0);
        let [r, _, b, a] = canvas.image().pixel(0, 0).unwrap_or_default();
        assert_eq!(a, 255);
        assert!(r > 120 && r < 135);
        assert!(b > 120 && b < 135);
    }

    #[test]
    fn stroke_leaves_center_empty() {
        let mut canvas = Canvas::new(20, 20);
        canvas.stroke_rounded_rect(2.0, 2.0, 16.0, 16.0, 3.0, 2.0, [0, 0, 0, 255]);
        let image = canvas.into_image();
        assert_eq!(image.pixel(10, 10).map(|p| p[3]), Some(0));
        assert_eq!(image.pixel(10, 2).map(|p| p[3]), Some(255));
    }

    #[test]
    fn image_blit_keeps_transparent_texels_out() {
        let mut stamp = Canvas::new(2, 1);
        stamp.fill_rect(0.0, 0.0, 1.0, 1.0, [0, 255, 0, 255]);
        let stamp = stamp.into_image();
        let mut canvas = Canvas::with_background(4, 4, [0, 0, 0, 255]);
        canvas.draw_image(1, 1, &stamp);
        assert_eq!(canvas.image().pixel(1, 1), Some([0, 255, 0, 255]));
        assert_eq!(canvas.image().pixel(2, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn line_covers_its_midpoint() {
        let mut canvas = Canvas::new(16, 16);
        canvas.stroke_line(Vec2::new(2.0, 8.0), Vec2::new(14.0, 8.0), 3.0, [255; 4]);
        let image = canvas.into_image();
        assert_eq!(image.pixel(8, 8).map(|p| p[3]), Some(255));
        assert_eq!(image.pixel(8, 2).map(|p| p[3]), Some(0));
    }

    #[test]
    fn coverage_blit_is_clipped() {
        let mut canvas = Canvas::new(2, 2);
        canvas.draw_coverage(-1, 1, 2, &[255, 255, 255, 255], [9, 9, 9, 255]);
        let image = canvas.into_image();
        assert_eq!(image.pixel(0, 1), Some([9, 9, 9, 255]));
        assert_eq!(image.pixel(1, 0).map(|p| p[3]), Some(0));
    }
}
