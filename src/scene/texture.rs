//! CPU-side texture images and material texture bindings.

use glam::Vec2;

/// Handle to an image registered with a [`Scene`](super::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub(crate) u32);

impl TextureId {
    /// Raw index, stable for the lifetime of the scene.
    #[must_use]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Texture addressing outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Wrap {
    /// Tile the image.
    #[default]
    Repeat,
    /// Clamp to the edge texel.
    Clamp,
}

/// Texel filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// Bilinear filtering.
    #[default]
    Linear,
    /// Nearest texel, for crisp pixel art.
    Nearest,
}

/// An RGBA8 image in sRGB space with its sampling parameters.
///
/// Row 0 is the top of the image; texture coordinate `(0, 0)` addresses
/// the top-left texel.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    /// Addressing mode for both axes.
    pub wrap: Wrap,
    /// Filtering mode for magnification and minification.
    pub filter: Filter,
}

impl Image {
    /// A `width` x `height` image filled with `rgba`.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self {
            width,
            height,
            pixels,
            wrap: Wrap::Repeat,
            filter: Filter::Linear,
        }
    }

    /// Build an image by evaluating `f(x, y)` for every texel.
    #[must_use]
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> [u8; 4],
    ) -> Self {
        let mut image = Self::filled(width, height, [0; 4]);
        for y in 0..image.height {
            for x in 0..image.width {
                image.set_pixel(x, y, f(x, y));
            }
        }
        image
    }

    /// Width in texels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major from the top row.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Texel at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[i..i + 4]);
        Some(out)
    }

    /// Overwrite the texel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Builder-style override of the wrap mode.
    #[must_use]
    pub fn with_wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = wrap;
        self
    }

    /// Builder-style override of the filter mode.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Whether any texel is not fully opaque.
    #[must_use]
    pub fn has_alpha(&self) -> bool {
        self.pixels.chunks_exact(4).any(|p| p[3] < 255)
    }
}

/// A texture bound to a material, with its UV transform.
///
/// Sampling uses `uv * repeat + offset`, so a sprite sheet shows a single
/// tile with `repeat = 1 / grid` and `offset = tile / grid`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureMap {
    /// The image to sample.
    pub texture: TextureId,
    /// UV scale.
    pub repeat: Vec2,
    /// UV offset applied after scaling.
    pub offset: Vec2,
}

impl TextureMap {
    /// Map with identity UV transform.
    #[must_use]
    pub fn new(texture: TextureId) -> Self {
        Self {
            texture,
            repeat: Vec2::ONE,
            offset: Vec2::ZERO,
        }
    }

    /// Builder-style UV repeat.
    #[must_use]
    pub fn with_repeat(mut self, x: f32, y: f32) -> Self {
        self.repeat = Vec2::new(x, y);
        self
    }

    /// Transform a mesh UV into sampling space.
    #[must_use]
    pub fn transform_uv(&self, uv: Vec2) -> Vec2 {
        uv * self.repeat + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_addresses_top_left_first() {
        let image = Image::from_fn(2, 2, |x, y| [x as u8, y as u8, 0, 255]);
        assert_eq!(image.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(image.pixel(1, 0), Some([1, 0, 0, 255]));
        assert_eq!(image.pixel(0, 1), Some([0, 1, 0, 255]));
        assert_eq!(image.pixel(2, 0), None);
        assert!(!image.has_alpha());
    }

    #[test]
    fn zero_sized_images_are_clamped() {
        let image = Image::filled(0, 0, [1, 2, 3, 4]);
        assert_eq!((image.width(), image.height()), (1, 1));
        assert!(image.has_alpha());
    }

    #[test]
    fn texture_map_transforms_uv() {
        let map = TextureMap {
            texture: TextureId(0),
            repeat: Vec2::new(0.25, 0.25),
            offset: Vec2::new(0.5, 0.75),
        };
        assert_eq!(map.transform_uv(Vec2::ONE), Vec2::new(0.75, 1.0));
    }
}
