//! sRGB colors as used by materials, lights, lines and canvases.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// An RGB color with components in `[0, 1]`, stored in sRGB space.
///
/// Demos specify colors the way artists do (hex triplets), so values are
/// kept in sRGB and converted to linear only when uploaded to the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
}

impl Color {
    /// Pure white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Pure black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// Highlight yellow used by the picking demos.
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0);

    /// Color from sRGB components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Color from a `0xRRGGBB` literal.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Color from hue, saturation and lightness, all in `[0, 1]`.
    #[must_use]
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        if s <= 0.0 {
            return Self::new(l, l, l);
        }
        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = h.rem_euclid(1.0);
        Self::new(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    }

    /// The `0xRRGGBB` representation, rounding each channel.
    #[must_use]
    pub fn to_hex(self) -> u32 {
        let [r, g, b] = self.to_rgb8();
        (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
    }

    /// 8-bit channels, clamped.
    #[must_use]
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Linear interpolation towards `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Multiply every channel by `k`.
    #[must_use]
    pub fn scale(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    /// Components converted to linear space for shading.
    #[must_use]
    pub fn to_linear(self) -> Vec3 {
        Vec3::new(
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        )
    }

    /// Linear RGBA with the given alpha.
    #[must_use]
    pub fn to_linear_rgba(self, alpha: f32) -> Vec4 {
        self.to_linear().extend(alpha)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips() {
        for hex in [0x000088, 0x9990ff, 0xffaa00, 0x111111] {
            assert_eq!(Color::from_hex(hex).to_hex(), hex);
        }
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 1.0, 0.5).to_hex(), 0xff0000);
        assert_eq!(Color::from_hsl(1.0 / 3.0, 1.0, 0.5).to_hex(), 0x00ff00);
        assert_eq!(Color::from_hsl(2.0 / 3.0, 1.0, 0.5).to_hex(), 0x0000ff);
        assert_eq!(Color::from_hsl(0.3, 0.0, 0.5).to_hex(), 0x808080);
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(Color::BLACK.to_linear(), Vec3::ZERO);
        let white = Color::WHITE.to_linear();
        assert!((white - Vec3::ONE).length() < 1e-5);
        assert!(Color::new(0.5, 0.5, 0.5).to_linear().x < 0.5);
    }
}
