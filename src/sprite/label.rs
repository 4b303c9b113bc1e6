//! Text labels painted into textures for sprites.
//!
//! Glyphs are rasterised with `fontdue` into a [`Canvas`] holding a
//! rounded, bordered box sized to the text.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::error::VignetteError;
use crate::scene::canvas::{Canvas, Rgba};
use crate::scene::Image;

/// Places a bold sans-serif face is commonly installed.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Corner radius of the label box in pixels.
const CORNER_RADIUS: f32 = 6.0;

/// Appearance of a text label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    /// Glyph size in pixels.
    pub font_size: f32,
    /// Border stroke width in pixels.
    pub border_thickness: f32,
    /// Border color.
    pub border_color: Rgba,
    /// Fill color of the box.
    pub background_color: Rgba,
    /// Glyph color.
    pub text_color: Rgba,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            border_thickness: 4.0,
            border_color: [0, 0, 0, 255],
            background_color: [255, 255, 255, 255],
            text_color: [0, 0, 0, 255],
        }
    }
}

/// Paints text labels, with or without a font.
pub struct LabelPainter {
    font: Option<fontdue::Font>,
    warned: Cell<bool>,
}

impl std::fmt::Debug for LabelPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelPainter")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl LabelPainter {
    /// Painter using the font at `path`, or the first system font found
    /// when `path` is `None` or unreadable.
    #[must_use]
    pub fn new(path: Option<&Path>) -> Self {
        let candidates = path
            .map(Path::to_path_buf)
            .into_iter()
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from));
        for candidate in candidates {
            match Self::load(&candidate) {
                Ok(painter) => {
                    log::info!("Label font: {}", candidate.display());
                    return painter;
                }
                Err(e) if path.is_some_and(|p| p == candidate) => {
                    log::warn!("{e}");
                }
                Err(_) => {}
            }
        }
        Self::without_font()
    }

    /// Painter using the font file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VignetteError::FontLoad`] when the file cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, VignetteError> {
        let bytes = std::fs::read(path).map_err(|e| {
            VignetteError::FontLoad(format!("{}: {e}", path.display()))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Painter using a TrueType or OpenType font from memory.
    ///
    /// # Errors
    ///
    /// Returns [`VignetteError::FontLoad`] when the bytes are not a font.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VignetteError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| VignetteError::FontLoad(e.to_string()))?;
        Ok(Self {
            font: Some(font),
            warned: Cell::new(false),
        })
    }

    /// Painter that draws label boxes without text.
    #[must_use]
    pub fn without_font() -> Self {
        Self {
            font: None,
            warned: Cell::new(false),
        }
    }

    /// Whether glyphs will be drawn.
    #[must_use]
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Advance width of `text` at `size` pixels. Without a font, an
    /// average glyph width of `0.6 * size` is assumed.
    #[must_use]
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let Some(font) = &self.font else {
            return text.chars().count() as f32 * size * 0.6;
        };
        text.chars()
            .map(|c| font.metrics(c, size).advance_width)
            .sum()
    }

    /// Paint `text` inside a rounded, bordered box.
    #[must_use]
    pub fn paint(&self, text: &str, style: &LabelStyle) -> Image {
        let t = style.border_thickness.max(0.0);
        let size = style.font_size.max(1.0);
        let text_width = self.measure(text, size);
        let box_w = text_width + t;
        let box_h = size * 1.4 + t;
        let mut canvas = Canvas::new((box_w + t).ceil() as u32, (box_h + t).ceil() as u32);

        let half = t * 0.5;
        canvas.fill_rounded_rect(half, half, box_w, box_h, CORNER_RADIUS, style.background_color);
        if t > 0.0 {
            canvas.stroke_rounded_rect(
                half,
                half,
                box_w,
                box_h,
                CORNER_RADIUS,
                t,
                style.border_color,
            );
        }

        match &self.font {
            Some(font) => draw_text(&mut canvas, font, text, t, t + size, size, style.text_color),
            None if !self.warned.replace(true) => {
                log::warn!("No label font found; labels are drawn without text");
            }
            None => {}
        }
        canvas.into_image()
    }

    /// Draw bare `text` onto `canvas` with its baseline at `baseline`.
    /// Returns `false` when no font is available and nothing was drawn.
    pub fn fill_text(
        &self,
        canvas: &mut Canvas,
        text: &str,
        x: f32,
        baseline: f32,
        size: f32,
        color: Rgba,
    ) -> bool {
        let Some(font) = &self.font else {
            return false;
        };
        draw_text(canvas, font, text, x, baseline, size.max(1.0), color);
        true
    }
}

/// Rasterise `text` with its baseline at `baseline`, starting at `x`.
fn draw_text(
    canvas: &mut Canvas,
    font: &fontdue::Font,
    text: &str,
    x: f32,
    baseline: f32,
    size: f32,
    color: Rgba,
) {
    let ascent = font
        .horizontal_line_metrics(size)
        .map_or(size * 0.8, |m| m.ascent);
    let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
    layout.reset(&LayoutSettings {
        x,
        y: baseline - ascent,
        ..LayoutSettings::default()
    });
    layout.append(&[font], &TextStyle::new(text, size, 0));
    for glyph in layout.glyphs() {
        if glyph.width == 0 || glyph.height == 0 {
            continue;
        }
        let (_, coverage) = font.rasterize_config(glyph.key);
        canvas.draw_coverage(
            glyph.x.round() as i32,
            glyph.y.round() as i32,
            glyph.width,
            &coverage,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fontless_label_paints_box() {
        let painter = LabelPainter::without_font();
        let style = LabelStyle::default();
        let image = painter.paint("Sphere", &style);
        let expected_w = 6.0 * 18.0 * 0.6 + 2.0 * 4.0;
        assert_eq!(image.width(), (expected_w as f32).ceil() as u32);
        assert_eq!(image.height(), (18.0f32 * 1.4 + 8.0).ceil() as u32);
        // border at the left edge, white fill in the middle
        let mid_y = image.height() / 2;
        assert_eq!(image.pixel(2, mid_y), Some([0, 0, 0, 255]));
        assert_eq!(image.pixel(image.width() / 2, mid_y), Some([255, 255, 255, 255]));
    }

    #[test]
    fn wider_text_gives_wider_label() {
        let painter = LabelPainter::without_font();
        let style = LabelStyle::default();
        let short = painter.paint("a", &style);
        let long = painter.paint("a much longer label", &style);
        assert!(long.width() > short.width());
        assert_eq!(long.height(), short.height());
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        assert!(matches!(
            LabelPainter::from_bytes(b"not a font"),
            Err(VignetteError::FontLoad(_))
        ));
        assert!(LabelPainter::load(Path::new("/nonexistent/font.ttf")).is_err());
    }
}
