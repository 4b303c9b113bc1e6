//! Surface descriptions for meshes, lines and sprites.

use super::color::Color;
use super::texture::TextureMap;

/// Lighting model of a mesh material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shading {
    /// Unlit flat color.
    Basic,
    /// Diffuse only.
    #[default]
    Lambert,
    /// Diffuse plus Blinn-Phong specular.
    Phong,
    /// View-space normal mapped to RGB.
    Normal,
    /// View depth between near and far mapped to grey.
    Depth,
}

/// How a transparent fragment combines with the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Blending {
    /// Standard "over" compositing.
    #[default]
    Normal,
    /// Source added on top of the destination.
    Additive,
}

/// Which triangle faces are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Counter-clockwise faces only.
    #[default]
    Front,
    /// Clockwise faces only; used for sky boxes seen from inside.
    Back,
    /// Both faces.
    Double,
}

/// Mesh surface parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Lighting model.
    pub shading: Shading,
    /// Base (diffuse) color.
    pub color: Color,
    /// Light emitted regardless of lighting.
    pub emissive: Color,
    /// Specular color for [`Shading::Phong`].
    pub specular: Color,
    /// Specular exponent for [`Shading::Phong`].
    pub shininess: f32,
    /// Alpha multiplier; only honoured when `transparent` is set.
    pub opacity: f32,
    /// Draw in the sorted transparent pass.
    pub transparent: bool,
    /// Blend equation for transparent draws.
    pub blending: Blending,
    /// Face culling.
    pub side: Side,
    /// Write to the depth buffer.
    pub depth_write: bool,
    /// Draw unique edges as lines instead of filled triangles.
    pub wireframe: bool,
    /// Multiply the color by per-vertex colors.
    pub vertex_colors: bool,
    /// Optional diffuse texture.
    pub map: Option<TextureMap>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            shading: Shading::Lambert,
            color: Color::WHITE,
            emissive: Color::BLACK,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            opacity: 1.0,
            transparent: false,
            blending: Blending::Normal,
            side: Side::Front,
            depth_write: true,
            wireframe: false,
            vertex_colors: false,
            map: None,
        }
    }
}

impl Material {
    fn with_shading(shading: Shading, color: Color) -> Self {
        Self {
            shading,
            color,
            ..Self::default()
        }
    }

    /// Unlit material.
    #[must_use]
    pub fn basic(color: Color) -> Self {
        Self::with_shading(Shading::Basic, color)
    }

    /// Diffuse-lit material.
    #[must_use]
    pub fn lambert(color: Color) -> Self {
        Self::with_shading(Shading::Lambert, color)
    }

    /// Diffuse and specular lit material.
    #[must_use]
    pub fn phong(color: Color) -> Self {
        Self::with_shading(Shading::Phong, color)
    }

    /// Normal-visualising material.
    #[must_use]
    pub fn normal() -> Self {
        Self::with_shading(Shading::Normal, Color::WHITE)
    }

    /// Depth-visualising material.
    #[must_use]
    pub fn depth() -> Self {
        Self::with_shading(Shading::Depth, Color::WHITE)
    }

    /// Set the face culling side.
    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Make the material transparent with the given opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = true;
        self
    }

    /// Set the blend equation; additive blending implies transparency.
    #[must_use]
    pub fn with_blending(mut self, blending: Blending) -> Self {
        self.blending = blending;
        if blending == Blending::Additive {
            self.transparent = true;
        }
        self
    }

    /// Draw as a wireframe.
    #[must_use]
    pub fn with_wireframe(mut self) -> Self {
        self.wireframe = true;
        self
    }

    /// Use per-vertex colors.
    #[must_use]
    pub fn with_vertex_colors(mut self) -> Self {
        self.vertex_colors = true;
        self
    }

    /// Sample a texture.
    #[must_use]
    pub fn with_map(mut self, map: TextureMap) -> Self {
        self.map = Some(map);
        self
    }

    /// Set the emissive color.
    #[must_use]
    pub fn with_emissive(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }

    /// Set the specular color.
    #[must_use]
    pub fn with_specular(mut self, specular: Color) -> Self {
        self.specular = specular;
        self
    }

    /// Set the specular exponent.
    #[must_use]
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Disable depth writes.
    #[must_use]
    pub fn without_depth_write(mut self) -> Self {
        self.depth_write = false;
        self
    }

    /// Effective alpha of the material.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        if self.transparent {
            self.opacity
        } else {
            1.0
        }
    }
}

/// Dash pattern in world units along a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    /// Length of each drawn segment.
    pub dash_size: f32,
    /// Length of each gap.
    pub gap_size: f32,
}

/// Line segment material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMaterial {
    /// Line color, multiplied with vertex colors when enabled.
    pub color: Color,
    /// Use per-vertex colors.
    pub vertex_colors: bool,
    /// Optional dash pattern; requires computed line distances.
    pub dash: Option<Dash>,
    /// Alpha; below one draws in the transparent pass.
    pub opacity: f32,
}

impl LineMaterial {
    /// Solid line of one color.
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            color,
            vertex_colors: false,
            dash: None,
            opacity: 1.0,
        }
    }

    /// Solid line colored per vertex.
    #[must_use]
    pub fn vertex_colored() -> Self {
        Self {
            vertex_colors: true,
            ..Self::new(Color::WHITE)
        }
    }

    /// Dashed line.
    #[must_use]
    pub fn dashed(color: Color, dash_size: f32, gap_size: f32) -> Self {
        Self {
            dash: Some(Dash {
                dash_size,
                gap_size,
            }),
            ..Self::new(color)
        }
    }
}

/// Camera-facing textured quad material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteMaterial {
    /// Tint multiplied with the texture.
    pub color: Color,
    /// Alpha multiplier.
    pub opacity: f32,
    /// Optional texture.
    pub map: Option<TextureMap>,
    /// Blend equation.
    pub blending: Blending,
    /// Test against the depth buffer; disabled for overlay labels.
    pub depth_test: bool,
}

impl SpriteMaterial {
    /// Textured sprite.
    #[must_use]
    pub fn new(map: TextureMap) -> Self {
        Self {
            map: Some(map),
            ..Self::default()
        }
    }

    /// Set the tint.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Draw on top of everything.
    #[must_use]
    pub fn without_depth_test(mut self) -> Self {
        self.depth_test = false;
        self
    }
}

impl Default for SpriteMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 1.0,
            map: None,
            blending: Blending::Normal,
            depth_test: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_implies_transparency() {
        let m = Material::lambert(Color::WHITE).with_opacity(1.5);
        assert!(m.transparent);
        assert_eq!(m.opacity, 1.0);
        assert_eq!(Material::basic(Color::BLACK).with_opacity(0.0).alpha(), 0.0);
    }

    #[test]
    fn opaque_materials_ignore_opacity() {
        let mut m = Material::phong(Color::WHITE);
        m.opacity = 0.2;
        assert_eq!(m.alpha(), 1.0);
    }

    #[test]
    fn additive_blending_is_transparent() {
        let m = Material::basic(Color::WHITE).with_blending(Blending::Additive);
        assert!(m.transparent);
    }
}
