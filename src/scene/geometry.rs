//! Indexed triangle meshes.

use std::collections::BTreeSet;

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;

use super::color::Color;

/// A contiguous run of indices drawn with one material slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryGroup {
    /// First index (not triangle) of the run.
    pub start: u32,
    /// Number of indices in the run.
    pub count: u32,
    /// Which of the mesh's materials to draw the run with.
    pub material_index: usize,
}

/// Indexed triangle mesh with per-vertex attributes.
///
/// Attribute vectors are parallel: `positions[i]`, `normals[i]` and
/// `uvs[i]` describe vertex `i`. Triangles are counter-clockwise when seen
/// from the side their normals point to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Vertex positions in local space.
    pub positions: Vec<Vec3>,
    /// Unit vertex normals.
    pub normals: Vec<Vec3>,
    /// Texture coordinates, `(0, 0)` at the image's top-left.
    pub uvs: Vec<Vec2>,
    /// Optional per-vertex colors, used by materials with vertex colors.
    pub colors: Option<Vec<Color>>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
    /// Material groups; empty means a single group using material 0.
    pub groups: Vec<GeometryGroup>,
}

impl Geometry {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex indices of triangle `face`, if it exists.
    #[must_use]
    pub fn triangle(&self, face: usize) -> Option<[u32; 3]> {
        let i = face * 3;
        let tri = self.indices.get(i..i + 3)?;
        Some([tri[0], tri[1], tri[2]])
    }

    /// Expand so that no vertex is shared between triangles.
    ///
    /// Needed before assigning one color per face.
    #[must_use]
    pub fn to_non_indexed(&self) -> Self {
        let pick = |i: u32| i as usize;
        let positions =
            self.indices.iter().map(|&i| self.positions[pick(i)]).collect();
        let normals =
            self.indices.iter().map(|&i| self.normals[pick(i)]).collect();
        let uvs = self.indices.iter().map(|&i| self.uvs[pick(i)]).collect();
        let colors = self
            .colors
            .as_ref()
            .map(|c| self.indices.iter().map(|&i| c[pick(i)]).collect());
        Self {
            positions,
            normals,
            uvs,
            colors,
            indices: (0..self.indices.len() as u32).collect(),
            groups: self.groups.clone(),
        }
    }

    /// Weld vertices whose positions agree within `tolerance`.
    ///
    /// The first vertex of each cluster survives with its attributes.
    /// Triangles that collapse are dropped; material groups are cleared
    /// since their index ranges no longer apply.
    #[must_use]
    pub fn merge_vertices(&self, tolerance: f32) -> Self {
        let tolerance = tolerance.max(f32::EPSILON);
        let mut seen: FxHashMap<[i64; 3], u32> = FxHashMap::default();
        let mut remap = Vec::with_capacity(self.positions.len());
        let mut out = Self::default();
        let mut colors = self.colors.as_ref().map(|_| Vec::new());

        for (i, p) in self.positions.iter().enumerate() {
            let key = [
                (p.x / tolerance).round() as i64,
                (p.y / tolerance).round() as i64,
                (p.z / tolerance).round() as i64,
            ];
            let next = out.positions.len() as u32;
            let idx = *seen.entry(key).or_insert(next);
            if idx == next {
                out.positions.push(*p);
                out.normals.push(self.normals[i]);
                out.uvs.push(self.uvs[i]);
                if let (Some(dst), Some(src)) = (&mut colors, &self.colors) {
                    dst.push(src[i]);
                }
            }
            remap.push(idx);
        }

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] =
                [remap[tri[0] as usize], remap[tri[1] as usize], remap[tri[2] as usize]];
            if a != b && b != c && a != c {
                out.indices.extend_from_slice(&[a, b, c]);
            }
        }
        out.colors = colors;
        out
    }

    /// Replace normals with per-face normals. Only meaningful on
    /// non-indexed geometry.
    pub fn compute_flat_normals(&mut self) {
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let n = face_normal(self.positions[a], self.positions[b], self.positions[c]);
            self.normals[a] = n;
            self.normals[b] = n;
            self.normals[c] = n;
        }
    }

    /// Recompute smooth, area-weighted vertex normals.
    pub fn compute_vertex_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let n = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        self.normals = acc.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    /// Assign per-vertex colors. Returns `false` (and leaves the geometry
    /// untouched) when the count does not match the vertex count.
    pub fn set_vertex_colors(&mut self, colors: Vec<Color>) -> bool {
        if colors.len() != self.positions.len() {
            return false;
        }
        self.colors = Some(colors);
        true
    }

    /// Paint all three vertices of `face` with `color`, creating a white
    /// color attribute first if needed.
    pub fn paint_face(&mut self, face: usize, color: Color) {
        let Some(tri) = self.triangle(face) else {
            return;
        };
        let count = self.positions.len();
        let colors = self.colors.get_or_insert_with(|| vec![Color::WHITE; count]);
        for i in tri {
            if let Some(c) = colors.get_mut(i as usize) {
                *c = color;
            }
        }
    }

    /// Unique undirected edges, for wireframe rendering.
    #[must_use]
    pub fn wireframe_edges(&self) -> Vec<[u32; 2]> {
        let mut edges = BTreeSet::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let _ = edges.insert([a.min(b), a.max(b)]);
            }
        }
        edges.into_iter().collect()
    }

    /// Centroid of the vertices and the largest distance from it.
    #[must_use]
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        if self.positions.is_empty() {
            return (Vec3::ZERO, 0.0);
        }
        let center = self.positions.iter().copied().sum::<Vec3>()
            / self.positions.len() as f32;
        let radius = self
            .positions
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0f32, f32::max);
        (center, radius)
    }
}

/// Unit normal of a counter-clockwise triangle.
#[must_use]
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Geometry {
        Geometry {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 4],
            uvs: vec![Vec2::ZERO; 4],
            colors: None,
            indices: vec![0, 1, 2, 0, 2, 3],
            groups: Vec::new(),
        }
    }

    #[test]
    fn non_indexed_has_three_vertices_per_triangle() {
        let flat = quad().to_non_indexed();
        assert_eq!(flat.vertex_count(), 6);
        assert_eq!(flat.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(flat.positions[3], Vec3::ZERO);
    }

    #[test]
    fn merge_restores_shared_vertices() {
        let merged = quad().to_non_indexed().merge_vertices(1e-3);
        assert_eq!(merged.vertex_count(), 4);
        assert_eq!(merged.triangle_count(), 2);
    }

    #[test]
    fn quad_has_five_unique_edges() {
        assert_eq!(quad().wireframe_edges().len(), 5);
    }

    #[test]
    fn paint_face_creates_color_attribute() {
        let mut g = quad().to_non_indexed();
        g.paint_face(1, Color::YELLOW);
        let colors = g.colors.unwrap_or_default();
        assert_eq!(colors[0], Color::WHITE);
        assert_eq!(colors[3], Color::YELLOW);
        assert_eq!(colors[5], Color::YELLOW);
    }

    #[test]
    fn vertex_colors_must_match_count() {
        let mut g = quad();
        assert!(!g.set_vertex_colors(vec![Color::BLACK; 3]));
        assert!(g.set_vertex_colors(vec![Color::BLACK; 4]));
    }

    #[test]
    fn flat_normals_face_the_viewer() {
        let mut g = quad().to_non_indexed();
        g.normals = vec![Vec3::X; 6];
        g.compute_flat_normals();
        assert!(g.normals.iter().all(|n| (*n - Vec3::Z).length() < 1e-6));
    }
}
