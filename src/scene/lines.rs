//! Line segment geometry for helpers, wireframes and dashed lines.

use glam::Vec3;

use super::color::Color;

/// A list of independent segments stored as endpoint pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineGeometry {
    /// Endpoints; segment `i` runs from `positions[2i]` to `positions[2i+1]`.
    pub positions: Vec<Vec3>,
    /// Optional per-endpoint colors.
    pub colors: Option<Vec<Color>>,
    /// Cumulative distance along the line at each endpoint, for dashing.
    pub line_distances: Option<Vec<f32>>,
}

impl LineGeometry {
    /// Segments from endpoint pairs. A trailing unpaired point is dropped.
    #[must_use]
    pub fn from_segments(mut positions: Vec<Vec3>) -> Self {
        positions.truncate(positions.len() & !1);
        Self {
            positions,
            colors: None,
            line_distances: None,
        }
    }

    /// A polyline through `points`, expanded into segments.
    #[must_use]
    pub fn from_strip(points: &[Vec3]) -> Self {
        let positions = points
            .windows(2)
            .flat_map(|w| [w[0], w[1]])
            .collect();
        Self::from_segments(positions)
    }

    /// Append a colored segment, creating the color attribute on first use.
    pub fn push_colored(&mut self, a: Vec3, b: Vec3, color_a: Color, color_b: Color) {
        let prior = self.positions.len();
        let colors = self
            .colors
            .get_or_insert_with(|| vec![Color::WHITE; prior]);
        colors.push(color_a);
        colors.push(color_b);
        self.positions.push(a);
        self.positions.push(b);
        self.line_distances = None;
    }

    /// Number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    /// Fill `line_distances` with the running length of the line, so that
    /// consecutive segments continue the dash pattern.
    pub fn compute_line_distances(&mut self) {
        let mut distances = Vec::with_capacity(self.positions.len());
        let mut total = 0.0;
        for seg in self.positions.chunks_exact(2) {
            distances.push(total);
            total += seg[0].distance(seg[1]);
            distances.push(total);
        }
        self.line_distances = Some(distances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_expands_into_pairs() {
        let g = LineGeometry::from_strip(&[Vec3::ZERO, Vec3::X, Vec3::ONE]);
        assert_eq!(g.segment_count(), 2);
        assert_eq!(g.positions[2], Vec3::X);
    }

    #[test]
    fn distances_accumulate_across_segments() {
        let mut g = LineGeometry::from_strip(&[
            Vec3::new(-100.0, -100.0, 0.0),
            Vec3::new(-100.0, 100.0, 0.0),
            Vec3::new(0.0, 100.0, 0.0),
        ]);
        g.compute_line_distances();
        assert_eq!(g.line_distances, Some(vec![0.0, 200.0, 200.0, 300.0]));
    }

    #[test]
    fn colored_segments_backfill_white() {
        let mut g = LineGeometry::from_segments(vec![Vec3::ZERO, Vec3::X]);
        g.push_colored(Vec3::ZERO, Vec3::Y, Color::BLACK, Color::BLACK);
        let colors = g.colors.unwrap_or_default();
        assert_eq!(colors, vec![Color::WHITE, Color::WHITE, Color::BLACK, Color::BLACK]);
    }

    #[test]
    fn odd_point_is_dropped() {
        let g = LineGeometry::from_segments(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(g.positions.len(), 2);
    }
}
