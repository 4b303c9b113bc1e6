//! Vertex formats and conversion from scene geometry.

use crate::scene::{Color, Geometry, LineGeometry};

/// Vertex of a triangle mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
    /// Linear RGBA.
    color: [f32; 4],
}

/// Vertex of a line segment.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    position: [f32; 3],
    /// Linear RGBA.
    color: [f32; 4],
    line_distance: f32,
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2, // uv
        3 => Float32x4, // color
    ];

    /// Buffer layout matching `mesh.wgsl` and `shadow.wgsl`.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl LineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4, // color
        2 => Float32,   // line distance
    ];

    /// Buffer layout matching `line.wgsl`.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

fn linear(color: Option<&Color>) -> [f32; 4] {
    color.copied().unwrap_or(Color::WHITE).to_linear_rgba(1.0).to_array()
}

/// Interleave a geometry's attributes. Missing normals, uvs or colors
/// default to zero, zero and white.
#[must_use]
pub fn mesh_vertices(geometry: &Geometry) -> Vec<MeshVertex> {
    let colors = geometry.colors.as_deref();
    geometry
        .positions
        .iter()
        .enumerate()
        .map(|(i, p)| MeshVertex {
            position: p.to_array(),
            normal: geometry.normals.get(i).map_or([0.0; 3], |n| n.to_array()),
            uv: geometry.uvs.get(i).map_or([0.0; 2], |uv| uv.to_array()),
            color: linear(colors.and_then(|c| c.get(i))),
        })
        .collect()
}

/// Segment endpoints with their colors and dash distances.
#[must_use]
pub fn line_vertices(lines: &LineGeometry) -> Vec<LineVertex> {
    let colors = lines.colors.as_deref();
    let distances = lines.line_distances.as_deref();
    lines
        .positions
        .iter()
        .enumerate()
        .map(|(i, p)| LineVertex {
            position: p.to_array(),
            color: linear(colors.and_then(|c| c.get(i))),
            line_distance: distances.and_then(|d| d.get(i)).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Unique triangle edges of a geometry as line segments.
#[must_use]
pub fn wireframe_vertices(geometry: &Geometry) -> Vec<LineVertex> {
    let colors = geometry.colors.as_deref();
    geometry
        .wireframe_edges()
        .into_iter()
        .flatten()
        .filter_map(|i| {
            let p = geometry.positions.get(i as usize)?;
            Some(LineVertex {
                position: p.to_array(),
                color: linear(colors.and_then(|c| c.get(i as usize))),
                line_distance: 0.0,
            })
        })
        .collect()
}
