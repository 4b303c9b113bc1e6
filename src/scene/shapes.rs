//! Parametric geometry generators.
//!
//! All shapes are centred on the origin with counter-clockwise front faces
//! and texture coordinates whose `v` axis runs down the image.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::geometry::{Geometry, GeometryGroup};

/// Axis-aligned box with six material groups, in the order +X, -X, +Y,
/// -Y, +Z, -Z.
#[must_use]
pub fn cuboid(
    width: f32,
    height: f32,
    depth: f32,
    width_segments: u32,
    height_segments: u32,
    depth_segments: u32,
) -> Geometry {
    let (ws, hs, ds) = (
        width_segments.max(1),
        height_segments.max(1),
        depth_segments.max(1),
    );
    let mut g = Geometry::default();
    // (u axis, v axis, w axis, u dir, v dir, extents, segments)
    let faces: [([usize; 3], [f32; 2], [f32; 3], [u32; 2]); 6] = [
        ([2, 1, 0], [-1.0, -1.0], [depth, height, width], [ds, hs]),
        ([2, 1, 0], [1.0, -1.0], [depth, height, -width], [ds, hs]),
        ([0, 2, 1], [1.0, 1.0], [width, depth, height], [ws, ds]),
        ([0, 2, 1], [1.0, -1.0], [width, depth, -height], [ws, ds]),
        ([0, 1, 2], [1.0, -1.0], [width, height, depth], [ws, hs]),
        ([0, 1, 2], [-1.0, -1.0], [width, height, -depth], [ws, hs]),
    ];
    for (material_index, (axes, dirs, size, segs)) in faces.into_iter().enumerate() {
        let start = g.indices.len() as u32;
        box_face(&mut g, axes, dirs, size, segs);
        g.groups.push(GeometryGroup {
            start,
            count: g.indices.len() as u32 - start,
            material_index,
        });
    }
    g
}

fn box_face(
    g: &mut Geometry,
    [u, v, w]: [usize; 3],
    [udir, vdir]: [f32; 2],
    [width, height, depth]: [f32; 3],
    [grid_x, grid_y]: [u32; 2],
) {
    let base = g.positions.len() as u32;
    let seg_w = width / grid_x as f32;
    let seg_h = height / grid_y as f32;
    let normal_sign = if depth > 0.0 { 1.0 } else { -1.0 };

    for iy in 0..=grid_y {
        let y = iy as f32 * seg_h - height * 0.5;
        for ix in 0..=grid_x {
            let x = ix as f32 * seg_w - width * 0.5;
            let mut p = [0.0f32; 3];
            p[u] = x * udir;
            p[v] = y * vdir;
            p[w] = depth * 0.5;
            let mut n = [0.0f32; 3];
            n[w] = normal_sign;
            g.positions.push(Vec3::from(p));
            g.normals.push(Vec3::from(n));
            g.uvs.push(Vec2::new(
                ix as f32 / grid_x as f32,
                iy as f32 / grid_y as f32,
            ));
        }
    }
    grid_indices(&mut g.indices, base, grid_x, grid_y);
}

/// Quads of a `(grid_x + 1) x (grid_y + 1)` vertex grid as two triangles.
fn grid_indices(indices: &mut Vec<u32>, base: u32, grid_x: u32, grid_y: u32) {
    let row = grid_x + 1;
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = base + ix + row * iy;
            let b = base + ix + row * (iy + 1);
            let c = base + ix + 1 + row * (iy + 1);
            let d = base + ix + 1 + row * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

/// Rectangle in the XY plane facing +Z.
#[must_use]
pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let (gx, gy) = (width_segments.max(1), height_segments.max(1));
    let mut g = Geometry::default();
    for iy in 0..=gy {
        let y = iy as f32 * height / gy as f32 - height * 0.5;
        for ix in 0..=gx {
            let x = ix as f32 * width / gx as f32 - width * 0.5;
            g.positions.push(Vec3::new(x, -y, 0.0));
            g.normals.push(Vec3::Z);
            g.uvs.push(Vec2::new(ix as f32 / gx as f32, iy as f32 / gy as f32));
        }
    }
    grid_indices(&mut g.indices, 0, gx, gy);
    g
}

/// UV sphere.
#[must_use]
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    sphere_section(radius, width_segments, height_segments, PI)
}

/// Sphere cut off at polar angle `theta_length`, measured from +Y; `PI / 2`
/// gives the upper hemisphere.
#[must_use]
pub fn sphere_section(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    theta_length: f32,
) -> Geometry {
    let theta_length = theta_length.clamp(0.0, PI);
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut g = Geometry::default();
    let row = ws + 1;

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let u_offset = if iy == 0 {
            0.5 / ws as f32
        } else if iy == hs && theta_length >= PI {
            -0.5 / ws as f32
        } else {
            0.0
        };
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let (phi, theta) = (u * TAU, v * theta_length);
            let p = Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            g.positions.push(p);
            g.normals.push(p.normalize_or_zero());
            g.uvs.push(Vec2::new(u + u_offset, v));
        }
    }

    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                g.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 || theta_length < PI {
                g.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    g
}

/// Cylinder or truncated cone along Y. A zero radius omits that cap.
#[must_use]
pub fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) -> Geometry {
    let rs = radial_segments.max(3);
    let hs = height_segments.max(1);
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);
    let mut g = Geometry::default();

    for y in 0..=hs {
        let v = y as f32 / hs as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        for x in 0..=rs {
            let u = x as f32 / rs as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            g.positions.push(Vec3::new(radius * sin, -v * height + half, radius * cos));
            g.normals.push(Vec3::new(sin, slope, cos).normalize_or_zero());
            g.uvs.push(Vec2::new(u, v));
        }
    }
    let row = rs + 1;
    for x in 0..rs {
        for y in 0..hs {
            let a = y * row + x;
            let b = (y + 1) * row + x;
            let c = (y + 1) * row + x + 1;
            let d = y * row + x + 1;
            g.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    if radius_top > 0.0 {
        cylinder_cap(&mut g, radius_top, half, rs, true);
    }
    if radius_bottom > 0.0 {
        cylinder_cap(&mut g, radius_bottom, half, rs, false);
    }
    g
}

fn cylinder_cap(g: &mut Geometry, radius: f32, half: f32, rs: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = Vec3::new(0.0, sign, 0.0);
    let center_start = g.positions.len() as u32;
    for _ in 0..rs {
        g.positions.push(Vec3::new(0.0, half * sign, 0.0));
        g.normals.push(normal);
        g.uvs.push(Vec2::splat(0.5));
    }
    let ring_start = g.positions.len() as u32;
    for x in 0..=rs {
        let (sin, cos) = (x as f32 / rs as f32 * TAU).sin_cos();
        g.positions.push(Vec3::new(radius * sin, half * sign, radius * cos));
        g.normals.push(normal);
        g.uvs.push(Vec2::new(cos * 0.5 + 0.5, 0.5 - sin * 0.5 * sign));
    }
    for x in 0..rs {
        let c = center_start + x;
        let i = ring_start + x;
        if top {
            g.indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            g.indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}

/// Torus in the XY plane around the Z axis.
#[must_use]
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Geometry {
    let radial = radial_segments.max(2);
    let tubular = tubular_segments.max(3);
    let mut g = Geometry::default();

    for j in 0..=radial {
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let v = j as f32 / radial as f32 * TAU;
            let ring = radius + tube * v.cos();
            let p = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            g.positions.push(p);
            g.normals.push((p - center).normalize_or_zero());
            g.uvs.push(Vec2::new(
                i as f32 / tubular as f32,
                1.0 - j as f32 / radial as f32,
            ));
        }
    }
    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            g.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    g
}

/// (p, q) torus knot.
#[must_use]
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> Geometry {
    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let (p, q) = (p.max(1) as f32, q as f32);
    let curve = |u: f32| {
        let qu = q / p * u;
        let cs = qu.cos();
        Vec3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * 0.5 * u.sin(),
            radius * qu.sin() * 0.5,
        )
    };
    let mut g = Geometry::default();

    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);
        let t = p2 - p1;
        let n = p2 + p1;
        let b = t.cross(n).normalize_or_zero();
        let n = b.cross(t).normalize_or_zero();
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let pos = p1 + n * cx + b * cy;
            g.positions.push(pos);
            g.normals.push((pos - p1).normalize_or_zero());
            g.uvs.push(Vec2::new(
                i as f32 / tubular as f32,
                1.0 - j as f32 / radial as f32,
            ));
        }
    }
    let row = radial + 1;
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = row * (j - 1) + i - 1;
            let b = row * j + i - 1;
            let c = row * j + i;
            let d = row * (j - 1) + i;
            g.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    g
}

/// Flat annulus in the XY plane facing +Z.
#[must_use]
pub fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> Geometry {
    let segs = theta_segments.max(3);
    let mut g = Geometry::default();
    for radius in [inner_radius, outer_radius] {
        for i in 0..=segs {
            let (sin, cos) = (i as f32 / segs as f32 * TAU).sin_cos();
            let p = Vec3::new(radius * cos, radius * sin, 0.0);
            g.positions.push(p);
            g.normals.push(Vec3::Z);
            let outer = outer_radius.max(f32::EPSILON);
            g.uvs.push(Vec2::new(
                (p.x / outer + 1.0) * 0.5,
                1.0 - (p.y / outer + 1.0) * 0.5,
            ));
        }
    }
    for i in 0..segs {
        let a = i;
        let b = i + segs + 1;
        let c = i + segs + 2;
        let d = i + 1;
        g.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }
    g
}

/// Prism over a simple polygon `outline` in the XY plane, from `z = 0` to
/// `z = depth`.
///
/// Group 0 holds both caps and group 1 the sides, so a two-material mesh
/// colors them apart. Cap UVs are the outline's own coordinates. The
/// outline may wind either way. Fewer than three points give an empty
/// geometry.
#[must_use]
pub fn extrude(outline: &[Vec2], depth: f32) -> Geometry {
    let mut g = Geometry::default();
    if outline.len() < 3 {
        return g;
    }
    let mut points = outline.to_vec();
    if signed_area(&points) < 0.0 {
        points.reverse();
    }
    let n = points.len() as u32;
    let caps = triangulate(&points);

    for (z, normal) in [(depth, Vec3::Z), (0.0, Vec3::NEG_Z)] {
        for p in &points {
            g.positions.push(p.extend(z));
            g.normals.push(normal);
            g.uvs.push(*p);
        }
    }
    for [a, b, c] in &caps {
        g.indices.extend_from_slice(&[*a, *b, *c]);
    }
    for [a, b, c] in &caps {
        g.indices.extend_from_slice(&[c + n, b + n, a + n]);
    }
    let cap_count = g.indices.len() as u32;

    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        let edge = q - *p;
        let normal = Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero();
        let base = g.positions.len() as u32;
        let corners = [
            (p.extend(0.0), 0.0, 0.0),
            (q.extend(0.0), 1.0, 0.0),
            (q.extend(depth), 1.0, 1.0),
            (p.extend(depth), 0.0, 1.0),
        ];
        for (position, u, v) in corners {
            g.positions.push(position);
            g.normals.push(normal);
            g.uvs.push(Vec2::new(u, v));
        }
        g.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    g.groups = vec![
        GeometryGroup {
            start: 0,
            count: cap_count,
            material_index: 0,
        },
        GeometryGroup {
            start: cap_count,
            count: g.indices.len() as u32 - cap_count,
            material_index: 1,
        },
    ];
    g
}

/// Twice-signed area, positive for counter-clockwise polygons.
fn signed_area(points: &[Vec2]) -> f32 {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum()
}

/// Ear clipping of a counter-clockwise simple polygon into
/// counter-clockwise triangles. Stops early on self-intersecting input.
fn triangulate(points: &[Vec2]) -> Vec<[u32; 3]> {
    let turn = |o: Vec2, a: Vec2, b: Vec2| (a - o).perp_dot(b - o);
    let mut remaining: Vec<u32> = (0..points.len() as u32).collect();
    let mut triangles = Vec::with_capacity(points.len().saturating_sub(2));
    while remaining.len() > 3 {
        let len = remaining.len();
        let corner = |i: usize| {
            [
                remaining[(i + len - 1) % len],
                remaining[i],
                remaining[(i + 1) % len],
            ]
        };
        let ear = (0..len).find(|&i| {
            let [ia, ib, ic] = corner(i);
            let (a, b, c) = (
                points[ia as usize],
                points[ib as usize],
                points[ic as usize],
            );
            if turn(a, b, c) <= 0.0 {
                return false;
            }
            !remaining.iter().any(|&j| {
                let p = points[j as usize];
                j != ia
                    && j != ib
                    && j != ic
                    && turn(a, b, p) >= 0.0
                    && turn(b, c, p) >= 0.0
                    && turn(c, a, p) >= 0.0
            })
        });
        let Some(i) = ear else {
            break;
        };
        triangles.push(corner(i));
        let _ = remaining.remove(i);
    }
    if let [a, b, c] = remaining[..] {
        triangles.push([a, b, c]);
    }
    triangles
}

/// Regular tetrahedron, flat shaded. Each face is split into
/// `(detail + 1)^2` triangles before projection onto the sphere.
#[must_use]
pub fn tetrahedron(radius: f32, detail: u32) -> Geometry {
    const V: [[f32; 3]; 4] = [
        [1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
    ];
    const I: [u32; 12] = [2, 1, 0, 0, 3, 2, 1, 3, 0, 2, 3, 1];
    polyhedron(&V, &I, radius, detail)
}

/// Regular octahedron, flat shaded.
#[must_use]
pub fn octahedron(radius: f32, detail: u32) -> Geometry {
    const V: [[f32; 3]; 6] = [
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];
    const I: [u32; 24] = [
        0, 2, 4, 0, 4, 3, 0, 3, 5, 0, 5, 2, 1, 2, 5, 1, 5, 3, 1, 3, 4, 1, 4, 2,
    ];
    polyhedron(&V, &I, radius, detail)
}

/// Regular icosahedron, flat shaded.
#[must_use]
pub fn icosahedron(radius: f32, detail: u32) -> Geometry {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let v = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    const I: [u32; 60] = [
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11,
        10, 2, 10, 7, 6, 7, 1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4,
        9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1,
    ];
    polyhedron(&v, &I, radius, detail)
}

/// Non-indexed polyhedron with every face subdivided `detail` times and
/// projected onto a sphere of `radius`. Normals are flat and texture
/// coordinates spherical.
fn polyhedron(vertices: &[[f32; 3]], indices: &[u32], radius: f32, detail: u32) -> Geometry {
    let mut g = Geometry::default();
    let mut push = |p: Vec3| {
        let dir = p.normalize_or_zero();
        let u = dir.z.atan2(-dir.x) / TAU + 0.5;
        let v = 0.5 - dir.y.clamp(-1.0, 1.0).asin() / PI;
        g.positions.push(dir * radius);
        g.normals.push(Vec3::ZERO);
        g.uvs.push(Vec2::new(u, v));
    };
    let cols = detail + 1;
    for face in indices.chunks_exact(3) {
        let [a, b, c] = [face[0], face[1], face[2]].map(|i| Vec3::from(vertices[i as usize]));
        let grid: Vec<Vec<Vec3>> = (0..=cols)
            .map(|i| {
                let t = i as f32 / cols as f32;
                let aj = a.lerp(c, t);
                let bj = b.lerp(c, t);
                let rows = cols - i;
                (0..=rows)
                    .map(|j| {
                        if rows == 0 {
                            aj
                        } else {
                            aj.lerp(bj, j as f32 / rows as f32)
                        }
                    })
                    .collect()
            })
            .collect();
        for i in 0..cols as usize {
            for j in 0..(2 * (cols as usize - i) - 1) {
                let k = j / 2;
                if j % 2 == 0 {
                    push(grid[i][k + 1]);
                    push(grid[i + 1][k]);
                    push(grid[i][k]);
                } else {
                    push(grid[i][k + 1]);
                    push(grid[i + 1][k + 1]);
                    push(grid[i + 1][k]);
                }
            }
        }
    }
    g.indices = (0..g.positions.len() as u32).collect();
    g.compute_flat_normals();
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(g: &Geometry) {
        assert_eq!(g.positions.len(), g.normals.len());
        assert_eq!(g.positions.len(), g.uvs.len());
        assert_eq!(g.indices.len() % 3, 0);
        assert!(g.indices.iter().all(|&i| (i as usize) < g.positions.len()));
        for n in &g.normals {
            assert!((n.length() - 1.0).abs() < 1e-3, "normal {n} is not unit");
        }
    }

    fn star() -> Vec<Vec2> {
        [
            (0.0, 50.0),
            (10.0, 10.0),
            (40.0, 10.0),
            (20.0, -10.0),
            (30.0, -50.0),
            (0.0, -20.0),
            (-30.0, -50.0),
            (-20.0, -10.0),
            (-40.0, 10.0),
            (-10.0, 10.0),
        ]
        .into_iter()
        .map(|(x, y)| Vec2::new(x, y))
        .collect()
    }

    #[test]
    fn extruded_star_caps_and_sides() {
        let g = extrude(&star(), 4.0);
        assert_well_formed(&g);
        assert_eq!(g.vertex_count(), 2 * 10 + 4 * 10);
        assert_eq!(g.triangle_count(), 2 * 8 + 2 * 10);
        assert_eq!(g.groups.len(), 2);
        assert_eq!((g.groups[0].start, g.groups[0].count), (0, 48));
        assert_eq!((g.groups[1].start, g.groups[1].count), (48, 60));
        assert_eq!(g.groups[1].material_index, 1);

        // every triangle winds counter-clockwise about its stored normal
        for face in 0..g.triangle_count() {
            let Some([a, b, c]) = g.triangle(face) else {
                panic!("missing face {face}");
            };
            let (pa, pb, pc) = (
                g.positions[a as usize],
                g.positions[b as usize],
                g.positions[c as usize],
            );
            let facing = (pb - pa).cross(pc - pa).dot(g.normals[a as usize]);
            assert!(facing > 0.0, "face {face} winds against its normal");
        }
    }

    #[test]
    fn cap_triangles_cover_the_outline() {
        let mut ccw = star();
        ccw.reverse();
        assert!(signed_area(&ccw) > 0.0);
        let triangles = triangulate(&ccw);
        assert_eq!(triangles.len(), 8);
        let areas: Vec<f32> = triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.map(|i| ccw[i as usize]);
                (b - a).perp_dot(c - a) * 0.5
            })
            .collect();
        assert!(areas.iter().all(|a| *a > 0.0));
        assert!((areas.iter().sum::<f32>() - 2700.0).abs() < 1e-2);
        assert!(extrude(&ccw[..2], 4.0).indices.is_empty());
    }

    #[test]
    fn box_counts_and_groups() {
        let g = cuboid(80.0, 80.0, 80.0, 2, 2, 2);
        assert_well_formed(&g);
        assert_eq!(g.vertex_count(), 6 * 9);
        assert_eq!(g.triangle_count(), 6 * 8);
        assert_eq!(g.groups.len(), 6);
        assert_eq!(g.groups[5].material_index, 5);
        let covered: u32 = g.groups.iter().map(|gr| gr.count).sum();
        assert_eq!(covered as usize, g.indices.len());
    }

    #[test]
    fn box_faces_point_outward() {
        let g = cuboid(2.0, 2.0, 2.0, 1, 1, 1);
        for tri in g.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| g.positions[i as usize]);
            let n = crate::scene::geometry::face_normal(a, b, c);
            let center = (a + b + c) / 3.0;
            assert!(n.dot(center) > 0.0);
        }
    }

    #[test]
    fn plane_faces_positive_z() {
        let g = plane(10.0, 10.0, 1, 1);
        assert_well_formed(&g);
        assert_eq!(g.triangle_count(), 2);
        let [a, b, c] = [0, 1, 2].map(|i| g.positions[g.indices[i] as usize]);
        assert!(crate::scene::geometry::face_normal(a, b, c).z > 0.99);
        assert_eq!(g.uvs[0], Vec2::ZERO);
        assert_eq!(g.positions[0], Vec3::new(-5.0, 5.0, 0.0));
    }

    #[test]
    fn sphere_counts() {
        let g = sphere(50.0, 32, 16);
        assert_well_formed(&g);
        assert_eq!(g.vertex_count(), 33 * 17);
        assert_eq!(g.triangle_count(), 32 * 16 * 2 - 2 * 32);
        assert!(g.positions.iter().all(|p| (p.length() - 50.0).abs() < 1e-3));
    }

    #[test]
    fn hemisphere_keeps_open_rim() {
        let g = sphere_section(40.0, 32, 16, PI / 2.0);
        assert_well_formed(&g);
        assert_eq!(g.triangle_count(), 32 * 16 * 2 - 32);
        assert!(g.positions.iter().all(|p| p.y > -1e-3));
    }

    #[test]
    fn cone_has_single_cap() {
        let cone = cylinder(0.0, 40.0, 100.0, 20, 4);
        let tube = cylinder(40.0, 40.0, 100.0, 20, 4);
        assert_well_formed(&cone);
        assert_well_formed(&tube);
        assert_eq!(tube.triangle_count() - cone.triangle_count(), 20);
    }

    #[test]
    fn torus_and_knot_are_well_formed() {
        assert_well_formed(&torus(25.0, 10.0, 8, 4));
        assert_well_formed(&torus_knot(30.0, 8.0, 64, 8, 2, 3));
    }

    #[test]
    fn ring_spans_radii() {
        let g = ring(10.0, 40.0, 8);
        assert_well_formed(&g);
        assert_eq!(g.triangle_count(), 16);
        let lens: Vec<f32> = g.positions.iter().map(|p| p.length()).collect();
        assert!(lens.iter().all(|l| (l - 10.0).abs() < 1e-3 || (l - 40.0).abs() < 1e-3));
    }

    #[test]
    fn polyhedra_are_flat_and_outward() {
        for (g, faces) in [
            (tetrahedron(40.0, 0), 4),
            (octahedron(40.0, 0), 8),
            (icosahedron(40.0, 0), 20),
            (icosahedron(40.0, 1), 80),
        ] {
            assert_well_formed(&g);
            assert_eq!(g.triangle_count(), faces);
            for tri in g.indices.chunks_exact(3) {
                let n = g.normals[tri[0] as usize];
                let center = g.positions[tri[0] as usize];
                assert!(n.dot(center) > 0.0);
            }
        }
    }
}
