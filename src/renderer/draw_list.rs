//! Per-frame draw ordering, independent of the GPU.
//!
//! Everything the renderer issues in a frame is decided here: which
//! pipeline each node needs, which object uniform slot it reads, and the
//! order of the opaque and transparent passes.

use glam::Mat4;

use super::uniforms::{view_depth, DrawFlags, ObjectUniforms};
use crate::scene::{Blending, Material, NodeId, NodeKind, Side, TextureId, WorldNode};

/// Vertex format and shader of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    /// `mesh.wgsl` over [`MeshVertex`](super::vertex::MeshVertex).
    Mesh,
    /// `line.wgsl` over [`LineVertex`](super::vertex::LineVertex).
    Line,
    /// `sprite.wgsl`, no vertex buffer.
    Sprite,
}

/// Color blend state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// No blending.
    Opaque,
    /// Premultiplied-free "over".
    Normal,
    /// Source added to destination.
    Additive,
}

impl BlendMode {
    fn transparent(blending: Blending) -> Self {
        match blending {
            Blending::Normal => Self::Normal,
            Blending::Additive => Self::Additive,
        }
    }
}

/// Everything that selects a distinct render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    /// Shader and vertex layout.
    pub kind: DrawKind,
    /// Culled face.
    pub cull: Option<wgpu::Face>,
    /// Blend state.
    pub blend: BlendMode,
    /// Depth writes.
    pub depth_write: bool,
    /// Depth test against the main depth buffer.
    pub depth_test: bool,
}

fn cull_for(side: Side) -> Option<wgpu::Face> {
    match side {
        Side::Front => Some(wgpu::Face::Back),
        Side::Back => Some(wgpu::Face::Front),
        Side::Double => None,
    }
}

/// Which GPU buffers a draw reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSource {
    /// Index range of a mesh node's triangle buffer.
    MeshRange {
        /// Mesh node.
        node: NodeId,
        /// First index.
        start: u32,
        /// Index count.
        count: u32,
    },
    /// Edge buffer of a mesh node.
    Wireframe(NodeId),
    /// Segment buffer of a lines node.
    Lines(NodeId),
    /// Billboard quad of a sprite node.
    Sprite(NodeId),
}

impl DrawSource {
    /// Node the draw belongs to.
    #[must_use]
    pub fn node(&self) -> NodeId {
        match *self {
            Self::MeshRange { node, .. }
            | Self::Wireframe(node)
            | Self::Lines(node)
            | Self::Sprite(node) => node,
        }
    }
}

/// One draw call.
#[derive(Debug, Clone)]
pub struct DrawItem {
    /// Pipeline to bind.
    pub key: PipelineKey,
    /// Buffers to bind.
    pub source: DrawSource,
    /// Contents of this draw's object uniform slot.
    pub object: ObjectUniforms,
    /// Color map, or the white fallback when `None`.
    pub texture: Option<TextureId>,
    /// Also drawn into the shadow maps.
    pub cast_shadow: bool,
    depth: f32,
}

/// Options that change how nodes are drawn this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawSettings {
    /// Scene has fog and fog is enabled.
    pub fog: bool,
    /// Shadow maps are rendered this frame.
    pub shadows: bool,
}

/// Draw calls in submission order. The index of an item is its object
/// uniform slot.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Opaque meshes, then opaque lines, then transparent draws from
    /// back to front.
    pub items: Vec<DrawItem>,
    /// Items before this index are opaque.
    pub opaque_len: usize,
}

impl DrawList {
    /// Build the frame's draw list from visible nodes.
    #[must_use]
    pub fn build(nodes: &[WorldNode<'_>], view: &Mat4, settings: DrawSettings) -> Self {
        let mut meshes = Vec::new();
        let mut lines = Vec::new();
        let mut transparent = Vec::new();

        for world_node in nodes {
            let node = world_node.node;
            let world = world_node.world;
            let depth = view_depth(view, &world);
            let flags = DrawFlags {
                receive_shadow: settings.shadows && node.receive_shadow,
                fog: settings.fog,
            };
            match &node.kind {
                NodeKind::Mesh(mesh) => {
                    let geometry = mesh.geometry();
                    for (group, material) in mesh.draw_groups() {
                        let item = if material.wireframe {
                            if geometry.indices.is_empty() {
                                continue;
                            }
                            DrawItem {
                                key: line_key(material),
                                source: DrawSource::Wireframe(world_node.id),
                                object: ObjectUniforms::wireframe(world, material, flags),
                                texture: None,
                                cast_shadow: false,
                                depth,
                            }
                        } else {
                            if group.count == 0 {
                                continue;
                            }
                            DrawItem {
                                key: mesh_key(material),
                                source: DrawSource::MeshRange {
                                    node: world_node.id,
                                    start: group.start,
                                    count: group.count,
                                },
                                object: ObjectUniforms::mesh(world, material, flags),
                                texture: material.map.map(|m| m.texture),
                                cast_shadow: settings.shadows && node.cast_shadow,
                                depth,
                            }
                        };
                        match (material.transparent, item.key.kind) {
                            (true, _) => transparent.push(item),
                            (false, DrawKind::Line) => lines.push(item),
                            (false, _) => meshes.push(item),
                        }
                    }
                }
                NodeKind::Lines(l) => {
                    if l.geometry().positions.len() < 2 {
                        continue;
                    }
                    let translucent = l.material.opacity < 1.0;
                    let item = DrawItem {
                        key: PipelineKey {
                            kind: DrawKind::Line,
                            cull: None,
                            blend: if translucent {
                                BlendMode::Normal
                            } else {
                                BlendMode::Opaque
                            },
                            depth_write: !translucent,
                            depth_test: true,
                        },
                        source: DrawSource::Lines(world_node.id),
                        object: ObjectUniforms::lines(world, &l.material, flags),
                        texture: None,
                        cast_shadow: false,
                        depth,
                    };
                    if translucent {
                        transparent.push(item);
                    } else {
                        lines.push(item);
                    }
                }
                NodeKind::Sprite(sprite) => {
                    let material = &sprite.material;
                    transparent.push(DrawItem {
                        key: PipelineKey {
                            kind: DrawKind::Sprite,
                            cull: None,
                            blend: BlendMode::transparent(material.blending),
                            depth_write: material.depth_test,
                            depth_test: material.depth_test,
                        },
                        source: DrawSource::Sprite(world_node.id),
                        object: ObjectUniforms::sprite(world, material, sprite.center, flags),
                        texture: material.map.map(|m| m.texture),
                        cast_shadow: false,
                        depth,
                    });
                }
                NodeKind::Group | NodeKind::Light(_) => {}
            }
        }

        // farthest first; stable so equal depths keep scene order
        transparent.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        let opaque_len = meshes.len() + lines.len();
        let mut items = meshes;
        items.extend(lines);
        items.extend(transparent);
        Self { items, opaque_len }
    }

    /// Items drawn into the shadow maps, with their object slots.
    pub fn shadow_casters(&self) -> impl Iterator<Item = (usize, &DrawItem)> {
        self.items.iter().enumerate().filter(|(_, item)| item.cast_shadow)
    }

    /// Object uniforms in slot order.
    #[must_use]
    pub fn objects(&self) -> Vec<ObjectUniforms> {
        self.items.iter().map(|item| item.object).collect()
    }

    /// Whether nothing is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn mesh_key(material: &Material) -> PipelineKey {
    PipelineKey {
        kind: DrawKind::Mesh,
        cull: cull_for(material.side),
        blend: if material.transparent {
            BlendMode::transparent(material.blending)
        } else {
            BlendMode::Opaque
        },
        depth_write: material.depth_write,
        depth_test: true,
    }
}

fn line_key(material: &Material) -> PipelineKey {
    PipelineKey {
        kind: DrawKind::Line,
        cull: None,
        ..mesh_key(material)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::camera::Camera;
    use crate::scene::{
        shapes, Color, LineGeometry, LineMaterial, Node, Scene, SpriteMaterial, TextureId,
        TextureMap,
    };

    fn build(scene: &Scene) -> DrawList {
        let camera = Camera::default();
        DrawList::build(
            &scene.iter(),
            &camera.view(),
            DrawSettings {
                fog: true,
                shadows: true,
            },
        )
    }

    fn sprite_at(z: f32) -> Node {
        Node::sprite(SpriteMaterial::new(TextureMap::new(TextureId(0)))).with_position(0.0, 0.0, z)
    }

    #[test]
    fn opaque_before_lines_before_transparent() {
        let mut scene = Scene::new();
        let _ = scene.add(None, sprite_at(0.0));
        let _ = scene.add(
            None,
            Node::lines(
                LineGeometry::from_strip(&[Vec3::ZERO, Vec3::X]),
                LineMaterial::new(Color::WHITE),
            ),
        );
        let _ = scene.add(
            None,
            Node::mesh(shapes::cuboid(1.0, 1.0, 1.0, 1, 1, 1), Material::basic(Color::WHITE)),
        );
        let list = build(&scene);
        let kinds: Vec<DrawKind> = list.items.iter().map(|i| i.key.kind).collect();
        assert_eq!(kinds, vec![DrawKind::Mesh, DrawKind::Line, DrawKind::Sprite]);
        assert_eq!(list.opaque_len, 2);
    }

    #[test]
    fn transparent_items_sort_back_to_front() {
        let mut scene = Scene::new();
        let near = scene.add(None, sprite_at(300.0));
        let far = scene.add(None, sprite_at(-300.0));
        let middle = scene.add(
            None,
            Node::mesh(
                shapes::sphere(10.0, 8, 6),
                Material::basic(Color::WHITE).with_opacity(0.5),
            ),
        );
        let order: Vec<NodeId> = build(&scene).items.iter().map(|i| i.source.node()).collect();
        assert_eq!(order, vec![far, middle, near]);
    }

    #[test]
    fn wireframe_materials_use_the_line_pipeline() {
        let mut scene = Scene::new();
        let id = scene.add(
            None,
            Node::mesh(
                shapes::sphere(50.0, 32, 16),
                Material::basic(Color::from_hex(0x00ee00)).with_wireframe(),
            ),
        );
        let list = build(&scene);
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].key.kind, DrawKind::Line);
        assert_eq!(list.items[0].source, DrawSource::Wireframe(id));
    }

    #[test]
    fn material_groups_become_separate_draws() {
        let mut scene = Scene::new();
        let materials = (0..6)
            .map(|i| Material::basic(Color::from_hsl(i as f32 / 6.0, 1.0, 0.5)))
            .collect();
        let _ = scene.add(
            None,
            Node::multi_mesh(shapes::cuboid(50.0, 50.0, 50.0, 1, 1, 1), materials),
        );
        let list = build(&scene);
        assert_eq!(list.items.len(), 6);
        assert!(list.items.iter().all(|i| matches!(i.source, DrawSource::MeshRange { count: 6, .. })));
    }

    #[test]
    fn single_material_box_is_one_draw() {
        let mut scene = Scene::new();
        let _ = scene.add(
            None,
            Node::mesh(shapes::cuboid(50.0, 50.0, 50.0, 1, 1, 1), Material::basic(Color::WHITE)),
        );
        let list = build(&scene);
        assert_eq!(list.items.len(), 1);
        assert!(matches!(
            list.items[0].source,
            DrawSource::MeshRange { start: 0, count: 36, .. }
        ));
    }

    #[test]
    fn sides_map_to_cull_modes() {
        let mut scene = Scene::new();
        let _ = scene.add(
            None,
            Node::mesh(
                shapes::cuboid(1.0, 1.0, 1.0, 1, 1, 1),
                Material::basic(Color::WHITE).with_side(Side::Back),
            ),
        );
        let _ = scene.add(
            None,
            Node::mesh(
                shapes::plane(1.0, 1.0, 1, 1),
                Material::basic(Color::WHITE).with_side(Side::Double),
            ),
        );
        let list = build(&scene);
        assert_eq!(list.items[0].key.cull, Some(wgpu::Face::Front));
        assert_eq!(list.items[1].key.cull, None);
    }

    #[test]
    fn only_flagged_meshes_cast_shadows() {
        let mut scene = Scene::new();
        let caster = scene.add(
            None,
            Node::mesh(shapes::cuboid(50.0, 50.0, 50.0, 1, 1, 1), Material::default())
                .with_shadows(true, false),
        );
        let _ = scene.add(
            None,
            Node::mesh(shapes::plane(500.0, 500.0, 1, 1), Material::default())
                .with_shadows(false, true),
        );
        let list = build(&scene);
        let casters: Vec<NodeId> = list.shadow_casters().map(|(_, i)| i.source.node()).collect();
        assert_eq!(casters, vec![caster]);
    }

    #[test]
    fn hidden_nodes_are_not_drawn() {
        let mut scene = Scene::new();
        let mut node = sprite_at(0.0);
        node.visible = false;
        let _ = scene.add(None, node);
        assert!(build(&scene).is_empty());
    }
}
