//! Scene nodes and their renderable payloads.

use std::sync::Arc;

use glam::{Vec2, Vec3};

use super::geometry::{Geometry, GeometryGroup};
use super::light::Light;
use super::lines::LineGeometry;
use super::material::{LineMaterial, Material, SpriteMaterial};
use super::transform::Transform;

/// Handle to a node in a [`Scene`](super::Scene). Ids are never reused
/// within one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Triangle mesh drawn with one material per geometry group.
///
/// Geometry is shared behind an [`Arc`] so that several meshes can overlay
/// different materials on the same triangles. Mutating it through
/// [`Mesh::geometry_mut`] bumps the revision so GPU buffers are rebuilt.
#[derive(Debug, Clone)]
pub struct Mesh {
    geometry: Arc<Geometry>,
    /// Material slots indexed by [`GeometryGroup::material_index`](super::GeometryGroup).
    pub materials: Vec<Material>,
    revision: u64,
}

impl Mesh {
    /// Mesh drawn with a single material.
    #[must_use]
    pub fn new(geometry: impl Into<Arc<Geometry>>, material: Material) -> Self {
        Self::with_materials(geometry, vec![material])
    }

    /// Mesh whose geometry groups select among `materials`.
    #[must_use]
    pub fn with_materials(geometry: impl Into<Arc<Geometry>>, materials: Vec<Material>) -> Self {
        Self {
            geometry: geometry.into(),
            materials,
            revision: 0,
        }
    }

    /// Shared geometry.
    #[must_use]
    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    /// Mutable geometry; copies it first if it is shared.
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        self.revision += 1;
        Arc::make_mut(&mut self.geometry)
    }

    /// Increments on every [`Mesh::geometry_mut`] call.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Material in slot `index`. A missing slot resolves to the first
    /// material, so a geometry grouped for six materials still draws with
    /// one. `None` only when the mesh has no materials.
    #[must_use]
    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index).or_else(|| self.materials.first())
    }

    /// Index runs paired with the material that draws each one.
    ///
    /// A single-material mesh is one run over every index whatever the
    /// geometry's groups say. With several materials each geometry group
    /// is a run, resolved through [`Mesh::material`].
    #[must_use]
    pub fn draw_groups(&self) -> Vec<(GeometryGroup, &Material)> {
        let Some(first) = self.materials.first() else {
            return Vec::new();
        };
        if self.materials.len() == 1 || self.geometry.groups.is_empty() {
            let whole = GeometryGroup {
                start: 0,
                count: self.geometry.indices.len() as u32,
                material_index: 0,
            };
            return vec![(whole, first)];
        }
        self.geometry
            .groups
            .iter()
            .map(|group| {
                let material = self.materials.get(group.material_index).unwrap_or(first);
                (*group, material)
            })
            .collect()
    }

    /// Mutable first material.
    pub fn material_mut(&mut self) -> Option<&mut Material> {
        self.materials.first_mut()
    }
}

/// Line segments with a single material.
#[derive(Debug, Clone)]
pub struct Lines {
    geometry: LineGeometry,
    /// Line appearance.
    pub material: LineMaterial,
    revision: u64,
}

impl Lines {
    /// Wrap segments with a material.
    #[must_use]
    pub fn new(geometry: LineGeometry, material: LineMaterial) -> Self {
        Self {
            geometry,
            material,
            revision: 0,
        }
    }

    /// Segment data.
    #[must_use]
    pub fn geometry(&self) -> &LineGeometry {
        &self.geometry
    }

    /// Mutable segment data; bumps the revision.
    pub fn geometry_mut(&mut self) -> &mut LineGeometry {
        self.revision += 1;
        &mut self.geometry
    }

    /// Increments on every [`Lines::geometry_mut`] call.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Camera-facing quad. Its world size is the node's scale on X and Y.
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    /// Appearance.
    pub material: SpriteMaterial,
    /// Anchor within the quad, `(0.5, 0.5)` centres it on the node and
    /// `(0, 1)` puts the node at the quad's bottom-left corner.
    pub center: Vec2,
}

impl Sprite {
    /// Centred sprite.
    #[must_use]
    pub fn new(material: SpriteMaterial) -> Self {
        Self {
            material,
            center: Vec2::splat(0.5),
        }
    }
}

/// What a node draws or emits.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure transform container.
    Group,
    /// Triangle mesh.
    Mesh(Mesh),
    /// Line segments.
    Lines(Lines),
    /// Billboard quad.
    Sprite(Sprite),
    /// Light source.
    Light(Light),
}

/// An element of the scene graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Optional lookup name.
    pub name: String,
    /// Transform relative to the parent.
    pub transform: Transform,
    /// Hidden nodes hide their whole subtree.
    pub visible: bool,
    /// Draw into shadow maps.
    pub cast_shadow: bool,
    /// Sample shadow maps when lit.
    pub receive_shadow: bool,
    /// Payload.
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            name: String::new(),
            transform: Transform::IDENTITY,
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Empty group.
    #[must_use]
    pub fn group() -> Self {
        Self::with_kind(NodeKind::Group)
    }

    /// Mesh with one material.
    #[must_use]
    pub fn mesh(geometry: impl Into<Arc<Geometry>>, material: Material) -> Self {
        Self::with_kind(NodeKind::Mesh(Mesh::new(geometry, material)))
    }

    /// Mesh with per-group materials.
    #[must_use]
    pub fn multi_mesh(geometry: impl Into<Arc<Geometry>>, materials: Vec<Material>) -> Self {
        Self::with_kind(NodeKind::Mesh(Mesh::with_materials(geometry, materials)))
    }

    /// Line segments.
    #[must_use]
    pub fn lines(geometry: LineGeometry, material: LineMaterial) -> Self {
        Self::with_kind(NodeKind::Lines(Lines::new(geometry, material)))
    }

    /// Centred sprite.
    #[must_use]
    pub fn sprite(material: SpriteMaterial) -> Self {
        Self::with_kind(NodeKind::Sprite(Sprite::new(material)))
    }

    /// Light source.
    #[must_use]
    pub fn light(light: Light) -> Self {
        Self::with_kind(NodeKind::Light(light))
    }

    /// Set the lookup name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the local translation.
    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.translation = Vec3::new(x, y, z);
        self
    }

    /// Set the local rotation from XYZ Euler angles.
    #[must_use]
    pub fn with_rotation_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.set_euler(x, y, z);
        self
    }

    /// Set the local scale.
    #[must_use]
    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.scale = Vec3::new(x, y, z);
        self
    }

    /// Set shadow casting and receiving.
    #[must_use]
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    /// Parent node, `None` for roots.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Mesh payload, if any.
    #[must_use]
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(m) => Some(m),
            _ => None,
        }
    }

    /// Mutable mesh payload, if any.
    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.kind {
            NodeKind::Mesh(m) => Some(m),
            _ => None,
        }
    }

    /// Mutable sprite payload, if any.
    pub fn as_sprite_mut(&mut self) -> Option<&mut Sprite> {
        match &mut self.kind {
            NodeKind::Sprite(s) => Some(s),
            _ => None,
        }
    }

    /// Light payload, if any.
    #[must_use]
    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(l) => Some(l),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{shapes, Color};

    fn box_geometry() -> Geometry {
        shapes::cuboid(10.0, 10.0, 10.0, 1, 1, 1)
    }

    #[test]
    fn single_material_ignores_geometry_groups() {
        let mesh = Mesh::new(box_geometry(), Material::basic(Color::WHITE));
        let groups = mesh.draw_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0.start, 0);
        assert_eq!(groups[0].0.count, 36);
    }

    #[test]
    fn missing_slots_use_the_first_material() {
        let red = Material::basic(Color::from_hex(0xff_0000));
        let blue = Material::basic(Color::from_hex(0x00_00ff));
        let mesh = Mesh::with_materials(box_geometry(), vec![red.clone(), blue.clone()]);
        let groups = mesh.draw_groups();
        assert_eq!(groups.len(), 6);
        assert_eq!(groups[1].1, &blue);
        assert!(groups[2..].iter().all(|(_, m)| **m == red));
        assert_eq!(mesh.material(5), Some(&red));
        assert!(Mesh::with_materials(box_geometry(), Vec::new()).draw_groups().is_empty());
    }
}
