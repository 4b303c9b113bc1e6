//! Scene graph: an arena of nodes, a texture table and environment.
//!
//! Demos build a [`Scene`] once in setup and mutate node transforms,
//! materials and textures every frame. The renderer reads it back through
//! [`Scene::iter`], which yields visible nodes with their world matrices.

pub mod canvas;
pub mod color;
pub mod geometry;
pub mod helpers;
pub mod light;
pub mod lines;
pub mod material;
pub mod node;
pub mod shapes;
pub mod texture;
pub mod transform;

use std::sync::Arc;

use glam::{Mat4, Vec3};

pub use self::canvas::Canvas;
pub use self::color::Color;
pub use self::geometry::{Geometry, GeometryGroup};
pub use self::light::{Light, LightKind, ShadowCamera};
pub use self::lines::LineGeometry;
pub use self::material::{
    Blending, Dash, LineMaterial, Material, Shading, Side, SpriteMaterial,
};
pub use self::node::{Lines, Mesh, Node, NodeId, NodeKind, Sprite};
pub use self::texture::{Filter, Image, TextureId, TextureMap, Wrap};
pub use self::transform::Transform;

/// Exponential squared distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    /// Color fragments fade towards.
    pub color: Color,
    /// Density; visibility is `exp(-(density * distance)^2)`.
    pub density: f32,
}

impl Fog {
    /// Fog of the given color and density.
    #[must_use]
    pub fn exp2(color: Color, density: f32) -> Self {
        Self { color, density }
    }

    /// Fraction of a fragment's color that survives at `distance`.
    #[must_use]
    pub fn visibility(&self, distance: f32) -> f32 {
        let d = self.density * distance;
        (-d * d).exp()
    }
}

#[derive(Debug, Clone)]
struct TextureSlot {
    image: Image,
    revision: u64,
}

/// A visible node together with its world matrix, as yielded by
/// [`Scene::iter`].
#[derive(Debug, Clone, Copy)]
pub struct WorldNode<'a> {
    /// Node handle.
    pub id: NodeId,
    /// The node.
    pub node: &'a Node,
    /// Local-to-world matrix.
    pub world: Mat4,
}

/// The contents of one demo.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    roots: Vec<NodeId>,
    textures: Vec<TextureSlot>,
    fog: Option<Fog>,
    background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene with a black background and no fog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            textures: Vec::new(),
            fog: None,
            background: Color::BLACK,
        }
    }

    /// Insert `node` under `parent`, or as a root when `parent` is `None`
    /// or no longer exists.
    pub fn add(&mut self, parent: Option<NodeId>, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.children.clear();
        let parent = parent.filter(|p| self.node(*p).is_some());
        node.parent = parent;
        self.nodes.push(Some(node));
        match parent.and_then(|p| self.node_mut(p)) {
            Some(p) => p.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Insert a group holding one mesh per material over shared geometry.
    /// Used to overlay a wireframe on a solid surface.
    pub fn add_multi_material(
        &mut self,
        parent: Option<NodeId>,
        geometry: Geometry,
        materials: Vec<Material>,
    ) -> NodeId {
        let geometry = Arc::new(geometry);
        let group = self.add(parent, Node::group());
        for material in materials {
            let _ = self.add(Some(group), Node::mesh(Arc::clone(&geometry), material));
        }
        group
    }

    /// Remove a node and all of its descendants. Returns how many nodes
    /// were removed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        let Some(node) = self.nodes.get_mut(id.index()).and_then(Option::take) else {
            return 0;
        };
        match node.parent.and_then(|p| self.node_mut(p)) {
            Some(parent) => parent.children.retain(|c| *c != id),
            None => self.roots.retain(|c| *c != id),
        }
        let mut removed = 1;
        let mut stack = node.children;
        while let Some(child) = stack.pop() {
            if let Some(n) = self.nodes.get_mut(child.index()).and_then(Option::take) {
                removed += 1;
                stack.extend(n.children);
            }
        }
        removed
    }

    /// Node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutable node by id.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Children of `id`, empty when the node does not exist.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], Node::children)
    }

    /// Top-level nodes.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Whether the scene has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First node with the given name, in insertion order.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .find(|(_, n)| n.as_ref().is_some_and(|n| n.name == name))
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Local-to-world matrix of `id`, composing every ancestor.
    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.node(c)) {
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// World-space position of `id`'s origin.
    #[must_use]
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// Whether `id` and all of its ancestors are visible.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            match self.node(c) {
                Some(n) if n.visible => current = n.parent,
                _ => return false,
            }
        }
        true
    }

    /// Depth-first walk over visible nodes, skipping hidden subtrees.
    #[must_use]
    pub fn iter(&self) -> Vec<WorldNode<'_>> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|id| (*id, Mat4::IDENTITY))
            .collect();
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            out.push(WorldNode { id, node, world });
            stack.extend(node.children.iter().rev().map(|c| (*c, world)));
        }
        out
    }

    /// Register an image and return its handle.
    pub fn add_texture(&mut self, image: Image) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(TextureSlot { image, revision: 0 });
        id
    }

    /// Image by handle.
    #[must_use]
    pub fn texture(&self, id: TextureId) -> Option<&Image> {
        self.textures.get(id.0 as usize).map(|t| &t.image)
    }

    /// Mutable image; bumps its revision so the renderer re-uploads it.
    pub fn texture_mut(&mut self, id: TextureId) -> Option<&mut Image> {
        let slot = self.textures.get_mut(id.0 as usize)?;
        slot.revision += 1;
        Some(&mut slot.image)
    }

    /// Upload revision of an image.
    #[must_use]
    pub fn texture_revision(&self, id: TextureId) -> Option<u64> {
        self.textures.get(id.0 as usize).map(|t| t.revision)
    }

    /// All registered images with their handles and revisions.
    pub fn textures(&self) -> impl Iterator<Item = (TextureId, &Image, u64)> {
        self.textures
            .iter()
            .enumerate()
            .map(|(i, t)| (TextureId(i as u32), &t.image, t.revision))
    }

    /// Current fog.
    #[must_use]
    pub fn fog(&self) -> Option<Fog> {
        self.fog
    }

    /// Replace or clear the fog.
    pub fn set_fog(&mut self, fog: Option<Fog>) {
        self.fog = fog;
    }

    /// Clear color.
    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    /// Set the clear color.
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positioned(x: f32, y: f32, z: f32) -> Node {
        Node::group().with_position(x, y, z)
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut scene = Scene::new();
        let a = scene.add(None, positioned(10.0, 0.0, 0.0).with_scale(2.0, 2.0, 2.0));
        let b = scene.add(Some(a), positioned(0.0, 5.0, 0.0));
        let c = scene.add(Some(b), positioned(1.0, 0.0, 0.0));
        assert_eq!(scene.world_position(c), Vec3::new(12.0, 10.0, 0.0));
        assert_eq!(scene.children(a), &[b]);
        assert_eq!(scene.node(c).and_then(Node::parent), Some(b));
    }

    #[test]
    fn remove_is_recursive() {
        let mut scene = Scene::new();
        let a = scene.add(None, Node::group());
        let b = scene.add(Some(a), Node::group());
        let _c = scene.add(Some(b), Node::group());
        let d = scene.add(None, Node::group());
        assert_eq!(scene.remove(a), 3);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.roots(), &[d]);
        assert!(scene.node(b).is_none());
        assert_eq!(scene.remove(a), 0);
    }

    #[test]
    fn removing_child_detaches_from_parent() {
        let mut scene = Scene::new();
        let a = scene.add(None, Node::group());
        let b = scene.add(Some(a), Node::group());
        let _ = scene.remove(b);
        assert!(scene.children(a).is_empty());
    }

    #[test]
    fn hidden_subtrees_are_skipped() {
        let mut scene = Scene::new();
        let a = scene.add(None, Node::group());
        let b = scene.add(Some(a), Node::group());
        let _ = scene.add(Some(b), Node::group());
        let e = scene.add(None, Node::group());
        if let Some(n) = scene.node_mut(b) {
            n.visible = false;
        }
        let ids: Vec<NodeId> = scene.iter().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![a, e]);
        assert!(!scene.is_visible(b));
    }

    #[test]
    fn multi_material_shares_geometry() {
        let mut scene = Scene::new();
        let group = scene.add_multi_material(
            None,
            shapes::sphere(50.0, 8, 6),
            vec![
                Material::basic(Color::from_hex(0x000088)),
                Material::basic(Color::from_hex(0x00ee00)).with_wireframe(),
            ],
        );
        let meshes: Vec<&Mesh> = scene
            .children(group)
            .iter()
            .filter_map(|c| scene.node(*c).and_then(Node::as_mesh))
            .collect();
        assert_eq!(meshes.len(), 2);
        assert!(Arc::ptr_eq(meshes[0].geometry(), meshes[1].geometry()));
    }

    #[test]
    fn texture_mut_bumps_revision() {
        let mut scene = Scene::new();
        let id = scene.add_texture(Image::filled(1, 1, [0; 4]));
        assert_eq!(scene.texture_revision(id), Some(0));
        if let Some(image) = scene.texture_mut(id) {
            image.set_pixel(0, 0, [1, 2, 3, 4]);
        }
        assert_eq!(scene.texture_revision(id), Some(1));
        assert_eq!(scene.texture(id).and_then(|i| i.pixel(0, 0)), Some([1, 2, 3, 4]));
    }

    #[test]
    fn find_by_name_and_fog() {
        let mut scene = Scene::new();
        let _ = scene.add(None, Node::group().with_name("floor"));
        let cube = scene.add(None, Node::group().with_name("cube"));
        assert_eq!(scene.find_by_name("cube"), Some(cube));
        assert_eq!(scene.find_by_name("missing"), None);
        let fog = Fog::exp2(Color::from_hex(0x9999ff), 0.00025);
        scene.set_fog(Some(fog));
        assert!((fog.visibility(0.0) - 1.0).abs() < 1e-6);
        assert!(fog.visibility(4000.0) < 0.5);
    }
}
