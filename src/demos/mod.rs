//! The gallery's demo scenes.
//!
//! A demo fills a fresh [`Scene`] in [`Demo::setup`] and may animate it
//! from [`Demo::update`], which runs once per frame before rendering.
//! Demos never touch the GPU: the engine renders whatever the scene holds
//! after the update, so every demo can be exercised headlessly.
//!
//! # Adding a demo
//!
//! 1. Implement [`Demo`] for a struct holding the demo's state.
//! 2. Add a [`DemoId`] variant, its name and title, and construct the demo
//!    in [`DemoId::create`].

pub mod assets;
mod basic;
mod interaction;
mod rigs;
mod sprites;
pub mod stage;
mod textures;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use glam::Vec3;
use rand::rngs::StdRng;

use crate::camera::Camera;
use crate::error::VignetteError;
use crate::input::{KeyboardState, MouseState};
use crate::picking::{Ray, RayHit, Raycaster};
use crate::scene::{NodeId, Scene};
use crate::sprite::LabelPainter;

/// Everything a demo may use while building its scene.
pub struct SetupContext<'a> {
    /// The empty scene to fill.
    pub scene: &'a mut Scene,
    /// Rasterises text for label sprites.
    pub labels: &'a LabelPainter,
    /// Source of randomness (seeded in tests).
    pub rng: &'a mut StdRng,
}

/// How the camera starts out for a demo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoSetup {
    /// Camera position.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Whether mouse drags orbit the camera.
    pub orbit: bool,
}

impl Default for DemoSetup {
    fn default() -> Self {
        Self {
            eye: stage::CAMERA_EYE,
            target: Vec3::ZERO,
            orbit: true,
        }
    }
}

/// Per-frame view of the gallery handed to [`Demo::update`].
pub struct FrameContext<'a> {
    /// The demo's scene.
    pub scene: &'a mut Scene,
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Seconds since the demo started.
    pub elapsed: f32,
    /// Held keys and this frame's transitions.
    pub keyboard: &'a KeyboardState,
    /// Cursor position and this frame's clicks.
    pub mouse: &'a MouseState,
    /// The camera used for this frame. Demos that disable orbiting may
    /// move it themselves.
    pub camera: &'a mut Camera,
}

impl FrameContext<'_> {
    /// Frame delta as a [`Duration`].
    #[must_use]
    pub fn delta(&self) -> Duration {
        Duration::try_from_secs_f32(self.dt).unwrap_or_default()
    }

    /// Ray from the camera through the cursor.
    #[must_use]
    pub fn pointer_ray(&self) -> Ray {
        Ray::from_camera(self.mouse.ndc(), self.camera)
    }

    /// Nearest mesh under the cursor within `root` and its descendants.
    #[must_use]
    pub fn pick(&self, root: NodeId) -> Option<RayHit> {
        Raycaster::new(self.pointer_ray())
            .intersect_node(self.scene, root, true)
            .into_iter()
            .next()
    }
}

/// A self-contained scene.
pub trait Demo {
    /// Populate `ctx.scene` and say where the camera starts.
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup;

    /// Advance the demo by one frame.
    fn update(&mut self, _ctx: &mut FrameContext<'_>) {}
}

/// Every demo in the gallery, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DemoId {
    /// Basic, Lambert and Phong spheres under a point light.
    #[default]
    SolidMaterials,
    /// Wireframe spheres and a wireframe overlay.
    Wireframe,
    /// Per-face and per-vertex colors.
    VertexColors,
    /// The geometry generators.
    Shapes,
    /// A star outline extruded into a prism.
    Extrusion,
    /// Solid and dashed lines.
    DashedLines,
    /// Axes, grid and arrow helpers.
    Helpers,
    /// Textured spheres and boxes.
    Textures,
    /// Repeated texture maps.
    TexturesRepeat,
    /// Sprite-sheet animation.
    TextureAnimation,
    /// Textures painted at runtime.
    TextureFromCanvas,
    /// A textured sky box.
    Skybox,
    /// Transparent and additive materials.
    Translucence,
    /// Spot lights casting shadows.
    Shadow,
    /// Tinted sprites.
    Sprites,
    /// Text labels on sprites.
    SpriteTextLabels,
    /// Vertex and face indices labelled on a sphere.
    LabeledGeometry,
    /// Highlight the object under the cursor.
    MouseHover,
    /// Paint clicked faces.
    MouseClick,
    /// A tooltip that follows the cursor across objects.
    MouseTooltip,
    /// A sprite that follows the cursor.
    MouseSprite,
    /// Move a sphere with the keyboard.
    KeyboardEvents,
    /// A camera chasing a drivable box.
    ChaseCamera,
}

impl DemoId {
    /// All demos in presentation order.
    pub const ALL: [Self; 23] = [
        Self::SolidMaterials,
        Self::Wireframe,
        Self::VertexColors,
        Self::Shapes,
        Self::Extrusion,
        Self::DashedLines,
        Self::Helpers,
        Self::Textures,
        Self::TexturesRepeat,
        Self::TextureAnimation,
        Self::TextureFromCanvas,
        Self::Skybox,
        Self::Translucence,
        Self::Shadow,
        Self::Sprites,
        Self::SpriteTextLabels,
        Self::LabeledGeometry,
        Self::MouseHover,
        Self::MouseClick,
        Self::MouseTooltip,
        Self::MouseSprite,
        Self::KeyboardEvents,
        Self::ChaseCamera,
    ];

    /// Kebab-case name used on the command line and in options files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SolidMaterials => "solid-materials",
            Self::Wireframe => "wireframe",
            Self::VertexColors => "vertex-colors",
            Self::Shapes => "shapes",
            Self::Extrusion => "extrusion",
            Self::DashedLines => "dashed-lines",
            Self::Helpers => "helpers",
            Self::Textures => "textures",
            Self::TexturesRepeat => "textures-repeat",
            Self::TextureAnimation => "texture-animation",
            Self::TextureFromCanvas => "texture-from-canvas",
            Self::Skybox => "skybox",
            Self::Translucence => "translucence",
            Self::Shadow => "shadow",
            Self::Sprites => "sprites",
            Self::SpriteTextLabels => "sprite-text-labels",
            Self::LabeledGeometry => "labeled-geometry",
            Self::MouseHover => "mouse-hover",
            Self::MouseClick => "mouse-click",
            Self::MouseTooltip => "mouse-tooltip",
            Self::MouseSprite => "mouse-sprite",
            Self::KeyboardEvents => "keyboard-events",
            Self::ChaseCamera => "chase-camera",
        }
    }

    /// Human-readable title for the window.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::SolidMaterials => "Solid Materials",
            Self::Wireframe => "Wireframe",
            Self::VertexColors => "Vertex Colors",
            Self::Shapes => "Shapes",
            Self::Extrusion => "Extrusion",
            Self::DashedLines => "Dashed Lines",
            Self::Helpers => "Helpers",
            Self::Textures => "Textures",
            Self::TexturesRepeat => "Textures Repeat",
            Self::TextureAnimation => "Texture Animation",
            Self::TextureFromCanvas => "Texture From Canvas",
            Self::Skybox => "Skybox",
            Self::Translucence => "Translucence",
            Self::Shadow => "Shadow",
            Self::Sprites => "Sprites",
            Self::SpriteTextLabels => "Sprite Text Labels",
            Self::LabeledGeometry => "Labeled Geometry",
            Self::MouseHover => "Mouse Hover",
            Self::MouseClick => "Mouse Click",
            Self::MouseTooltip => "Mouse Tooltip",
            Self::MouseSprite => "Mouse Sprite",
            Self::KeyboardEvents => "Keyboard Events",
            Self::ChaseCamera => "Chase Camera",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|d| *d == self).unwrap_or(0)
    }

    /// The following demo, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// The preceding demo, wrapping around.
    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// A fresh instance of the demo.
    #[must_use]
    pub fn create(self) -> Box<dyn Demo> {
        match self {
            Self::SolidMaterials => Box::new(basic::SolidMaterials),
            Self::Wireframe => Box::new(basic::Wireframe),
            Self::VertexColors => Box::new(basic::VertexColors),
            Self::Shapes => Box::new(basic::Shapes),
            Self::Extrusion => Box::new(basic::Extrusion),
            Self::DashedLines => Box::new(basic::DashedLines),
            Self::Helpers => Box::new(basic::Helpers),
            Self::Textures => Box::new(textures::Textures),
            Self::TexturesRepeat => Box::new(textures::TexturesRepeat),
            Self::TextureAnimation => Box::new(textures::TextureAnimation::default()),
            Self::TextureFromCanvas => Box::new(textures::TextureFromCanvas),
            Self::Skybox => Box::new(textures::Skybox),
            Self::Translucence => Box::new(textures::Translucence),
            Self::Shadow => Box::new(textures::Shadow),
            Self::Sprites => Box::new(sprites::Sprites),
            Self::SpriteTextLabels => Box::new(sprites::SpriteTextLabels),
            Self::LabeledGeometry => Box::new(sprites::LabeledGeometry),
            Self::MouseHover => Box::new(interaction::MouseHover::default()),
            Self::MouseClick => Box::new(interaction::MouseClick::default()),
            Self::MouseTooltip => Box::new(interaction::MouseTooltip::default()),
            Self::MouseSprite => Box::new(interaction::MouseSprite::default()),
            Self::KeyboardEvents => Box::new(interaction::KeyboardEvents::default()),
            Self::ChaseCamera => Box::new(rigs::ChaseCameraDemo::default()),
        }
    }
}

impl fmt::Display for DemoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DemoId {
    type Err = VignetteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| VignetteError::UnknownDemo(s.to_owned()))
    }
}

/// Headless harness shared by the demo tests.
#[cfg(test)]
pub(crate) mod harness {
    use rand::SeedableRng;

    use super::*;

    /// A demo with its scene and the input it sees each frame.
    pub(crate) struct Harness {
        pub(crate) demo: Box<dyn Demo>,
        pub(crate) scene: Scene,
        pub(crate) setup: DemoSetup,
        pub(crate) camera: Camera,
        pub(crate) keyboard: KeyboardState,
        pub(crate) mouse: MouseState,
        pub(crate) elapsed: f32,
    }

    impl Harness {
        pub(crate) fn new(id: DemoId) -> Self {
            let mut demo = id.create();
            let mut scene = Scene::new();
            let labels = LabelPainter::without_font();
            let mut rng = StdRng::seed_from_u64(7);
            let setup = demo.setup(&mut SetupContext {
                scene: &mut scene,
                labels: &labels,
                rng: &mut rng,
            });
            let camera = Camera {
                eye: setup.eye,
                target: setup.target,
                aspect: 1.0,
                ..Camera::default()
            };
            let mut mouse = MouseState::new();
            mouse.set_viewport(800, 800);
            Self {
                demo,
                scene,
                setup,
                camera,
                keyboard: KeyboardState::new(),
                mouse,
                elapsed: 0.0,
            }
        }

        /// Run one frame of `dt` seconds, then clear per-frame input.
        pub(crate) fn step(&mut self, dt: f32) {
            self.elapsed += dt;
            self.demo.update(&mut FrameContext {
                scene: &mut self.scene,
                dt,
                elapsed: self.elapsed,
                keyboard: &self.keyboard,
                mouse: &self.mouse,
                camera: &mut self.camera,
            });
            self.keyboard.end_frame();
            self.mouse.end_frame();
        }

        /// Put the cursor over the projection of `world`.
        pub(crate) fn point_at(&mut self, world: Vec3) {
            let ndc = self.camera.project(world);
            let size = self.mouse.viewport();
            let x = (ndc.x + 1.0) * 0.5 * size.x;
            let y = (1.0 - ndc.y) * 0.5 * size.y;
            let _ = self.mouse.handle_mouse_position(x, y);
        }

        /// Press and release the left button without moving.
        pub(crate) fn click(&mut self) {
            self.mouse.handle_mouse_down();
            let _ = self.mouse.handle_mouse_up();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::harness::Harness;
    use super::*;

    #[test]
    fn names_round_trip_and_are_unique() {
        for id in DemoId::ALL {
            assert_eq!(id.name().parse::<DemoId>().ok(), Some(id));
        }
        let mut names: Vec<_> = DemoId::ALL.iter().map(|d| d.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DemoId::ALL.len());
        assert!(matches!(
            "no-such-demo".parse::<DemoId>(),
            Err(VignetteError::UnknownDemo(_))
        ));
    }

    #[test]
    fn next_and_prev_wrap() {
        let first = DemoId::ALL[0];
        let last = DemoId::ALL[DemoId::ALL.len() - 1];
        assert_eq!(last.next(), first);
        assert_eq!(first.prev(), last);
        for id in DemoId::ALL {
            assert_eq!(id.next().prev(), id);
        }
    }

    #[test]
    fn every_demo_builds_and_runs_headless() {
        for id in DemoId::ALL {
            let mut h = Harness::new(id);
            assert!(!h.scene.is_empty(), "{id} built an empty scene");
            assert!(
                h.scene.iter().iter().any(|w| w.node.as_mesh().is_some()),
                "{id} has nothing to draw"
            );
            for _ in 0..10 {
                h.step(1.0 / 60.0);
            }
        }
    }
}
