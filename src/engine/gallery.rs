//! The GPU-free half of the engine: active demo, its scene, camera rig
//! and input.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::command::GalleryCommand;
use crate::camera::{Camera, OrbitController};
use crate::demos::{Demo, DemoId, DemoSetup, FrameContext, SetupContext};
use crate::input::{InputEvent, InputProcessor};
use crate::options::Options;
use crate::scene::Scene;
use crate::sprite::LabelPainter;

/// Seed for demo randomness, so each visit to a demo looks the same.
const DEMO_SEED: u64 = 0x5eed;

/// Runs one demo at a time against its own [`Scene`].
pub struct Gallery {
    options: Options,
    labels: LabelPainter,
    input: InputProcessor,
    active: DemoId,
    demo: Box<dyn Demo>,
    scene: Scene,
    orbit: OrbitController,
    viewport: (u32, u32),
    /// Seconds since the active demo started.
    elapsed: f32,
    quit_requested: bool,
}

impl Gallery {
    /// Start on `options.window.start_demo`, or the first demo when it is
    /// unset or unknown.
    #[must_use]
    pub fn new(options: Options, labels: LabelPainter) -> Self {
        let first = match options.window.start_demo.as_deref().map(str::parse::<DemoId>) {
            Some(Ok(id)) => id,
            Some(Err(e)) => {
                log::warn!("{e}; starting with {}", DemoId::default());
                DemoId::default()
            }
            None => DemoId::default(),
        };
        let viewport = (options.window.width, options.window.height);
        let input = InputProcessor::with_key_bindings(options.keybindings.clone());
        let (demo, scene, setup) = build(first, &labels);
        let orbit = orbit_for(&setup, &options, viewport);
        log::info!("demo {first}: {}", first.title());
        let mut gallery = Self {
            options,
            labels,
            input,
            active: first,
            demo,
            scene,
            orbit,
            viewport,
            elapsed: 0.0,
            quit_requested: false,
        };
        gallery.input.set_viewport(viewport.0, viewport.1);
        gallery
    }

    /// Replace the active demo with a fresh instance of `id`.
    pub fn switch_demo(&mut self, id: DemoId) {
        let (demo, scene, setup) = build(id, &self.labels);
        self.orbit = orbit_for(&setup, &self.options, self.viewport);
        self.demo = demo;
        self.scene = scene;
        self.active = id;
        self.elapsed = 0.0;
        log::info!("demo {id}: {}", id.title());
    }

    /// Apply a user command.
    pub fn execute(&mut self, command: GalleryCommand) {
        match command {
            GalleryCommand::RotateCamera { delta } => self.orbit.rotate(delta),
            GalleryCommand::PanCamera { delta } => self.orbit.pan(delta),
            GalleryCommand::Zoom { delta } => self.orbit.zoom(delta),
            GalleryCommand::NextDemo => self.switch_demo(self.active.next()),
            GalleryCommand::PreviousDemo => self.switch_demo(self.active.prev()),
            GalleryCommand::ResetCamera => self.orbit.reset(),
            GalleryCommand::ToggleAutoRotate => {
                let on = self.orbit.toggle_auto_rotate();
                log::info!("auto-rotate {}", if on { "on" } else { "off" });
            }
            GalleryCommand::Quit => self.quit_requested = true,
        }
    }

    /// Feed a window event through the input processor and apply any
    /// command it produces. Returns the command.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<GalleryCommand> {
        let command = self.input.handle_event(event)?;
        self.execute(command);
        Some(command)
    }

    /// Advance the camera rig and the demo by `dt` seconds, then clear
    /// this frame's input transitions.
    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        self.orbit.update(dt);
        self.demo.update(&mut FrameContext {
            scene: &mut self.scene,
            dt,
            elapsed: self.elapsed,
            keyboard: self.input.keyboard(),
            mouse: self.input.mouse(),
            camera: self.orbit.camera_mut(),
        });
        self.input.end_frame();
    }

    /// Track the viewport for the camera aspect and cursor mapping.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
        self.orbit.resize(width, height);
        self.input.set_viewport(width, height);
    }

    /// The demo being shown.
    #[must_use]
    pub fn active(&self) -> DemoId {
        self.active
    }

    /// The active demo's scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The camera the scene is drawn from.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        self.orbit.camera()
    }

    /// The orbit rig of the active demo.
    #[must_use]
    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }

    /// Options the gallery was started with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Whether a [`GalleryCommand::Quit`] has been executed.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

/// Instantiate `id` and let it build a fresh scene.
fn build(id: DemoId, labels: &LabelPainter) -> (Box<dyn Demo>, Scene, DemoSetup) {
    let mut demo = id.create();
    let mut scene = Scene::new();
    let mut rng = StdRng::seed_from_u64(DEMO_SEED);
    let setup = demo.setup(&mut SetupContext {
        scene: &mut scene,
        labels,
        rng: &mut rng,
    });
    log::debug!("{id}: {} nodes, {} textures", scene.len(), scene.textures().count());
    (demo, scene, setup)
}

fn orbit_for(setup: &DemoSetup, options: &Options, viewport: (u32, u32)) -> OrbitController {
    let camera = Camera {
        eye: setup.eye,
        target: setup.target,
        fovy: options.camera.fovy,
        znear: options.camera.znear,
        zfar: options.camera.zfar,
        ..Camera::default()
    };
    let mut orbit = OrbitController::new(camera, &options.camera);
    orbit.resize(viewport.0, viewport.1);
    orbit.set_enabled(setup.orbit);
    orbit
}
