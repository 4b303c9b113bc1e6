//! The gallery engine: a [`Gallery`] of demos drawn by a [`SceneRenderer`].

pub mod command;
mod gallery;

pub use self::gallery::Gallery;

use self::command::GalleryCommand;
use crate::camera::Camera;
use crate::demos::DemoId;
use crate::error::VignetteError;
use crate::gpu::render_context::RenderContext;
use crate::input::InputEvent;
use crate::options::Options;
use crate::renderer::SceneRenderer;
use crate::scene::Scene;
use crate::sprite::LabelPainter;
use crate::util::frame_timing::FrameTiming;

/// Owns the GPU side of the gallery and drives the active demo.
///
/// # Frame loop
///
/// Forward window events to [`handle_input`](Self::handle_input), then
/// once per frame call [`update`](Self::update) followed by
/// [`render`](Self::render). Call [`resize`](Self::resize) when the
/// window size changes.
pub struct GalleryEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    renderer: SceneRenderer,
    gallery: Gallery,
    /// Per-frame timing and FPS reporting.
    frame_timing: FrameTiming,
}

impl GalleryEngine {
    /// Engine presenting to `window`.
    ///
    /// # Errors
    ///
    /// Returns [`VignetteError`] if GPU initialization or shader
    /// composition fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, VignetteError> {
        let context = RenderContext::new(window, size, options.window.vsync).await?;
        Self::from_context(context, options)
    }

    /// Engine from a pre-built [`RenderContext`], e.g. one made with
    /// [`RenderContext::from_device`] for texture-only rendering.
    ///
    /// # Errors
    ///
    /// Returns [`VignetteError::Shader`] if a shader fails to compose.
    pub fn from_context(context: RenderContext, options: Options) -> Result<Self, VignetteError> {
        let renderer = SceneRenderer::new(&context, &options.render)?;
        let labels = LabelPainter::new(options.text.font_path.as_deref());
        let frame_timing = FrameTiming::new(options.render.fps_log_interval);
        let mut gallery = Gallery::new(options, labels);
        let (width, height) = context.size();
        gallery.resize(width, height);
        Ok(Self {
            context,
            renderer,
            gallery,
            frame_timing,
        })
    }

    /// Process a platform-agnostic input event. Demo switches also drop
    /// the GPU caches of the old scene.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<GalleryCommand> {
        let before = self.gallery.active();
        let command = self.gallery.handle_input(event);
        if self.gallery.active() != before {
            self.renderer.clear();
        }
        command
    }

    /// Apply a command directly.
    pub fn execute(&mut self, command: GalleryCommand) {
        let before = self.gallery.active();
        self.gallery.execute(command);
        if self.gallery.active() != before {
            self.renderer.clear();
        }
    }

    /// Show `id`, dropping the current demo and its GPU resources.
    pub fn switch_demo(&mut self, id: DemoId) {
        self.renderer.clear();
        self.gallery.switch_demo(id);
    }

    /// Advance the camera and the active demo by the time since the last
    /// update.
    pub fn update(&mut self) {
        let dt = self.frame_timing.tick();
        self.gallery.update(dt);
        if let Some(fps) = self.frame_timing.take_report() {
            log::info!(
                "{}: {fps:.1} fps, {} draws",
                self.gallery.active(),
                self.renderer.draw_count()
            );
        }
    }

    /// Draw the active scene and present it.
    ///
    /// # Errors
    ///
    /// Returns the surface error when no frame could be acquired; callers
    /// resize on `Lost` or `Outdated`.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.render_to_texture(&view);
        frame.present();
        Ok(())
    }

    /// Draw the active scene into a caller-owned view. No present happens.
    pub fn render_to_texture(&mut self, view: &wgpu::TextureView) {
        self.renderer
            .prepare(&self.context, self.gallery.scene(), self.gallery.camera());
        let mut encoder = self.context.create_encoder();
        self.renderer.render(&mut encoder, view);
        self.context.submit(encoder);
    }

    /// Resize the surface, depth buffer and camera projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.context.resize(width, height);
            self.renderer.resize(&self.context.device, width, height);
            self.gallery.resize(width, height);
        }
    }

    /// The demo being shown.
    #[must_use]
    pub fn active_demo(&self) -> DemoId {
        self.gallery.active()
    }

    /// The active demo's scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        self.gallery.scene()
    }

    /// The camera the scene is drawn from.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        self.gallery.camera()
    }

    /// Options the engine was started with.
    #[must_use]
    pub fn options(&self) -> &Options {
        self.gallery.options()
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// Whether the user asked to close the gallery.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.gallery.quit_requested()
    }
}
