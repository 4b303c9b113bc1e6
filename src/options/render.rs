use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Render", inline)]
#[serde(default)]
/// Renderer feature toggles and quality settings.
pub struct RenderOptions {
    /// Edge length of each shadow map layer in texels.
    #[schemars(title = "Shadow Map Size", range(min = 256, max = 4096))]
    pub shadow_map_size: u32,
    /// Render shadow maps for lights that cast shadows.
    #[schemars(title = "Shadows")]
    pub shadows: bool,
    /// Apply scene fog.
    #[schemars(title = "Fog")]
    pub fog: bool,
    /// Seconds between FPS log lines. 0 disables FPS logging.
    #[schemars(title = "FPS Log Interval", range(min = 0.0, max = 60.0), extend("step" = 1.0))]
    pub fps_log_interval: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            shadow_map_size: 1024,
            shadows: true,
            fog: true,
            fps_log_interval: 5.0,
        }
    }
}
