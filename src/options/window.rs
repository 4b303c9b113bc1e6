use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Window", inline)]
#[serde(default)]
/// Initial window size and presentation settings.
pub struct WindowOptions {
    /// Initial inner width in logical pixels.
    #[schemars(title = "Width", range(min = 320, max = 7680))]
    pub width: u32,
    /// Initial inner height in logical pixels.
    #[schemars(title = "Height", range(min = 240, max = 4320))]
    pub height: u32,
    /// Window title prefix; the active demo's title is appended.
    #[schemars(skip)]
    pub title: String,
    /// Present with vertical sync.
    #[schemars(title = "VSync")]
    pub vsync: bool,
    /// Demo shown at startup, by kebab-case name.
    #[schemars(skip)]
    pub start_demo: Option<String>,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "vignette".to_owned(),
            vsync: true,
            start_demo: None,
        }
    }
}
