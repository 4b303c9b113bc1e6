//! Gallery options with TOML preset support.
//!
//! Window, camera, renderer, text and keybinding settings are consolidated
//! here. Options serialize to/from TOML so a partial file can override a
//! single section.

mod camera;
mod render;
mod text;
mod window;

use std::path::Path;

pub use camera::CameraOptions;
pub use render::RenderOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use text::TextOptions;
pub use window::WindowOptions;

use crate::error::VignetteError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[render]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Window size and startup demo.
    pub window: WindowOptions,
    /// Camera projection and orbit-control parameters.
    pub camera: CameraOptions,
    /// Renderer feature toggles.
    pub render: RenderOptions,
    /// Font settings for text sprites.
    pub text: TextOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeyBindings,
}

impl Options {
    /// Generate JSON Schema describing the user-tunable options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VignetteError::Io`] if the file cannot be read and
    /// [`VignetteError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, VignetteError> {
        let content = std::fs::read_to_string(path).map_err(VignetteError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VignetteError::OptionsParse`] on malformed TOML or
    /// mistyped fields.
    pub fn from_toml(content: &str) -> Result<Self, VignetteError> {
        toml::from_str(content).map_err(|e| VignetteError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed), creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`VignetteError::OptionsParse`] if serialization fails and
    /// [`VignetteError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), VignetteError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VignetteError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VignetteError::Io)?;
        }
        std::fs::write(path, content).map_err(VignetteError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::command::GalleryCommand;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[render]
shadow_map_size = 2048

[window]
start_demo = "texture-animation"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.render.shadow_map_size, 2048);
        assert_eq!(opts.window.start_demo.as_deref(), Some("texture-animation"));
        // Everything else should be default
        assert!(opts.render.shadows);
        assert_eq!(opts.window.width, 1280);
        assert_eq!(opts.camera.fovy, 45.0);
        assert!(opts.text.font_path.is_none());
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[camera]\nfovy = \"wide\"").unwrap_err();
        assert!(matches!(err, VignetteError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("PageDown"),
            Some(GalleryCommand::NextDemo)
        );
        assert_eq!(opts.keybindings.lookup("Escape"), Some(GalleryCommand::Quit));
        assert_eq!(opts.keybindings.lookup("KeyW"), None);
    }

    #[test]
    fn keybindings_override_from_toml() {
        let toml_str = r#"
[keybindings.bindings]
KeyN = "next_demo"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.keybindings.lookup("KeyN"), Some(GalleryCommand::NextDemo));
        // A bindings table replaces the defaults wholesale.
        assert_eq!(opts.keybindings.lookup("PageDown"), None);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("vignette-opts-{}", std::process::id()));
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.camera.rotate_speed = 1.25;
        opts.save(&path).unwrap();
        assert_eq!(Options::load(&path).unwrap(), opts);
        assert_eq!(Options::list_presets(&dir), vec!["preset".to_owned()]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value = serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("window"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("render"));
        assert!(props.contains_key("text"));
        assert!(!props.contains_key("keybindings"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("damping").is_some());
        assert!(camera.get("znear").is_none());
    }
}
