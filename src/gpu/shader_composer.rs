use std::borrow::Cow;
use std::fmt;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

/// A WGSL module failed to register or compose.
#[derive(Debug)]
pub struct ShaderError {
    /// File path of the failing module.
    pub file_path: String,
    /// Composer diagnostic.
    pub source: Box<ComposerError>,
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to compose '{}': {}", self.file_path, self.source)
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Top-level shaders composed by the renderer.
pub mod sources {
    /// Lit and unlit triangle meshes.
    pub const MESH: (&str, &str) = (include_str!("../../assets/shaders/mesh.wgsl"), "mesh.wgsl");
    /// Line segments, wireframes and dashed lines.
    pub const LINE: (&str, &str) = (include_str!("../../assets/shaders/line.wgsl"), "line.wgsl");
    /// Camera-facing textured quads.
    pub const SPRITE: (&str, &str) =
        (include_str!("../../assets/shaders/sprite.wgsl"), "sprite.wgsl");
    /// Depth-only shadow map pass.
    pub const SHADOW: (&str, &str) =
        (include_str!("../../assets/shaders/shadow.wgsl"), "shadow.wgsl");

    /// Every top-level shader, for composition checks.
    pub const ALL: [(&str, &str); 4] = [MESH, LINE, SPRITE, SHADOW];
}

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads all shared WGSL modules at construction time. Consuming
/// shaders use `#import vignette::module_name::{Item}` to pull in shared
/// code. The composer produces `naga::Module` IR directly, skipping WGSL
/// re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path)
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

impl ShaderComposer {
    /// Register the shared modules in dependency order.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if a shared module does not parse.
    pub fn new() -> Result<Self, ShaderError> {
        let mut composer = Composer::default();

        let modules: &[ModuleDef] = &[
            ModuleDef {
                source: include_str!("../../assets/shaders/modules/frame.wgsl"),
                file_path: "modules/frame.wgsl",
            },
            ModuleDef {
                source: include_str!("../../assets/shaders/modules/lighting.wgsl"),
                file_path: "modules/lighting.wgsl",
            },
            ModuleDef {
                source: include_str!("../../assets/shaders/modules/fog.wgsl"),
                file_path: "modules/fog.wgsl",
            },
        ];

        for m in modules {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| ShaderError {
                    file_path: m.file_path.to_owned(),
                    source: Box::new(e),
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, ShaderError> {
        let naga_module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a
    /// wgpu shader module. Useful for testing shader composition without a
    /// GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if composition fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, ShaderError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| ShaderError {
                file_path: file_path.to_owned(),
                source: Box::new(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in sources::ALL {
            let module = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| panic!("{e}"));
            assert!(module.entry_points.iter().any(|ep| ep.name == "vs_main"));
        }
    }

    #[test]
    fn composed_modules_validate() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in sources::ALL {
            let module = composer.compose_naga(source, file_path).unwrap();
            let mut validator = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::default(),
            );
            let _ = validator
                .validate(&module)
                .unwrap_or_else(|e| panic!("{file_path}: {e:?}"));
        }
    }

    #[test]
    fn broken_source_is_an_error() {
        let mut composer = ShaderComposer::new().unwrap();
        let err = composer
            .compose_naga("@vertex\nfn vs_main( -> {\n", "broken.wgsl")
            .unwrap_err();
        assert_eq!(err.file_path, "broken.wgsl");
        assert!(err.to_string().contains("broken.wgsl"));
    }
}
