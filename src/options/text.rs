use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Text", inline)]
#[serde(default)]
/// Font used for text sprites.
pub struct TextOptions {
    /// TrueType/OpenType font file. When unset, common system font
    /// locations are tried.
    #[schemars(skip)]
    pub font_path: Option<PathBuf>,
}
