use std::path::Path;

use crate::builder::{BuildOptions, NodeBuilder};
use crate::error::LoadError;
use crate::parser::parse_vtks;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.vtks` block text.
    Vtks,
    /// Dash component JSON.
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SourceFormat::Json,
            _ => SourceFormat::Vtks,
        }
    }
}

pub fn load_builder(src: &str, format: SourceFormat) -> Result<NodeBuilder, LoadError> {
    match format {
        SourceFormat::Vtks => Ok(parse_vtks(src)?),
        SourceFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(src)?;
            NodeBuilder::from_dash_json(&value)
        }
    }
}

/// Parses, builds and resolves a scene in one go.
pub fn load_scene(
    src: &str,
    format: SourceFormat,
    options: &BuildOptions,
) -> Result<Scene, LoadError> {
    let builder = load_builder(src, format)?;
    Ok(Scene::build(&builder, options)?)
}
