// src/sink/fs.rs
// =============================================================================
// Mirrors documents onto the local filesystem.
//
// Layout:
//   /redfish/v1                 -> <output>/index.json
//   /redfish/v1/Chassis         -> <output>/Chassis/index.json
//   /redfish/v1/Chassis/1/Power -> <output>/Chassis/1/Power/index.json
//
// The mapping is deterministic (re-crawling overwrites the same file) and
// reversible: identifier_for() turns a path back into the identifier.
// Documents are pretty-printed with 4-space indentation.
// =============================================================================

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

use super::ResourceSink;
use crate::error::{Error, Result};
use crate::resource::{ResourceIdentifier, ServiceRoot, SERVICE_ROOT_PATH};

/// Fixed file name inside every resource directory.
pub const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone)]
pub struct FsSink {
    output_root: PathBuf,
}

impl FsSink {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Where the document for `id` lives.
    ///
    /// Only identifiers under `/redfish/v1` have a location.
    pub fn location(&self, id: &ResourceIdentifier) -> Result<PathBuf> {
        let relative = id.relative_to_root().ok_or_else(|| Error::Persist {
            path: id.to_string(),
            message: format!("identifier is outside {}", SERVICE_ROOT_PATH),
        })?;

        let mut path = self.output_root.clone();
        // The service root itself has no segments
        if !relative.is_empty() {
            for segment in relative.split('/') {
                // Normalized identifiers have no empty or dot segments
                if segment.is_empty() || segment == "." || segment == ".." {
                    return Err(Error::Persist {
                        path: id.to_string(),
                        message: format!("identifier has an invalid segment '{}'", segment),
                    });
                }
                path.push(segment);
            }
        }
        path.push(INDEX_FILE);
        Ok(path)
    }

    /// Reverse of [`FsSink::location`].
    pub fn identifier_for(&self, path: &Path, root: &ServiceRoot) -> Option<ResourceIdentifier> {
        if path.file_name()? != INDEX_FILE {
            return None;
        }
        let dir = path.parent()?.strip_prefix(&self.output_root).ok()?;

        let mut id = SERVICE_ROOT_PATH.to_string();
        for component in dir.components() {
            match component {
                Component::Normal(segment) => {
                    id.push('/');
                    id.push_str(segment.to_str()?);
                }
                _ => return None,
            }
        }
        root.resolve(&id)
    }
}

fn to_pretty_json(document: &Value) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

#[async_trait]
impl ResourceSink for FsSink {
    async fn save(&self, id: &ResourceIdentifier, document: &Value) -> Result<PathBuf> {
        let file = self.location(id)?;
        let bytes = to_pretty_json(document)?;

        let persist_error = |e: std::io::Error| Error::Persist {
            path: file.display().to_string(),
            message: e.to_string(),
        };

        if let Some(dir) = file.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(persist_error)?;
        }
        tokio::fs::write(&file, bytes).await.map_err(persist_error)?;

        Ok(file)
    }
}
